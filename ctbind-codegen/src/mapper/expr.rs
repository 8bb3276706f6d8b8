//! Renderable ctypes type expressions.

use std::fmt;

use ctbind_ast::CursorId;

/// Element count of a constant array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayLen {
    /// The count as computed by the parser.
    Literal(u64),
    /// The count as written in source, a macro name such as `DCTSIZE2`.
    Symbol {
        name: String,
        /// The macro definition, when the translation unit has one.
        declaration: Option<CursorId>,
    },
}

impl fmt::Display for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayLen::Literal(count) => write!(f, "{count}"),
            ArrayLen::Symbol { name, .. } => f.write_str(name),
        }
    }
}

/// How a C type is spelled in generated Python.
///
/// Besides its text, each expression knows the imports it needs and the
/// declarations it names; both propagate through nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A `ctypes` primitive such as `c_int` or `c_char_p`.
    Primitive(&'static str),
    /// `POINTER(pointee)`.
    Pointer(Box<TypeExpr>),
    /// `element * count`.
    ConstantArray {
        element: Box<TypeExpr>,
        count: ArrayLen,
    },
    /// `CFUNCTYPE(result, params...)`.
    FunctionSignature {
        result: Box<TypeExpr>,
        params: Vec<TypeExpr>,
    },
    /// `None`, the ctypes spelling of `void`.
    Void,
    /// A declared record, enum or typedef, referenced by name.
    Opaque { name: String, declaration: CursorId },
    /// A type with no mapping, rendered as its C spelling.
    Unknown(String),
}

impl TypeExpr {
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// `(module, symbol)` pairs the rendered text needs.
    pub fn imports(&self) -> Vec<(&'static str, &'static str)> {
        let mut imports = Vec::new();
        self.collect_imports(&mut imports);
        imports
    }

    /// Cursors of the declarations named in the rendered text.
    pub fn dependencies(&self) -> Vec<CursorId> {
        let mut dependencies = Vec::new();
        self.collect_dependencies(&mut dependencies);
        dependencies
    }

    fn collect_imports(&self, out: &mut Vec<(&'static str, &'static str)>) {
        match self {
            TypeExpr::Primitive(symbol) => out.push(("ctypes", symbol)),
            TypeExpr::Pointer(pointee) => {
                out.push(("ctypes", "POINTER"));
                pointee.collect_imports(out);
            }
            TypeExpr::ConstantArray { element, .. } => element.collect_imports(out),
            TypeExpr::FunctionSignature { result, params } => {
                out.push(("ctypes", "CFUNCTYPE"));
                result.collect_imports(out);
                for param in params {
                    param.collect_imports(out);
                }
            }
            TypeExpr::Void | TypeExpr::Opaque { .. } | TypeExpr::Unknown(_) => {}
        }
    }

    fn collect_dependencies(&self, out: &mut Vec<CursorId>) {
        match self {
            TypeExpr::Pointer(pointee) => pointee.collect_dependencies(out),
            TypeExpr::ConstantArray { element, count } => {
                element.collect_dependencies(out);
                if let ArrayLen::Symbol {
                    declaration: Some(declaration),
                    ..
                } = count
                {
                    out.push(*declaration);
                }
            }
            TypeExpr::FunctionSignature { result, params } => {
                result.collect_dependencies(out);
                for param in params {
                    param.collect_dependencies(out);
                }
            }
            TypeExpr::Opaque { declaration, .. } => out.push(*declaration),
            TypeExpr::Primitive(_) | TypeExpr::Void | TypeExpr::Unknown(_) => {}
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(symbol) => f.write_str(symbol),
            TypeExpr::Pointer(pointee) => write!(f, "POINTER({pointee})"),
            TypeExpr::ConstantArray { element, count } => write!(f, "{element} * {count}"),
            TypeExpr::FunctionSignature { result, params } => {
                write!(f, "CFUNCTYPE({result}")?;
                for param in params {
                    write!(f, ", {param}")?;
                }
                f.write_str(")")
            }
            TypeExpr::Void => f.write_str("None"),
            TypeExpr::Opaque { name, .. } => f.write_str(name),
            TypeExpr::Unknown(spelling) => f.write_str(spelling),
        }
    }
}
