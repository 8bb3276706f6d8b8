//! Type mapping onto the Python `ctypes` module.

use ctbind_ast::{CursorId, TokenKind, Type, TypeId, TypeKind};
use ctbind_decl::DeclIndex;

use super::{ArrayLen, TypeExpr, TypeMapper};

/// Maps parsed C types to [`TypeExpr`] values.
///
/// Declared types render under the alias of their declaration, so renames
/// applied to the [`DeclIndex`] reach every reference.
#[derive(Debug, Clone, Copy)]
pub struct CTypesMapper<'a> {
    index: &'a DeclIndex,
}

impl<'a> CTypesMapper<'a> {
    pub fn new(index: &'a DeclIndex) -> Self {
        Self { index }
    }

    fn map_type(&self, id: TypeId, owner: Option<CursorId>, bracket_group: usize) -> TypeExpr {
        let ty = self.index.unit().ty(id);
        if let Some(symbol) = primitive(ty.kind) {
            return TypeExpr::Primitive(symbol);
        }
        match ty.kind {
            TypeKind::Void => TypeExpr::Void,
            TypeKind::Elaborated => match ty.declaration.and_then(|cursor| self.declared(cursor)) {
                Some(resolved) if resolved != id => self.map_type(resolved, None, 0),
                _ => self.named(ty),
            },
            TypeKind::Pointer => match ty.pointee {
                Some(pointee) => self.map_pointer(pointee),
                None => TypeExpr::Unknown(ty.spelling.clone()),
            },
            TypeKind::ConstantArray => {
                let Some(element) = ty.element else {
                    return TypeExpr::Unknown(ty.spelling.clone());
                };
                let element = self.map_type(element, owner, bracket_group + 1);
                let count = owner
                    .and_then(|owner| self.symbolic_count(owner, bracket_group))
                    .unwrap_or(ArrayLen::Literal(ty.element_count.unwrap_or(0)));
                TypeExpr::ConstantArray {
                    element: Box::new(element),
                    count,
                }
            }
            TypeKind::FunctionProto => self.signature(ty),
            _ => self.named(ty),
        }
    }

    fn map_pointer(&self, pointee: TypeId) -> TypeExpr {
        let target = self.index.unit().ty(pointee);
        match target.kind {
            kind if kind.is_narrow_char() => TypeExpr::Primitive("c_char_p"),
            TypeKind::WChar => TypeExpr::Primitive("c_wchar_p"),
            TypeKind::Void => TypeExpr::Primitive("c_void_p"),
            TypeKind::FunctionProto => self.signature(target),
            _ => TypeExpr::Pointer(Box::new(self.map_type(pointee, None, 0))),
        }
    }

    fn signature(&self, ty: &Type) -> TypeExpr {
        let result = match ty.result {
            Some(result) => self.map_type(result, None, 0),
            None => TypeExpr::Void,
        };
        let params = ty
            .arguments
            .iter()
            .map(|&arg| self.map_type(arg, None, 0))
            .collect();
        TypeExpr::FunctionSignature {
            result: Box::new(result),
            params,
        }
    }

    /// The type introduced by a declaration cursor.
    fn declared(&self, cursor: CursorId) -> Option<TypeId> {
        self.index.unit().get_cursor(cursor)?.ty
    }

    /// A type referenced by name: records, enums, typedefs and anything
    /// without a mapping.
    fn named(&self, ty: &Type) -> TypeExpr {
        match ty.declaration {
            Some(declaration) => {
                let name = match self.index.lookup(declaration) {
                    Some(id) => self.index.get(id).alias().to_string(),
                    None => strip_tag(&ty.spelling).to_string(),
                };
                TypeExpr::Opaque { name, declaration }
            }
            None => TypeExpr::Unknown(strip_tag(&ty.spelling).to_string()),
        }
    }

    /// The macro name written between the `group`-th pair of top-level
    /// brackets of the owner's tokens.
    fn symbolic_count(&self, owner: CursorId, group: usize) -> Option<ArrayLen> {
        let unit = self.index.unit();
        unit.get_cursor(owner)?;

        let mut depth = 0usize;
        let mut seen = 0usize;
        let mut contents = Vec::new();
        for token in unit.cursor_tokens(owner).filter(|token| !token.is_comment()) {
            if token.is_punct("[") {
                depth += 1;
                if depth == 1 {
                    seen += 1;
                    continue;
                }
            } else if token.is_punct("]") {
                depth = depth.saturating_sub(1);
                if depth == 0 && seen == group + 1 {
                    break;
                }
            }
            if depth > 0 && seen == group + 1 {
                contents.push(token);
            }
        }

        match contents.as_slice() {
            [token] if token.kind == TokenKind::Identifier => {
                let declaration = self
                    .index
                    .select()
                    .macros()
                    .named(&token.spelling)
                    .iter()
                    .next()
                    .map(|decl| decl.cursor());
                Some(ArrayLen::Symbol {
                    name: token.spelling.clone(),
                    declaration,
                })
            }
            _ => None,
        }
    }
}

impl TypeMapper for CTypesMapper<'_> {
    fn language(&self) -> &'static str {
        "python"
    }

    fn map(&self, ty: TypeId, owner: Option<CursorId>) -> TypeExpr {
        self.map_type(ty, owner, 0)
    }
}

fn primitive(kind: TypeKind) -> Option<&'static str> {
    let symbol = match kind {
        TypeKind::Bool => "c_bool",
        TypeKind::CharS | TypeKind::SChar => "c_char",
        TypeKind::CharU | TypeKind::UChar => "c_ubyte",
        TypeKind::Double => "c_double",
        TypeKind::Float => "c_float",
        TypeKind::Int => "c_int",
        TypeKind::Long => "c_long",
        TypeKind::LongDouble => "c_longdouble",
        TypeKind::LongLong => "c_longlong",
        TypeKind::Short => "c_short",
        TypeKind::UInt => "c_uint",
        TypeKind::ULong => "c_ulong",
        TypeKind::ULongLong => "c_ulonglong",
        TypeKind::UShort => "c_ushort",
        TypeKind::WChar => "c_wchar",
        _ => return None,
    };
    Some(symbol)
}

fn strip_tag(spelling: &str) -> &str {
    ["struct ", "union ", "enum "]
        .iter()
        .find_map(|tag| spelling.strip_prefix(tag))
        .unwrap_or(spelling)
}
