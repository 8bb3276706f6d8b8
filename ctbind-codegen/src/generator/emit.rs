//! Per-kind code for included declarations.

use ctbind_ast::{CursorKind, SourceRange, TokenKind, TypeId};
use ctbind_core::{DeclKind, DefinitionMode};
use ctbind_decl::DeclId;
use tracing::debug;

use super::{CTypesGenerator, literal::python_int};
use crate::{
    Error, Result,
    builder::CodeBuilder,
    comment::{python_comment, with_right_comment},
    mapper::{TypeExpr, TypeMapper},
};

/// Blank lines requested before and after each kind of top-level item.
fn spacing(kind: DeclKind) -> (usize, usize) {
    match kind {
        DeclKind::Enum => (2, 1),
        DeclKind::Struct | DeclKind::Union | DeclKind::Opaque => (2, 2),
        DeclKind::Function => (1, 1),
        _ => (0, 0),
    }
}

impl CTypesGenerator<'_> {
    pub(super) fn emit_declaration(&mut self, id: DeclId, body: &mut CodeBuilder) -> Result<()> {
        let decl = self.index.get(id);
        let (before, after) = spacing(decl.kind());
        body.pad_to(before);
        match decl.kind() {
            DeclKind::Enum => self.enum_code(id, body)?,
            DeclKind::Struct => self.record_code(id, "Structure", body)?,
            DeclKind::Union => self.record_code(id, "Union", body)?,
            DeclKind::Typedef => self.typedef_code(id, body)?,
            DeclKind::Function => self.function_code(id, body)?,
            DeclKind::Macro => self.macro_code(id, body)?,
            DeclKind::Opaque => self.opaque_code(id, body),
            kind @ (DeclKind::Field | DeclKind::Parameter | DeclKind::EnumConstant) => {
                return Err(Error::UnsupportedKind {
                    name: decl.name().to_string(),
                    kind,
                });
            }
        }
        body.pad_to(after);
        Ok(())
    }

    fn enum_code(&mut self, id: DeclId, body: &mut CodeBuilder) -> Result<()> {
        let index = self.index;
        let decl = index.get(id);
        let constants: Vec<(DeclId, i64)> = index
            .enum_constants(id)
            .into_iter()
            .filter_map(|constant| match index.cursor(constant).enum_value {
                Some(value) => Some((constant, value)),
                None => {
                    debug!(constant = %index.get(constant).name(), "enum constant has no value");
                    None
                }
            })
            .collect();

        // anonymous enums only declare constants
        if index.cursor(id).is_anonymous() {
            for &(constant, value) in &constants {
                let name = index.get(constant).alias();
                self.commented(constant, &format!("{name} = {value}"), body)?;
                if decl.is_exported() {
                    self.exports.add(name);
                }
            }
            return Ok(());
        }

        let enum_name = decl.alias();
        self.imports.add("enum", "IntFlag");
        if decl.is_exported() {
            self.exports.add(enum_name);
        }
        self.above_comment(decl.extent(), body)?;
        body.push_line(&format!("class {enum_name}(IntFlag):"));
        body.push_indent();
        if constants.is_empty() {
            body.push_line("pass");
        }
        for &(constant, value) in &constants {
            let name = index.get(constant).alias();
            self.commented(constant, &format!("{name} = {value}"), body)?;
        }
        body.push_dedent();
        if !constants.is_empty() {
            body.push_blank().push_blank();
        }
        for &(constant, _) in &constants {
            let name = index.get(constant).alias();
            body.push_line(&format!("{name} = {enum_name}.{name}"));
        }
        Ok(())
    }

    fn record_code(&mut self, id: DeclId, base: &str, body: &mut CodeBuilder) -> Result<()> {
        let decl = self.index.get(id);
        let name = decl.alias();
        let fields = self.index.fields(id);

        match decl.mode() {
            DefinitionMode::ForwardOnly => {
                if fields.is_empty() {
                    body.push_line("# Forward declaration");
                } else {
                    body.push_line("# Forward declaration. Definition of _fields_ will appear later.");
                }
                self.imports.add("ctypes", base);
                body.push_line(&format!("class {name}({base}):"));
                body.push_indent().push_line("pass").push_dedent();
            }
            DefinitionMode::Full => {
                self.imports.add("ctypes", base);
                self.above_comment(decl.extent(), body)?;
                body.push_line(&format!("class {name}({base}):"));
                body.push_indent();
                if fields.is_empty() {
                    body.push_line("pass");
                } else {
                    body.push_line("_fields_ = (");
                    self.fields_code(&fields, body)?;
                    body.push_line(")");
                }
                body.push_dedent();
            }
            DefinitionMode::DefinitionOnly => {
                if !fields.is_empty() {
                    body.push_line(&format!("{name}._fields_ = ("));
                    self.fields_code(&fields, body)?;
                    body.push_line(")");
                }
            }
        }

        if decl.is_exported() {
            self.exports.add(name);
        }
        Ok(())
    }

    /// Field descriptors one level deeper than the current indentation,
    /// separated by blank lines.
    fn fields_code(&mut self, fields: &[DeclId], body: &mut CodeBuilder) -> Result<()> {
        body.push_indent();
        for (position, &field) in fields.iter().enumerate() {
            if position > 0 {
                body.push_blank();
            }
            let expr = self.declared_expr(field)?;
            self.load_imports(&expr);
            self.check_dependencies(&expr, field);
            let name = self.index.get(field).alias();
            self.commented(field, &format!("(\"{name}\", {expr}),"), body)?;
        }
        body.push_dedent();
        Ok(())
    }

    fn typedef_code(&mut self, id: DeclId, body: &mut CodeBuilder) -> Result<()> {
        let decl = self.index.get(id);
        let expr = self.declared_expr(id)?;
        let rendered = expr.render();
        if decl.alias() == rendered {
            debug!(typedef = %decl.alias(), "skipping no-op typedef");
            return Ok(());
        }
        self.load_imports(&expr);
        self.check_dependencies(&expr, id);
        if decl.is_exported() {
            self.exports.add(decl.alias());
        }
        self.commented(id, &format!("{} = {rendered}", decl.alias()), body)
    }

    fn function_code(&mut self, id: DeclId, body: &mut CodeBuilder) -> Result<()> {
        let decl = self.index.get(id);
        let library = self
            .config
            .library
            .as_ref()
            .ok_or_else(|| Error::MissingLibrary {
                function: decl.name().to_string(),
            })?;
        let alias = decl.alias();
        let binding = format!("{alias} = {}.{}", library.handle, decl.name());

        let result = match self.result_type(id) {
            Some(result) => self.mapper.map(result, None),
            None => TypeExpr::Void,
        };
        self.load_imports(&result);
        self.check_dependencies(&result, id);

        let mut params = Vec::new();
        for parameter in self.index.parameters(id) {
            let expr = self.declared_expr(parameter)?;
            self.load_imports(&expr);
            self.check_dependencies(&expr, id);
            params.push(expr);
        }

        self.commented(id, &binding, body)?;
        body.push_line(&format!("{alias}.restype = {result}"));
        if params.is_empty() {
            body.push_line(&format!("{alias}.argtypes = []"));
        } else {
            body.push_line(&format!("{alias}.argtypes = ["));
            body.push_indent();
            for param in &params {
                body.push_line(&format!("{param},"));
            }
            body.push_dedent();
            body.push_line("]");
        }

        if decl.is_exported() {
            self.exports.add(alias);
        }
        Ok(())
    }

    /// The result type of a function: the prototype's result, or the type
    /// named by a type-reference child.
    fn result_type(&self, id: DeclId) -> Option<TypeId> {
        let unit = self.index.unit();
        let cursor = self.index.cursor(id);
        cursor
            .ty
            .and_then(|ty| unit.ty(ty).result)
            .or_else(|| {
                cursor
                    .children
                    .iter()
                    .map(|&child| unit.cursor(child))
                    .find(|child| child.kind == CursorKind::TypeRef)
                    .and_then(|child| child.ty)
            })
    }

    fn macro_code(&mut self, id: DeclId, body: &mut CodeBuilder) -> Result<()> {
        let decl = self.index.get(id);
        let name = decl.name();
        let tokens: Vec<_> = self
            .index
            .unit()
            .cursor_tokens(decl.cursor())
            .filter(|token| !token.is_comment())
            .skip_while(|token| !(token.kind == TokenKind::Identifier && token.spelling == name))
            .skip(1)
            .collect();

        let value = match tokens.as_slice() {
            [literal] if literal.kind == TokenKind::Literal => python_int(&literal.spelling),
            [minus, literal] if minus.is_punct("-") && literal.kind == TokenKind::Literal => {
                python_int(&literal.spelling).map(|value| format!("-{value}"))
            }
            _ => None,
        };
        let Some(value) = value else {
            debug!(%name, tokens = tokens.len(), "skipping unsupported macro");
            return Ok(());
        };

        if decl.is_exported() {
            self.exports.add(decl.alias());
        }
        self.commented(id, &format!("{} = {value}", decl.alias()), body)
    }

    fn opaque_code(&mut self, id: DeclId, body: &mut CodeBuilder) {
        let decl = self.index.get(id);
        let base = match self.index.unit().cursor(decl.cursor()).kind {
            CursorKind::UnionDecl => "Union",
            _ => "Structure",
        };
        self.imports.add("ctypes", base);
        body.push_line("# Opaque type");
        body.push_line(&format!("class {}({base}):", decl.alias()));
        body.push_indent().push_line("pass").push_dedent();
        if decl.is_exported() {
            self.exports.add(decl.alias());
        }
    }

    /// The mapped type of a field, parameter or typedef.
    fn declared_expr(&self, id: DeclId) -> Result<TypeExpr> {
        let decl = self.index.get(id);
        let ty = self
            .index
            .declared_type(id)
            .ok_or_else(|| Error::MissingType {
                name: decl.name().to_string(),
                kind: decl.kind(),
            })?;
        Ok(self.mapper.map(ty, Some(decl.cursor())))
    }

    /// `code` with the comments written above and to the right of the
    /// declaration in source.
    fn commented(&self, id: DeclId, code: &str, body: &mut CodeBuilder) -> Result<()> {
        let extent = self.index.get(id).extent();
        self.above_comment(extent, body)?;
        match self.index.comments().right_of(extent)? {
            Some(token) => body.push_lines(with_right_comment(code, token)),
            None => body.push_line(code),
        };
        Ok(())
    }

    fn above_comment(&self, extent: &SourceRange, body: &mut CodeBuilder) -> Result<()> {
        if let Some(token) = self.index.comments().above(extent)? {
            body.push_lines(python_comment(token));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_by_kind() {
        assert_eq!(spacing(DeclKind::Struct), (2, 2));
        assert_eq!(spacing(DeclKind::Opaque), (2, 2));
        assert_eq!(spacing(DeclKind::Enum), (2, 1));
        assert_eq!(spacing(DeclKind::Function), (1, 1));
        assert_eq!(spacing(DeclKind::Typedef), (0, 0));
        assert_eq!(spacing(DeclKind::Macro), (0, 0));
    }
}
