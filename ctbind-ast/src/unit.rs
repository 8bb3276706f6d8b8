//! The translation unit: cursor arena, type table and token stream.

use serde::{Deserialize, Serialize};

use crate::{Cursor, CursorId, Error, Result, Token, Type, TypeId};

/// One parsed header together with everything it pulled in.
///
/// Ids handed out by [`crate::TranslationUnitBuilder`] are always valid;
/// units read from JSON are checked by [`TranslationUnit::from_json`], so the
/// accessors index directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Path of the main file that was parsed.
    spelling: String,
    #[serde(default)]
    cursors: Vec<Cursor>,
    #[serde(default)]
    types: Vec<Type>,
    #[serde(default)]
    tokens: Vec<Token>,
    /// Top-level cursors in parser order.
    #[serde(default)]
    root: Vec<CursorId>,
}

impl TranslationUnit {
    pub(crate) fn from_parts(
        spelling: String,
        cursors: Vec<Cursor>,
        types: Vec<Type>,
        tokens: Vec<Token>,
        root: Vec<CursorId>,
    ) -> Self {
        Self {
            spelling,
            cursors,
            types,
            tokens,
            root,
        }
    }

    /// Load a translation unit from its JSON form and check internal references.
    pub fn from_json(json: &str) -> Result<Self> {
        let unit: TranslationUnit = serde_json::from_str(json)?;
        unit.validate()?;
        Ok(unit)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Path of the main file.
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn cursor(&self, id: CursorId) -> &Cursor {
        &self.cursors[id.index()]
    }

    pub fn get_cursor(&self, id: CursorId) -> Option<&Cursor> {
        self.cursors.get(id.index())
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// Top-level cursors, in the order the parser produced them.
    pub fn top_level(&self) -> &[CursorId] {
        &self.root
    }

    pub fn children(&self, id: CursorId) -> &[CursorId] {
        &self.cursor(id).children
    }

    /// Every cursor id in the arena.
    pub fn cursor_ids(&self) -> impl Iterator<Item = CursorId> + '_ {
        (0..self.cursors.len() as u32).map(CursorId)
    }

    /// The whole token stream, comments included.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens lying within the extent of a cursor, in source order.
    pub fn cursor_tokens(&self, id: CursorId) -> impl Iterator<Item = &Token> + '_ {
        let extent = self.cursor(id).extent.clone();
        self.tokens
            .iter()
            .filter(move |token| extent.contains(&token.extent))
    }

    /// Declaration naming a type, if any.
    pub fn type_declaration(&self, id: TypeId) -> Option<CursorId> {
        self.ty(id).declaration
    }

    /// Check that every id stored in the unit points into its arenas.
    pub fn validate(&self) -> Result<()> {
        let check_cursor = |referrer: &dyn Fn() -> String, id: CursorId| {
            if id.index() < self.cursors.len() {
                Ok(())
            } else {
                Err(Error::DanglingCursor {
                    referrer: referrer(),
                    missing: id,
                })
            }
        };
        let check_type = |referrer: &dyn Fn() -> String, id: TypeId| {
            if id.index() < self.types.len() {
                Ok(())
            } else {
                Err(Error::DanglingType {
                    referrer: referrer(),
                    missing: id,
                })
            }
        };

        for &id in &self.root {
            check_cursor(&|| "translation unit".to_string(), id)?;
        }
        for (index, cursor) in self.cursors.iter().enumerate() {
            let referrer = || format!("cursor {} ('{}')", index, cursor.spelling);
            for &child in &cursor.children {
                check_cursor(&referrer, child)?;
            }
            for ty in [cursor.ty, cursor.underlying_type].into_iter().flatten() {
                check_type(&referrer, ty)?;
            }
        }
        for (index, ty) in self.types.iter().enumerate() {
            let referrer = || format!("type {} ('{}')", index, ty.spelling);
            let linked = [ty.pointee, ty.element, ty.result];
            for id in linked.into_iter().flatten().chain(ty.arguments.iter().copied()) {
                check_type(&referrer, id)?;
            }
            if let Some(declaration) = ty.declaration {
                check_cursor(&referrer, declaration)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CursorKind, SourceRange, TranslationUnitBuilder, TypeKind};

    fn sample() -> TranslationUnit {
        let mut builder = TranslationUnitBuilder::new("sample.h");
        builder.lex("typedef int INT_TYPEDEF; // counter\n");
        let int = builder.builtin(TypeKind::Int);
        builder.add_cursor(
            None,
            Cursor::new(
                CursorKind::TypedefDecl,
                "INT_TYPEDEF",
                SourceRange::in_file("sample.h", (1, 1), (1, 24)),
            )
            .with_underlying_type(int),
        );
        builder.build()
    }

    #[test]
    fn test_json_round_trip_preserves_unit() {
        let unit = sample();
        let json = unit.to_json().unwrap();
        let loaded = TranslationUnit::from_json(&json).unwrap();
        assert_eq!(loaded, unit);
    }

    #[test]
    fn test_from_json_rejects_dangling_ids() {
        let json = r#"{
            "spelling": "bad.h",
            "cursors": [{
                "kind": "typedef_decl",
                "spelling": "T",
                "extent": {
                    "start": {"file": "bad.h", "line": 1, "column": 1},
                    "end": {"file": "bad.h", "line": 1, "column": 10}
                },
                "underlying_type": 7
            }],
            "root": [0]
        }"#;
        let err = TranslationUnit::from_json(json).unwrap_err();
        assert!(matches!(err, Error::DanglingType { .. }));
    }

    #[test]
    fn test_cursor_tokens_stay_within_extent() {
        let unit = sample();
        let id = unit.top_level()[0];
        let spellings: Vec<&str> = unit
            .cursor_tokens(id)
            .map(|token| token.spelling.as_str())
            .collect();
        assert_eq!(spellings, vec!["typedef", "int", "INT_TYPEDEF"]);
    }
}
