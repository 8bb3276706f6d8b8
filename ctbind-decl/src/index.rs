//! The declaration arena of one translation unit.

use std::collections::{HashMap, VecDeque};

use ctbind_ast::{Cursor, CursorId, CursorKind, TranslationUnit, TypeId, TypeKind};
use ctbind_core::{DeclKind, DefinitionMode};
use tracing::{debug, trace};

use crate::{CommentIndex, DeclId, Declaration, Error, Result, Selection};

/// Every declaration of a translation unit, wrapped once and addressed by [`DeclId`].
///
/// Owns the translation unit and its [`CommentIndex`]. One index serves one
/// generation session; the only state that changes after construction is
/// what callers set through `include*` and [`rename`](Self::rename).
#[derive(Debug, Clone)]
pub struct DeclIndex {
    unit: TranslationUnit,
    comments: CommentIndex,
    decls: Vec<Declaration>,
    by_cursor: HashMap<CursorId, DeclId>,
    /// Opaque placeholders by the cursor of the type they stand in for.
    opaque_for: HashMap<CursorId, DeclId>,
    /// Forward placeholders by the record they were split from.
    forward_for: HashMap<DeclId, DeclId>,
    /// Top-level declarations in selection order.
    order: Vec<DeclId>,
}

impl DeclIndex {
    pub fn new(unit: TranslationUnit) -> Self {
        let comments = CommentIndex::build(unit.tokens());
        let mut decls = Vec::new();
        let mut by_cursor = HashMap::new();

        let mut stack: Vec<CursorId> = unit.top_level().iter().rev().copied().collect();
        while let Some(cursor_id) = stack.pop() {
            let cursor = unit.cursor(cursor_id);
            if let Some(kind) = decl_kind(cursor.kind) {
                let id = DeclId(decls.len());
                decls.push(
                    Declaration::builder(cursor_id, kind, decl_name(&unit, cursor))
                        .extent(cursor.extent.clone())
                        .definition(cursor.is_definition)
                        .build(id),
                );
                by_cursor.insert(cursor_id, id);
            }
            stack.extend(cursor.children.iter().rev().copied());
        }

        let order = selection_order(&unit, &by_cursor);
        trace!(
            declarations = decls.len(),
            top_level = order.len(),
            comments = comments.len(),
            "indexed translation unit"
        );

        Self {
            unit,
            comments,
            decls,
            by_cursor,
            opaque_for: HashMap::new(),
            forward_for: HashMap::new(),
            order,
        }
    }

    pub fn unit(&self) -> &TranslationUnit {
        &self.unit
    }

    pub fn comments(&self) -> &CommentIndex {
        &self.comments
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    /// The cursor wrapped by a declaration.
    pub fn cursor(&self, id: DeclId) -> &Cursor {
        self.unit.cursor(self.get(id).cursor())
    }

    /// The declaration wrapping `cursor`, if it is a declaration cursor.
    pub fn lookup(&self, cursor: CursorId) -> Option<DeclId> {
        self.by_cursor.get(&cursor).copied()
    }

    /// The opaque placeholder standing in for `cursor`, if one was created.
    pub fn opaque_placeholder(&self, cursor: CursorId) -> Option<DeclId> {
        self.opaque_for.get(&cursor).copied()
    }

    /// Returns true if code for `cursor` will be emitted, either as the
    /// declaration itself or as an opaque placeholder.
    pub fn is_exposed(&self, cursor: CursorId) -> bool {
        [self.lookup(cursor), self.opaque_placeholder(cursor)]
            .into_iter()
            .flatten()
            .any(|id| self.get(id).is_included())
    }

    /// All declarations, including nested ones and synthesized variants.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Every top-level declaration, in selection order.
    pub fn select(&self) -> Selection<'_> {
        Selection::new(self, self.order.clone())
    }

    /// Mark a declaration for emission.
    ///
    /// With `before`, the declaration becomes a predecessor of `before` and
    /// is emitted ahead of it.
    pub fn include(&mut self, id: DeclId, export: bool, before: Option<DeclId>) {
        self.decls[id.0].mark_included(export);
        if let Some(before) = before {
            self.decls[before.0].add_predecessor(id);
        }
    }

    pub fn include_all(&mut self, ids: &[DeclId], export: bool) {
        for &id in ids {
            self.include(id, export, None);
        }
    }

    /// Split a struct or union into a forward placeholder emitted before
    /// `before` and a field assignment emitted in place of the original.
    ///
    /// Returns the id of the forward placeholder. The original id keeps
    /// addressing the declaration, now in [`DefinitionMode::DefinitionOnly`].
    pub fn include_forward(&mut self, id: DeclId, before: DeclId, export: bool) -> Result<DeclId> {
        let original = self.get(id);
        if !original.kind().is_record() {
            return Err(Error::NotAStructOrUnion {
                name: original.name().to_string(),
                kind: original.kind(),
            });
        }
        if let Some(&forward_id) = self.forward_for.get(&id) {
            self.include(forward_id, export, Some(before));
            return Ok(forward_id);
        }

        let forward_id = DeclId(self.decls.len());
        let forward = original
            .to_builder()
            .mode(DefinitionMode::ForwardOnly)
            .build(forward_id);
        let definition = original
            .to_builder()
            .mode(DefinitionMode::DefinitionOnly)
            .build(id)
            .with_selection_of(original);
        debug!(name = %definition.name(), forward = %forward_id, "split forward declaration");

        self.decls[id.0] = definition;
        self.decls.push(forward);
        self.forward_for.insert(id, forward_id);
        self.decls[id.0].add_predecessor(forward_id);
        self.include(forward_id, export, Some(before));
        Ok(forward_id)
    }

    /// Emit an empty placeholder for the pointee of a pointer-typed
    /// declaration ahead of `before`.
    ///
    /// One placeholder exists per pointee; later calls reuse it.
    pub fn include_opaque_type(
        &mut self,
        id: DeclId,
        before: DeclId,
        export: bool,
    ) -> Result<DeclId> {
        let decl = self.get(id);
        let not_a_pointer = || Error::NotAPointer {
            name: decl.name().to_string(),
        };
        let ty = self.declared_type(id).ok_or_else(not_a_pointer)?;
        let ty = self.unit.ty(ty);
        if ty.kind != TypeKind::Pointer {
            return Err(not_a_pointer());
        }
        let pointee = ty
            .pointee
            .and_then(|pointee| self.unit.type_declaration(pointee))
            .ok_or_else(|| Error::NoPointeeDeclaration {
                name: decl.name().to_string(),
            })?;

        let opaque_id = match self.opaque_for.get(&pointee) {
            Some(&existing) => existing,
            None => {
                let opaque_id = DeclId(self.decls.len());
                let cursor = self.unit.cursor(pointee);
                let name = match self.lookup(pointee) {
                    Some(target) => self.get(target).name().to_string(),
                    None => cursor.spelling.clone(),
                };
                debug!(%name, "synthesized opaque placeholder");
                let opaque = Declaration::builder(pointee, DeclKind::Opaque, name)
                    .extent(cursor.extent.clone())
                    .build(opaque_id);
                self.decls.push(opaque);
                self.opaque_for.insert(pointee, opaque_id);
                opaque_id
            }
        };
        self.include(opaque_id, export, Some(before));
        Ok(opaque_id)
    }

    /// Export a declaration under a different name.
    ///
    /// A forward placeholder split from `id` follows the new name.
    pub fn rename(&mut self, id: DeclId, alias: impl Into<String>) {
        let alias = alias.into();
        if let Some(&forward_id) = self.forward_for.get(&id) {
            self.decls[forward_id.0].set_alias(alias.clone());
        }
        self.decls[id.0].set_alias(alias);
    }

    /// Field declarations of a struct or union, in source order.
    pub fn fields(&self, id: DeclId) -> Vec<DeclId> {
        self.children_of_kind(id, DeclKind::Field)
    }

    pub fn field(&self, id: DeclId, name: &str) -> Result<DeclId> {
        let record = self.get(id);
        if !record.kind().is_record() {
            return Err(Error::NotAStructOrUnion {
                name: record.name().to_string(),
                kind: record.kind(),
            });
        }
        self.fields(id)
            .into_iter()
            .find(|&field| self.get(field).name() == name)
            .ok_or_else(|| Error::NoSuchField {
                record: record.name().to_string(),
                field: name.to_string(),
            })
    }

    /// Parameter declarations of a function, in source order.
    pub fn parameters(&self, id: DeclId) -> Vec<DeclId> {
        self.children_of_kind(id, DeclKind::Parameter)
    }

    pub fn parameter(&self, id: DeclId, name: &str) -> Result<DeclId> {
        let function = self.get(id);
        if function.kind() != DeclKind::Function {
            return Err(Error::NotAFunction {
                name: function.name().to_string(),
                kind: function.kind(),
            });
        }
        self.parameters(id)
            .into_iter()
            .find(|&parameter| self.get(parameter).name() == name)
            .ok_or_else(|| Error::NoSuchParameter {
                function: function.name().to_string(),
                parameter: name.to_string(),
            })
    }

    /// Enum constants of an enum, in source order.
    pub fn enum_constants(&self, id: DeclId) -> Vec<DeclId> {
        self.children_of_kind(id, DeclKind::EnumConstant)
    }

    /// The type a declaration introduces: the aliased type for typedefs,
    /// the declared type otherwise.
    pub fn declared_type(&self, id: DeclId) -> Option<TypeId> {
        let cursor = self.cursor(id);
        match cursor.kind {
            CursorKind::TypedefDecl => cursor.underlying_type,
            _ => cursor.ty,
        }
    }

    /// The declaration named by the type of a field, parameter or typedef,
    /// looking through one level of pointer.
    pub fn type_declaration(&self, id: DeclId) -> Option<DeclId> {
        let mut ty = self.declared_type(id)?;
        if let Some(pointee) = self.unit.ty(ty).pointee {
            ty = pointee;
        }
        self.unit
            .type_declaration(ty)
            .and_then(|cursor| self.lookup(cursor))
    }

    /// The one struct definition named `name`.
    pub fn struct_named(&self, name: &str) -> Result<DeclId> {
        self.select()
            .structs()
            .named(name)
            .single(DeclKind::Struct, name)
    }

    pub fn union_named(&self, name: &str) -> Result<DeclId> {
        self.select()
            .unions()
            .named(name)
            .single(DeclKind::Union, name)
    }

    pub fn enum_named(&self, name: &str) -> Result<DeclId> {
        self.select().enums().named(name).single(DeclKind::Enum, name)
    }

    pub fn typedef(&self, name: &str) -> Result<DeclId> {
        self.select()
            .typedefs()
            .named(name)
            .single(DeclKind::Typedef, name)
    }

    pub fn function(&self, name: &str) -> Result<DeclId> {
        self.select()
            .functions()
            .named(name)
            .single(DeclKind::Function, name)
    }

    pub fn macro_named(&self, name: &str) -> Result<DeclId> {
        self.select()
            .macros()
            .named(name)
            .single(DeclKind::Macro, name)
    }

    /// The one top-level declaration of `kind` named `name`.
    pub fn named(&self, kind: DeclKind, name: &str) -> Result<DeclId> {
        match kind {
            DeclKind::Struct => self.struct_named(name),
            _ => self.select().of_kind(kind).named(name).single(kind, name),
        }
    }

    fn children_of_kind(&self, id: DeclId, kind: DeclKind) -> Vec<DeclId> {
        self.cursor(id)
            .children
            .iter()
            .filter_map(|&child| self.lookup(child))
            .filter(|&child| self.get(child).kind() == kind)
            .collect()
    }
}

fn decl_kind(kind: CursorKind) -> Option<DeclKind> {
    let kind = match kind {
        CursorKind::StructDecl => DeclKind::Struct,
        CursorKind::UnionDecl => DeclKind::Union,
        CursorKind::EnumDecl => DeclKind::Enum,
        CursorKind::EnumConstantDecl => DeclKind::EnumConstant,
        CursorKind::FieldDecl => DeclKind::Field,
        CursorKind::FunctionDecl => DeclKind::Function,
        CursorKind::ParmDecl => DeclKind::Parameter,
        CursorKind::TypedefDecl => DeclKind::Typedef,
        CursorKind::MacroDefinition => DeclKind::Macro,
        _ => return None,
    };
    Some(kind)
}

/// Source name, or the type spelling for anonymous records and enums.
fn decl_name(unit: &TranslationUnit, cursor: &Cursor) -> String {
    let tagged = cursor.kind.is_record() || cursor.kind == CursorKind::EnumDecl;
    match cursor.ty {
        Some(ty) if tagged && cursor.is_anonymous() => unit.ty(ty).spelling.clone(),
        _ => cursor.spelling.clone(),
    }
}

/// Top-level declarations in source order.
///
/// Parsers report the macro definitions of a file in one early batch; the
/// main file's macros are held back and re-inserted before the first later
/// declaration that ends on or after the macro's last line.
fn selection_order(unit: &TranslationUnit, by_cursor: &HashMap<CursorId, DeclId>) -> Vec<DeclId> {
    let main_file = unit.spelling();
    let mut order = Vec::new();
    let mut push = |cursor: CursorId| {
        if let Some(&id) = by_cursor.get(&cursor) {
            order.push(id);
        }
    };
    let mut pending: VecDeque<CursorId> = VecDeque::new();

    for &cursor_id in unit.top_level() {
        let cursor = unit.cursor(cursor_id);
        if cursor.extent.file() == Some(main_file) {
            match cursor.kind {
                CursorKind::MacroInstantiation => {}
                CursorKind::MacroDefinition => {
                    pending.push_back(cursor_id);
                    continue;
                }
                _ => {
                    while let Some(&macro_id) = pending.front() {
                        if unit.cursor(macro_id).extent.end.line > cursor.extent.end.line {
                            break;
                        }
                        pending.pop_front();
                        push(macro_id);
                    }
                }
            }
        }
        push(cursor_id);
    }
    pending.into_iter().for_each(push);
    order
}

#[cfg(test)]
mod tests {
    use ctbind_ast::{SourceRange, TranslationUnitBuilder};

    use super::*;

    fn range(line: u32) -> SourceRange {
        SourceRange::in_file("t.h", (line, 1), (line, 30))
    }

    /// `struct A { struct B *b; }; struct B { struct A *a; }; typedef struct A A_t;`
    fn mutual() -> (DeclIndex, DeclId, DeclId, DeclId) {
        let mut builder = TranslationUnitBuilder::new("t.h");
        let a = builder.add_cursor(
            None,
            Cursor::new(CursorKind::StructDecl, "A", range(1)).definition(),
        );
        builder.record(a);
        let b = builder.add_cursor(
            None,
            Cursor::new(CursorKind::StructDecl, "B", range(2)).definition(),
        );
        builder.record(b);
        let b_ref = builder.elaborated(b);
        let b_ptr = builder.pointer(b_ref);
        builder.add_cursor(
            Some(a),
            Cursor::new(CursorKind::FieldDecl, "b", range(1)).with_type(b_ptr),
        );
        let a_ref = builder.elaborated(a);
        let a_ptr = builder.pointer(a_ref);
        builder.add_cursor(
            Some(b),
            Cursor::new(CursorKind::FieldDecl, "a", range(2)).with_type(a_ptr),
        );
        builder.add_cursor(
            None,
            Cursor::new(CursorKind::TypedefDecl, "A_t", range(3)).with_underlying_type(a_ref),
        );
        let index = DeclIndex::new(builder.build());
        let a = index.struct_named("A").unwrap();
        let b = index.struct_named("B").unwrap();
        let a_t = index.typedef("A_t").unwrap();
        (index, a, b, a_t)
    }

    #[test]
    fn test_one_declaration_per_cursor() {
        let (index, a, ..) = mutual();
        let cursor = index.get(a).cursor();
        assert_eq!(index.lookup(cursor), Some(a));
        assert_eq!(index.len(), 5);
        assert_eq!(index.select().len(), 3);
    }

    #[test]
    fn test_include_registers_predecessor() {
        let (mut index, a, b, _) = mutual();
        index.include(b, false, Some(a));
        assert!(index.get(b).is_included());
        assert!(!index.get(b).is_exported());
        assert_eq!(index.get(a).predecessors().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_include_forward_splits_record() {
        let (mut index, a, b, _) = mutual();
        index.include(a, true, None);
        index.include(b, true, None);
        let forward = index.include_forward(a, b, false).unwrap();

        assert_eq!(index.get(forward).mode(), DefinitionMode::ForwardOnly);
        assert!(index.get(forward).is_included());
        assert_eq!(index.get(a).mode(), DefinitionMode::DefinitionOnly);
        assert!(index.get(a).is_exported());
        assert_eq!(index.get(a).predecessors().collect::<Vec<_>>(), vec![forward]);
        assert_eq!(index.get(b).predecessors().collect::<Vec<_>>(), vec![forward]);
        // the split does not add a top-level declaration
        assert_eq!(index.select().len(), 3);
    }

    #[test]
    fn test_include_forward_reuses_placeholder() {
        let (mut index, a, b, a_t) = mutual();
        let first = index.include_forward(a, b, false).unwrap();
        let second = index.include_forward(a, a_t, false).unwrap();

        assert_eq!(first, second);
        assert_eq!(index.len(), 6);
        assert_eq!(index.get(a).predecessors().collect::<Vec<_>>(), vec![first]);
        assert_eq!(index.get(a_t).predecessors().collect::<Vec<_>>(), vec![first]);
    }

    #[test]
    fn test_rename_after_split_renames_placeholder() {
        let (mut index, a, b, _) = mutual();
        let forward = index.include_forward(a, b, false).unwrap();
        index.rename(a, "Alpha");

        assert_eq!(index.get(a).alias(), "Alpha");
        assert_eq!(index.get(forward).alias(), "Alpha");
        assert_eq!(index.get(forward).name(), "A");
    }

    #[test]
    fn test_include_forward_rejects_non_records() {
        let (mut index, _, b, a_t) = mutual();
        let err = index.include_forward(a_t, b, false).unwrap_err();
        assert_eq!(
            err,
            Error::NotAStructOrUnion {
                name: "A_t".to_string(),
                kind: DeclKind::Typedef,
            }
        );
    }

    #[test]
    fn test_include_opaque_type_reuses_placeholder() {
        let (mut index, a, b, _) = mutual();
        let field = index.field(b, "a").unwrap();
        let first = index.include_opaque_type(field, b, false).unwrap();
        let second = index.include_opaque_type(field, b, false).unwrap();

        assert_eq!(first, second);
        assert_eq!(index.get(first).kind(), DeclKind::Opaque);
        assert_eq!(index.get(first).name(), "A");
        assert!(index.is_exposed(index.get(a).cursor()));
        assert!(!index.get(a).is_included());
    }

    #[test]
    fn test_include_opaque_type_requires_pointer() {
        let (mut index, _, b, a_t) = mutual();
        let err = index.include_opaque_type(a_t, b, false).unwrap_err();
        assert_eq!(
            err,
            Error::NotAPointer {
                name: "A_t".to_string()
            }
        );
    }

    #[test]
    fn test_type_declaration_looks_through_pointer() {
        let (index, a, b, a_t) = mutual();
        let field = index.field(a, "b").unwrap();
        assert_eq!(index.type_declaration(field), Some(b));
        assert_eq!(index.type_declaration(a_t), Some(a));
    }

    #[test]
    fn test_field_lookup_errors() {
        let (index, a, _, a_t) = mutual();
        assert_eq!(
            index.field(a, "missing").unwrap_err(),
            Error::NoSuchField {
                record: "A".to_string(),
                field: "missing".to_string(),
            }
        );
        assert!(matches!(
            index.field(a_t, "b"),
            Err(Error::NotAStructOrUnion { .. })
        ));
    }

    #[test]
    fn test_singleton_queries() {
        let (index, ..) = mutual();
        assert_eq!(
            index.struct_named("C").unwrap_err(),
            Error::NoMatch {
                kind: DeclKind::Struct,
                name: "C".to_string(),
            }
        );
        assert!(index.function("A").is_err());
    }

    #[test]
    fn test_multiple_matches() {
        let mut builder = TranslationUnitBuilder::new("t.h");
        for line in [1, 5] {
            let node = builder.add_cursor(
                None,
                Cursor::new(CursorKind::StructDecl, "node", range(line)).definition(),
            );
            builder.record(node);
        }
        let index = DeclIndex::new(builder.build());
        assert_eq!(
            index.struct_named("node").unwrap_err(),
            Error::MultipleMatches {
                kind: DeclKind::Struct,
                name: "node".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_struct_queries_skip_forward_declarations() {
        let mut builder = TranslationUnitBuilder::new("t.h");
        let fwd = builder.add_cursor(None, Cursor::new(CursorKind::StructDecl, "node", range(1)));
        builder.record(fwd);
        let def = builder.add_cursor(
            None,
            Cursor::new(CursorKind::StructDecl, "node", range(3)).definition(),
        );
        builder.record(def);
        let index = DeclIndex::new(builder.build());

        let found = index.struct_named("node").unwrap();
        assert_eq!(index.get(found).start_line(), 3);
        assert_eq!(index.select().structs().len(), 1);
    }

    #[test]
    fn test_anonymous_record_named_by_type() {
        let mut builder = TranslationUnitBuilder::new("t.h");
        let anon = builder.add_cursor(
            None,
            Cursor::new(CursorKind::StructDecl, "", range(4)).definition(),
        );
        builder.record(anon);
        let index = DeclIndex::new(builder.build());
        let decl = index.select().structs().iter().next().map(|d| d.name().to_string());
        assert_eq!(decl.as_deref(), Some("struct (unnamed at t.h:4:1)"));
    }

    #[test]
    fn test_macros_interleaved_by_line() {
        let mut builder = TranslationUnitBuilder::new("t.h");
        // parsers report macro definitions first
        builder.add_cursor(None, Cursor::new(CursorKind::MacroDefinition, "FIRST", range(1)));
        builder.add_cursor(None, Cursor::new(CursorKind::MacroDefinition, "SECOND", range(3)));
        builder.add_cursor(None, Cursor::new(CursorKind::MacroDefinition, "LAST", range(9)));
        let int = builder.builtin(TypeKind::Int);
        builder.add_cursor(
            None,
            Cursor::new(CursorKind::TypedefDecl, "one", range(2)).with_underlying_type(int),
        );
        builder.add_cursor(
            None,
            Cursor::new(CursorKind::TypedefDecl, "two", range(5)).with_underlying_type(int),
        );
        let index = DeclIndex::new(builder.build());

        let names: Vec<&str> = index.select().iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["FIRST", "one", "SECOND", "two", "LAST"]);
    }

    #[test]
    fn test_macros_from_other_files_keep_position() {
        let mut builder = TranslationUnitBuilder::new("t.h");
        builder.add_cursor(
            None,
            Cursor::new(
                CursorKind::MacroDefinition,
                "OTHER",
                SourceRange::in_file("other.h", (40, 1), (40, 20)),
            ),
        );
        builder.add_cursor(None, Cursor::new(CursorKind::MacroDefinition, "MINE", range(6)));
        let int = builder.builtin(TypeKind::Int);
        builder.add_cursor(
            None,
            Cursor::new(CursorKind::TypedefDecl, "early", range(2)).with_underlying_type(int),
        );
        let index = DeclIndex::new(builder.build());

        let names: Vec<&str> = index.select().iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["OTHER", "early", "MINE"]);
        assert_eq!(index.select().in_header("other.h").len(), 1);
    }

    #[test]
    fn test_rename_changes_alias_only() {
        let (mut index, a, ..) = mutual();
        index.rename(a, "Alpha");
        assert_eq!(index.get(a).alias(), "Alpha");
        assert_eq!(index.struct_named("A"), Ok(a));
    }
}
