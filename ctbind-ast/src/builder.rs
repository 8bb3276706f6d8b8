//! Construction API for translation units.

use std::collections::HashMap;

use crate::{
    Cursor, CursorId, CursorKind, Token, TranslationUnit, Type, TypeId, TypeKind, lexer,
};

/// Incrementally builds a [`TranslationUnit`].
///
/// Parser adapters (and tests) add cursors in parser order; cursors added
/// without a parent become top-level declarations.
///
/// # Example
///
/// ```
/// use ctbind_ast::{Cursor, CursorKind, SourceRange, TranslationUnitBuilder, TypeKind};
///
/// let mut builder = TranslationUnitBuilder::new("point.h");
/// let int = builder.builtin(TypeKind::Int);
/// let point = builder.add_cursor(
///     None,
///     Cursor::new(CursorKind::StructDecl, "Point", SourceRange::in_file("point.h", (1, 1), (4, 2)))
///         .definition(),
/// );
/// builder.record(point);
/// builder.add_cursor(
///     Some(point),
///     Cursor::new(CursorKind::FieldDecl, "x", SourceRange::in_file("point.h", (2, 5), (2, 10)))
///         .with_type(int),
/// );
/// let unit = builder.build();
/// assert_eq!(unit.top_level().len(), 1);
/// ```
#[derive(Debug)]
pub struct TranslationUnitBuilder {
    spelling: String,
    cursors: Vec<Cursor>,
    types: Vec<Type>,
    tokens: Vec<Token>,
    root: Vec<CursorId>,
    builtins: HashMap<TypeKind, TypeId>,
}

impl TranslationUnitBuilder {
    /// Start a translation unit for the given main file.
    pub fn new(spelling: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            cursors: Vec::new(),
            types: Vec::new(),
            tokens: Vec::new(),
            root: Vec::new(),
            builtins: HashMap::new(),
        }
    }

    /// Path of the main file.
    pub fn file(&self) -> &str {
        &self.spelling
    }

    /// Add a cursor under `parent`, or at top level when `parent` is `None`.
    pub fn add_cursor(&mut self, parent: Option<CursorId>, cursor: Cursor) -> CursorId {
        let id = CursorId(self.cursors.len() as u32);
        self.cursors.push(cursor);
        match parent {
            Some(parent) => self.cursors[parent.index()].children.push(id),
            None => self.root.push(id),
        }
        id
    }

    pub fn cursor(&self, id: CursorId) -> &Cursor {
        &self.cursors[id.index()]
    }

    pub fn set_cursor_type(&mut self, id: CursorId, ty: TypeId) {
        self.cursors[id.index()].ty = Some(ty);
    }

    /// Add an arbitrary type.
    pub fn add_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// A builtin type; one shared entry per kind.
    pub fn builtin(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.builtins.get(&kind) {
            return id;
        }
        let id = self.add_type(Type::builtin(kind));
        self.builtins.insert(kind, id);
        id
    }

    pub fn pointer(&mut self, pointee: TypeId) -> TypeId {
        let spelling = format!("{} *", self.ty(pointee).spelling);
        let mut ty = Type::new(TypeKind::Pointer, spelling);
        ty.pointee = Some(pointee);
        self.add_type(ty)
    }

    pub fn constant_array(&mut self, element: TypeId, count: u64) -> TypeId {
        let spelling = format!("{}[{}]", self.ty(element).spelling, count);
        let mut ty = Type::new(TypeKind::ConstantArray, spelling);
        ty.element = Some(element);
        ty.element_count = Some(count);
        self.add_type(ty)
    }

    pub fn function_proto(&mut self, result: TypeId, arguments: Vec<TypeId>) -> TypeId {
        let args: Vec<&str> = arguments
            .iter()
            .map(|&arg| self.ty(arg).spelling.as_str())
            .collect();
        let args = if args.is_empty() {
            "void".to_string()
        } else {
            args.join(", ")
        };
        let spelling = format!("{} ({})", self.ty(result).spelling, args);
        let mut ty = Type::new(TypeKind::FunctionProto, spelling);
        ty.result = Some(result);
        ty.arguments = arguments;
        self.add_type(ty)
    }

    /// The record type declared by a struct or union cursor; also becomes
    /// the cursor's own type.
    pub fn record(&mut self, declaration: CursorId) -> TypeId {
        let spelling = self.tagged_spelling(declaration);
        self.declared_type(TypeKind::Record, spelling, declaration)
    }

    /// The enum type declared by an enum cursor; also becomes the cursor's type.
    pub fn enum_type(&mut self, declaration: CursorId) -> TypeId {
        let spelling = self.tagged_spelling(declaration);
        self.declared_type(TypeKind::Enum, spelling, declaration)
    }

    /// The type named by a typedef cursor; also becomes the cursor's type.
    pub fn typedef_type(&mut self, declaration: CursorId) -> TypeId {
        let spelling = self.cursor(declaration).spelling.clone();
        self.declared_type(TypeKind::Typedef, spelling, declaration)
    }

    /// Sugar for a type written by name in source (`struct Foo`, `MyInt`).
    pub fn elaborated(&mut self, declaration: CursorId) -> TypeId {
        let cursor = self.cursor(declaration);
        let spelling = match cursor.kind {
            CursorKind::TypedefDecl => cursor.spelling.clone(),
            _ => self.tagged_spelling(declaration),
        };
        self.add_type(Type::new(TypeKind::Elaborated, spelling).with_declaration(declaration))
    }

    /// Append tokens to the stream.
    pub fn tokens(&mut self, tokens: impl IntoIterator<Item = Token>) {
        self.tokens.extend(tokens);
    }

    /// Tokenize source text of the main file and append the tokens.
    pub fn lex(&mut self, source: &str) {
        let file = self.spelling.clone();
        self.lex_file(&file, source);
    }

    /// Tokenize source text of any file and append the tokens.
    pub fn lex_file(&mut self, file: &str, source: &str) {
        self.tokens.extend(lexer::tokenize(file, source));
    }

    pub fn build(self) -> TranslationUnit {
        TranslationUnit::from_parts(
            self.spelling,
            self.cursors,
            self.types,
            self.tokens,
            self.root,
        )
    }

    fn declared_type(&mut self, kind: TypeKind, spelling: String, declaration: CursorId) -> TypeId {
        let id = self.add_type(Type::new(kind, spelling).with_declaration(declaration));
        self.set_cursor_type(declaration, id);
        id
    }

    fn tagged_spelling(&self, declaration: CursorId) -> String {
        let cursor = self.cursor(declaration);
        let tag = match cursor.kind {
            CursorKind::UnionDecl => "union",
            CursorKind::EnumDecl => "enum",
            _ => "struct",
        };
        if cursor.is_anonymous() {
            format!("{} (unnamed at {})", tag, cursor.location())
        } else {
            format!("{} {}", tag, cursor.spelling)
        }
    }
}
