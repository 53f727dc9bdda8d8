// Declarations
//
// The top-level declarations of every source file, stored in one arena owned by
// the `Program` and addressed by `DeclarationId`.

use crate::node::{Expression, Span, TypeNode};
use std::fmt;

/// Stable index of a declaration in the program's declaration arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(pub u32);

impl DeclarationId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclarationId,
    pub name: String,
    pub file: String,
    pub span: Span,
    pub exported: bool,
    pub kind: DeclarationKind,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
    Class(ClassDeclaration),
    Variable {
        initializer: Option<Expression>,
        type_node: Option<TypeNode>,
    },
    Function(FunctionDeclaration),
    Enum(Vec<EnumMember>),
}

#[derive(Debug, Clone, Default)]
pub struct ClassDeclaration {
    pub decorators: Vec<Decorator>,
    pub members: Vec<ClassMember>,
    /// `None` when the class declares no constructor.
    pub constructor_parameters: Option<Vec<CtorParameter>>,
    pub heritage: Option<Expression>,
    /// `declare class` or a class in a `.d.ts` file.
    pub is_ambient: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone)]
pub struct Decorator {
    /// Identifier the decorator is referenced by, e.g. `Component` or `core.Component`.
    pub name: String,
    /// Import path of the decorator's identifier, filled in from the file's imports.
    pub import: Option<String>,
    /// `None` for a decorator that is not called (`@Foo` rather than `@Foo()`).
    pub args: Option<Vec<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMemberKind {
    Property,
    Method,
    Getter,
    Setter,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub name: String,
    pub kind: ClassMemberKind,
    pub is_static: bool,
    pub value: Option<Expression>,
    pub type_node: Option<TypeNode>,
    pub decorators: Vec<Decorator>,
    /// Method parameters, for methods.
    pub parameters: Vec<String>,
    /// Returned expression of a method whose body is a single `return`.
    pub return_expression: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CtorParameter {
    pub name: Option<String>,
    pub type_node: Option<TypeNode>,
    pub decorators: Vec<Decorator>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionDeclaration {
    pub parameters: Vec<String>,
    pub return_expression: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: String,
    pub initializer: Option<Expression>,
}

impl Declaration {
    pub fn as_class(&self) -> Option<&ClassDeclaration> {
        match &self.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, DeclarationKind::Class(_))
    }
}

impl ClassDeclaration {
    pub fn static_member(&self, name: &str) -> Option<&ClassMember> {
        self.members.iter().find(|m| m.is_static && m.name == name)
    }
}

// --- Module structure ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Named(String),
    Default,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub local: String,
    pub imported: ImportedName,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// `export { local as exported }` or an exported declaration.
    Local { exported: String, local: String },
    /// `export { name as exported } from 'module'`.
    Reexport {
        exported: String,
        name: String,
        module: String,
    },
    /// `export * from 'module'`.
    Star { module: String },
}

#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub is_declaration_file: bool,
    pub declarations: Vec<DeclarationId>,
    pub imports: Vec<Import>,
    pub exports: Vec<ExportEntry>,
}

impl SourceFile {
    pub fn import_for(&self, local: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.local == local)
    }
}
