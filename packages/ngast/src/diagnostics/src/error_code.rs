/// Angular-style error codes carried by handler diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DecoratorArgNotLiteral = 1001,
    DecoratorArityWrong = 1002,
    DecoratorNotCalled = 1003,

    /// This error code indicates that there are incompatible decorators on a type or a class field.
    DecoratorCollision = 1006,

    ValueHasWrongType = 1010,
    ValueNotLiteral = 1011,

    ComponentMissingTemplate = 2001,
    PipeMissingName = 2002,
    ParamMissingToken = 2003,
    DirectiveMissingSelector = 2004,

    /// Raised when an component cannot resolve an external resource, such as a template or a style
    /// sheet.
    ComponentResourceNotFound = 2008,

    /// Raised when a standalone component lists something other than a standalone declaration or
    /// an NgModule in its `imports`.
    ComponentUnknownImport = 2012,

    NgmoduleInvalidDeclaration = 6001,
    NgmoduleInvalidImport = 6002,
    NgmoduleInvalidExport = 6003,

    /// Raised when the same declaration is declared by more than one NgModule.
    NgmoduleDeclarationNotUnique = 6007,
}
