// Dynamic Value
//
// A value that could not be statically evaluated, together with the node
// that stopped evaluation and the reason.

use std::fmt;
use ts::Expression;

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicValue {
    pub node: Expression,
    pub file: String,
    pub reason: DynamicReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DynamicReason {
    /// An identifier with no declaration or import.
    UnknownIdentifier(String),
    /// A name imported from a module outside the program. Property accesses
    /// on it extend `name` (`ChangeDetectionStrategy.OnPush`).
    External { module: String, name: String },
    /// The whole module object of a namespace import.
    NamespaceImport(String),
    UnsupportedSyntax(&'static str),
    FunctionValue,
    /// A call to something that has no statically known return value.
    UnknownCall,
    /// A call to a function or static method with no single-`return` body,
    /// such as one from a declaration file. `name` is qualified by its class
    /// for methods.
    DeclaredCall { name: String, file: String },
    DynamicImport,
    /// An operation on a value of the wrong type.
    InvalidExpressionType(&'static str),
    /// A variable whose initializer depends on itself.
    CircularReference(String),
    DepthExceeded,
    /// An operand of this expression was itself dynamic.
    DynamicInput(Box<DynamicValue>),
}

impl DynamicValue {
    pub fn new(node: &Expression, file: &str, reason: DynamicReason) -> Self {
        Self {
            node: node.clone(),
            file: file.to_string(),
            reason,
        }
    }

    /// Follows `DynamicInput` chains down to the value that started them.
    pub fn root_cause(&self) -> &DynamicValue {
        match &self.reason {
            DynamicReason::DynamicInput(inner) => inner.root_cause(),
            _ => self,
        }
    }
}

impl fmt::Display for DynamicReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicReason::UnknownIdentifier(name) => write!(f, "unknown identifier '{}'", name),
            DynamicReason::External { module, name } => {
                write!(f, "'{}' is imported from external module '{}'", name, module)
            }
            DynamicReason::NamespaceImport(file) => write!(f, "namespace import of '{}'", file),
            DynamicReason::UnsupportedSyntax(kind) => write!(f, "unsupported syntax: {}", kind),
            DynamicReason::FunctionValue => f.write_str("function value"),
            DynamicReason::UnknownCall => f.write_str("call to a function with unknown behavior"),
            DynamicReason::DeclaredCall { name, file } => write!(f, "call to '{}' from '{}' with no evaluable body", name, file),
            DynamicReason::DynamicImport => f.write_str("dynamic import"),
            DynamicReason::InvalidExpressionType(what) => write!(f, "invalid operand for {}", what),
            DynamicReason::CircularReference(name) => write!(f, "circular reference to '{}'", name),
            DynamicReason::DepthExceeded => f.write_str("maximum evaluation depth exceeded"),
            DynamicReason::DynamicInput(inner) => write!(f, "depends on a dynamic value ({})", inner.reason),
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}@{}", self.reason, self.file, self.node.span.start)
    }
}
