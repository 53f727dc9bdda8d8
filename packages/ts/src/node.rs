// Syntax Nodes
//
// Owned expression and type trees lowered from the oxc AST. Only the shapes the
// analysis engine can reason about are modeled; everything else is kept as an
// `Unsupported` node carrying its syntax kind so that evaluation can report it.

use std::fmt;

/// Byte range into the source text of the owning file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<oxc_span::Span> for Span {
    fn from(span: oxc_span::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    StringLiteral(String),
    NumericLiteral(f64),
    BooleanLiteral(bool),
    NullLiteral,
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: Vec<Expression>,
    },
    Identifier(String),
    PropertyAccess {
        object: Box<Expression>,
        property: String,
    },
    ElementAccess {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<ArrayElement>,
    },
    New {
        callee: Box<Expression>,
        arguments: Vec<ArrayElement>,
    },
    Array(Vec<ArrayElement>),
    Object(Vec<ObjectMember>),
    /// Arrow function or function expression. `body` is the returned
    /// expression when the body is an expression or a single `return`.
    Function {
        params: Vec<String>,
        body: Option<Box<Expression>>,
    },
    DynamicImport(Box<Expression>),
    Unary {
        operator: String,
        argument: Box<Expression>,
    },
    Binary {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    Unsupported(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Expression(Expression),
    Spread(Expression),
    Hole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Property { key: PropertyName, value: Expression },
    Spread(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Static(String),
    Computed(Expression),
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::StringLiteral(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Static property lookup on an object literal.
    pub fn object_property(&self, name: &str) -> Option<&Expression> {
        let ExpressionKind::Object(members) = &self.kind else {
            return None;
        };
        members.iter().find_map(|member| match member {
            ObjectMember::Property {
                key: PropertyName::Static(key),
                value,
            } if key == name => Some(value),
            _ => None,
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExpressionKind::StringLiteral(_) => "string literal",
            ExpressionKind::NumericLiteral(_) => "numeric literal",
            ExpressionKind::BooleanLiteral(_) => "boolean literal",
            ExpressionKind::NullLiteral => "null",
            ExpressionKind::TemplateLiteral { .. } => "template literal",
            ExpressionKind::Identifier(_) => "identifier",
            ExpressionKind::PropertyAccess { .. } => "property access",
            ExpressionKind::ElementAccess { .. } => "element access",
            ExpressionKind::Call { .. } => "call expression",
            ExpressionKind::New { .. } => "new expression",
            ExpressionKind::Array(_) => "array literal",
            ExpressionKind::Object(_) => "object literal",
            ExpressionKind::Function { .. } => "function expression",
            ExpressionKind::DynamicImport(_) => "dynamic import",
            ExpressionKind::Unary { .. } => "unary expression",
            ExpressionKind::Binary { .. } => "binary expression",
            ExpressionKind::Conditional { .. } => "conditional expression",
            ExpressionKind::Unsupported(kind) => kind,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::StringLiteral(value) => write!(f, "'{}'", value),
            ExpressionKind::NumericLiteral(value) => write!(f, "{}", value),
            ExpressionKind::BooleanLiteral(value) => write!(f, "{}", value),
            ExpressionKind::NullLiteral => f.write_str("null"),
            ExpressionKind::Identifier(name) => f.write_str(name),
            ExpressionKind::PropertyAccess { object, property } => {
                write!(f, "{}.{}", object, property)
            }
            ExpressionKind::Call { callee, .. } => write!(f, "{}(...)", callee),
            ExpressionKind::New { callee, .. } => write!(f, "new {}(...)", callee),
            ExpressionKind::Array(_) => f.write_str("[...]"),
            ExpressionKind::Object(_) => f.write_str("{...}"),
            ExpressionKind::DynamicImport(specifier) => write!(f, "import({})", specifier),
            _ => f.write_str(self.kind_name()),
        }
    }
}

/// Type annotations, reduced to what constructor tokens and static markers need.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// `Foo`, `i0.Foo`, `Foo<A, B>`.
    Reference { name: String, args: Vec<TypeNode> },
    /// `typeof Foo`.
    Query(String),
    Tuple(Vec<TypeNode>),
    StringLiteral(String),
    Union(Vec<TypeNode>),
    /// `string`, `number`, `never`, `any`...
    Keyword(String),
    Unknown,
}

impl TypeNode {
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            TypeNode::Reference { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            TypeNode::StringLiteral(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, TypeNode::Keyword(k) if k == "never")
    }
}
