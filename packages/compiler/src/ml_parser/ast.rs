//! ML Parser AST
//!
//! HTML node tree produced by the markup parser.

use crate::parse_util::ParseSourceSpan;

/// Node type union
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    Expansion(Expansion),
}

impl Node {
    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            Node::Element(node) => &node.source_span,
            Node::Text(node) => &node.source_span,
            Node::Comment(node) => &node.source_span,
            Node::Expansion(node) => &node.source_span,
        }
    }
}

/// Text node
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub value: Option<String>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Full name; namespaced elements are stored as `:ns:name`.
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: ParseSourceSpan,
    pub end_source_span: Option<ParseSourceSpan>,
    pub is_self_closing: bool,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }
}

/// ICU message: `{count, plural, =0 {none} other {many}}`
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub switch_value: String,
    pub kind: String,
    pub cases: Vec<ExpansionCase>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionCase {
    pub value: String,
    pub expression: Vec<Node>,
    pub source_span: ParseSourceSpan,
}
