//! Render3 AST
//!
//! Template nodes after attribute classification.

use crate::ml_parser::ast::Expansion;
use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum R3Node {
    Element(Element),
    Template(Template),
    Content(Content),
    Text(Text),
    BoundText(BoundText),
    Icu(Icu),
}

impl R3Node {
    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            R3Node::Element(node) => &node.source_span,
            R3Node::Template(node) => &node.source_span,
            R3Node::Content(node) => &node.source_span,
            R3Node::Text(node) => &node.source_span,
            R3Node::BoundText(node) => &node.source_span,
            R3Node::Icu(node) => &node.source_span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Text containing `{{ }}` interpolation; the raw text is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundText {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icu {
    pub expansion: Expansion,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAttribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
    /// Set for `i18n` and `i18n-*` markers.
    pub is_i18n: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Property,
    Attribute,
    Class,
    Style,
    TwoWay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundAttribute {
    pub name: String,
    pub binding_type: BindingType,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundEvent {
    pub name: String,
    pub handler: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Attributes hoisted onto a template by `*` microsyntax.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateAttr {
    Text(TextAttribute),
    Bound(BoundAttribute),
}

impl TemplateAttr {
    pub fn name(&self) -> &str {
        match self {
            TemplateAttr::Text(attr) => &attr.name,
            TemplateAttr::Bound(attr) => &attr.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub children: Vec<R3Node>,
    pub references: Vec<Reference>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: ParseSourceSpan,
    pub end_source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// `None` for templates synthesized from `*` microsyntax.
    pub tag_name: Option<String>,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub template_attrs: Vec<TemplateAttr>,
    pub children: Vec<R3Node>,
    pub references: Vec<Reference>,
    pub variables: Vec<Variable>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: ParseSourceSpan,
    pub end_source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub selector: String,
    pub attributes: Vec<TextAttribute>,
    pub children: Vec<R3Node>,
    pub source_span: ParseSourceSpan,
}
