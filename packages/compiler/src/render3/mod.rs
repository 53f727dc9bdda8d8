//! Render3 Module
//!
//! Template nodes and the HTML to template node transform.

pub mod r3_ast;
pub mod r3_template_transform;

pub use r3_ast::*;
pub use r3_template_transform::{html_ast_to_render3_ast, parse_template_bindings, R3ParseResult};

use crate::ml_parser;
use crate::parse_util::ParseError;

/// A component template parsed down to template nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTemplate {
    pub nodes: Vec<R3Node>,
    /// Markup and classification errors, in that order.
    pub errors: Vec<ParseError>,
    pub styles: Vec<String>,
}

pub fn parse_template(template: &str, template_url: &str) -> ParsedTemplate {
    let parse_result = ml_parser::parse(template, template_url);
    let r3_result = html_ast_to_render3_ast(&parse_result.root_nodes);
    let mut errors = parse_result.errors;
    errors.extend(r3_result.errors);
    ParsedTemplate {
        nodes: r3_result.nodes,
        errors,
        styles: r3_result.styles,
    }
}
