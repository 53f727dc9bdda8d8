#![deny(clippy::all)]

//! Template-level building blocks used by ngast.
//!
//! - `directive_matching`: CSS selector parsing and structural matching.
//! - `ml_parser`: a tolerant markup parser producing an HTML node tree.
//! - `render3`: classification of the HTML tree into template nodes
//!   (elements, templates, content projection, bound text).
//! - `style_parser`: a rule-level stylesheet parser.

pub mod directive_matching;
pub mod ml_parser;
pub mod parse_util;
pub mod render3;
pub mod style_parser;

pub use directive_matching::{CssSelector, SelectorMatcher, SelectorParseError};
pub use parse_util::{ParseError, ParseErrorLevel, ParseLocation, ParseSourceSpan};
pub use render3::{parse_template, ParsedTemplate};
pub use style_parser::{parse_styles, StyleAst};
