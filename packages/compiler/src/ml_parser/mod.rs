//! ML (Markup Language) Parser Module
//!
//! Handles HTML parsing for component templates

pub mod ast;
pub mod parser;
pub mod tags;

pub use ast::*;
pub use parser::{parse, ParseTreeResult};
pub use tags::*;
