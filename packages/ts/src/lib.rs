//! TypeScript-compatible declaration model and program layer for ngast.
//!
//! Sources are parsed with oxc and lowered into an owned, lifetime-free model
//! (`Declaration`, `Expression`, `TypeNode`) that the analysis engine can hold
//! on to for the lifetime of an analysis session.

use std::fmt;

pub mod declaration;
mod lower;
pub mod node;
pub mod path;
pub mod program;
pub mod type_checker;

pub use declaration::*;
pub use node::*;
pub use program::*;
pub use type_checker::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

// --- Diagnostic Structures ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticMessageChain {
    String(String),
    Chain {
        message_text: String,
        category: DiagnosticCategory,
        code: i32,
        next: Option<Vec<DiagnosticMessageChain>>,
    },
}

impl DiagnosticMessageChain {
    pub fn new(message: impl Into<String>) -> Self {
        Self::String(message.into())
    }
}

impl From<String> for DiagnosticMessageChain {
    fn from(s: String) -> Self {
        DiagnosticMessageChain::String(s)
    }
}

impl From<&str> for DiagnosticMessageChain {
    fn from(s: &str) -> Self {
        DiagnosticMessageChain::String(s.to_string())
    }
}

impl fmt::Display for DiagnosticMessageChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticMessageChain::String(s) => write!(f, "{}", s),
            DiagnosticMessageChain::Chain {
                message_text, next, ..
            } => {
                write!(f, "{}", message_text)?;
                for chained in next.iter().flatten() {
                    write!(f, "\n  {}", chained)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: Option<usize>,
    pub length: Option<usize>,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: usize,
    pub length: usize,
    pub message_text: DiagnosticMessageChain,
    pub related_information: Option<Vec<DiagnosticRelatedInformation>>,
}

impl Diagnostic {
    /// An error located at `span` in `file`.
    pub fn error(code: i32, file: &str, span: Span, message: impl Into<DiagnosticMessageChain>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            file: Some(file.to_string()),
            start: span.start as usize,
            length: span.len() as usize,
            message_text: message.into(),
            related_information: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}@{}: TS{}: {}", file, self.start, self.code, self.message_text),
            None => write!(f, "TS{}: {}", self.code, self.message_text),
        }
    }
}

// --- Utilities ---

pub fn make_diagnostic_chain(
    message_text: String,
    next: Option<Vec<DiagnosticMessageChain>>,
) -> DiagnosticMessageChain {
    DiagnosticMessageChain::Chain {
        category: DiagnosticCategory::Message,
        code: 0,
        message_text,
        next,
    }
}

pub fn add_diagnostic_chain(
    message_text: DiagnosticMessageChain,
    add: Vec<DiagnosticMessageChain>,
) -> DiagnosticMessageChain {
    match message_text {
        DiagnosticMessageChain::String(s) => make_diagnostic_chain(s, Some(add)),
        DiagnosticMessageChain::Chain {
            message_text,
            category,
            code,
            next,
        } => {
            let mut next_vec = next.unwrap_or_default();
            next_vec.extend(add);
            DiagnosticMessageChain::Chain {
                message_text,
                category,
                code,
                next: Some(next_vec),
            }
        }
    }
}
