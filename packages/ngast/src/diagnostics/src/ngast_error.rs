// Engine Errors
//
// Errors surfaced to callers of the workspace. Handler problems stay on their
// trait as diagnostics and only surface as `Analysis` when that declaration's
// analysis is read.

use thiserror::Error;
use ts::{Diagnostic, ProgramError};

pub type NgastResult<T> = Result<T, NgastError>;

#[derive(Debug, Error)]
pub enum NgastError {
    #[error("analysis of '{name}' failed with {} diagnostic(s)", diagnostics.len())]
    Analysis {
        name: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("'{name}' was skipped by analysis")]
    Skipped { name: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("re-entrant analysis: {}", trail.join(" -> "))]
    Reentrancy { trail: Vec<String> },

    #[error("cyclic service construction: {}", trail.join(" -> "))]
    ServiceCycle { trail: Vec<String> },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("lazy route cycle: {}", trail.join(" -> "))]
    LazyRouteCycle { trail: Vec<String> },
}

impl NgastError {
    /// Diagnostics captured on an errored trait, empty for every other error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            NgastError::Analysis { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, NgastError::Analysis { .. } | NgastError::Skipped { .. })
    }
}

impl From<ProgramError> for NgastError {
    fn from(error: ProgramError) -> Self {
        NgastError::Configuration(error.to_string())
    }
}

impl From<serde_json::Error> for NgastError {
    fn from(error: serde_json::Error) -> Self {
        NgastError::Configuration(error.to_string())
    }
}
