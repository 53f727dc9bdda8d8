use super::error_code::ErrorCode;
use super::util::ng_error_code;
use std::fmt;
use ts::{
    make_diagnostic_chain as ts_make_diagnostic_chain, Diagnostic, DiagnosticCategory,
    DiagnosticMessageChain, DiagnosticRelatedInformation, Span,
};

/// A handler error anchored at a node. Converted into a `Diagnostic` on the
/// trait that raised it.
#[derive(Debug, Clone)]
pub struct FatalDiagnosticError {
    pub code: ErrorCode,
    pub file: String,
    pub span: Span,
    pub diagnostic_message: DiagnosticMessageChain,
    pub related_information: Option<Vec<DiagnosticRelatedInformation>>,
}

impl FatalDiagnosticError {
    pub fn new(
        code: ErrorCode,
        file: &str,
        span: Span,
        diagnostic_message: impl Into<DiagnosticMessageChain>,
    ) -> Self {
        Self {
            code,
            file: file.to_string(),
            span,
            diagnostic_message: diagnostic_message.into(),
            related_information: None,
        }
    }

    pub fn with_related(mut self, related: DiagnosticRelatedInformation) -> Self {
        self.related_information.get_or_insert_with(Vec::new).push(related);
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        make_diagnostic(
            self.code,
            &self.file,
            self.span,
            self.diagnostic_message.clone(),
            self.related_information.clone(),
            DiagnosticCategory::Error,
        )
    }
}

impl fmt::Display for FatalDiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FatalDiagnosticError: Code: {:?}, Message: {}",
            self.code, self.diagnostic_message
        )
    }
}

impl std::error::Error for FatalDiagnosticError {}

impl From<FatalDiagnosticError> for Diagnostic {
    fn from(error: FatalDiagnosticError) -> Self {
        error.to_diagnostic()
    }
}

pub fn make_diagnostic(
    code: ErrorCode,
    file: &str,
    span: Span,
    message_text: DiagnosticMessageChain,
    related_information: Option<Vec<DiagnosticRelatedInformation>>,
    category: DiagnosticCategory,
) -> Diagnostic {
    Diagnostic {
        category,
        code: ng_error_code(code),
        file: Some(file.to_string()),
        start: span.start as usize,
        length: span.len() as usize,
        message_text,
        related_information,
    }
}

pub fn make_diagnostic_chain(
    message_text: String,
    next: Option<Vec<DiagnosticMessageChain>>,
) -> DiagnosticMessageChain {
    ts_make_diagnostic_chain(message_text, next)
}

pub fn make_related_information(file: &str, span: Span, message_text: String) -> DiagnosticRelatedInformation {
    DiagnosticRelatedInformation {
        category: DiagnosticCategory::Message,
        code: 0,
        file: Some(file.to_string()),
        start: Some(span.start as usize),
        length: Some(span.len() as usize),
        message_text,
    }
}
