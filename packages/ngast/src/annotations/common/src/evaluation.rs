// Evaluation Utilities
//
// Reading decorator arguments and typed fields out of evaluated object literals.

use super::util::{decorator_short_name, CORE_MODULE};
use crate::diagnostics::{make_diagnostic, ErrorCode};
use crate::partial_evaluator::{PartialEvaluator, ResolvedValue};
use indexmap::IndexMap;
use serde::Serialize;
use ts::{Decorator, Diagnostic, DiagnosticCategory, Expression, ExpressionKind, Span};

/// View encapsulation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewEncapsulation {
    Emulated,
    None,
    ShadowDom,
}

impl ViewEncapsulation {
    pub fn from_member(name: &str) -> Option<Self> {
        match name {
            "Emulated" => Some(ViewEncapsulation::Emulated),
            "None" => Some(ViewEncapsulation::None),
            "ShadowDom" => Some(ViewEncapsulation::ShadowDom),
            _ => None,
        }
    }

    pub fn from_number(n: f64) -> Option<Self> {
        match n as i64 {
            0 => Some(ViewEncapsulation::Emulated),
            2 => Some(ViewEncapsulation::None),
            3 => Some(ViewEncapsulation::ShadowDom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeDetectionStrategy {
    OnPush,
    Default,
}

impl ChangeDetectionStrategy {
    pub fn from_member(name: &str) -> Option<Self> {
        match name {
            "OnPush" => Some(ChangeDetectionStrategy::OnPush),
            "Default" => Some(ChangeDetectionStrategy::Default),
            _ => None,
        }
    }

    pub fn from_number(n: f64) -> Option<Self> {
        match n as i64 {
            0 => Some(ChangeDetectionStrategy::OnPush),
            1 => Some(ChangeDetectionStrategy::Default),
            _ => None,
        }
    }
}

/// Member name of a core enum value such as `ViewEncapsulation.None`.
pub fn core_enum_member<'v>(value: &'v ResolvedValue, enum_name: &str) -> Option<&'v str> {
    let (module, name) = value.as_external()?;
    if module != CORE_MODULE {
        return None;
    }
    name.strip_prefix(enum_name)?.strip_prefix('.')
}

/// The single object-literal argument of `decorator`.
///
/// `Ok(None)` for a call without arguments when `optional` is set. A missing
/// call, a wrong argument count or a non-literal argument are errors.
pub fn read_decorator_argument<'d>(
    decorator: &'d Decorator,
    file: &str,
    optional: bool,
) -> Result<Option<&'d Expression>, Diagnostic> {
    let name = decorator_short_name(decorator);
    let Some(args) = decorator.args.as_ref() else {
        return Err(error(
            ErrorCode::DecoratorNotCalled,
            file,
            decorator.span,
            format!("@{} must be called", name),
        ));
    };
    match args.as_slice() {
        [] if optional => Ok(None),
        [] => Err(error(
            ErrorCode::DecoratorArityWrong,
            file,
            decorator.span,
            format!("@{} requires an argument", name),
        )),
        [arg] => match arg.kind {
            ExpressionKind::Object(_) => Ok(Some(arg)),
            _ => Err(error(
                ErrorCode::DecoratorArgNotLiteral,
                file,
                arg.span,
                format!("@{} argument must be an object literal", name),
            )),
        },
        _ => Err(error(
            ErrorCode::DecoratorArityWrong,
            file,
            decorator.span,
            format!("@{} takes at most one argument, got {}", name, args.len()),
        )),
    }
}

pub(crate) fn error(code: ErrorCode, file: &str, span: Span, message: String) -> Diagnostic {
    make_diagnostic(code, file, span, message.into(), None, DiagnosticCategory::Error)
}

/// Typed reads of the fields of a decorator's object literal. Type errors are
/// collected rather than returned.
pub struct ObjectReader<'a> {
    evaluator: &'a PartialEvaluator,
    object: &'a Expression,
    file: &'a str,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(evaluator: &'a PartialEvaluator, object: &'a Expression, file: &'a str) -> Self {
        Self {
            evaluator,
            object,
            file,
            diagnostics: Vec::new(),
        }
    }

    pub fn file(&self) -> &'a str {
        self.file
    }

    pub fn has(&self, field: &str) -> bool {
        self.object.object_property(field).is_some()
    }

    pub fn raw(&self, field: &str) -> Option<&'a Expression> {
        self.object.object_property(field)
    }

    /// Evaluated value of `field`; `None` when absent.
    pub fn value(&self, field: &str) -> Option<ResolvedValue> {
        self.raw(field).map(|expr| self.evaluator.evaluate(expr, self.file))
    }

    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.value(field)? {
            ResolvedValue::String(s) => Some(s),
            ResolvedValue::Undefined => None,
            other => {
                self.wrong_type(field, "a string", &other);
                None
            }
        }
    }

    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        match self.value(field)? {
            ResolvedValue::Boolean(b) => Some(b),
            ResolvedValue::Undefined => None,
            other => {
                self.wrong_type(field, "a boolean", &other);
                None
            }
        }
    }

    /// An array of strings. A lone string is accepted when `allow_single` is set.
    pub fn string_array(&mut self, field: &str, allow_single: bool) -> Option<Vec<String>> {
        match self.value(field)? {
            ResolvedValue::String(s) if allow_single => Some(vec![s]),
            ResolvedValue::Array(items) => {
                let mut strings = Vec::with_capacity(items.len());
                for item in &items {
                    match item {
                        ResolvedValue::String(s) => strings.push(s.clone()),
                        other => {
                            self.wrong_type(field, "an array of strings", other);
                            return None;
                        }
                    }
                }
                Some(strings)
            }
            ResolvedValue::Undefined => None,
            other => {
                self.wrong_type(field, "an array of strings", &other);
                None
            }
        }
    }

    /// A map of string values; entries with other values are reported.
    pub fn string_map(&mut self, field: &str) -> IndexMap<String, String> {
        let mut map = IndexMap::new();
        match self.value(field) {
            Some(ResolvedValue::Map(entries)) => {
                for (key, value) in entries {
                    match value {
                        ResolvedValue::String(s) => {
                            map.insert(key, s);
                        }
                        other => self.wrong_type(&format!("{}.{}", field, key), "a string", &other),
                    }
                }
            }
            None | Some(ResolvedValue::Undefined) => {}
            Some(other) => self.wrong_type(field, "an object", &other),
        }
        map
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn wrong_type(&mut self, field: &str, expected: &str, actual: &ResolvedValue) {
        let span = self.raw(field.split('.').next().unwrap_or(field)).map_or(self.object.span, |e| e.span);
        let diagnostic = error(
            ErrorCode::ValueHasWrongType,
            self.file,
            span,
            format!("{} must be {}, got {}", field, expected, describe(actual)),
        );
        self.diagnostics.push(diagnostic);
    }
}

fn describe(value: &ResolvedValue) -> String {
    match value {
        ResolvedValue::Dynamic(dynamic) => format!("a value that could not be determined statically ({})", dynamic.root_cause().reason),
        other => format!("{} {}", other.type_name(), other),
    }
}
