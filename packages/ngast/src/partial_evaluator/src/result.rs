// Result Types
//
// Values produced by partial evaluation.

use super::dynamic::{DynamicReason, DynamicValue};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use ts::DeclarationId;

/// A statically known reference to a top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(skip)]
    pub id: DeclarationId,
    pub name: String,
    pub file: String,
}

/// Resolved value from partial evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    Array(Vec<ResolvedValue>),
    /// Object literal, in source key order.
    Map(IndexMap<String, ResolvedValue>),
    Reference(Reference),
    Dynamic(DynamicValue),
}

impl ResolvedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResolvedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResolvedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ResolvedValue]> {
        match self {
            ResolvedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ResolvedValue>> {
        match self {
            ResolvedValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            ResolvedValue::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicValue> {
        match self {
            ResolvedValue::Dynamic(dynamic) => Some(dynamic),
            _ => None,
        }
    }

    /// Property of a map value.
    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ResolvedValue::Dynamic(_))
    }

    /// `(module, name)` of a value imported from outside the program.
    pub fn as_external(&self) -> Option<(&str, &str)> {
        match self {
            ResolvedValue::Dynamic(DynamicValue {
                reason: DynamicReason::External { module, name },
                ..
            }) => Some((module, name)),
            _ => None,
        }
    }

    /// Identity comparison used for DI tokens: references compare by
    /// declaration, external values by their qualified name, primitives by
    /// value.
    pub fn same_token(&self, other: &ResolvedValue) -> bool {
        match (self, other) {
            (ResolvedValue::Reference(a), ResolvedValue::Reference(b)) => a.id == b.id,
            (ResolvedValue::Dynamic(_), ResolvedValue::Dynamic(_)) => {
                match (self.as_external(), other.as_external()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (ResolvedValue::String(a), ResolvedValue::String(b)) => a == b,
            (ResolvedValue::Number(a), ResolvedValue::Number(b)) => a == b,
            (ResolvedValue::Boolean(a), ResolvedValue::Boolean(b)) => a == b,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ResolvedValue::String(_) => "string",
            ResolvedValue::Number(_) => "number",
            ResolvedValue::Boolean(_) => "boolean",
            ResolvedValue::Null => "null",
            ResolvedValue::Undefined => "undefined",
            ResolvedValue::Array(_) => "array",
            ResolvedValue::Map(_) => "object",
            ResolvedValue::Reference(_) => "reference",
            ResolvedValue::Dynamic(_) => "dynamic value",
        }
    }

    /// JavaScript truthiness, when it can be known.
    pub(crate) fn truthiness(&self) -> Option<bool> {
        match self {
            ResolvedValue::String(s) => Some(!s.is_empty()),
            ResolvedValue::Number(n) => Some(*n != 0.0 && !n.is_nan()),
            ResolvedValue::Boolean(b) => Some(*b),
            ResolvedValue::Null | ResolvedValue::Undefined => Some(false),
            ResolvedValue::Array(_) | ResolvedValue::Map(_) | ResolvedValue::Reference(_) => Some(true),
            ResolvedValue::Dynamic(_) => None,
        }
    }

    /// String conversion of a primitive, as a template literal would do it.
    pub(crate) fn to_js_string(&self) -> Option<String> {
        match self {
            ResolvedValue::String(s) => Some(s.clone()),
            ResolvedValue::Number(n) => Some(format_number(*n)),
            ResolvedValue::Boolean(b) => Some(b.to_string()),
            ResolvedValue::Null => Some("null".to_string()),
            ResolvedValue::Undefined => Some("undefined".to_string()),
            _ => None,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::String(s) => write!(f, "'{}'", s),
            ResolvedValue::Number(n) => f.write_str(&format_number(*n)),
            ResolvedValue::Boolean(b) => write!(f, "{}", b),
            ResolvedValue::Null => f.write_str("null"),
            ResolvedValue::Undefined => f.write_str("undefined"),
            ResolvedValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ResolvedValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", key, value)?;
                }
                f.write_str(" }")
            }
            ResolvedValue::Reference(reference) => f.write_str(&reference.name),
            ResolvedValue::Dynamic(dynamic) => match dynamic.reason {
                DynamicReason::External { ref module, ref name } => write!(f, "{} from '{}'", name, module),
                _ => write!(f, "<dynamic: {}>", dynamic.reason),
            },
        }
    }
}
