// Provider API

use crate::partial_evaluator::{Reference, ResolvedValue};
use serde::Serialize;
use std::fmt;

/// How a provider produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UseKind {
    Value,
    Factory,
    Existing,
    Class,
}

impl UseKind {
    pub const KEYS: [(&'static str, UseKind); 4] = [
        ("useValue", UseKind::Value),
        ("useFactory", UseKind::Factory),
        ("useExisting", UseKind::Existing),
        ("useClass", UseKind::Class),
    ];

    pub fn key(self) -> &'static str {
        match self {
            UseKind::Value => "useValue",
            UseKind::Factory => "useFactory",
            UseKind::Existing => "useExisting",
            UseKind::Class => "useClass",
        }
    }
}

impl fmt::Display for UseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A `{ provide, useX }` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub provide: ResolvedValue,
    pub use_kind: UseKind,
    pub value: ResolvedValue,
    pub multi: bool,
}

impl Provider {
    /// Printable form of the token.
    pub fn name(&self) -> String {
        self.provide.to_string()
    }

    pub fn provides(&self, token: &ResolvedValue) -> bool {
        self.provide.same_token(token)
    }
}

/// One entry of a flattened `providers` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEntry {
    /// A class provided under its own token, or under `provide` through `useClass`.
    Class {
        provide: Option<ResolvedValue>,
        class: Reference,
    },
    Provider(Provider),
}

impl ProviderEntry {
    /// Whether this entry answers requests for `token`.
    pub fn provides(&self, token: &ResolvedValue) -> bool {
        match self {
            ProviderEntry::Class { provide: Some(provide), .. } => provide.same_token(token),
            ProviderEntry::Class { provide: None, class } => {
                token.as_reference().map_or(false, |r| r.id == class.id)
            }
            ProviderEntry::Provider(provider) => provider.provides(token),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ProviderEntry::Class { class, .. } => class.name.clone(),
            ProviderEntry::Provider(provider) => provider.name(),
        }
    }
}
