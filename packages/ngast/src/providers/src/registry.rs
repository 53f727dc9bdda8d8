// Provider Registry
//
// Flattens evaluated `providers` expressions into provider entries.

use super::api::{Provider, ProviderEntry, UseKind};
use crate::logging::Logger;
use crate::partial_evaluator::{PartialEvaluator, ResolvedValue};
use indexmap::IndexMap;
use std::rc::Rc;
use ts::Expression;

pub struct ProviderRegistry {
    evaluator: Rc<PartialEvaluator>,
    logger: Rc<dyn Logger>,
    max_depth: usize,
}

impl ProviderRegistry {
    pub fn new(evaluator: Rc<PartialEvaluator>, logger: Rc<dyn Logger>, max_depth: usize) -> Self {
        Self {
            evaluator,
            logger,
            max_depth,
        }
    }

    /// Evaluates `expr` in `file` and flattens the result. Entries that cannot
    /// be understood are left out.
    pub fn get_providers(&self, expr: &Expression, file: &str) -> Vec<ProviderEntry> {
        let value = self.evaluator.evaluate(expr, file);
        self.resolve_providers(&value)
    }

    pub fn resolve_providers(&self, value: &ResolvedValue) -> Vec<ProviderEntry> {
        let mut entries = Vec::new();
        self.walk(value, 0, &mut entries);
        entries
    }

    fn walk(&self, value: &ResolvedValue, depth: usize, out: &mut Vec<ProviderEntry>) {
        if depth > self.max_depth {
            self.logger
                .debug(&format!("providers nested deeper than {}, ignoring the rest", self.max_depth));
            return;
        }
        match value {
            ResolvedValue::Array(items) => {
                for item in items {
                    self.walk(item, depth + 1, out);
                }
            }
            ResolvedValue::Reference(class) => out.push(ProviderEntry::Class {
                provide: None,
                class: class.clone(),
            }),
            ResolvedValue::Map(map) => match self.read_provider(map) {
                Some(entry) => out.push(entry),
                None => self.logger.debug(&format!("dropping unrecognized provider {}", value)),
            },
            ResolvedValue::Dynamic(dynamic) => {
                self.logger.debug(&format!("dropping dynamic provider: {}", dynamic));
            }
            other => self.logger.debug(&format!("dropping provider {}", other)),
        }
    }

    /// A `{ provide, useX }` mapping with exactly one use key.
    fn read_provider(&self, map: &IndexMap<String, ResolvedValue>) -> Option<ProviderEntry> {
        let provide = map.get("provide")?;
        let mut uses = UseKind::KEYS
            .iter()
            .filter_map(|(key, kind)| map.get(*key).map(|value| (*kind, value)));
        let (use_kind, value) = uses.next()?;
        if uses.next().is_some() {
            return None;
        }

        if use_kind == UseKind::Class {
            let class = value.as_reference()?;
            return Some(ProviderEntry::Class {
                provide: Some(provide.clone()),
                class: class.clone(),
            });
        }
        Some(ProviderEntry::Provider(Provider {
            provide: provide.clone(),
            use_kind,
            value: value.clone(),
            multi: map.get("multi").and_then(ResolvedValue::as_bool).unwrap_or(false),
        }))
    }
}
