// Common Utilities
//
// Decorator lookup and value helpers shared by the handlers.

use crate::partial_evaluator::{DynamicReason, Reference, ResolvedValue};
use ts::Decorator;

/// Module name of the framework core.
pub const CORE_MODULE: &str = "@angular/core";

/// Check if a decorator is imported from @angular/core.
pub fn is_angular_core(decorator: &Decorator) -> bool {
    decorator.import.as_deref() == Some(CORE_MODULE)
}

/// `@Name` or `@ns.Name`, imported from @angular/core.
pub fn is_angular_decorator(decorator: &Decorator, name: &str) -> bool {
    if !is_angular_core(decorator) {
        return false;
    }
    decorator.name == name
        || decorator
            .name
            .rsplit_once('.')
            .map_or(false, |(_, last)| last == name)
}

pub fn find_angular_decorator<'d>(decorators: &'d [Decorator], name: &str) -> Option<&'d Decorator> {
    decorators.iter().find(|d| is_angular_decorator(d, name))
}

pub fn get_angular_decorators<'d>(decorators: &'d [Decorator], names: &[&str]) -> Vec<&'d Decorator> {
    decorators
        .iter()
        .filter(|d| names.iter().any(|name| is_angular_decorator(d, name)))
        .collect()
}

/// Short name of a decorator, without any namespace qualifier.
pub fn decorator_short_name(decorator: &Decorator) -> &str {
    decorator
        .name
        .rsplit_once('.')
        .map_or(decorator.name.as_str(), |(_, last)| last)
}

/// What a list entry such as a module import turned out to be.
pub enum ListEntry<'v> {
    Reference(&'v Reference),
    /// A value imported from outside the program.
    External { module: &'v str, name: &'v str },
    /// Anything else, with the value that stopped it.
    Other(&'v ResolvedValue),
}

/// Flatten nested arrays of `value` into list entries.
pub fn flatten_list(value: &ResolvedValue) -> Vec<ListEntry<'_>> {
    let mut entries = Vec::new();
    collect_entries(value, &mut entries);
    entries
}

fn collect_entries<'v>(value: &'v ResolvedValue, out: &mut Vec<ListEntry<'v>>) {
    match value {
        ResolvedValue::Array(items) => {
            for item in items {
                collect_entries(item, out);
            }
        }
        ResolvedValue::Reference(reference) => out.push(ListEntry::Reference(reference)),
        ResolvedValue::Dynamic(dynamic) => match &dynamic.root_cause().reason {
            DynamicReason::External { module, name } => out.push(ListEntry::External { module, name }),
            _ => out.push(ListEntry::Other(value)),
        },
        other => out.push(ListEntry::Other(other)),
    }
}

