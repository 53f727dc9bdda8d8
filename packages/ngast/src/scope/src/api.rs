// Scope API
//
// The directives and pipes visible to a component's template.

use crate::metadata::{DirectiveMeta, PipeMeta};
use crate::partial_evaluator::Reference;
use serde::Serialize;
use ts::DeclarationId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeDirective {
    pub reference: Reference,
    pub selector: Option<String>,
    pub is_component: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopePipe {
    pub reference: Reference,
    pub name: String,
}

/// Directives and pipes of a compilation or export scope, in the order they
/// were first seen. Each declaration appears once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleScope {
    pub directives: Vec<ScopeDirective>,
    pub pipes: Vec<ScopePipe>,
}

impl ModuleScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.pipes.is_empty()
    }

    /// Adds a directive unless one with the same declaration is already present.
    pub fn add_directive(&mut self, meta: &DirectiveMeta) {
        if self.has_directive(meta.reference.id) {
            return;
        }
        self.directives.push(ScopeDirective {
            reference: meta.reference.clone(),
            selector: meta.selector.clone(),
            is_component: meta.is_component,
        });
    }

    pub fn add_pipe(&mut self, meta: &PipeMeta) {
        if self.has_pipe(meta.reference.id) {
            return;
        }
        self.pipes.push(ScopePipe {
            reference: meta.reference.clone(),
            name: meta.name.clone(),
        });
    }

    /// Adds every entry of `other` not already present.
    pub fn merge(&mut self, other: &ModuleScope) {
        for directive in &other.directives {
            if !self.has_directive(directive.reference.id) {
                self.directives.push(directive.clone());
            }
        }
        for pipe in &other.pipes {
            if !self.has_pipe(pipe.reference.id) {
                self.pipes.push(pipe.clone());
            }
        }
    }

    pub fn has_directive(&self, node: DeclarationId) -> bool {
        self.directives.iter().any(|d| d.reference.id == node)
    }

    pub fn has_pipe(&self, node: DeclarationId) -> bool {
        self.pipes.iter().any(|p| p.reference.id == node)
    }
}
