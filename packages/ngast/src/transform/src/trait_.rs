// Trait System - State machine for tracking decorator analysis progress
//
// Traits are created when a DecoratorHandler matches a class. Each trait begins in a
// pending state and moves forward through analysis and resolution. Errored and
// Skipped are terminal.

use super::api::{Analysis, DecoratorHandler, DetectResult, Resolution};
use std::fmt;
use std::rc::Rc;
use ts::Diagnostic;

// ============================================================================
// Trait State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitState {
    /// Freshly created, never analyzed.
    Pending,

    /// The handler's `analyze` is running.
    Analyzing,

    /// Analysis succeeded; resolution has not run yet.
    Analyzed,

    /// The handler's `resolve` is running.
    Resolving,

    Resolved,

    /// Analysis or resolution produced error diagnostics.
    Errored,

    /// The handler produced neither an analysis nor errors.
    Skipped,
}

impl fmt::Display for TraitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Trait Implementation
// ============================================================================

/// An Angular aspect of a class, such as its component definition.
///
/// The `state` field indicates which of the optional fields are valid:
/// `analysis` from Analyzed through Resolved, `resolution` once Resolved and
/// `diagnostics` once Errored.
pub struct Trait {
    pub state: TraitState,

    /// The `DecoratorHandler` which matched on the class to create this trait.
    pub handler: Rc<dyn DecoratorHandler>,

    /// The detection result which indicated that this trait applied to the class.
    pub detected: DetectResult,

    analysis: Option<Analysis>,
    resolution: Option<Resolution>,
    diagnostics: Option<Vec<Diagnostic>>,
}

impl Trait {
    pub fn pending(handler: Rc<dyn DecoratorHandler>, detected: DetectResult) -> Self {
        Trait {
            state: TraitState::Pending,
            handler,
            detected,
            analysis: None,
            resolution: None,
            diagnostics: None,
        }
    }

    /// # Panics
    /// Panics if the trait is not Pending.
    pub fn to_analyzing(&mut self) {
        self.assert_transition_legal(&[TraitState::Pending], TraitState::Analyzing);
        self.state = TraitState::Analyzing;
    }

    /// # Panics
    /// Panics if the trait is not Analyzing.
    pub fn to_analyzed(&mut self, analysis: Analysis) {
        self.assert_transition_legal(&[TraitState::Analyzing], TraitState::Analyzed);
        self.analysis = Some(analysis);
        self.state = TraitState::Analyzed;
    }

    /// # Panics
    /// Panics if the trait is not Analyzed.
    pub fn to_resolving(&mut self) {
        self.assert_transition_legal(&[TraitState::Analyzed], TraitState::Resolving);
        self.state = TraitState::Resolving;
    }

    /// # Panics
    /// Panics if the trait is not Resolving.
    pub fn to_resolved(&mut self, resolution: Option<Resolution>) {
        self.assert_transition_legal(&[TraitState::Resolving], TraitState::Resolved);
        self.resolution = resolution;
        self.state = TraitState::Resolved;
    }

    /// Any partial analysis is dropped.
    ///
    /// # Panics
    /// Panics unless the trait is Pending, Analyzing or Resolving.
    pub fn to_errored(&mut self, diagnostics: Vec<Diagnostic>) {
        self.assert_transition_legal(
            &[TraitState::Pending, TraitState::Analyzing, TraitState::Resolving],
            TraitState::Errored,
        );
        self.analysis = None;
        self.resolution = None;
        self.diagnostics = Some(diagnostics);
        self.state = TraitState::Errored;
    }

    /// # Panics
    /// Panics if the trait is not Analyzing.
    pub fn to_skipped(&mut self) {
        self.assert_transition_legal(&[TraitState::Analyzing], TraitState::Skipped);
        self.state = TraitState::Skipped;
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn diagnostics(&self) -> Option<&[Diagnostic]> {
        self.diagnostics.as_deref()
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.state, TraitState::Analyzing | TraitState::Resolving)
    }

    pub fn is_errored(&self) -> bool {
        self.state == TraitState::Errored
    }

    /// Verifies that the trait is currently in an allowed state before transitioning.
    fn assert_transition_legal(&self, allowed: &[TraitState], transition_to: TraitState) {
        if !allowed.contains(&self.state) {
            panic!(
                "Assertion failure: cannot transition from {:?} to {:?}.",
                self.state, transition_to
            );
        }
    }
}

impl fmt::Debug for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trait")
            .field("state", &self.state)
            .field("handler", &self.handler.name())
            .field("kind", &self.detected.kind)
            .finish()
    }
}
