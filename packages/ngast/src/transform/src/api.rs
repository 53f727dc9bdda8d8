// Transform API - Core types and traits for Angular decorator handling
//
// A `DecoratorHandler` recognizes one Angular annotation on a class and turns
// it into an analysis. The `TraitCompiler` drives handlers through detect,
// analyze, register and resolve.

use crate::annotations::{
    ComponentAnalysis, ComponentResolution, DirectiveAnalysis, InjectableAnalysis, NgModuleAnalysis,
    NgModuleResolution, PipeAnalysis,
};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;
use ts::{Decorator, DeclarationId, Diagnostic};

// ============================================================================
// Core Enums
// ============================================================================

/// The Angular annotation a class carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AnnotationKind {
    NgModule,
    Injectable,
    Directive,
    Component,
    Pipe,
}

impl AnnotationKind {
    /// Decorator name that triggers this kind.
    pub fn decorator_name(self) -> &'static str {
        match self {
            AnnotationKind::NgModule => "NgModule",
            AnnotationKind::Injectable => "Injectable",
            AnnotationKind::Directive => "Directive",
            AnnotationKind::Component => "Component",
            AnnotationKind::Pipe => "Pipe",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.decorator_name())
    }
}

/// Handler precedence controls how it interacts with other handlers that match the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerPrecedence {
    /// Handler with PRIMARY precedence cannot overlap - there can only be one on a given class.
    /// If more than one PRIMARY handler matches a class, an error is produced.
    Primary,

    /// Handlers with WEAK precedence that match a class are ignored if any handlers with stronger
    /// precedence match a class.
    Weak,
}

// ============================================================================
// Core Structs
// ============================================================================

/// The output of detecting a trait for a declaration.
#[derive(Debug, Clone)]
pub struct DetectResult {
    /// The name of the decorator that triggered the match.
    pub trigger: Option<String>,

    /// The recognized decorator. `None` for pre-compiled classes detected
    /// through their static definition markers.
    pub decorator: Option<Decorator>,

    pub kind: AnnotationKind,
}

impl DetectResult {
    pub fn from_decorator(kind: AnnotationKind, decorator: &Decorator) -> Self {
        Self {
            trigger: Some(decorator.name.clone()),
            decorator: Some(decorator.clone()),
            kind,
        }
    }

    pub fn from_marker(kind: AnnotationKind) -> Self {
        Self {
            trigger: None,
            decorator: None,
            kind,
        }
    }
}

/// Analysis of one annotated class. Cloning shares the analysis.
#[derive(Debug, Clone)]
pub enum Analysis {
    NgModule(Rc<NgModuleAnalysis>),
    Injectable(Rc<InjectableAnalysis>),
    Directive(Rc<DirectiveAnalysis>),
    Component(Rc<ComponentAnalysis>),
    Pipe(Rc<PipeAnalysis>),
}

impl Analysis {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Analysis::NgModule(_) => AnnotationKind::NgModule,
            Analysis::Injectable(_) => AnnotationKind::Injectable,
            Analysis::Directive(_) => AnnotationKind::Directive,
            Analysis::Component(_) => AnnotationKind::Component,
            Analysis::Pipe(_) => AnnotationKind::Pipe,
        }
    }

    pub fn as_ng_module(&self) -> Option<&Rc<NgModuleAnalysis>> {
        match self {
            Analysis::NgModule(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn as_injectable(&self) -> Option<&Rc<InjectableAnalysis>> {
        match self {
            Analysis::Injectable(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&Rc<DirectiveAnalysis>> {
        match self {
            Analysis::Directive(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Rc<ComponentAnalysis>> {
        match self {
            Analysis::Component(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn as_pipe(&self) -> Option<&Rc<PipeAnalysis>> {
        match self {
            Analysis::Pipe(analysis) => Some(analysis),
            _ => None,
        }
    }
}

/// Data produced by a handler's resolve phase.
#[derive(Debug, Clone)]
pub enum Resolution {
    NgModule(NgModuleResolution),
    Component(ComponentResolution),
}

/// The output of an analysis operation, consisting of possibly an analysis object
/// and potentially diagnostics if there were errors uncovered during analysis.
#[derive(Debug, Default)]
pub struct AnalysisOutput {
    pub analysis: Option<Analysis>,
    pub diagnostics: Option<Vec<Diagnostic>>,
}

impl AnalysisOutput {
    pub fn of(analysis: Analysis) -> Self {
        Self {
            analysis: Some(analysis),
            diagnostics: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(analysis: Option<Analysis>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            analysis,
            diagnostics: if diagnostics.is_empty() { None } else { Some(diagnostics) },
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().flatten().any(Diagnostic::is_error)
    }
}

/// The output of a resolution operation.
#[derive(Debug, Default)]
pub struct ResolveResult {
    pub data: Option<Resolution>,
    pub diagnostics: Option<Vec<Diagnostic>>,
}

impl ResolveResult {
    pub fn of(data: Resolution) -> Self {
        Self {
            data: Some(data),
            diagnostics: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().flatten().any(Diagnostic::is_error)
    }
}

// ============================================================================
// DecoratorHandler Trait
// ============================================================================

/// Recognizes one annotation and extracts what the rest of the engine needs
/// from the decorated class.
pub trait DecoratorHandler {
    /// The name of this handler (for debugging and error messages).
    fn name(&self) -> &str;

    fn kind(&self) -> AnnotationKind;

    fn precedence(&self) -> HandlerPrecedence {
        HandlerPrecedence::Primary
    }

    /// Determine whether this handler is responsible for the class.
    fn detect(&self, node: DeclarationId) -> Option<DetectResult>;

    /// Perform analysis on the decorator/class combination.
    fn analyze(&self, node: DeclarationId, detected: &DetectResult) -> AnalysisOutput;

    /// Record the analysis in the larger compilation, before any resolve runs.
    fn register(&self, _node: DeclarationId, _analysis: &Analysis) {}

    /// Perform resolution on the given decorator along with the result of analysis.
    fn resolve(&self, _node: DeclarationId, _analysis: &Analysis) -> ResolveResult {
        ResolveResult::empty()
    }
}
