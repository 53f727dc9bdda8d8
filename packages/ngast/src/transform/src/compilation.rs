// Compilation - The heart of the analysis engine
//
// The TraitCompiler processes classes on demand. Any time a DecoratorHandler matches a
// class, a "trait" is created to represent that Angular aspect of the class (such as the
// class having a component definition). Each record is analyzed at most once.

use super::api::{Analysis, AnalysisOutput, AnnotationKind, DecoratorHandler, DetectResult, HandlerPrecedence, Resolution};
use super::trait_::{Trait, TraitState};
use crate::diagnostics::{make_diagnostic, make_related_information, ErrorCode, NgastError, NgastResult};
use crate::logging::Logger;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use ts::{DeclarationId, Diagnostic, DiagnosticCategory, Program};

// ============================================================================
// ClassRecord
// ============================================================================

/// Records information about a specific class that has matched traits.
#[derive(Debug)]
pub struct ClassRecord {
    pub node: DeclarationId,

    pub class_name: String,

    /// All traits which matched on the class. A class carries at most one
    /// primary trait.
    pub traits: Vec<Trait>,

    /// Whether traits contains a trait from a DecoratorHandler matched as PRIMARY.
    pub has_primary_handler: bool,
}

impl ClassRecord {
    pub fn new(node: DeclarationId, class_name: String) -> Self {
        Self {
            node,
            class_name,
            traits: Vec::new(),
            has_primary_handler: false,
        }
    }

    pub fn primary(&self) -> Option<&Trait> {
        self.traits.first()
    }

    pub fn kind(&self) -> Option<AnnotationKind> {
        self.primary().map(|t| t.detected.kind)
    }

    pub fn state(&self) -> Option<TraitState> {
        self.primary().map(|t| t.state)
    }

    fn primary_mut(&mut self) -> Option<&mut Trait> {
        self.traits.first_mut()
    }
}

// ============================================================================
// TraitCompiler
// ============================================================================

pub struct TraitCompiler {
    handlers: Vec<Rc<dyn DecoratorHandler>>,
    program: Rc<Program>,
    logger: Rc<dyn Logger>,
    records: RefCell<IndexMap<DeclarationId, ClassRecord>>,
    /// Classes no handler matched.
    not_of_interest: RefCell<HashSet<DeclarationId>>,
    /// Declarations whose analyze or resolve is running, outermost first.
    in_progress: RefCell<Vec<DeclarationId>>,
    all_analyzed: Cell<bool>,
}

impl TraitCompiler {
    pub fn new(handlers: Vec<Rc<dyn DecoratorHandler>>, program: Rc<Program>, logger: Rc<dyn Logger>) -> Self {
        Self {
            handlers,
            program,
            logger,
            records: RefCell::new(IndexMap::new()),
            not_of_interest: RefCell::new(HashSet::new()),
            in_progress: RefCell::new(Vec::new()),
            all_analyzed: Cell::new(false),
        }
    }

    /// Analyze `node` if it has not been analyzed yet.
    ///
    /// Returns `Reentrancy` when the class is already being analyzed further
    /// up the stack.
    pub fn analyze_node(&self, node: DeclarationId) -> NgastResult<()> {
        if let Some(state) = self.records.borrow().get(&node).and_then(ClassRecord::state) {
            if state == TraitState::Analyzing {
                return Err(self.reentrancy(node));
            }
            return Ok(());
        }
        if self.not_of_interest.borrow().contains(&node) {
            return Ok(());
        }

        let decl = self.program.declaration(node);
        if !decl.is_class() {
            self.not_of_interest.borrow_mut().insert(node);
            return Ok(());
        }

        let Some((handler, detected, collisions)) = self.detect(node) else {
            self.not_of_interest.borrow_mut().insert(node);
            return Ok(());
        };

        let mut record = ClassRecord::new(node, decl.name.clone());
        record.has_primary_handler = handler.precedence() == HandlerPrecedence::Primary;
        let mut trait_ = Trait::pending(handler.clone(), detected.clone());

        if !collisions.is_empty() {
            let diagnostic = self.collision_diagnostic(node, &detected, &collisions);
            trait_.to_errored(vec![diagnostic]);
            record.traits.push(trait_);
            self.records.borrow_mut().insert(node, record);
            self.logger.warn(&format!(
                "{} carries more than one primary annotation; keeping {}",
                decl.name, detected.kind
            ));
            return Ok(());
        }

        trait_.to_analyzing();
        record.traits.push(trait_);
        self.records.borrow_mut().insert(node, record);
        self.logger
            .debug(&format!("{}: {} -> {} ({})", decl.name, TraitState::Pending, TraitState::Analyzing, detected.kind));

        self.in_progress.borrow_mut().push(node);
        let output = handler.analyze(node, &detected);
        self.in_progress.borrow_mut().pop();

        if let Some(analysis) = self.complete_analysis(node, output) {
            handler.register(node, &analysis);
        }
        Ok(())
    }

    /// Resolve `node`, analyzing it and the rest of the program first.
    ///
    /// Scopes are computed from every registered module, so the first resolve
    /// analyzes all classes.
    pub fn resolve_node(&self, node: DeclarationId) -> NgastResult<()> {
        self.analyze_node(node)?;
        self.analyze_all()?;

        match self.state_of(node) {
            Some(TraitState::Analyzed) => {}
            Some(TraitState::Analyzing | TraitState::Resolving) => return Err(self.reentrancy(node)),
            _ => return Ok(()),
        }

        let (handler, analysis) = {
            let mut records = self.records.borrow_mut();
            let Some(trait_) = records.get_mut(&node).and_then(ClassRecord::primary_mut) else {
                return Ok(());
            };
            let Some(analysis) = trait_.analysis().cloned() else {
                return Ok(());
            };
            trait_.to_resolving();
            (trait_.handler.clone(), analysis)
        };

        self.in_progress.borrow_mut().push(node);
        let result = handler.resolve(node, &analysis);
        self.in_progress.borrow_mut().pop();

        let mut records = self.records.borrow_mut();
        let Some(record) = records.get_mut(&node) else {
            return Ok(());
        };
        let name = record.class_name.clone();
        let Some(trait_) = record.primary_mut() else {
            return Ok(());
        };
        if result.has_errors() {
            let diagnostics = result.diagnostics.unwrap_or_default();
            self.logger
                .warn(&format!("{}: resolution failed with {} diagnostic(s)", name, diagnostics.len()));
            trait_.to_errored(diagnostics);
        } else {
            trait_.to_resolved(result.data);
            self.logger
                .debug(&format!("{}: {} -> {}", name, TraitState::Resolving, TraitState::Resolved));
        }
        Ok(())
    }

    /// Analyze every class of the program. Classes whose analysis is already
    /// running are left alone.
    pub fn analyze_all(&self) -> NgastResult<()> {
        if self.all_analyzed.get() {
            return Ok(());
        }
        let mut complete = true;
        for decl in self.program.declarations() {
            if !decl.is_class() {
                continue;
            }
            if self.in_progress.borrow().contains(&decl.id) {
                complete = false;
                continue;
            }
            self.analyze_node(decl.id)?;
        }
        if complete {
            self.all_analyzed.set(true);
        }
        Ok(())
    }

    /// Analysis of `node`, resolved first.
    ///
    /// `Ok(None)` when no handler matched or the trait was skipped; an errored
    /// trait surfaces as `NgastError::Analysis` carrying its diagnostics.
    pub fn analysis_of(&self, node: DeclarationId) -> NgastResult<Option<Analysis>> {
        self.resolve_node(node)?;
        self.with_trait(node, |name, trait_| match trait_.state {
            TraitState::Errored => Err(NgastError::Analysis {
                name: name.to_string(),
                diagnostics: trait_.diagnostics().map(<[Diagnostic]>::to_vec).unwrap_or_default(),
            }),
            _ => Ok(trait_.analysis().cloned()),
        })
        .unwrap_or(Ok(None))
    }

    pub fn resolution_of(&self, node: DeclarationId) -> NgastResult<Option<Resolution>> {
        self.resolve_node(node)?;
        Ok(self.with_trait(node, |_, trait_| trait_.resolution().cloned()).flatten())
    }

    /// Diagnostics of an errored trait for `node`, analyzing it if needed.
    pub fn diagnostics_of(&self, node: DeclarationId) -> NgastResult<Vec<Diagnostic>> {
        self.resolve_node(node)?;
        Ok(self
            .with_trait(node, |_, trait_| trait_.diagnostics().map(<[Diagnostic]>::to_vec))
            .flatten()
            .unwrap_or_default())
    }

    /// Annotation kind of `node` after analysis; `None` for classes no handler matched.
    pub fn kind_of(&self, node: DeclarationId) -> NgastResult<Option<AnnotationKind>> {
        self.analyze_node(node)?;
        Ok(self.records.borrow().get(&node).and_then(ClassRecord::kind))
    }

    pub fn state_of(&self, node: DeclarationId) -> Option<TraitState> {
        self.records.borrow().get(&node).and_then(ClassRecord::state)
    }

    /// Every tracked record, in declaration order, optionally restricted to one kind.
    pub fn all_records(&self, kind: Option<AnnotationKind>) -> Vec<DeclarationId> {
        let records = self.records.borrow();
        let mut ids: Vec<DeclarationId> = records
            .values()
            .filter(|record| kind.map_or(true, |k| record.kind() == Some(k)))
            .map(|record| record.node)
            .collect();
        ids.sort();
        ids
    }

    /// Diagnostics of every errored trait seen so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let records = self.records.borrow();
        let mut diagnostics = Vec::new();
        for id in self.all_records(None) {
            if let Some(found) = records.get(&id).and_then(ClassRecord::primary).and_then(Trait::diagnostics) {
                diagnostics.extend(found.iter().cloned());
            }
        }
        diagnostics
    }

    fn detect(
        &self,
        node: DeclarationId,
    ) -> Option<(Rc<dyn DecoratorHandler>, DetectResult, Vec<DetectResult>)> {
        let mut primary: Option<(Rc<dyn DecoratorHandler>, DetectResult)> = None;
        let mut weak: Option<(Rc<dyn DecoratorHandler>, DetectResult)> = None;
        let mut collisions = Vec::new();

        for handler in &self.handlers {
            let Some(detected) = handler.detect(node) else {
                continue;
            };
            match handler.precedence() {
                HandlerPrecedence::Primary if primary.is_some() => collisions.push(detected),
                HandlerPrecedence::Primary => primary = Some((handler.clone(), detected)),
                HandlerPrecedence::Weak => {
                    if weak.is_none() {
                        weak = Some((handler.clone(), detected));
                    }
                }
            }
        }

        let (handler, detected) = primary.or(weak)?;
        Some((handler, detected, collisions))
    }

    fn complete_analysis(&self, node: DeclarationId, output: AnalysisOutput) -> Option<Analysis> {
        let mut records = self.records.borrow_mut();
        let record = records.get_mut(&node)?;
        let name = record.class_name.clone();
        let trait_ = record.primary_mut()?;

        if output.has_errors() {
            let diagnostics = output.diagnostics.unwrap_or_default();
            self.logger
                .warn(&format!("{}: analysis failed with {} diagnostic(s)", name, diagnostics.len()));
            trait_.to_errored(diagnostics);
            return None;
        }
        match output.analysis {
            Some(analysis) => {
                trait_.to_analyzed(analysis.clone());
                self.logger
                    .debug(&format!("{}: {} -> {}", name, TraitState::Analyzing, TraitState::Analyzed));
                Some(analysis)
            }
            None => {
                trait_.to_skipped();
                self.logger.debug(&format!("{}: skipped", name));
                None
            }
        }
    }

    fn collision_diagnostic(&self, node: DeclarationId, kept: &DetectResult, others: &[DetectResult]) -> Diagnostic {
        let decl = self.program.declaration(node);
        let names: Vec<String> = std::iter::once(kept)
            .chain(others)
            .map(|d| format!("@{}", d.kind))
            .collect();
        let span = others
            .first()
            .and_then(|d| d.decorator.as_ref())
            .map_or(decl.span, |d| d.span);
        let related = kept
            .decorator
            .as_ref()
            .map(|d| vec![make_related_information(&decl.file, d.span, format!("@{} is applied here.", kept.kind))]);
        make_diagnostic(
            ErrorCode::DecoratorCollision,
            &decl.file,
            span,
            format!(
                "The class '{}' is decorated with {}, but only one Angular annotation is allowed per class.",
                decl.name,
                names.join(" and ")
            )
            .into(),
            related,
            DiagnosticCategory::Error,
        )
    }

    fn with_trait<R>(&self, node: DeclarationId, f: impl FnOnce(&str, &Trait) -> R) -> Option<R> {
        let records = self.records.borrow();
        let record = records.get(&node)?;
        record.primary().map(|trait_| f(&record.class_name, trait_))
    }

    fn reentrancy(&self, node: DeclarationId) -> NgastError {
        let in_progress = self.in_progress.borrow();
        let start = in_progress.iter().position(|id| *id == node).unwrap_or(0);
        let trail = in_progress[start..]
            .iter()
            .chain(std::iter::once(&node))
            .map(|id| self.program.declaration(*id).name.clone())
            .collect();
        NgastError::Reentrancy { trail }
    }
}
