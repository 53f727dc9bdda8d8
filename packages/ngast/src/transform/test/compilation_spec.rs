use crate::annotations::common::find_angular_decorator;
use crate::annotations::InjectableAnalysis;
use crate::diagnostics::{ng_error_code, ErrorCode, NgastError, NgastResult};
use crate::logging::{CapturingLogger, LogLevel, Logger};
use crate::partial_evaluator::Reference;
use crate::reflection::{ReflectionHost, TypeScriptReflectionHost};
use crate::transform::*;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use ts::{DeclarationId, Diagnostic, Program};

#[derive(Clone, Copy, Default)]
enum Failure {
    #[default]
    None,
    Analyze,
    Resolve,
}

struct MockHandler {
    kind: AnnotationKind,
    precedence: HandlerPrecedence,
    program: Rc<Program>,
    reflector: TypeScriptReflectionHost,
    failure: Failure,
    analyze_calls: Cell<usize>,
    /// Set to make `analyze` call back into the compiler for the same class.
    reenter: RefCell<Weak<TraitCompiler>>,
    reentry_result: RefCell<Option<NgastResult<()>>>,
}

impl MockHandler {
    fn new(program: &Rc<Program>, kind: AnnotationKind) -> Self {
        Self {
            kind,
            precedence: HandlerPrecedence::Primary,
            program: program.clone(),
            reflector: TypeScriptReflectionHost::new(program.clone()),
            failure: Failure::None,
            analyze_calls: Cell::new(0),
            reenter: RefCell::new(Weak::new()),
            reentry_result: RefCell::new(None),
        }
    }

    fn weak(mut self) -> Self {
        self.precedence = HandlerPrecedence::Weak;
        self
    }

    fn failing(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    fn error_for(&self, node: DeclarationId) -> Diagnostic {
        let decl = self.program.declaration(node);
        Diagnostic::error(ng_error_code(ErrorCode::ValueHasWrongType), &decl.file, decl.span, "broken")
    }
}

impl DecoratorHandler for MockHandler {
    fn name(&self) -> &str {
        "MockHandler"
    }

    fn kind(&self) -> AnnotationKind {
        self.kind
    }

    fn precedence(&self) -> HandlerPrecedence {
        self.precedence
    }

    fn detect(&self, node: DeclarationId) -> Option<DetectResult> {
        let decorators = self.reflector.get_decorators_of_declaration(node);
        find_angular_decorator(decorators, self.kind.decorator_name()).map(|d| DetectResult::from_decorator(self.kind, d))
    }

    fn analyze(&self, node: DeclarationId, _detected: &DetectResult) -> AnalysisOutput {
        self.analyze_calls.set(self.analyze_calls.get() + 1);
        if let Some(compiler) = self.reenter.borrow().upgrade() {
            *self.reentry_result.borrow_mut() = Some(compiler.analyze_node(node));
        }
        let decl = self.program.declaration(node);
        if matches!(self.failure, Failure::Analyze) && decl.name.starts_with("Broken") {
            return AnalysisOutput::with_diagnostics(None, vec![self.error_for(node)]);
        }
        if decl.name.starts_with("Skipped") {
            return AnalysisOutput::empty();
        }
        AnalysisOutput::of(Analysis::Injectable(Rc::new(InjectableAnalysis {
            reference: Reference {
                id: node,
                name: decl.name.clone(),
                file: decl.file.clone(),
            },
            provided_in: None,
            use_kind: None,
            use_value: None,
            deps: Some(Vec::new()),
            is_compiled: false,
        })))
    }

    fn resolve(&self, node: DeclarationId, _analysis: &Analysis) -> ResolveResult {
        match self.failure {
            Failure::Resolve => ResolveResult {
                data: None,
                diagnostics: Some(vec![self.error_for(node)]),
            },
            _ => ResolveResult::empty(),
        }
    }
}

fn program(source: &str) -> Rc<Program> {
    Rc::new(Program::from_sources([("/app/main.ts", source)]).expect("program"))
}

fn class(program: &Program, name: &str) -> DeclarationId {
    program
        .declarations()
        .iter()
        .find(|decl| decl.name == name)
        .map(|decl| decl.id)
        .expect("class")
}

fn compiler(program: &Rc<Program>, handlers: Vec<Rc<dyn DecoratorHandler>>) -> (TraitCompiler, Rc<CapturingLogger>) {
    let logger = Rc::new(CapturingLogger::new(LogLevel::Debug));
    let compiler = TraitCompiler::new(handlers, program.clone(), logger.clone() as Rc<dyn Logger>);
    (compiler, logger)
}

mod lifecycle_tests {
    use super::*;

    #[test]
    fn should_not_record_classes_without_annotations() -> anyhow::Result<()> {
        let program = program("export class Plain {}");
        let (compiler, _) = compiler(&program, vec![Rc::new(MockHandler::new(&program, AnnotationKind::Injectable))]);
        let node = class(&program, "Plain");

        assert!(compiler.analysis_of(node)?.is_none());
        assert_eq!(compiler.state_of(node), None);
        assert!(compiler.all_records(None).is_empty());
        Ok(())
    }

    #[test]
    fn should_analyze_each_class_once() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable } from '@angular/core';
             @Injectable() export class Svc {}",
        );
        let handler = Rc::new(MockHandler::new(&program, AnnotationKind::Injectable));
        let (compiler, logger) = compiler(&program, vec![handler.clone()]);
        let node = class(&program, "Svc");

        assert!(compiler.analysis_of(node)?.is_some());
        assert!(compiler.analysis_of(node)?.is_some());
        compiler.analyze_all()?;
        assert_eq!(handler.analyze_calls.get(), 1);
        assert_eq!(compiler.state_of(node), Some(TraitState::Resolved));
        assert!(logger.contains("Svc: Analyzing -> Analyzed"));
        Ok(())
    }

    #[test]
    fn should_mark_empty_analyses_as_skipped() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable } from '@angular/core';
             @Injectable() export class SkippedSvc {}",
        );
        let (compiler, _) = compiler(&program, vec![Rc::new(MockHandler::new(&program, AnnotationKind::Injectable))]);
        let node = class(&program, "SkippedSvc");

        assert!(compiler.analysis_of(node)?.is_none());
        assert_eq!(compiler.state_of(node), Some(TraitState::Skipped));
        Ok(())
    }

    #[test]
    fn should_filter_records_by_kind() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable, Pipe } from '@angular/core';
             @Injectable() export class A {}
             @Pipe({ name: 'b' }) export class B {}
             @Injectable() export class C {}",
        );
        let (compiler, _) = compiler(
            &program,
            vec![
                Rc::new(MockHandler::new(&program, AnnotationKind::Injectable)),
                Rc::new(MockHandler::new(&program, AnnotationKind::Pipe)),
            ],
        );
        compiler.analyze_all()?;

        let injectables = compiler.all_records(Some(AnnotationKind::Injectable));
        assert_eq!(injectables, vec![class(&program, "A"), class(&program, "C")]);
        assert_eq!(compiler.all_records(Some(AnnotationKind::Pipe)), vec![class(&program, "B")]);
        assert_eq!(compiler.all_records(None).len(), 3);
        assert_eq!(compiler.kind_of(class(&program, "B"))?, Some(AnnotationKind::Pipe));
        Ok(())
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn should_isolate_errored_declarations() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable } from '@angular/core';
             @Injectable() export class BrokenSvc {}
             @Injectable() export class GoodSvc {}",
        );
        let handler = MockHandler::new(&program, AnnotationKind::Injectable).failing(Failure::Analyze);
        let (compiler, logger) = compiler(&program, vec![Rc::new(handler)]);
        let broken = class(&program, "BrokenSvc");
        let good = class(&program, "GoodSvc");

        match compiler.analysis_of(broken) {
            Err(NgastError::Analysis { name, diagnostics }) => {
                assert_eq!(name, "BrokenSvc");
                assert_eq!(diagnostics.len(), 1);
            }
            other => panic!("expected an analysis error, got {:?}", other.map(|a| a.map(|a| a.kind()))),
        }
        assert!(compiler.analysis_of(good)?.is_some());
        assert_eq!(compiler.state_of(broken), Some(TraitState::Errored));
        assert_eq!(compiler.diagnostics().len(), 1);
        assert!(logger.contains("BrokenSvc: analysis failed with 1 diagnostic(s)"));
        Ok(())
    }

    #[test]
    fn should_move_to_errored_when_resolve_fails() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable } from '@angular/core';
             @Injectable() export class Svc {}",
        );
        let handler = MockHandler::new(&program, AnnotationKind::Injectable).failing(Failure::Resolve);
        let (compiler, _) = compiler(&program, vec![Rc::new(handler)]);
        let node = class(&program, "Svc");

        assert!(compiler.analysis_of(node).is_err());
        assert_eq!(compiler.state_of(node), Some(TraitState::Errored));
        assert_eq!(compiler.diagnostics_of(node)?.len(), 1);
        Ok(())
    }

    #[test]
    fn should_report_colliding_primary_annotations() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable, Pipe } from '@angular/core';
             @Injectable() @Pipe({ name: 'x' }) export class Both {}",
        );
        let (compiler, _) = compiler(
            &program,
            vec![
                Rc::new(MockHandler::new(&program, AnnotationKind::Injectable)),
                Rc::new(MockHandler::new(&program, AnnotationKind::Pipe)),
            ],
        );
        let node = class(&program, "Both");

        let diagnostics = compiler.diagnostics_of(node)?;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ng_error_code(ErrorCode::DecoratorCollision));
        assert!(diagnostics[0].related_information.is_some());
        assert_eq!(compiler.kind_of(node)?, Some(AnnotationKind::Injectable));
        Ok(())
    }

    #[test]
    fn should_prefer_primary_handlers_over_weak_ones() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable, Pipe } from '@angular/core';
             @Injectable() @Pipe({ name: 'x' }) export class Both {}",
        );
        let weak = Rc::new(MockHandler::new(&program, AnnotationKind::Injectable).weak());
        let (compiler, _) = compiler(
            &program,
            vec![weak.clone(), Rc::new(MockHandler::new(&program, AnnotationKind::Pipe))],
        );
        let node = class(&program, "Both");

        assert_eq!(compiler.kind_of(node)?, Some(AnnotationKind::Pipe));
        assert!(compiler.diagnostics_of(node)?.is_empty());
        assert_eq!(weak.analyze_calls.get(), 0);
        Ok(())
    }

    #[test]
    fn should_turn_recursive_analysis_into_a_reentrancy_error() -> anyhow::Result<()> {
        let program = program(
            "import { Injectable } from '@angular/core';
             @Injectable() export class Loop {}",
        );
        let handler = Rc::new(MockHandler::new(&program, AnnotationKind::Injectable));
        let (compiler, _) = compiler(&program, vec![handler.clone()]);
        let compiler = Rc::new(compiler);
        *handler.reenter.borrow_mut() = Rc::downgrade(&compiler);

        compiler.analyze_node(class(&program, "Loop"))?;
        match handler.reentry_result.borrow_mut().take() {
            Some(Err(NgastError::Reentrancy { trail })) => assert_eq!(trail, vec!["Loop", "Loop"]),
            other => panic!("expected a reentrancy error, got {:?}", other),
        }
        assert_eq!(handler.analyze_calls.get(), 1);
        Ok(())
    }
}
