//! Injectable decorator handler
//!
//! Handles `@Injectable` and pre-compiled `ɵprov` classes.

use crate::annotations::common::{analyze_constructor_dependencies, read_decorator_argument, HandlerContext, ObjectReader, R3Dependency};
use crate::partial_evaluator::{Reference, ResolvedValue};
use crate::providers::UseKind;
use crate::transform::{Analysis, AnalysisOutput, AnnotationKind, DecoratorHandler, DetectResult};
use serde::Serialize;
use std::rc::Rc;
use ts::DeclarationId;

/// Where an injectable is provided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProvidedIn {
    /// `'root'`, `'platform'` or `'any'`.
    Scope(String),
    /// An NgModule class.
    Module(Reference),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectableAnalysis {
    pub reference: Reference,
    pub provided_in: Option<ProvidedIn>,
    /// Set when the decorator itself says how to build the value.
    pub use_kind: Option<UseKind>,
    #[serde(skip)]
    pub use_value: Option<ResolvedValue>,
    pub deps: Option<Vec<R3Dependency>>,
    pub is_compiled: bool,
}

pub struct InjectableDecoratorHandler {
    cx: Rc<HandlerContext>,
}

impl InjectableDecoratorHandler {
    pub fn new(cx: Rc<HandlerContext>) -> Self {
        Self { cx }
    }
}

impl DecoratorHandler for InjectableDecoratorHandler {
    fn name(&self) -> &str {
        "InjectableDecoratorHandler"
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Injectable
    }

    fn detect(&self, node: DeclarationId) -> Option<DetectResult> {
        self.cx.detect(node, AnnotationKind::Injectable)
    }

    fn analyze(&self, node: DeclarationId, detected: &DetectResult) -> AnalysisOutput {
        let cx = self.cx.as_ref();
        let (deps, mut diagnostics) = analyze_constructor_dependencies(cx, node);
        let mut analysis = InjectableAnalysis {
            reference: cx.reference_to(node),
            provided_in: None,
            use_kind: None,
            use_value: None,
            deps,
            is_compiled: detected.decorator.is_none(),
        };

        if let Some(decorator) = detected.decorator.as_ref() {
            let file = cx.declaration(node).file.as_str();
            match read_decorator_argument(decorator, file, true) {
                Ok(Some(object)) => {
                    let mut reader = ObjectReader::new(&cx.evaluator, object, file);
                    analysis.provided_in = match reader.value("providedIn") {
                        Some(ResolvedValue::String(scope)) => Some(ProvidedIn::Scope(scope)),
                        Some(ResolvedValue::Reference(module)) => Some(ProvidedIn::Module(module)),
                        Some(ResolvedValue::Null) | None => None,
                        Some(other) => {
                            cx.logger.debug(&format!(
                                "{}: ignoring providedIn {}",
                                analysis.reference.name, other
                            ));
                            None
                        }
                    };
                    if let Some((kind, value)) = UseKind::KEYS
                        .iter()
                        .find_map(|(key, kind)| reader.value(key).map(|value| (*kind, value)))
                    {
                        analysis.use_kind = Some(kind);
                        analysis.use_value = Some(value);
                    }
                    diagnostics.extend(reader.into_diagnostics());
                }
                Ok(None) => {}
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }

        AnalysisOutput::with_diagnostics(Some(Analysis::Injectable(Rc::new(analysis))), diagnostics)
    }

    fn register(&self, node: DeclarationId, _analysis: &Analysis) {
        let file = &self.cx.declaration(node).file;
        self.cx.local_metadata.register_kind(file, node, AnnotationKind::Injectable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::common::InjectFlags;
    use crate::testing::{find_class, make_handler_context, make_handler_context_with};

    fn analyze_in(cx: Rc<HandlerContext>, class: &str) -> AnalysisOutput {
        let node = find_class(&cx.program, class);
        let handler = InjectableDecoratorHandler::new(cx);
        let detected = handler.detect(node).expect("detected");
        handler.analyze(node, &detected)
    }

    fn injectable(output: &AnalysisOutput) -> Rc<InjectableAnalysis> {
        output
            .analysis
            .as_ref()
            .and_then(Analysis::as_injectable)
            .cloned()
            .expect("injectable analysis")
    }

    #[test]
    fn should_read_provided_in() {
        let cx = make_handler_context(&[(
            "/app/svc.ts",
            "import { Injectable } from '@angular/core';
             @Injectable({ providedIn: 'root' })
             export class Service {}",
        )]);
        let output = analyze_in(cx, "Service");
        assert_eq!(injectable(&output).provided_in, Some(ProvidedIn::Scope("root".to_string())));
    }

    #[test]
    fn should_read_constructor_dependencies() {
        let cx = make_handler_context(&[
            (
                "/app/dep.ts",
                "import { Injectable } from '@angular/core';
                 @Injectable() export class Dep {}",
            ),
            (
                "/app/svc.ts",
                "import { Injectable, Inject, Optional, Self } from '@angular/core';
                 import { Dep } from './dep';
                 @Injectable()
                 export class Service {
                   constructor(dep: Dep, @Optional() @Self() other: Dep, @Inject('token') value: string) {}
                 }",
            ),
        ]);
        let output = analyze_in(cx, "Service");
        let deps = injectable(&output).deps.clone().expect("deps");
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].token_name.as_deref(), Some("Dep"));
        assert_eq!(deps[1].flags, InjectFlags::OPTIONAL | InjectFlags::SELF);
        assert_eq!(deps[2].token_name.as_deref(), Some("'token'"));
    }

    #[test]
    fn should_keep_missing_tokens_unless_strict() {
        let source = "import { Injectable } from '@angular/core';
             @Injectable()
             export class Service { constructor(value: string) {} }";
        let lenient = analyze_in(make_handler_context(&[("/app/svc.ts", source)]), "Service");
        let deps = injectable(&lenient).deps.clone().expect("deps");
        assert!(deps[0].token.is_none());

        let strict = analyze_in(make_handler_context_with(&[("/app/svc.ts", source)], true), "Service");
        assert!(strict.has_errors());
    }

    #[test]
    fn should_inherit_base_class_constructors() {
        let cx = make_handler_context(&[(
            "/app/svc.ts",
            "import { Injectable } from '@angular/core';
             export class Dep {}
             export class Base { constructor(dep: Dep) {} }
             @Injectable()
             export class Child extends Base {}",
        )]);
        let output = analyze_in(cx, "Child");
        let deps = injectable(&output).deps.clone().expect("deps");
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].token_name.as_deref(), Some("Dep"));
    }

    #[test]
    fn should_record_use_keys() {
        let cx = make_handler_context(&[(
            "/app/svc.ts",
            "import { Injectable } from '@angular/core';
             export class Impl {}
             @Injectable({ providedIn: 'root', useClass: Impl })
             export class Service {}",
        )]);
        let output = analyze_in(cx, "Service");
        let analysis = injectable(&output);
        assert_eq!(analysis.use_kind, Some(UseKind::Class));
        assert_eq!(
            analysis.use_value.as_ref().and_then(ResolvedValue::as_reference).map(|r| r.name.as_str()),
            Some("Impl")
        );
    }
}
