//! Directive decorator handler
//!
//! Handles `@Directive` and pre-compiled `ɵdir` classes.

use super::metadata::{directive_metadata_from_dts, extract_directive_metadata, DirectiveAnalysis, R3DirectiveMetadata};
use crate::annotations::common::{
    analyze_constructor_dependencies, error, read_decorator_argument, HandlerContext, ObjectReader, SourceExpression,
};
use crate::diagnostics::ErrorCode;
use crate::metadata::MetadataRegistry;
use crate::transform::{Analysis, AnalysisOutput, AnnotationKind, DecoratorHandler, DetectResult};
use std::rc::Rc;
use ts::DeclarationId;

pub struct DirectiveDecoratorHandler {
    cx: Rc<HandlerContext>,
}

impl DirectiveDecoratorHandler {
    pub fn new(cx: Rc<HandlerContext>) -> Self {
        Self { cx }
    }
}

impl DecoratorHandler for DirectiveDecoratorHandler {
    fn name(&self) -> &str {
        "DirectiveDecoratorHandler"
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Directive
    }

    fn detect(&self, node: DeclarationId) -> Option<DetectResult> {
        self.cx.detect(node, AnnotationKind::Directive)
    }

    fn analyze(&self, node: DeclarationId, detected: &DetectResult) -> AnalysisOutput {
        let cx = self.cx.as_ref();
        let (deps, mut diagnostics) = analyze_constructor_dependencies(cx, node);

        let Some(decorator) = detected.decorator.as_ref() else {
            return match directive_metadata_from_dts(cx, node) {
                Some(meta) => AnalysisOutput::of(Analysis::Directive(Rc::new(DirectiveAnalysis {
                    meta: R3DirectiveMetadata { deps, ..meta },
                    providers: None,
                    is_compiled: true,
                }))),
                None => AnalysisOutput::empty(),
            };
        };

        let decl = cx.declaration(node);
        let file = decl.file.as_str();
        let argument = match read_decorator_argument(decorator, file, true) {
            Ok(argument) => argument,
            Err(diagnostic) => return AnalysisOutput::with_diagnostics(None, vec![diagnostic]),
        };

        // `@Directive()` declares an abstract directive.
        let Some(object) = argument else {
            let mut meta = R3DirectiveMetadata::new(cx.reference_to(node));
            meta.deps = deps;
            let analysis = DirectiveAnalysis {
                meta,
                providers: None,
                is_compiled: false,
            };
            return AnalysisOutput::with_diagnostics(Some(Analysis::Directive(Rc::new(analysis))), diagnostics);
        };

        let mut reader = ObjectReader::new(&cx.evaluator, object, file);
        let meta = extract_directive_metadata(cx, node, &mut reader, deps);
        let is_abstract = decl.as_class().map_or(false, |class| class.is_abstract);
        if meta.selector.is_none() && !is_abstract {
            reader.report(error(
                ErrorCode::DirectiveMissingSelector,
                file,
                object.span,
                format!("Directive {} has no selector, please add it!", decl.name),
            ));
        }
        let providers = reader.raw("providers").map(|expr| SourceExpression::new(expr, file));
        diagnostics.extend(reader.into_diagnostics());

        let analysis = DirectiveAnalysis {
            meta,
            providers,
            is_compiled: false,
        };
        AnalysisOutput::with_diagnostics(Some(Analysis::Directive(Rc::new(analysis))), diagnostics)
    }

    fn register(&self, _node: DeclarationId, analysis: &Analysis) {
        if let Some(directive) = analysis.as_directive() {
            self.cx
                .local_metadata
                .register_directive_metadata(directive.meta.to_directive_meta(false, Vec::new()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataReader;
    use crate::testing::{find_class, make_handler_context};

    fn analyze(source: &str, class: &str) -> (Rc<HandlerContext>, AnalysisOutput) {
        let cx = make_handler_context(&[("/app/dir.ts", source)]);
        let node = find_class(&cx.program, class);
        let handler = DirectiveDecoratorHandler::new(cx.clone());
        let detected = handler.detect(node).expect("detected");
        let output = handler.analyze(node, &detected);
        (cx, output)
    }

    #[test]
    fn should_read_selector_and_bindings() {
        let (_, output) = analyze(
            "import { Directive, Input, Output } from '@angular/core';
             @Directive({ selector: '[tooltip]', exportAs: 'tip, tooltip', inputs: ['text: tooltip'], standalone: true })
             export class TooltipDir {
               @Input('tooltipDelay') delay: number;
               @Input() position: string;
               @Output() shown;
             }",
            "TooltipDir",
        );
        let analysis = output.analysis.expect("analysis");
        let directive = analysis.as_directive().expect("directive");
        let meta = &directive.meta;
        assert_eq!(meta.selector.as_deref(), Some("[tooltip]"));
        assert_eq!(meta.export_as, Some(vec!["tip".to_string(), "tooltip".to_string()]));
        assert_eq!(meta.inputs.get("text").map(String::as_str), Some("tooltip"));
        assert_eq!(meta.inputs.get("delay").map(String::as_str), Some("tooltipDelay"));
        assert_eq!(meta.inputs.get("position").map(String::as_str), Some("position"));
        assert_eq!(meta.outputs.get("shown").map(String::as_str), Some("shown"));
        assert!(meta.is_standalone);
        assert_eq!(meta.deps, Some(Vec::new()));
    }

    #[test]
    fn should_require_a_selector_on_concrete_directives() {
        let (_, output) = analyze(
            "import { Directive } from '@angular/core';
             @Directive({ exportAs: 'x' })
             export class NoSelector {}",
            "NoSelector",
        );
        assert!(output.has_errors());
        let diagnostics = output.diagnostics.expect("diagnostics");
        assert_eq!(diagnostics[0].code, crate::diagnostics::ng_error_code(ErrorCode::DirectiveMissingSelector));
    }

    #[test]
    fn should_accept_abstract_directives() {
        let (_, output) = analyze(
            "import { Directive } from '@angular/core';
             @Directive()
             export abstract class Base {}",
            "Base",
        );
        assert!(!output.has_errors());
        assert!(output.analysis.is_some());
    }

    #[test]
    fn should_reject_non_literal_arguments() {
        let (_, output) = analyze(
            "import { Directive } from '@angular/core';
             const config = { selector: '[x]' };
             @Directive(config)
             export class Indirect {}",
            "Indirect",
        );
        let diagnostics = output.diagnostics.expect("diagnostics");
        assert_eq!(diagnostics[0].code, crate::diagnostics::ng_error_code(ErrorCode::DecoratorArgNotLiteral));
    }

    #[test]
    fn should_ignore_decorators_from_other_packages() {
        let cx = make_handler_context(&[(
            "/app/dir.ts",
            "import { Directive } from './my-decorators';
             @Directive({ selector: '[x]' })
             export class NotAngular {}",
        )]);
        let node = find_class(&cx.program, "NotAngular");
        assert!(DirectiveDecoratorHandler::new(cx).detect(node).is_none());
    }

    #[test]
    fn should_register_directive_metadata() {
        let (cx, output) = analyze(
            "import { Directive } from '@angular/core';
             @Directive({ selector: '[a]' })
             export class ADir {}",
            "ADir",
        );
        let node = find_class(&cx.program, "ADir");
        let handler = DirectiveDecoratorHandler::new(cx.clone());
        handler.register(node, &output.analysis.expect("analysis"));
        let meta = cx.local_metadata.get_directive_metadata(node).expect("registered");
        assert_eq!(meta.selector.as_deref(), Some("[a]"));
        assert!(!meta.is_component);
        assert_eq!(cx.local_metadata.declarations_in_file("/app/dir.ts", Some(AnnotationKind::Directive)), vec![node]);
    }
}
