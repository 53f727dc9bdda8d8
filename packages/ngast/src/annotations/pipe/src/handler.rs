//! Pipe decorator handler
//!
//! Handles `@Pipe` and pre-compiled `ɵpipe` classes.

use crate::annotations::common::{
    analyze_constructor_dependencies, error, read_decorator_argument, HandlerContext, ObjectReader, R3Dependency,
};
use crate::diagnostics::ErrorCode;
use crate::metadata::{MetadataRegistry, PipeMeta};
use crate::partial_evaluator::Reference;
use crate::transform::{Analysis, AnalysisOutput, AnnotationKind, DecoratorHandler, DetectResult};
use serde::Serialize;
use std::rc::Rc;
use ts::DeclarationId;

/// Metadata extracted from `@Pipe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeAnalysis {
    pub reference: Reference,
    /// Name used in templates.
    pub pipe_name: String,
    /// Whether the pipe is pure (default: true)
    pub pure: bool,
    /// Whether the pipe is standalone (default: false)
    pub is_standalone: bool,
    pub deps: Option<Vec<R3Dependency>>,
    pub is_compiled: bool,
}

impl PipeAnalysis {
    pub fn to_pipe_meta(&self) -> PipeMeta {
        PipeMeta {
            reference: self.reference.clone(),
            name: self.pipe_name.clone(),
            is_standalone: self.is_standalone,
        }
    }
}

pub struct PipeDecoratorHandler {
    cx: Rc<HandlerContext>,
}

impl PipeDecoratorHandler {
    pub fn new(cx: Rc<HandlerContext>) -> Self {
        Self { cx }
    }

    fn analyze_compiled(&self, node: DeclarationId, deps: Option<Vec<R3Dependency>>) -> AnalysisOutput {
        match self.cx.metadata.get_pipe_metadata(node) {
            Some(meta) => AnalysisOutput::of(Analysis::Pipe(Rc::new(PipeAnalysis {
                reference: meta.reference.clone(),
                pipe_name: meta.name.clone(),
                pure: true,
                is_standalone: meta.is_standalone,
                deps,
                is_compiled: true,
            }))),
            None => AnalysisOutput::empty(),
        }
    }
}

impl DecoratorHandler for PipeDecoratorHandler {
    fn name(&self) -> &str {
        "PipeDecoratorHandler"
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Pipe
    }

    fn detect(&self, node: DeclarationId) -> Option<DetectResult> {
        self.cx.detect(node, AnnotationKind::Pipe)
    }

    fn analyze(&self, node: DeclarationId, detected: &DetectResult) -> AnalysisOutput {
        let cx = self.cx.as_ref();
        let (deps, mut diagnostics) = analyze_constructor_dependencies(cx, node);
        let Some(decorator) = detected.decorator.as_ref() else {
            return self.analyze_compiled(node, deps);
        };

        let decl = cx.declaration(node);
        let file = decl.file.as_str();
        let object = match read_decorator_argument(decorator, file, false) {
            Ok(Some(object)) => object,
            Ok(None) => return AnalysisOutput::empty(),
            Err(diagnostic) => return AnalysisOutput::with_diagnostics(None, vec![diagnostic]),
        };

        let mut reader = ObjectReader::new(&cx.evaluator, object, file);
        let pipe_name = reader.string("name");
        if pipe_name.is_none() && !reader.has("name") {
            reader.report(error(
                ErrorCode::PipeMissingName,
                file,
                object.span,
                "@Pipe decorator is missing name field".to_string(),
            ));
        }
        let pure = reader.boolean("pure").unwrap_or(true);
        let is_standalone = reader.boolean("standalone").unwrap_or(false);
        diagnostics.extend(reader.into_diagnostics());

        let analysis = pipe_name.map(|pipe_name| {
            Analysis::Pipe(Rc::new(PipeAnalysis {
                reference: cx.reference_to(node),
                pipe_name,
                pure,
                is_standalone,
                deps,
                is_compiled: false,
            }))
        });
        AnalysisOutput::with_diagnostics(analysis, diagnostics)
    }

    fn register(&self, _node: DeclarationId, analysis: &Analysis) {
        if let Some(pipe) = analysis.as_pipe() {
            self.cx.local_metadata.register_pipe_metadata(pipe.to_pipe_meta());
        }
    }
}
