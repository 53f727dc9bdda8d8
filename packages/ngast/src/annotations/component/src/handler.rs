//! Component decorator handler
//!
//! Handles `@Component` and pre-compiled `ɵcmp` classes.

use super::metadata::{ComponentAnalysis, ComponentResolution};
use super::resources::{extract_styles, extract_template};
use crate::annotations::common::{
    analyze_constructor_dependencies, core_enum_member, error, flatten_list, read_decorator_argument,
    ChangeDetectionStrategy, HandlerContext, ListEntry, ObjectReader, SourceExpression, ViewEncapsulation,
};
use crate::annotations::directive::{directive_metadata_from_dts, extract_directive_metadata, R3DirectiveMetadata};
use crate::diagnostics::ErrorCode;
use crate::metadata::MetadataRegistry;
use crate::partial_evaluator::{Reference, ResolvedValue};
use crate::resource::ResourceLoader;
use crate::scope::ComponentScopeReader;
use crate::transform::{Analysis, AnalysisOutput, AnnotationKind, DecoratorHandler, DetectResult, Resolution, ResolveResult};
use std::rc::Rc;
use ts::DeclarationId;

pub struct ComponentDecoratorHandler {
    cx: Rc<HandlerContext>,
    resources: Rc<ResourceLoader>,
    scopes: Rc<ComponentScopeReader>,
}

impl ComponentDecoratorHandler {
    pub fn new(cx: Rc<HandlerContext>, resources: Rc<ResourceLoader>, scopes: Rc<ComponentScopeReader>) -> Self {
        Self { cx, resources, scopes }
    }

    fn read_imports(&self, reader: &mut ObjectReader<'_>, owner: &str) -> Vec<Reference> {
        let Some(value) = reader.value("imports") else {
            return Vec::new();
        };
        let span = reader.raw("imports").map(|expr| expr.span).unwrap_or_default();
        let mut imports = Vec::new();
        for entry in flatten_list(&value) {
            match entry {
                ListEntry::Reference(reference) => imports.push(reference.clone()),
                ListEntry::External { module, name } => {
                    self.cx
                        .logger
                        .debug(&format!("{}: skipping external import {} from '{}'", owner, name, module));
                }
                ListEntry::Other(other) => reader.report(error(
                    ErrorCode::ComponentUnknownImport,
                    reader.file(),
                    span,
                    format!("'imports' of {} must only contain components, directives, pipes, or NgModules, got {}", owner, other),
                )),
            }
        }
        imports
    }
}

fn read_enum<T>(
    reader: &mut ObjectReader<'_>,
    field: &str,
    enum_name: &str,
    from_member: fn(&str) -> Option<T>,
    from_number: fn(f64) -> Option<T>,
) -> Option<T> {
    let value = reader.value(field)?;
    let parsed = match &value {
        ResolvedValue::Number(n) => from_number(*n),
        other => core_enum_member(other, enum_name).and_then(from_member),
    };
    if parsed.is_none() {
        let span = reader.raw(field).map(|expr| expr.span).unwrap_or_default();
        reader.report(error(
            ErrorCode::ValueHasWrongType,
            reader.file(),
            span,
            format!("{} must be a member of {} enum from @angular/core, got {}", field, enum_name, value),
        ));
    }
    parsed
}

impl DecoratorHandler for ComponentDecoratorHandler {
    fn name(&self) -> &str {
        "ComponentDecoratorHandler"
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Component
    }

    fn detect(&self, node: DeclarationId) -> Option<DetectResult> {
        self.cx.detect(node, AnnotationKind::Component)
    }

    fn analyze(&self, node: DeclarationId, detected: &DetectResult) -> AnalysisOutput {
        let cx = self.cx.as_ref();
        let (deps, mut diagnostics) = analyze_constructor_dependencies(cx, node);

        let Some(decorator) = detected.decorator.as_ref() else {
            return match directive_metadata_from_dts(cx, node) {
                Some(meta) => AnalysisOutput::of(Analysis::Component(Rc::new(ComponentAnalysis::compiled(
                    R3DirectiveMetadata { deps, ..meta },
                )))),
                None => AnalysisOutput::empty(),
            };
        };

        let decl = cx.declaration(node);
        let file = decl.file.as_str();
        let object = match read_decorator_argument(decorator, file, false) {
            Ok(Some(object)) => object,
            Ok(None) => return AnalysisOutput::empty(),
            Err(diagnostic) => return AnalysisOutput::with_diagnostics(None, vec![diagnostic]),
        };

        let mut reader = ObjectReader::new(&cx.evaluator, object, file);
        let meta = extract_directive_metadata(cx, node, &mut reader, deps);
        let template = extract_template(&self.resources, &mut reader, &decl.name, object.span);
        let styles = extract_styles(&self.resources, &mut reader);
        let change_detection = read_enum(
            &mut reader,
            "changeDetection",
            "ChangeDetectionStrategy",
            ChangeDetectionStrategy::from_member,
            ChangeDetectionStrategy::from_number,
        );
        let encapsulation = read_enum(
            &mut reader,
            "encapsulation",
            "ViewEncapsulation",
            ViewEncapsulation::from_member,
            ViewEncapsulation::from_number,
        )
        .unwrap_or(ViewEncapsulation::Emulated);
        let imports = self.read_imports(&mut reader, &decl.name);

        let analysis = ComponentAnalysis {
            meta,
            template,
            styles,
            change_detection,
            encapsulation,
            imports,
            raw_imports: reader.raw("imports").map(|expr| SourceExpression::new(expr, file)),
            providers: reader.raw("providers").map(|expr| SourceExpression::new(expr, file)),
            view_providers: reader.raw("viewProviders").map(|expr| SourceExpression::new(expr, file)),
            is_compiled: false,
        };
        diagnostics.extend(reader.into_diagnostics());
        AnalysisOutput::with_diagnostics(Some(Analysis::Component(Rc::new(analysis))), diagnostics)
    }

    fn register(&self, _node: DeclarationId, analysis: &Analysis) {
        if let Some(component) = analysis.as_component() {
            self.cx
                .local_metadata
                .register_directive_metadata(component.meta.to_directive_meta(true, component.imports.clone()));
        }
    }

    fn resolve(&self, node: DeclarationId, analysis: &Analysis) -> ResolveResult {
        let Some(component) = analysis.as_component() else {
            return ResolveResult::empty();
        };
        let metadata = self.cx.metadata.as_ref();
        let mut diagnostics = Vec::new();
        for import in &component.imports {
            let is_module = metadata.get_ng_module_metadata(import.id).is_some();
            let is_standalone = metadata.get_directive_metadata(import.id).map_or(false, |d| d.is_standalone)
                || metadata.get_pipe_metadata(import.id).map_or(false, |p| p.is_standalone);
            if !is_module && !is_standalone {
                let span = component.raw_imports.as_ref().map(|raw| raw.node.span).unwrap_or_default();
                diagnostics.push(error(
                    ErrorCode::ComponentUnknownImport,
                    &component.meta.reference.file,
                    span,
                    format!(
                        "'{}' is listed in the imports of {}, but is neither a standalone declaration nor an NgModule",
                        import.name, component.meta.reference.name
                    ),
                ));
            }
        }

        let scope = self.scopes.get_scope_for_component(node);
        if scope.is_none() {
            self.cx
                .logger
                .debug(&format!("{} is not declared by any NgModule", component.meta.reference.name));
        }
        ResolveResult {
            data: Some(Resolution::Component(ComponentResolution { scope })),
            diagnostics: if diagnostics.is_empty() { None } else { Some(diagnostics) },
        }
    }
}
