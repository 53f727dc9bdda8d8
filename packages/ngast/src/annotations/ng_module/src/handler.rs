//! NgModule decorator handler
//!
//! Handles `@NgModule` and pre-compiled `ɵmod` classes. Resolution checks the
//! module's lists against registered metadata and computes its compilation scope.

use super::module_with_providers::read_module_with_providers;
use crate::annotations::common::{error, flatten_list, read_decorator_argument, HandlerContext, ListEntry, ObjectReader, SourceExpression};
use crate::diagnostics::{make_diagnostic, make_related_information, ErrorCode};
use crate::metadata::{MetadataRegistry, NgModuleMeta};
use crate::partial_evaluator::{Reference, ResolvedValue};
use crate::scope::{LocalModuleScopeRegistry, ModuleScope};
use crate::transform::{Analysis, AnalysisOutput, AnnotationKind, DecoratorHandler, DetectResult, Resolution, ResolveResult};
use serde::Serialize;
use std::rc::Rc;
use ts::{DeclarationId, Diagnostic, DiagnosticCategory, Span};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NgModuleAnalysis {
    pub reference: Reference,
    pub declarations: Vec<Reference>,
    pub imports: Vec<Reference>,
    pub exports: Vec<Reference>,
    pub bootstrap: Vec<Reference>,
    pub schemas: Vec<String>,
    pub id: Option<String>,
    #[serde(skip)]
    pub providers: Option<SourceExpression>,
    /// `providers` of `ModuleWithProviders` imports.
    #[serde(skip)]
    pub import_providers: Vec<ResolvedValue>,
    #[serde(skip)]
    pub raw_imports: Option<SourceExpression>,
    #[serde(skip)]
    pub spans: ListSpans,
    pub is_compiled: bool,
}

/// Where each list was written, for resolve-time diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSpans {
    pub declarations: Option<Span>,
    pub imports: Option<Span>,
    pub exports: Option<Span>,
}

impl NgModuleAnalysis {
    fn empty(reference: Reference, is_compiled: bool) -> Self {
        Self {
            reference,
            declarations: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            bootstrap: Vec::new(),
            schemas: Vec::new(),
            id: None,
            providers: None,
            import_providers: Vec::new(),
            raw_imports: None,
            spans: ListSpans::default(),
            is_compiled,
        }
    }

    pub fn to_ng_module_meta(&self) -> NgModuleMeta {
        NgModuleMeta {
            reference: self.reference.clone(),
            declarations: self.declarations.clone(),
            imports: self.imports.clone(),
            exports: self.exports.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NgModuleResolution {
    /// Everything templates of this module's declarations can use.
    pub scope: Rc<ModuleScope>,
}

pub struct NgModuleDecoratorHandler {
    cx: Rc<HandlerContext>,
    scopes: Rc<LocalModuleScopeRegistry>,
}

impl NgModuleDecoratorHandler {
    pub fn new(cx: Rc<HandlerContext>, scopes: Rc<LocalModuleScopeRegistry>) -> Self {
        Self { cx, scopes }
    }

    fn analyze_compiled(&self, node: DeclarationId) -> AnalysisOutput {
        let Some(meta) = self.cx.metadata.get_ng_module_metadata(node) else {
            return AnalysisOutput::empty();
        };
        let mut analysis = NgModuleAnalysis::empty(meta.reference.clone(), true);
        analysis.declarations = meta.declarations.clone();
        analysis.imports = meta.imports.clone();
        analysis.exports = meta.exports.clone();
        AnalysisOutput::of(Analysis::NgModule(Rc::new(analysis)))
    }

    /// References of a `declarations` or `exports` list.
    fn read_references(&self, reader: &mut ObjectReader<'_>, field: &str, code: ErrorCode, owner: &str) -> Vec<Reference> {
        let Some(value) = reader.value(field) else {
            return Vec::new();
        };
        let span = reader.raw(field).map(|expr| expr.span).unwrap_or_default();
        let mut references = Vec::new();
        for entry in flatten_list(&value) {
            match entry {
                ListEntry::Reference(reference) => references.push(reference.clone()),
                ListEntry::External { module, name } if code == ErrorCode::NgmoduleInvalidExport => {
                    self.cx
                        .logger
                        .debug(&format!("{}: skipping external export {} from '{}'", owner, name, module));
                }
                ListEntry::External { name, .. } => reader.report(error(
                    code,
                    reader.file(),
                    span,
                    format!("'{}' in {} of {} is not a class of this program.", name, field, owner),
                )),
                ListEntry::Other(other) => reader.report(error(
                    code,
                    reader.file(),
                    span,
                    format!("Value in NgModule.{} of {} is not a reference: {}", field, owner, other),
                )),
            }
        }
        references
    }

    fn read_imports(&self, reader: &mut ObjectReader<'_>, analysis: &mut NgModuleAnalysis) {
        let Some(value) = reader.value("imports") else {
            return;
        };
        let span = reader.raw("imports").map(|expr| expr.span).unwrap_or_default();
        let owner = analysis.reference.name.clone();
        for entry in flatten_list(&value) {
            match entry {
                ListEntry::Reference(reference) => analysis.imports.push(reference.clone()),
                ListEntry::External { module, name } => {
                    self.cx
                        .logger
                        .debug(&format!("{}: skipping external import {} from '{}'", owner, name, module));
                }
                ListEntry::Other(other) => {
                    if let Some(mwp) = read_module_with_providers(other) {
                        analysis.imports.push(mwp.ng_module);
                        analysis.import_providers.extend(mwp.providers);
                    } else if other.is_dynamic() {
                        self.cx
                            .logger
                            .debug(&format!("{}: skipping import that cannot be resolved statically: {}", owner, other));
                    } else {
                        reader.report(error(
                            ErrorCode::NgmoduleInvalidImport,
                            reader.file(),
                            span,
                            format!("Value in NgModule.imports of {} is not a reference: {}", owner, other),
                        ));
                    }
                }
            }
        }
    }

    fn read_schemas(&self, reader: &ObjectReader<'_>) -> Vec<String> {
        let Some(value) = reader.value("schemas") else {
            return Vec::new();
        };
        flatten_list(&value)
            .into_iter()
            .filter_map(|entry| match entry {
                ListEntry::External { name, .. } => Some(name.to_string()),
                ListEntry::Reference(reference) => Some(reference.name.clone()),
                ListEntry::Other(other) => other.get("name").and_then(ResolvedValue::as_str).map(str::to_string),
            })
            .collect()
    }

    fn invalid(&self, code: ErrorCode, analysis: &NgModuleAnalysis, span: Option<Span>, message: String) -> Diagnostic {
        let decl = self.cx.declaration(analysis.reference.id);
        error(code, &decl.file, span.unwrap_or(decl.span), message)
    }
}

impl DecoratorHandler for NgModuleDecoratorHandler {
    fn name(&self) -> &str {
        "NgModuleDecoratorHandler"
    }

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::NgModule
    }

    fn detect(&self, node: DeclarationId) -> Option<DetectResult> {
        self.cx.detect(node, AnnotationKind::NgModule)
    }

    fn analyze(&self, node: DeclarationId, detected: &DetectResult) -> AnalysisOutput {
        let Some(decorator) = detected.decorator.as_ref() else {
            return self.analyze_compiled(node);
        };
        let cx = self.cx.as_ref();
        let decl = cx.declaration(node);
        let file = decl.file.as_str();
        let mut analysis = NgModuleAnalysis::empty(cx.reference_to(node), false);

        let object = match read_decorator_argument(decorator, file, true) {
            Ok(Some(object)) => object,
            Ok(None) => return AnalysisOutput::of(Analysis::NgModule(Rc::new(analysis))),
            Err(diagnostic) => return AnalysisOutput::with_diagnostics(None, vec![diagnostic]),
        };

        let mut reader = ObjectReader::new(&cx.evaluator, object, file);
        analysis.declarations =
            self.read_references(&mut reader, "declarations", ErrorCode::NgmoduleInvalidDeclaration, &decl.name);
        self.read_imports(&mut reader, &mut analysis);
        analysis.exports = self.read_references(&mut reader, "exports", ErrorCode::NgmoduleInvalidExport, &decl.name);
        if let Some(bootstrap) = reader.value("bootstrap") {
            analysis.bootstrap = flatten_list(&bootstrap)
                .into_iter()
                .filter_map(|entry| match entry {
                    ListEntry::Reference(reference) => Some(reference.clone()),
                    _ => None,
                })
                .collect();
        }
        analysis.schemas = self.read_schemas(&reader);
        analysis.id = reader.string("id");
        analysis.providers = reader.raw("providers").map(|expr| SourceExpression::new(expr, file));
        analysis.raw_imports = reader.raw("imports").map(|expr| SourceExpression::new(expr, file));
        analysis.spans = ListSpans {
            declarations: reader.raw("declarations").map(|expr| expr.span),
            imports: reader.raw("imports").map(|expr| expr.span),
            exports: reader.raw("exports").map(|expr| expr.span),
        };

        let diagnostics = reader.into_diagnostics();
        AnalysisOutput::with_diagnostics(Some(Analysis::NgModule(Rc::new(analysis))), diagnostics)
    }

    fn register(&self, _node: DeclarationId, analysis: &Analysis) {
        if let Some(module) = analysis.as_ng_module() {
            self.cx.local_metadata.register_ng_module_metadata(module.to_ng_module_meta());
        }
    }

    fn resolve(&self, node: DeclarationId, analysis: &Analysis) -> ResolveResult {
        let Some(module) = analysis.as_ng_module() else {
            return ResolveResult::empty();
        };
        let metadata = self.cx.metadata.as_ref();
        let mut diagnostics = Vec::new();

        if !module.is_compiled {
            for declaration in &module.declarations {
                let directive = metadata.get_directive_metadata(declaration.id);
                let pipe = metadata.get_pipe_metadata(declaration.id);
                let standalone = directive.as_ref().map(|d| d.is_standalone).or(pipe.as_ref().map(|p| p.is_standalone));
                match standalone {
                    None => diagnostics.push(self.invalid(
                        ErrorCode::NgmoduleInvalidDeclaration,
                        module,
                        module.spans.declarations,
                        format!(
                            "The class '{}' is listed in the declarations of the NgModule '{}', but is not a directive, a component, or a pipe.",
                            declaration.name, module.reference.name
                        ),
                    )),
                    Some(true) => diagnostics.push(self.invalid(
                        ErrorCode::NgmoduleInvalidDeclaration,
                        module,
                        module.spans.declarations,
                        format!(
                            "'{}' is marked as standalone and can't be declared in any NgModule - did you intend to import it instead?",
                            declaration.name
                        ),
                    )),
                    Some(false) => {}
                }

                let owners = self.cx.local_metadata.get_declaring_modules(declaration.id);
                if let Some(owner) = owners.first().copied().filter(|owner| owners.len() > 1 && *owner != node) {
                    let owner_decl = self.cx.declaration(owner);
                    let decl = self.cx.declaration(node);
                    diagnostics.push(make_diagnostic(
                        ErrorCode::NgmoduleDeclarationNotUnique,
                        &decl.file,
                        module.spans.declarations.unwrap_or(decl.span),
                        format!(
                            "The class '{}' is declared by more than one NgModule: '{}' and '{}'.",
                            declaration.name, owner_decl.name, decl.name
                        )
                        .into(),
                        Some(vec![make_related_information(
                            &owner_decl.file,
                            owner_decl.span,
                            format!("'{}' is also declared in '{}'.", declaration.name, owner_decl.name),
                        )]),
                        DiagnosticCategory::Error,
                    ));
                }
            }

            for import in &module.imports {
                let is_module = metadata.get_ng_module_metadata(import.id).is_some();
                let is_standalone = metadata.get_directive_metadata(import.id).map_or(false, |d| d.is_standalone)
                    || metadata.get_pipe_metadata(import.id).map_or(false, |p| p.is_standalone);
                if !is_module && !is_standalone {
                    diagnostics.push(self.invalid(
                        ErrorCode::NgmoduleInvalidImport,
                        module,
                        module.spans.imports,
                        format!(
                            "'{}' is listed in the imports of '{}', but is not an NgModule or a standalone declaration.",
                            import.name, module.reference.name
                        ),
                    ));
                }
            }

            for export in &module.exports {
                if metadata.get_ng_module_metadata(export.id).is_none() && !metadata.is_declarable(export.id) {
                    diagnostics.push(self.invalid(
                        ErrorCode::NgmoduleInvalidExport,
                        module,
                        module.spans.exports,
                        format!(
                            "'{}' is listed in the exports of '{}', but is not a module, a directive, a component, or a pipe.",
                            export.name, module.reference.name
                        ),
                    ));
                }
            }
        }

        let scope = self.scopes.get_scope_of_module(node).unwrap_or_default();
        ResolveResult {
            data: Some(Resolution::NgModule(NgModuleResolution { scope })),
            diagnostics: if diagnostics.is_empty() { None } else { Some(diagnostics) },
        }
    }
}
