// Workspace
//
// Entry point for callers: owns one toolkit container and hands out symbol
// views over the declarations it analyzes.

use super::config::NgastOptions;
use super::container::ToolkitContainer;
use crate::annotations::common::SourceExpression;
use crate::diagnostics::{NgastError, NgastResult};
use crate::logging::{ConsoleLogger, Logger, NullLogger};
use crate::partial_evaluator::{DynamicReason, ResolvedValue};
use crate::providers::ProviderEntry;
use crate::resource::ResourceResolver;
use crate::symbols::{Dependency, Symbol};
use crate::transform::{Analysis, AnnotationKind};
use indexmap::IndexSet;
use std::rc::Rc;
use ts::path::{dirname, is_local_relative_path, join, strip_js_extension};
use ts::{DeclarationId, Diagnostic, ProgramHost};

pub struct Workspace {
    options: NgastOptions,
    host: Rc<dyn ProgramHost>,
    resources: Rc<dyn ResourceResolver>,
    logger: Rc<dyn Logger>,
    container: ToolkitContainer,
}

impl Workspace {
    /// Logs to the console when `logLevel` is set.
    pub fn new(options: NgastOptions, host: Rc<dyn ProgramHost>, resources: Rc<dyn ResourceResolver>) -> NgastResult<Self> {
        let logger: Rc<dyn Logger> = match options.log_level {
            Some(level) => Rc::new(ConsoleLogger::new(level)),
            None => Rc::new(NullLogger::new()),
        };
        Self::with_logger(options, host, resources, logger)
    }

    pub fn with_logger(
        options: NgastOptions,
        host: Rc<dyn ProgramHost>,
        resources: Rc<dyn ResourceResolver>,
        logger: Rc<dyn Logger>,
    ) -> NgastResult<Self> {
        let container = ToolkitContainer::new(options.clone(), host.clone(), resources.clone(), logger.clone())?;
        Ok(Self {
            options,
            host,
            resources,
            logger,
            container,
        })
    }

    pub fn container(&self) -> &ToolkitContainer {
        &self.container
    }

    pub fn program(&self) -> NgastResult<Rc<ts::Program>> {
        self.container.program()
    }

    /// Drop every service and analysis; the next query starts from the host again.
    pub fn reset(&mut self) -> NgastResult<()> {
        self.logger.info("resetting workspace");
        self.container = ToolkitContainer::new(
            self.options.clone(),
            self.host.clone(),
            self.resources.clone(),
            self.logger.clone(),
        )?;
        Ok(())
    }

    pub fn get_all_modules(&self) -> NgastResult<Vec<Symbol<'_>>> {
        self.get_all(AnnotationKind::NgModule)
    }

    pub fn get_all_components(&self) -> NgastResult<Vec<Symbol<'_>>> {
        self.get_all(AnnotationKind::Component)
    }

    pub fn get_all_directives(&self) -> NgastResult<Vec<Symbol<'_>>> {
        self.get_all(AnnotationKind::Directive)
    }

    pub fn get_all_injectables(&self) -> NgastResult<Vec<Symbol<'_>>> {
        self.get_all(AnnotationKind::Injectable)
    }

    pub fn get_all_pipes(&self) -> NgastResult<Vec<Symbol<'_>>> {
        self.get_all(AnnotationKind::Pipe)
    }

    /// Every declaration of `kind`, errored ones included.
    fn get_all(&self, kind: AnnotationKind) -> NgastResult<Vec<Symbol<'_>>> {
        let compiler = self.container.trait_compiler()?;
        compiler.analyze_all()?;
        let program = self.program()?;
        Ok(compiler
            .all_records(Some(kind))
            .into_iter()
            .map(|id| Symbol::new(self, program.declaration(id), kind))
            .collect())
    }

    /// The symbol for `node`, or `None` when no annotation was recognized on it.
    pub fn get_symbol(&self, node: DeclarationId) -> NgastResult<Option<Symbol<'_>>> {
        let Some(kind) = self.container.trait_compiler()?.kind_of(node)? else {
            return Ok(None);
        };
        let program = self.program()?;
        Ok(Some(Symbol::new(self, program.declaration(node), kind)))
    }

    /// The first annotated class named `name`.
    pub fn get_symbol_by_name(&self, name: &str) -> NgastResult<Option<Symbol<'_>>> {
        let program = self.program()?;
        for decl in program.declarations().iter().filter(|d| d.is_class() && d.name == name) {
            if let Some(symbol) = self.get_symbol(decl.id)? {
                return Ok(Some(symbol));
            }
        }
        Ok(None)
    }

    /// Resolve a dependency token to a symbol or a provider.
    ///
    /// Annotated classes resolve directly. Other tokens are looked up among the
    /// providers of every module, component and directive. A token imported
    /// through a relative path is finally matched by name against the
    /// injectables of that file. Unresolvable tokens give `None`.
    pub fn find_symbol(&self, token: &ResolvedValue, relative_to: &str) -> NgastResult<Option<Dependency<'_>>> {
        if let ResolvedValue::Reference(reference) = token {
            if let Some(symbol) = self.get_symbol(reference.id)? {
                return Ok(Some(Dependency::Symbol(symbol)));
            }
        }
        if let Some(found) = self.find_provider(token)? {
            return Ok(Some(found));
        }
        if let ResolvedValue::Dynamic(dynamic) = token {
            if let DynamicReason::External { module, name } = &dynamic.root_cause().reason {
                return self.find_injectable_in_module(module, name, relative_to);
            }
        }
        Ok(None)
    }

    fn find_provider(&self, token: &ResolvedValue) -> NgastResult<Option<Dependency<'_>>> {
        let compiler = self.container.trait_compiler()?;
        let registry = self.container.provider_registry()?;
        compiler.analyze_all()?;
        for kind in [AnnotationKind::NgModule, AnnotationKind::Component, AnnotationKind::Directive] {
            for id in compiler.all_records(Some(kind)) {
                let analysis = match compiler.analysis_of(id) {
                    Ok(Some(analysis)) => analysis,
                    Ok(None) | Err(NgastError::Analysis { .. }) => continue,
                    Err(fatal) => return Err(fatal),
                };
                let mut entries = Vec::new();
                for source in provider_sources(&analysis) {
                    entries.extend(registry.get_providers(&source.node, &source.file));
                }
                if let Analysis::NgModule(module) = &analysis {
                    for value in &module.import_providers {
                        entries.extend(registry.resolve_providers(value));
                    }
                }
                let Some(entry) = entries.into_iter().find(|entry| entry.provides(token)) else {
                    continue;
                };
                return match entry {
                    ProviderEntry::Class { class, .. } => Ok(self.get_symbol(class.id)?.map(Dependency::Symbol)),
                    ProviderEntry::Provider(provider) => Ok(Some(Dependency::Provider(provider))),
                };
            }
        }
        Ok(None)
    }

    fn find_injectable_in_module(&self, module: &str, name: &str, relative_to: &str) -> NgastResult<Option<Dependency<'_>>> {
        if !is_local_relative_path(module) {
            return Ok(None);
        }
        let program = self.program()?;
        let file = program
            .resolve_module(relative_to, module)
            .unwrap_or_else(|| join(&dirname(relative_to), &format!("{}.ts", strip_js_extension(module))));
        self.container.trait_compiler()?.analyze_all()?;
        let injectables = self
            .container
            .local_metadata()?
            .declarations_in_file(&file, Some(AnnotationKind::Injectable));
        for id in injectables {
            if program.declaration(id).name == name {
                return Ok(self.get_symbol(id)?.map(Dependency::Symbol));
            }
        }
        self.logger
            .debug(&format!("no injectable '{}' in '{}' for a token of {}", name, file, relative_to));
        Ok(None)
    }

    /// Files to re-analyze after `changed` were edited: the changed files and
    /// everything depending on them.
    pub fn affected_files(&self, changed: &[&str]) -> NgastResult<IndexSet<String>> {
        self.container.trait_compiler()?.analyze_all()?;
        let graph = self.container.dependencies()?;
        Ok(graph.affected_files(changed.iter().copied()))
    }

    /// Program diagnostics followed by the diagnostics of every errored trait.
    pub fn diagnostics(&self) -> NgastResult<Vec<Diagnostic>> {
        let program = self.program()?;
        let compiler = self.container.trait_compiler()?;
        compiler.analyze_all()?;
        for id in compiler.all_records(None) {
            compiler.resolve_node(id)?;
        }
        let mut diagnostics = program.diagnostics().to_vec();
        diagnostics.extend(compiler.diagnostics());
        Ok(diagnostics)
    }
}

fn provider_sources(analysis: &Analysis) -> Vec<&SourceExpression> {
    match analysis {
        Analysis::NgModule(module) => module.providers.iter().collect(),
        Analysis::Component(component) => component
            .providers
            .iter()
            .chain(component.view_providers.iter())
            .collect(),
        Analysis::Directive(directive) => directive.providers.iter().collect(),
        Analysis::Injectable(_) | Analysis::Pipe(_) => Vec::new(),
    }
}
