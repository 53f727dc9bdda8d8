// Symbols
//
// Read-only views over one annotated declaration. A view is cheap to create;
// every view of a declaration reads the same trait record, analyzing it on
// first access.

use super::component::ComponentSymbol;
use super::declarable::{DirectiveSymbol, InjectableSymbol, PipeSymbol};
use super::module::NgModuleSymbol;
use crate::annotations::common::{R3Dependency, SourceExpression};
use crate::diagnostics::{NgastError, NgastResult};
use crate::providers::{Provider, ProviderEntry};
use crate::toolkit::Workspace;
use crate::transform::{Analysis, Resolution, TraitState};
use std::fmt;
use ts::{Declaration, DeclarationId, Diagnostic};

pub use crate::transform::AnnotationKind;

/// What a dependency token or provider list entry resolved to.
#[derive(Debug, Clone)]
pub enum Dependency<'w> {
    Symbol(Symbol<'w>),
    Provider(Provider),
}

impl Dependency<'_> {
    pub fn name(&self) -> String {
        match self {
            Dependency::Symbol(symbol) => symbol.name().to_string(),
            Dependency::Provider(provider) => provider.name(),
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol<'_>> {
        match self {
            Dependency::Symbol(symbol) => Some(symbol),
            Dependency::Provider(_) => None,
        }
    }
}

/// State shared by every symbol variant.
#[derive(Clone)]
pub struct SymbolBase<'w> {
    workspace: &'w Workspace,
    node: DeclarationId,
    name: String,
    path: String,
}

impl<'w> SymbolBase<'w> {
    pub(crate) fn new(workspace: &'w Workspace, decl: &Declaration) -> Self {
        Self {
            workspace,
            node: decl.id,
            name: decl.name.clone(),
            path: decl.file.clone(),
        }
    }

    pub fn node(&self) -> DeclarationId {
        self.node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File of the declaration.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn workspace(&self) -> &'w Workspace {
        self.workspace
    }

    /// The handler's analysis. Fails with `NgastError::Analysis` when the
    /// trait errored.
    pub fn analysis(&self) -> NgastResult<Analysis> {
        self.workspace
            .container()
            .trait_compiler()?
            .analysis_of(self.node)?
            .ok_or_else(|| self.skipped())
    }

    pub(crate) fn skipped(&self) -> NgastError {
        NgastError::Skipped {
            name: self.name.clone(),
        }
    }

    pub(crate) fn resolution(&self) -> NgastResult<Option<Resolution>> {
        self.workspace.container().trait_compiler()?.resolution_of(self.node)
    }

    /// Diagnostics of the trait, present only when it errored.
    pub fn diagnostics(&self) -> NgastResult<Option<Vec<Diagnostic>>> {
        let compiler = self.workspace.container().trait_compiler()?;
        compiler.resolve_node(self.node)?;
        if compiler.state_of(self.node) != Some(TraitState::Errored) {
            return Ok(None);
        }
        compiler.diagnostics_of(self.node).map(Some)
    }

    /// Constructor dependencies resolved through the workspace. Attribute
    /// parameters and unresolvable tokens are left out.
    pub(crate) fn resolve_dependencies(&self, deps: Option<&[R3Dependency]>) -> NgastResult<Vec<Dependency<'w>>> {
        let mut resolved = Vec::new();
        for dep in deps.unwrap_or_default() {
            if dep.is_attribute() {
                continue;
            }
            let Some(token) = dep.token.as_ref() else {
                continue;
            };
            if let Some(found) = self.workspace.find_symbol(token, &self.path)? {
                resolved.push(found);
            }
        }
        Ok(resolved)
    }

    /// Flatten a recorded `providers` expression. Classes without an
    /// annotation are left out.
    pub(crate) fn resolve_providers(&self, source: Option<&SourceExpression>) -> NgastResult<Vec<Dependency<'w>>> {
        let Some(source) = source else {
            return Ok(Vec::new());
        };
        let entries = self
            .workspace
            .container()
            .provider_registry()?
            .get_providers(&source.node, &source.file);
        self.entries_to_dependencies(entries)
    }

    pub(crate) fn entries_to_dependencies(&self, entries: Vec<ProviderEntry>) -> NgastResult<Vec<Dependency<'w>>> {
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                ProviderEntry::Class { class, .. } => match self.workspace.get_symbol(class.id)? {
                    Some(symbol) => resolved.push(Dependency::Symbol(symbol)),
                    None => self
                        .workspace
                        .container()
                        .logger()
                        .debug(&format!("{}: provided class {} has no annotation", self.name, class.name)),
                },
                ProviderEntry::Provider(provider) => resolved.push(Dependency::Provider(provider)),
            }
        }
        Ok(resolved)
    }
}

impl fmt::Debug for SymbolBase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolBase")
            .field("node", &self.node)
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// An annotated declaration, one variant per annotation kind.
#[derive(Debug, Clone)]
pub enum Symbol<'w> {
    NgModule(NgModuleSymbol<'w>),
    Component(ComponentSymbol<'w>),
    Directive(DirectiveSymbol<'w>),
    Pipe(PipeSymbol<'w>),
    Injectable(InjectableSymbol<'w>),
}

impl<'w> Symbol<'w> {
    pub(crate) fn new(workspace: &'w Workspace, decl: &Declaration, kind: AnnotationKind) -> Self {
        let base = SymbolBase::new(workspace, decl);
        match kind {
            AnnotationKind::NgModule => Symbol::NgModule(NgModuleSymbol::new(base)),
            AnnotationKind::Component => Symbol::Component(ComponentSymbol::new(base)),
            AnnotationKind::Directive => Symbol::Directive(DirectiveSymbol::new(base)),
            AnnotationKind::Pipe => Symbol::Pipe(PipeSymbol::new(base)),
            AnnotationKind::Injectable => Symbol::Injectable(InjectableSymbol::new(base)),
        }
    }

    pub fn base(&self) -> &SymbolBase<'w> {
        match self {
            Symbol::NgModule(symbol) => &**symbol,
            Symbol::Component(symbol) => &**symbol,
            Symbol::Directive(symbol) => &**symbol,
            Symbol::Pipe(symbol) => &**symbol,
            Symbol::Injectable(symbol) => &**symbol,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Symbol::NgModule(_) => AnnotationKind::NgModule,
            Symbol::Component(_) => AnnotationKind::Component,
            Symbol::Directive(_) => AnnotationKind::Directive,
            Symbol::Pipe(_) => AnnotationKind::Pipe,
            Symbol::Injectable(_) => AnnotationKind::Injectable,
        }
    }

    pub fn is_symbol(&self, kind: AnnotationKind) -> bool {
        self.kind() == kind
    }

    pub fn node(&self) -> DeclarationId {
        self.base().node()
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    pub fn path(&self) -> &str {
        self.base().path()
    }

    pub fn analysis(&self) -> NgastResult<Analysis> {
        self.base().analysis()
    }

    pub fn diagnostics(&self) -> NgastResult<Option<Vec<Diagnostic>>> {
        self.base().diagnostics()
    }

    /// Constructor dependencies; modules have none.
    pub fn get_dependencies(&self) -> NgastResult<Vec<Dependency<'w>>> {
        match self {
            Symbol::NgModule(_) => Ok(Vec::new()),
            Symbol::Component(symbol) => symbol.get_dependencies(),
            Symbol::Directive(symbol) => symbol.get_dependencies(),
            Symbol::Pipe(symbol) => symbol.get_dependencies(),
            Symbol::Injectable(symbol) => symbol.get_dependencies(),
        }
    }

    /// Providers of modules, components and directives.
    pub fn get_providers(&self) -> NgastResult<Vec<Dependency<'w>>> {
        match self {
            Symbol::NgModule(symbol) => symbol.get_providers(),
            Symbol::Component(symbol) => symbol.get_providers(),
            Symbol::Directive(symbol) => symbol.get_providers(),
            Symbol::Pipe(_) | Symbol::Injectable(_) => Ok(Vec::new()),
        }
    }

    pub fn as_module(&self) -> Option<&NgModuleSymbol<'w>> {
        match self {
            Symbol::NgModule(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentSymbol<'w>> {
        match self {
            Symbol::Component(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&DirectiveSymbol<'w>> {
        match self {
            Symbol::Directive(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_pipe(&self) -> Option<&PipeSymbol<'w>> {
        match self {
            Symbol::Pipe(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_injectable(&self) -> Option<&InjectableSymbol<'w>> {
        match self {
            Symbol::Injectable(symbol) => Some(symbol),
            _ => None,
        }
    }
}

/// Symbols are equal when they view the same declaration.
impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node() == other.node()
    }
}

/// Implements `Deref` to the shared base for a symbol variant.
macro_rules! symbol_variant {
    ($name:ident) => {
        impl<'w> $name<'w> {
            pub(crate) fn new(base: $crate::symbols::SymbolBase<'w>) -> Self {
                Self { base }
            }
        }

        impl<'w> std::ops::Deref for $name<'w> {
            type Target = $crate::symbols::SymbolBase<'w>;

            fn deref(&self) -> &Self::Target {
                &self.base
            }
        }
    };
}

pub(crate) use symbol_variant;
