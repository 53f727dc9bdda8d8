// NgModule symbols

use super::symbol::{symbol_variant, Dependency, Symbol, SymbolBase};
use crate::annotations::NgModuleAnalysis;
use crate::diagnostics::NgastResult;
use crate::partial_evaluator::Reference;
use crate::routes::{LazyRoute, LazyRouteDiscovery};
use crate::scope::ModuleScope;
use crate::transform::Resolution;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct NgModuleSymbol<'w> {
    base: SymbolBase<'w>,
}

symbol_variant!(NgModuleSymbol);

impl<'w> NgModuleSymbol<'w> {
    pub fn metadata(&self) -> NgastResult<Rc<NgModuleAnalysis>> {
        self.analysis()?.as_ng_module().cloned().ok_or_else(|| self.skipped())
    }

    pub fn get_declarations(&self) -> NgastResult<Vec<Symbol<'w>>> {
        self.symbols_of(&self.metadata()?.declarations)
    }

    pub fn get_imports(&self) -> NgastResult<Vec<Symbol<'w>>> {
        self.symbols_of(&self.metadata()?.imports)
    }

    pub fn get_exports(&self) -> NgastResult<Vec<Symbol<'w>>> {
        self.symbols_of(&self.metadata()?.exports)
    }

    pub fn get_bootstrap(&self) -> NgastResult<Vec<Symbol<'w>>> {
        self.symbols_of(&self.metadata()?.bootstrap)
    }

    /// `providers` of the module followed by those of its
    /// `ModuleWithProviders` imports.
    pub fn get_providers(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        let mut providers = self.resolve_providers(metadata.providers.as_ref())?;
        let registry = self.workspace().container().provider_registry()?;
        for value in &metadata.import_providers {
            providers.extend(self.entries_to_dependencies(registry.resolve_providers(value))?);
        }
        Ok(providers)
    }

    /// Compilation scope of the module's declarations.
    pub fn get_scope(&self) -> NgastResult<Rc<ModuleScope>> {
        self.metadata()?;
        match self.resolution()? {
            Some(Resolution::NgModule(resolution)) => Ok(resolution.scope),
            _ => Ok(Rc::new(ModuleScope::new())),
        }
    }

    /// Modules reachable through `loadChildren` of the routes this module
    /// registers, depth first.
    pub fn get_lazy_routes(&self) -> NgastResult<Vec<LazyRoute>> {
        self.metadata()?;
        LazyRouteDiscovery::new(self.workspace().container())?.discover(self.node())
    }

    fn symbols_of(&self, references: &[Reference]) -> NgastResult<Vec<Symbol<'w>>> {
        let mut symbols = Vec::with_capacity(references.len());
        for reference in references {
            if let Some(symbol) = self.workspace().get_symbol(reference.id)? {
                symbols.push(symbol);
            }
        }
        Ok(symbols)
    }
}
