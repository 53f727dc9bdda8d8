// Directive, pipe and injectable symbols

use super::symbol::{symbol_variant, Dependency, SymbolBase};
use crate::annotations::{DirectiveAnalysis, InjectableAnalysis, PipeAnalysis};
use crate::diagnostics::NgastResult;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct DirectiveSymbol<'w> {
    base: SymbolBase<'w>,
}

symbol_variant!(DirectiveSymbol);

impl<'w> DirectiveSymbol<'w> {
    pub fn metadata(&self) -> NgastResult<Rc<DirectiveAnalysis>> {
        self.analysis()?.as_directive().cloned().ok_or_else(|| self.skipped())
    }

    pub fn get_dependencies(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_dependencies(metadata.meta.deps.as_deref())
    }

    pub fn get_providers(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_providers(metadata.providers.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct PipeSymbol<'w> {
    base: SymbolBase<'w>,
}

symbol_variant!(PipeSymbol);

impl<'w> PipeSymbol<'w> {
    pub fn metadata(&self) -> NgastResult<Rc<PipeAnalysis>> {
        self.analysis()?.as_pipe().cloned().ok_or_else(|| self.skipped())
    }

    pub fn get_dependencies(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_dependencies(metadata.deps.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct InjectableSymbol<'w> {
    base: SymbolBase<'w>,
}

symbol_variant!(InjectableSymbol);

impl<'w> InjectableSymbol<'w> {
    pub fn metadata(&self) -> NgastResult<Rc<InjectableAnalysis>> {
        self.analysis()?.as_injectable().cloned().ok_or_else(|| self.skipped())
    }

    pub fn get_dependencies(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_dependencies(metadata.deps.as_deref())
    }
}
