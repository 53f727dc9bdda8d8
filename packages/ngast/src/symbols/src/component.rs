// Component symbols
//
// Besides the directive surface, components expose their template scope, the
// bound template tree and their parsed styles.

use super::symbol::{symbol_variant, Dependency, Symbol, SymbolBase};
use crate::annotations::ComponentAnalysis;
use crate::diagnostics::NgastResult;
use crate::scope::ModuleScope;
use crate::template::{TemplateNode, TemplateTransform};
use crate::transform::Resolution;
use angular_compiler::{parse_styles, parse_template, ParseError, ParsedTemplate, StyleAst};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct ComponentSymbol<'w> {
    base: SymbolBase<'w>,
}

symbol_variant!(ComponentSymbol);

impl<'w> ComponentSymbol<'w> {
    pub fn metadata(&self) -> NgastResult<Rc<ComponentAnalysis>> {
        self.analysis()?.as_component().cloned().ok_or_else(|| self.skipped())
    }

    pub fn get_dependencies(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_dependencies(metadata.meta.deps.as_deref())
    }

    pub fn get_providers(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_providers(metadata.providers.as_ref())
    }

    pub fn get_view_providers(&self) -> NgastResult<Vec<Dependency<'w>>> {
        let metadata = self.metadata()?;
        self.resolve_providers(metadata.view_providers.as_ref())
    }

    /// Scope of the template; `None` when no module declares the component.
    pub fn get_scope(&self) -> NgastResult<Option<Rc<ModuleScope>>> {
        self.metadata()?;
        match self.resolution()? {
            Some(Resolution::Component(resolution)) => Ok(resolution.scope),
            _ => Ok(None),
        }
    }

    /// Selectors of every directive in scope, selector lists split apart.
    pub fn get_selector_scope(&self) -> NgastResult<Vec<String>> {
        let Some(scope) = self.get_scope()? else {
            return Ok(Vec::new());
        };
        Ok(scope
            .directives
            .iter()
            .filter_map(|directive| directive.selector.as_deref())
            .flat_map(|selector| selector.split(','))
            .map(str::trim)
            .filter(|selector| !selector.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn get_pipe_scope(&self) -> NgastResult<Vec<String>> {
        let Some(scope) = self.get_scope()? else {
            return Ok(Vec::new());
        };
        Ok(scope.pipes.iter().map(|pipe| pipe.name.clone()).collect())
    }

    /// The template bound against the component's scope. `None` for an
    /// orphaned component or one without template source.
    pub fn get_template_ast(&self) -> NgastResult<Option<Vec<TemplateNode<'w>>>> {
        let Some(scope) = self.get_scope()? else {
            return Ok(None);
        };
        let Some(parsed) = self.parse_template()? else {
            return Ok(None);
        };
        let transform = TemplateTransform::new(self.workspace(), &scope);
        transform.transform(&parsed.nodes).map(Some)
    }

    /// Recoverable errors from parsing the template.
    pub fn get_template_errors(&self) -> NgastResult<Vec<ParseError>> {
        Ok(self.parse_template()?.map(|parsed| parsed.errors).unwrap_or_default())
    }

    /// Inline styles then external ones, each parsed on its own.
    pub fn get_styles_ast(&self) -> NgastResult<Vec<StyleAst>> {
        let metadata = self.metadata()?;
        Ok(metadata.styles.texts().map(parse_styles).collect())
    }

    /// The first module declaring this component.
    pub fn get_module(&self) -> NgastResult<Option<Symbol<'w>>> {
        self.metadata()?;
        let scopes = self.workspace().container().component_scopes()?;
        match scopes.get_owning_module(self.node()) {
            Some(module) => self.workspace().get_symbol(module),
            None => Ok(None),
        }
    }

    fn parse_template(&self) -> NgastResult<Option<ParsedTemplate>> {
        let metadata = self.metadata()?;
        Ok(metadata
            .template
            .as_ref()
            .map(|template| parse_template(&template.content, template.source_url(self.path()))))
    }
}
