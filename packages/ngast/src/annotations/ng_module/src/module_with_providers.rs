// Module With Providers
//
// `{ ngModule, providers }` values, usually returned by `forRoot()` style
// static methods.

use crate::partial_evaluator::{Reference, ResolvedValue};

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModuleWithProviders {
    pub ng_module: Reference,
    pub providers: Option<ResolvedValue>,
}

/// Reads an evaluated `ModuleWithProviders` mapping. `None` for anything else.
pub fn read_module_with_providers(value: &ResolvedValue) -> Option<ResolvedModuleWithProviders> {
    let map = value.as_map()?;
    let ng_module = map.get("ngModule")?.as_reference()?;
    Some(ResolvedModuleWithProviders {
        ng_module: ng_module.clone(),
        providers: map.get("providers").cloned(),
    })
}
