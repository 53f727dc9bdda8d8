// Standalone Component Scope
//
// A standalone component sees itself and whatever it lists in `imports`.

use super::api::ModuleScope;
use super::local::LocalModuleScopeRegistry;
use crate::metadata::MetadataReader;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use ts::DeclarationId;

pub struct StandaloneComponentScopeReader {
    modules: Rc<LocalModuleScopeRegistry>,
    cache: RefCell<HashMap<DeclarationId, Rc<ModuleScope>>>,
}

impl StandaloneComponentScopeReader {
    pub fn new(modules: Rc<LocalModuleScopeRegistry>) -> Self {
        Self {
            modules,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// `None` unless `component` is a standalone component.
    pub fn get_scope_for_component(&self, component: DeclarationId) -> Option<Rc<ModuleScope>> {
        if let Some(scope) = self.cache.borrow().get(&component) {
            return Some(scope.clone());
        }
        let meta = self.modules.metadata().get_directive_metadata(component)?;
        if !meta.is_component || !meta.is_standalone {
            return None;
        }

        let mut scope = ModuleScope::new();
        scope.add_directive(&meta);
        for import in &meta.imports {
            match self.modules.get_export_scope_of_module(import.id) {
                Some(exported) => scope.merge(&exported),
                None => self.modules.add_standalone(&mut scope, import.id),
            }
        }

        let scope = Rc::new(scope);
        self.cache.borrow_mut().insert(component, scope.clone());
        Some(scope)
    }
}
