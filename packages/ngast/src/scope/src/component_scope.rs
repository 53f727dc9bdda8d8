// Component Scope Reader
//
// Scope lookup for any component: standalone components use their own
// imports, the rest use the compilation scope of their owning module.

use super::api::ModuleScope;
use super::local::LocalModuleScopeRegistry;
use super::standalone::StandaloneComponentScopeReader;
use crate::metadata::LocalMetadataRegistry;
use std::rc::Rc;
use ts::DeclarationId;

pub struct ComponentScopeReader {
    local_metadata: Rc<LocalMetadataRegistry>,
    modules: Rc<LocalModuleScopeRegistry>,
    standalone: StandaloneComponentScopeReader,
}

impl ComponentScopeReader {
    pub fn new(local_metadata: Rc<LocalMetadataRegistry>, modules: Rc<LocalModuleScopeRegistry>) -> Self {
        Self {
            local_metadata,
            standalone: StandaloneComponentScopeReader::new(modules.clone()),
            modules,
        }
    }

    /// `None` for a component that no module declares.
    pub fn get_scope_for_component(&self, component: DeclarationId) -> Option<Rc<ModuleScope>> {
        if let Some(scope) = self.standalone.get_scope_for_component(component) {
            return Some(scope);
        }
        let module = self.get_owning_module(component)?;
        self.modules.get_scope_of_module(module)
    }

    /// The module a declaration belongs to. When several modules declare it,
    /// the first one in the program owns it.
    pub fn get_owning_module(&self, node: DeclarationId) -> Option<DeclarationId> {
        self.local_metadata.get_declaring_modules(node).first().copied()
    }

    pub fn modules(&self) -> &LocalModuleScopeRegistry {
        &self.modules
    }
}
