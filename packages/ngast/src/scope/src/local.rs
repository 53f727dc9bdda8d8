// Local Module Scope Registry
//
// Computes the compilation scope of NgModules from registered metadata:
// own declarations, then the export scopes of imported modules.

use super::api::ModuleScope;
use crate::logging::Logger;
use crate::metadata::MetadataReader;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use ts::DeclarationId;

pub struct LocalModuleScopeRegistry {
    /// Local registrations first, then declaration-file markers.
    metadata: Rc<dyn MetadataReader>,
    logger: Rc<dyn Logger>,
    compilation_scopes: RefCell<HashMap<DeclarationId, Rc<ModuleScope>>>,
    export_scopes: RefCell<HashMap<DeclarationId, Rc<ModuleScope>>>,
}

impl LocalModuleScopeRegistry {
    pub fn new(metadata: Rc<dyn MetadataReader>, logger: Rc<dyn Logger>) -> Self {
        Self {
            metadata,
            logger,
            compilation_scopes: RefCell::new(HashMap::new()),
            export_scopes: RefCell::new(HashMap::new()),
        }
    }

    pub fn metadata(&self) -> &dyn MetadataReader {
        self.metadata.as_ref()
    }

    /// Everything a template declared in `module` can use. `None` when
    /// `module` is not an NgModule.
    pub fn get_scope_of_module(&self, module: DeclarationId) -> Option<Rc<ModuleScope>> {
        if let Some(scope) = self.compilation_scopes.borrow().get(&module) {
            return Some(scope.clone());
        }
        let meta = self.metadata.get_ng_module_metadata(module)?;

        let mut scope = ModuleScope::new();
        for declaration in &meta.declarations {
            self.add_declarable(&mut scope, declaration.id);
        }
        for import in &meta.imports {
            match self.get_export_scope_of_module(import.id) {
                Some(exported) => scope.merge(&exported),
                None => self.add_standalone(&mut scope, import.id),
            }
        }

        let scope = Rc::new(scope);
        self.compilation_scopes.borrow_mut().insert(module, scope.clone());
        Some(scope)
    }

    /// What `module` makes available to modules importing it.
    pub fn get_export_scope_of_module(&self, module: DeclarationId) -> Option<Rc<ModuleScope>> {
        self.export_scope(module, &mut Vec::new()).map(|(scope, _)| scope)
    }

    /// The export scope of `module` and the shallowest position in `visiting`
    /// at which a re-export cycle was cut while computing it (`usize::MAX`
    /// when none was). A scope that cut a cycle above its own position is
    /// partial and stays out of the cache.
    fn export_scope(&self, module: DeclarationId, visiting: &mut Vec<DeclarationId>) -> Option<(Rc<ModuleScope>, usize)> {
        if let Some(scope) = self.export_scopes.borrow().get(&module) {
            return Some((scope.clone(), usize::MAX));
        }
        let meta = self.metadata.get_ng_module_metadata(module)?;
        if let Some(depth) = visiting.iter().position(|m| *m == module) {
            self.logger
                .debug(&format!("{} re-exports itself through a cycle", meta.reference.name));
            return Some((Rc::new(ModuleScope::new()), depth));
        }
        let depth = visiting.len();
        visiting.push(module);

        let mut cut = usize::MAX;
        let mut scope = ModuleScope::new();
        for export in &meta.exports {
            if self.metadata.get_ng_module_metadata(export.id).is_some() {
                if let Some((exported, reached)) = self.export_scope(export.id, visiting) {
                    scope.merge(&exported);
                    cut = cut.min(reached);
                }
            } else {
                self.add_declarable(&mut scope, export.id);
            }
        }
        visiting.pop();

        let scope = Rc::new(scope);
        if cut >= depth {
            self.export_scopes.borrow_mut().insert(module, scope.clone());
        }
        Some((scope, cut))
    }

    pub(crate) fn add_declarable(&self, scope: &mut ModuleScope, node: DeclarationId) {
        if let Some(directive) = self.metadata.get_directive_metadata(node) {
            scope.add_directive(&directive);
        } else if let Some(pipe) = self.metadata.get_pipe_metadata(node) {
            scope.add_pipe(&pipe);
        }
    }

    /// Standalone declarables may be imported directly.
    pub(crate) fn add_standalone(&self, scope: &mut ModuleScope, node: DeclarationId) {
        if let Some(directive) = self.metadata.get_directive_metadata(node) {
            if directive.is_standalone {
                scope.add_directive(&directive);
            }
        } else if let Some(pipe) = self.metadata.get_pipe_metadata(node) {
            if pipe.is_standalone {
                scope.add_pipe(&pipe);
            }
        }
    }
}
