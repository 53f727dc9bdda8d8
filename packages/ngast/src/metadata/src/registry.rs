// Metadata Registry
//
// Metadata registered by handlers for classes of the program, plus a reader
// that consults several sources in order.

use super::api::{DirectiveMeta, MetadataReader, MetadataRegistry, NgModuleMeta, PipeMeta};
use crate::transform::AnnotationKind;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use ts::DeclarationId;

/// A registry of directive, pipe, and module metadata for types defined in the current
/// compilation unit, with a per-file index of annotated classes.
#[derive(Default)]
pub struct LocalMetadataRegistry {
    directives: RefCell<HashMap<DeclarationId, Rc<DirectiveMeta>>>,
    pipes: RefCell<HashMap<DeclarationId, Rc<PipeMeta>>>,
    ng_modules: RefCell<IndexMap<DeclarationId, Rc<NgModuleMeta>>>,
    by_file: RefCell<IndexMap<String, Vec<(DeclarationId, AnnotationKind)>>>,
}

impl LocalMetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `node` in `file` carries `kind`. Directive, pipe and module
    /// registrations do this themselves.
    pub fn register_kind(&self, file: &str, node: DeclarationId, kind: AnnotationKind) {
        let mut by_file = self.by_file.borrow_mut();
        let entries = by_file.entry(file.to_string()).or_default();
        if !entries.iter().any(|(id, _)| *id == node) {
            entries.push((node, kind));
        }
    }

    /// Annotated classes registered for `file`, in registration order.
    pub fn declarations_in_file(&self, file: &str, kind: Option<AnnotationKind>) -> Vec<DeclarationId> {
        self.by_file
            .borrow()
            .get(file)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, k)| kind.map_or(true, |wanted| *k == wanted))
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Modules whose `declarations` list `node`, lowest declaration first.
    pub fn get_declaring_modules(&self, node: DeclarationId) -> Vec<DeclarationId> {
        let mut modules: Vec<DeclarationId> = self
            .ng_modules
            .borrow()
            .iter()
            .filter(|(_, meta)| meta.declarations.iter().any(|d| d.id == node))
            .map(|(id, _)| *id)
            .collect();
        modules.sort();
        modules
    }

    pub fn ng_modules(&self) -> Vec<DeclarationId> {
        let mut modules: Vec<DeclarationId> = self.ng_modules.borrow().keys().copied().collect();
        modules.sort();
        modules
    }
}

impl MetadataReader for LocalMetadataRegistry {
    fn get_directive_metadata(&self, node: DeclarationId) -> Option<Rc<DirectiveMeta>> {
        self.directives.borrow().get(&node).cloned()
    }

    fn get_pipe_metadata(&self, node: DeclarationId) -> Option<Rc<PipeMeta>> {
        self.pipes.borrow().get(&node).cloned()
    }

    fn get_ng_module_metadata(&self, node: DeclarationId) -> Option<Rc<NgModuleMeta>> {
        self.ng_modules.borrow().get(&node).cloned()
    }
}

impl MetadataRegistry for LocalMetadataRegistry {
    fn register_directive_metadata(&self, meta: DirectiveMeta) {
        let kind = if meta.is_component {
            AnnotationKind::Component
        } else {
            AnnotationKind::Directive
        };
        self.register_kind(&meta.reference.file, meta.reference.id, kind);
        self.directives.borrow_mut().insert(meta.reference.id, Rc::new(meta));
    }

    fn register_pipe_metadata(&self, meta: PipeMeta) {
        self.register_kind(&meta.reference.file, meta.reference.id, AnnotationKind::Pipe);
        self.pipes.borrow_mut().insert(meta.reference.id, Rc::new(meta));
    }

    fn register_ng_module_metadata(&self, meta: NgModuleMeta) {
        self.register_kind(&meta.reference.file, meta.reference.id, AnnotationKind::NgModule);
        self.ng_modules.borrow_mut().insert(meta.reference.id, Rc::new(meta));
    }
}

/// A `MetadataReader` which reads from an ordered chain of other readers; the
/// first answer wins.
pub struct CompoundMetadataReader {
    readers: Vec<Rc<dyn MetadataReader>>,
}

impl CompoundMetadataReader {
    pub fn new(readers: Vec<Rc<dyn MetadataReader>>) -> Self {
        Self { readers }
    }
}

impl MetadataReader for CompoundMetadataReader {
    fn get_directive_metadata(&self, node: DeclarationId) -> Option<Rc<DirectiveMeta>> {
        self.readers.iter().find_map(|r| r.get_directive_metadata(node))
    }

    fn get_pipe_metadata(&self, node: DeclarationId) -> Option<Rc<PipeMeta>> {
        self.readers.iter().find_map(|r| r.get_pipe_metadata(node))
    }

    fn get_ng_module_metadata(&self, node: DeclarationId) -> Option<Rc<NgModuleMeta>> {
        self.readers.iter().find_map(|r| r.get_ng_module_metadata(node))
    }
}
