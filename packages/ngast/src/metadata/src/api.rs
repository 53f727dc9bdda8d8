// Metadata API
//
// The directive, pipe and module facts that scope computation needs, whether
// they come from local analysis or from pre-compiled declaration files.

use crate::partial_evaluator::Reference;
use serde::Serialize;
use std::rc::Rc;
use ts::DeclarationId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveMeta {
    pub reference: Reference,
    pub selector: Option<String>,
    pub export_as: Option<Vec<String>>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub is_component: bool,
    pub is_standalone: bool,
    /// `imports` of a standalone component.
    pub imports: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeMeta {
    pub reference: Reference,
    pub name: String,
    pub is_standalone: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NgModuleMeta {
    pub reference: Reference,
    pub declarations: Vec<Reference>,
    pub imports: Vec<Reference>,
    pub exports: Vec<Reference>,
}

/// Reads metadata for a class.
pub trait MetadataReader {
    fn get_directive_metadata(&self, node: DeclarationId) -> Option<Rc<DirectiveMeta>>;
    fn get_pipe_metadata(&self, node: DeclarationId) -> Option<Rc<PipeMeta>>;
    fn get_ng_module_metadata(&self, node: DeclarationId) -> Option<Rc<NgModuleMeta>>;

    fn is_declarable(&self, node: DeclarationId) -> bool {
        self.get_directive_metadata(node).is_some() || self.get_pipe_metadata(node).is_some()
    }
}

/// Registers new metadata for a class.
pub trait MetadataRegistry {
    fn register_directive_metadata(&self, meta: DirectiveMeta);
    fn register_pipe_metadata(&self, meta: PipeMeta);
    fn register_ng_module_metadata(&self, meta: NgModuleMeta);
}
