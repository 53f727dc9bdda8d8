// Declaration File Metadata
//
// Reads the static definition markers that compiled Angular classes carry in
// `.d.ts` files, for example
// `static ɵcmp: i0.ɵɵComponentDeclaration<Cmp, "cmp", never, {}, {}, never, never, true, never>`.

use super::api::{DirectiveMeta, MetadataReader, NgModuleMeta, PipeMeta};
use crate::partial_evaluator::Reference;
use crate::transform::AnnotationKind;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use ts::{ClassDeclaration, DeclarationId, Program, ResolvedSymbol, TypeCheckingContext, TypeNode};

const STANDALONE_DIRECTIVE_ARG: usize = 7;
const STANDALONE_PIPE_ARG: usize = 2;

/// Static fields that mark a compiled Angular class, with the kind each implies.
const MARKERS: &[(&str, AnnotationKind)] = &[
    ("ɵcmp", AnnotationKind::Component),
    ("ɵdir", AnnotationKind::Directive),
    ("ɵpipe", AnnotationKind::Pipe),
    ("ɵmod", AnnotationKind::NgModule),
    ("ɵprov", AnnotationKind::Injectable),
];

/// Kind of a pre-compiled class, read from its static marker fields.
pub fn read_marker_kind(class: &ClassDeclaration) -> Option<AnnotationKind> {
    MARKERS
        .iter()
        .find(|(field, _)| class.static_member(field).is_some())
        .map(|(_, kind)| *kind)
}

/// Reads directive, pipe and module metadata from compiled declaration files.
pub struct DtsMetadataReader {
    program: Rc<Program>,
    directives: RefCell<HashMap<DeclarationId, Option<Rc<DirectiveMeta>>>>,
    pipes: RefCell<HashMap<DeclarationId, Option<Rc<PipeMeta>>>>,
    ng_modules: RefCell<HashMap<DeclarationId, Option<Rc<NgModuleMeta>>>>,
}

impl DtsMetadataReader {
    pub fn new(program: Rc<Program>) -> Self {
        Self {
            program,
            directives: RefCell::new(HashMap::new()),
            pipes: RefCell::new(HashMap::new()),
            ng_modules: RefCell::new(HashMap::new()),
        }
    }

    /// Type arguments of the marker field `field`, if the class has one.
    fn marker_args(&self, node: DeclarationId, field: &str) -> Option<&[TypeNode]> {
        let class = self.program.declaration(node).as_class()?;
        match class.static_member(field)?.type_node.as_ref()? {
            TypeNode::Reference { args, .. } => Some(args),
            _ => None,
        }
    }

    fn reference_of(&self, node: DeclarationId) -> Reference {
        let decl = self.program.declaration(node);
        Reference {
            id: node,
            name: decl.name.clone(),
            file: decl.file.clone(),
        }
    }

    /// `[typeof A, typeof B]` resolved from `node`'s file. Names that leave the
    /// program are dropped.
    fn read_reference_tuple(&self, node: DeclarationId, ty: Option<&TypeNode>) -> Vec<Reference> {
        let Some(TypeNode::Tuple(elements)) = ty else {
            return Vec::new();
        };
        let file = &self.program.declaration(node).file;
        elements
            .iter()
            .filter_map(|element| match element {
                TypeNode::Query(name) => match self.program.resolve_entity_name(name, file)? {
                    ResolvedSymbol::Declaration(id) => Some(self.reference_of(id)),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    fn read_directive(&self, node: DeclarationId) -> Option<Rc<DirectiveMeta>> {
        let (args, is_component) = match self.marker_args(node, "ɵcmp") {
            Some(args) => (args, true),
            None => (self.marker_args(node, "ɵdir")?, false),
        };
        Some(Rc::new(DirectiveMeta {
            reference: self.reference_of(node),
            selector: args.get(1).and_then(TypeNode::as_string_literal).map(str::to_string),
            export_as: read_string_tuple(args.get(2)),
            inputs: Vec::new(),
            outputs: Vec::new(),
            is_component,
            is_standalone: read_boolean(args.get(STANDALONE_DIRECTIVE_ARG)),
            imports: Vec::new(),
        }))
    }

    fn read_pipe(&self, node: DeclarationId) -> Option<Rc<PipeMeta>> {
        let args = self.marker_args(node, "ɵpipe")?;
        Some(Rc::new(PipeMeta {
            reference: self.reference_of(node),
            name: args.get(1).and_then(TypeNode::as_string_literal)?.to_string(),
            is_standalone: read_boolean(args.get(STANDALONE_PIPE_ARG)),
        }))
    }

    fn read_ng_module(&self, node: DeclarationId) -> Option<Rc<NgModuleMeta>> {
        let args = self.marker_args(node, "ɵmod")?;
        Some(Rc::new(NgModuleMeta {
            reference: self.reference_of(node),
            declarations: self.read_reference_tuple(node, args.get(1)),
            imports: self.read_reference_tuple(node, args.get(2)),
            exports: self.read_reference_tuple(node, args.get(3)),
        }))
    }

    fn is_ambient(&self, node: DeclarationId) -> bool {
        let decl = self.program.declaration(node);
        decl.as_class().map_or(false, |c| c.is_ambient) || self.program.is_declaration_file(&decl.file)
    }
}

fn read_string_tuple(ty: Option<&TypeNode>) -> Option<Vec<String>> {
    match ty? {
        TypeNode::Tuple(items) => Some(
            items
                .iter()
                .filter_map(TypeNode::as_string_literal)
                .map(str::to_string)
                .collect(),
        ),
        TypeNode::StringLiteral(value) => Some(vec![value.clone()]),
        _ => None,
    }
}

fn read_boolean(ty: Option<&TypeNode>) -> bool {
    matches!(ty, Some(TypeNode::Keyword(value)) if value == "true")
}

fn cached<T>(
    cache: &RefCell<HashMap<DeclarationId, Option<Rc<T>>>>,
    node: DeclarationId,
    read: impl FnOnce() -> Option<Rc<T>>,
) -> Option<Rc<T>> {
    if let Some(found) = cache.borrow().get(&node) {
        return found.clone();
    }
    let value = read();
    cache.borrow_mut().insert(node, value.clone());
    value
}

impl MetadataReader for DtsMetadataReader {
    fn get_directive_metadata(&self, node: DeclarationId) -> Option<Rc<DirectiveMeta>> {
        if !self.is_ambient(node) {
            return None;
        }
        cached(&self.directives, node, || self.read_directive(node))
    }

    fn get_pipe_metadata(&self, node: DeclarationId) -> Option<Rc<PipeMeta>> {
        if !self.is_ambient(node) {
            return None;
        }
        cached(&self.pipes, node, || self.read_pipe(node))
    }

    fn get_ng_module_metadata(&self, node: DeclarationId) -> Option<Rc<NgModuleMeta>> {
        if !self.is_ambient(node) {
            return None;
        }
        cached(&self.ng_modules, node, || self.read_ng_module(node))
    }
}
