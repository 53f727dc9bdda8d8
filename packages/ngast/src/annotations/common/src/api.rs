// Handler Context
//
// Services shared by every decorator handler.

use super::util::find_angular_decorator;
use crate::logging::Logger;
use crate::metadata::{read_marker_kind, LocalMetadataRegistry, MetadataReader};
use crate::partial_evaluator::{PartialEvaluator, Reference};
use crate::reflection::ReflectionHost;
use crate::transform::{AnnotationKind, DetectResult};
use std::rc::Rc;
use ts::{Declaration, DeclarationId, Expression, Program};

pub struct HandlerContext {
    pub program: Rc<Program>,
    pub reflector: Rc<dyn ReflectionHost>,
    pub evaluator: Rc<PartialEvaluator>,
    /// Where handlers register what they analyzed.
    pub local_metadata: Rc<LocalMetadataRegistry>,
    /// Local registrations first, then declaration-file markers.
    pub metadata: Rc<dyn MetadataReader>,
    pub logger: Rc<dyn Logger>,
    pub strict_injection_parameters: bool,
}

impl HandlerContext {
    pub fn declaration(&self, node: DeclarationId) -> &Declaration {
        self.program.declaration(node)
    }

    pub fn reference_to(&self, node: DeclarationId) -> Reference {
        let decl = self.program.declaration(node);
        Reference {
            id: node,
            name: decl.name.clone(),
            file: decl.file.clone(),
        }
    }

    /// Source classes are matched by their `@angular/core` decorator,
    /// pre-compiled ones by their static definition marker.
    pub fn detect(&self, node: DeclarationId, kind: AnnotationKind) -> Option<DetectResult> {
        if self.reflector.is_ambient(node) {
            let class = self.declaration(node).as_class()?;
            return (read_marker_kind(class) == Some(kind)).then(|| DetectResult::from_marker(kind));
        }
        let decorators = self.reflector.get_decorators_of_declaration(node);
        find_angular_decorator(decorators, kind.decorator_name()).map(|d| DetectResult::from_decorator(kind, d))
    }
}

/// An expression kept from analysis for later evaluation, with the file it
/// must be evaluated in.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceExpression {
    pub node: Expression,
    pub file: String,
}

impl SourceExpression {
    pub fn new(node: &Expression, file: &str) -> Self {
        Self {
            node: node.clone(),
            file: file.to_string(),
        }
    }
}
