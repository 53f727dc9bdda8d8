// Component Metadata

use super::resources::{ComponentStyles, ComponentTemplate};
use crate::annotations::common::{ChangeDetectionStrategy, SourceExpression, ViewEncapsulation};
use crate::annotations::directive::R3DirectiveMetadata;
use crate::partial_evaluator::Reference;
use crate::scope::ModuleScope;
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAnalysis {
    pub meta: R3DirectiveMetadata,
    /// `None` only for pre-compiled components.
    pub template: Option<ComponentTemplate>,
    pub styles: ComponentStyles,
    pub change_detection: Option<ChangeDetectionStrategy>,
    pub encapsulation: ViewEncapsulation,
    /// `imports` of a standalone component.
    pub imports: Vec<Reference>,
    #[serde(skip)]
    pub raw_imports: Option<SourceExpression>,
    #[serde(skip)]
    pub providers: Option<SourceExpression>,
    #[serde(skip)]
    pub view_providers: Option<SourceExpression>,
    pub is_compiled: bool,
}

impl ComponentAnalysis {
    pub(crate) fn compiled(meta: R3DirectiveMetadata) -> Self {
        Self {
            meta,
            template: None,
            styles: ComponentStyles::default(),
            change_detection: None,
            encapsulation: ViewEncapsulation::Emulated,
            imports: Vec::new(),
            raw_imports: None,
            providers: None,
            view_providers: None,
            is_compiled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentResolution {
    /// Scope of the owning module, or of the component itself when standalone.
    /// `None` for a component no module declares.
    pub scope: Option<Rc<ModuleScope>>,
}
