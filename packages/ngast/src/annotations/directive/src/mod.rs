// Annotations Directive Source Module

pub mod handler;
pub mod metadata;

// Re-exports
pub use handler::DirectiveDecoratorHandler;
pub use metadata::{
    directive_metadata_from_dts, extract_directive_metadata, parse_binding_list, DirectiveAnalysis,
    R3DirectiveMetadata,
};
