// Annotations Component Source Module

pub mod handler;
pub mod metadata;
pub mod resources;

// Re-exports
pub use handler::ComponentDecoratorHandler;
pub use metadata::{ComponentAnalysis, ComponentResolution};
pub use resources::{extract_styles, extract_template, ComponentStyles, ComponentTemplate, ExternalStyle, ResourceTypeForDiagnostics};
