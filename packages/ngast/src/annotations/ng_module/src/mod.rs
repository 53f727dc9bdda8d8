// Annotations NgModule Source Module

pub mod handler;
pub mod module_with_providers;

// Re-exports
pub use handler::{NgModuleAnalysis, NgModuleDecoratorHandler, NgModuleResolution};
pub use module_with_providers::{read_module_with_providers, ResolvedModuleWithProviders};
