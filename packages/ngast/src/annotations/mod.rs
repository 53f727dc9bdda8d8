//! Decorator handlers
//!
//! One handler per Angular annotation kind, plus the helpers they share.

pub mod common;
pub mod component;
pub mod directive;
pub mod injectable;
pub mod ng_module;
pub mod pipe;

pub use component::{ComponentAnalysis, ComponentDecoratorHandler, ComponentResolution};
pub use directive::{DirectiveAnalysis, DirectiveDecoratorHandler};
pub use injectable::{InjectableAnalysis, InjectableDecoratorHandler};
pub use ng_module::{NgModuleAnalysis, NgModuleDecoratorHandler, NgModuleResolution};
pub use pipe::{PipeAnalysis, PipeDecoratorHandler};
