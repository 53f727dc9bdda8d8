// Annotations Pipe Source Module

pub mod handler;

// Re-exports
pub use handler::{PipeAnalysis, PipeDecoratorHandler};
