// Annotations Injectable Source Module

pub mod handler;

// Re-exports
pub use handler::{InjectableAnalysis, InjectableDecoratorHandler, ProvidedIn};
