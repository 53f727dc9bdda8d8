//! Incremental, trait-based symbol analysis for Angular-style programs.
//!
//! A [`Workspace`] owns one [`ToolkitContainer`], which lazily builds every
//! analysis service from [`NgastOptions`]. Declarations are analyzed on first
//! access through the `TraitCompiler` and exposed as [`Symbol`] views.

pub mod annotations;
pub mod diagnostics;
pub mod incremental;
pub mod logging;
pub mod metadata;
pub mod partial_evaluator;
pub mod providers;
pub mod reflection;
pub mod resource;
pub mod routes;
pub mod scope;
pub mod symbols;
pub mod template;
#[cfg(test)]
pub(crate) mod testing;
pub mod toolkit;
pub mod transform;

pub use crate::toolkit::{NgastOptions, ToolkitContainer, Workspace};
pub use crate::diagnostics::{NgastError, NgastResult};
pub use crate::symbols::{AnnotationKind, Symbol};
