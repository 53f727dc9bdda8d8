// Resource Resolver API
//
// Supplies the contents of external templates and stylesheets.

use std::future::{self, Future};
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to load {url}: {message}")]
    LoadFailed { url: String, message: String },
}

impl ResourceError {
    pub fn url(&self) -> &str {
        match self {
            ResourceError::NotFound(url) => url,
            ResourceError::LoadFailed { url, .. } => url,
        }
    }
}

pub type ResourceFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ResourceError>> + 'a>>;

/// Reads resources by their resolved absolute URL.
pub trait ResourceResolver {
    fn resolve_sync(&self, url: &str) -> Result<String, ResourceError>;

    /// Asynchronous read. Defaults to an already-completed future over
    /// `resolve_sync`.
    fn resolve_async(&self, url: &str) -> ResourceFuture<'_> {
        Box::pin(future::ready(self.resolve_sync(url)))
    }
}
