// Resource Loader
//
// Resolves resource URLs against the component that references them, caches
// their contents and records the component's dependency on each file.

use super::api::{ResourceError, ResourceResolver};
use crate::incremental::{DependencyTracker, FileDependencyGraph};
use crate::logging::Logger;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use ts::path::{dirname, join, normalize};

pub struct ResourceLoader {
    resolver: Rc<dyn ResourceResolver>,
    dependencies: Rc<FileDependencyGraph>,
    logger: Rc<dyn Logger>,
    cache: RefCell<HashMap<String, Result<String, ResourceError>>>,
}

impl ResourceLoader {
    pub fn new(resolver: Rc<dyn ResourceResolver>, dependencies: Rc<FileDependencyGraph>, logger: Rc<dyn Logger>) -> Self {
        Self {
            resolver,
            dependencies,
            logger,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Absolute URL of `url` as written in `containing_file`.
    pub fn resolve(&self, url: &str, containing_file: &str) -> String {
        if url.starts_with('/') {
            normalize(url)
        } else {
            join(&dirname(containing_file), url)
        }
    }

    /// Load a resolved URL on behalf of `containing_file`.
    pub fn load(&self, resolved: &str, containing_file: &str) -> Result<String, ResourceError> {
        self.dependencies.add_dependency(containing_file, resolved);
        if let Some(cached) = self.cache.borrow().get(resolved) {
            return cached.clone();
        }
        let loaded = self.resolver.resolve_sync(resolved);
        match &loaded {
            Ok(content) => self
                .logger
                .debug(&format!("loaded {} ({} bytes)", resolved, content.len())),
            Err(error) => self.logger.debug(&format!("{}", error)),
        }
        self.cache.borrow_mut().insert(resolved.to_string(), loaded.clone());
        loaded
    }

    /// Resolve and load in one step. Returns the resolved URL with the contents.
    pub fn fetch(&self, url: &str, containing_file: &str) -> (String, Result<String, ResourceError>) {
        let resolved = self.resolve(url, containing_file);
        let loaded = self.load(&resolved, containing_file);
        (resolved, loaded)
    }
}
