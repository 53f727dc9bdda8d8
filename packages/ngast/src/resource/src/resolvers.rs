// Resource Resolvers
//
// In-memory and file-system backed resolvers.

use super::api::{ResourceError, ResourceResolver};
use indexmap::IndexMap;
use std::path::PathBuf;
use ts::path::{join, normalize};

/// In-memory resolver keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceResolver {
    resources: IndexMap<String, String>,
}

impl InMemoryResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, url: &str, content: &str) -> &mut Self {
        self.resources.insert(normalize(url), content.to_string());
        self
    }

    pub fn contains(&self, url: &str) -> bool {
        self.resources.contains_key(&normalize(url))
    }
}

impl ResourceResolver for InMemoryResourceResolver {
    fn resolve_sync(&self, url: &str) -> Result<String, ResourceError> {
        self.resources
            .get(&normalize(url))
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(url.to_string()))
    }
}

/// File-based resolver. URLs are rooted at `root_dir`.
#[derive(Debug, Clone)]
pub struct FileResourceResolver {
    root_dir: String,
}

impl FileResourceResolver {
    pub fn new(root_dir: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn path_of(&self, url: &str) -> PathBuf {
        PathBuf::from(join(&self.root_dir, url.trim_start_matches('/')))
    }
}

impl ResourceResolver for FileResourceResolver {
    fn resolve_sync(&self, url: &str) -> Result<String, ResourceError> {
        let path = self.path_of(url);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ResourceError::NotFound(url.to_string()),
            _ => ResourceError::LoadFailed {
                url: url.to_string(),
                message: e.to_string(),
            },
        })
    }
}
