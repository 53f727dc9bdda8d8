// Toolkit Configuration
//
// Project settings for one analysis session, read from JSON.

use crate::diagnostics::{NgastError, NgastResult};
use crate::logging::LogLevel;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use ts::path::{is_rooted, join, normalize};
use ts::{CompilerOptions, ProgramHost};

pub const DEFAULT_MAX_PROVIDER_DEPTH: usize = 32;
pub const DEFAULT_MAX_EVALUATION_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NgastOptions {
    pub root_dir: Option<String>,
    pub base_url: Option<String>,
    /// Root files, relative to `rootDir` unless absolute.
    pub files: Vec<String>,
    /// Glob patterns expanded under `rootDir`.
    pub include: Vec<String>,
    pub paths: IndexMap<String, Vec<String>>,
    pub strict_injection_parameters: bool,
    pub max_provider_depth: usize,
    pub max_evaluation_depth: usize,
    /// Console logging at this level; no logging when absent.
    pub log_level: Option<LogLevel>,
}

impl Default for NgastOptions {
    fn default() -> Self {
        Self {
            root_dir: None,
            base_url: None,
            files: Vec::new(),
            include: Vec::new(),
            paths: IndexMap::new(),
            strict_injection_parameters: false,
            max_provider_depth: DEFAULT_MAX_PROVIDER_DEPTH,
            max_evaluation_depth: DEFAULT_MAX_EVALUATION_DEPTH,
            log_level: None,
        }
    }
}

impl NgastOptions {
    pub fn from_json(text: &str) -> NgastResult<Self> {
        let options: NgastOptions =
            serde_json::from_str(text).map_err(|e| NgastError::Configuration(format!("cannot parse options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> NgastResult<()> {
        if self.files.is_empty() && self.include.is_empty() {
            return Err(NgastError::Configuration("no input files: set `files` or `include`".to_string()));
        }
        for (key, targets) in &self.paths {
            if key.matches('*').count() > 1 {
                return Err(NgastError::Configuration(format!(
                    "paths pattern '{}' can have at most one '*'",
                    key
                )));
            }
            if let Some(target) = targets.iter().find(|t| t.matches('*').count() > 1) {
                return Err(NgastError::Configuration(format!(
                    "substitution '{}' for '{}' can have at most one '*'",
                    target, key
                )));
            }
        }
        if self.max_provider_depth == 0 {
            return Err(NgastError::Configuration("maxProviderDepth must be positive".to_string()));
        }
        if self.max_evaluation_depth == 0 {
            return Err(NgastError::Configuration("maxEvaluationDepth must be positive".to_string()));
        }
        Ok(())
    }

    pub fn root_dir(&self) -> &str {
        self.root_dir.as_deref().unwrap_or("/")
    }

    pub fn to_compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            root_dir: self.root_dir.clone(),
            base_url: self.base_url.clone(),
            paths: self.paths.clone(),
        }
    }

    /// `files` followed by the expansion of `include`, without duplicates.
    pub fn root_names(&self, host: &dyn ProgramHost) -> NgastResult<Vec<String>> {
        let root = self.root_dir();
        let mut names: IndexSet<String> = self
            .files
            .iter()
            .map(|file| if is_rooted(file) { normalize(file) } else { join(root, file) })
            .collect();
        if !self.include.is_empty() {
            let found = host
                .list_files(root, &self.include)
                .map_err(|e| NgastError::Configuration(e.to_string()))?;
            names.extend(found);
        }
        Ok(names.into_iter().collect())
    }
}
