// Incremental API
//
// Dependency tracking between files, used to decide what to re-analyze after
// an edit.

use indexmap::IndexSet;

/// Tracks dependencies between files.
pub trait DependencyTracker {
    /// Record that `from` depends on `to`.
    fn add_dependency(&self, from: &str, to: &str);

    /// Files that directly depend on `file`.
    fn get_dependents(&self, file: &str) -> IndexSet<String>;

    /// Files that `file` directly depends on.
    fn get_dependencies(&self, file: &str) -> IndexSet<String>;
}
