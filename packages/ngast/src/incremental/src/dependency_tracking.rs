// Dependency Tracking
//
// File-grained dependency graph. Edges come from static imports, from the
// evaluator following references into other files, and from the resource
// loader reading external templates and styles.

use super::api::DependencyTracker;
use indexmap::{IndexMap, IndexSet};
use std::cell::RefCell;
use ts::{ExportEntry, Program};

#[derive(Debug, Default)]
pub struct FileDependencyGraph {
    forward: RefCell<IndexMap<String, IndexSet<String>>>,
    reverse: RefCell<IndexMap<String, IndexSet<String>>>,
}

impl FileDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph seeded with the static import edges of `program`.
    pub fn from_program(program: &Program) -> Self {
        let graph = Self::new();
        for sf in program.files() {
            for import in &sf.imports {
                if let Some(target) = program.resolve_module(&sf.path, &import.module) {
                    graph.add_dependency(&sf.path, &target);
                }
            }
            for entry in &sf.exports {
                let module = match entry {
                    ExportEntry::Reexport { module, .. } | ExportEntry::Star { module } => module,
                    ExportEntry::Local { .. } => continue,
                };
                if let Some(target) = program.resolve_module(&sf.path, module) {
                    graph.add_dependency(&sf.path, &target);
                }
            }
        }
        graph
    }

    /// Every file that transitively depends on `file`, excluding `file` itself.
    pub fn get_transitive_dependents(&self, file: &str) -> IndexSet<String> {
        let reverse = self.reverse.borrow();
        let mut result = IndexSet::new();
        let mut stack = vec![file.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(dependents) = reverse.get(&current) {
                for dependent in dependents {
                    if dependent != file && result.insert(dependent.clone()) {
                        stack.push(dependent.clone());
                    }
                }
            }
        }
        result
    }

    /// The changed files plus everything that transitively depends on them.
    pub fn affected_files<'a>(&self, changed: impl IntoIterator<Item = &'a str>) -> IndexSet<String> {
        let mut affected = IndexSet::new();
        for file in changed {
            affected.insert(file.to_string());
            affected.extend(self.get_transitive_dependents(file));
        }
        affected
    }

    pub fn edge_count(&self) -> usize {
        self.forward.borrow().values().map(|deps| deps.len()).sum()
    }

    pub fn clear(&self) {
        self.forward.borrow_mut().clear();
        self.reverse.borrow_mut().clear();
    }
}

impl DependencyTracker for FileDependencyGraph {
    fn add_dependency(&self, from: &str, to: &str) {
        if from == to {
            return;
        }
        self.forward
            .borrow_mut()
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.reverse
            .borrow_mut()
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
    }

    fn get_dependents(&self, file: &str) -> IndexSet<String> {
        self.reverse.borrow().get(file).cloned().unwrap_or_default()
    }

    fn get_dependencies(&self, file: &str) -> IndexSet<String> {
        self.forward.borrow().get(file).cloned().unwrap_or_default()
    }
}
