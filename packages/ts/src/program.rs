// Program
//
// Loads root files through a `ProgramHost`, follows their static imports, and
// lowers every file into one shared declaration arena.

use crate::declaration::{Declaration, DeclarationId, ExportEntry, SourceFile};
use crate::lower::{lower_file, LoweredFile};
use crate::path::{dirname, is_declaration_file, is_local_relative_path, is_rooted, join, normalize, strip_js_extension};
use crate::Diagnostic;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions {
    pub root_dir: Option<String>,
    pub base_url: Option<String>,
    /// `paths` mappings, each key and target holding at most one `*`.
    pub paths: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProgramError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("no input files")]
    NoInputFiles,
    #[error("invalid include pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// File access used to build a `Program`.
pub trait ProgramHost {
    fn read_file(&self, path: &str) -> Option<String>;
    fn file_exists(&self, path: &str) -> bool;
    /// Files under `root` matching any of the `include` globs.
    fn list_files(&self, root: &str, include: &[String]) -> Result<Vec<String>, ProgramError>;
}

/// Host backed by an in-memory map of normalized paths to contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    files: IndexMap<String, String>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, content: &str) -> &mut Self {
        self.files.insert(normalize(path), content.to_string());
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|k| k.as_str())
    }
}

impl ProgramHost for InMemoryHost {
    fn read_file(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn list_files(&self, root: &str, include: &[String]) -> Result<Vec<String>, ProgramError> {
        let patterns = compile_patterns(root, include)?;
        Ok(self
            .files
            .keys()
            .filter(|path| patterns.iter().any(|p| p.matches(path)))
            .cloned()
            .collect())
    }
}

/// Host reading from the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemHost;

impl ProgramHost for FileSystemHost {
    fn read_file(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn list_files(&self, root: &str, include: &[String]) -> Result<Vec<String>, ProgramError> {
        let mut files = IndexSet::new();
        for pattern in include {
            let full = join(root, pattern);
            let entries = glob::glob(&full).map_err(|e| ProgramError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            for entry in entries.flatten() {
                files.insert(normalize(&entry.to_string_lossy().replace('\\', "/")));
            }
        }
        Ok(files.into_iter().collect())
    }
}

fn compile_patterns(root: &str, include: &[String]) -> Result<Vec<glob::Pattern>, ProgramError> {
    include
        .iter()
        .map(|pattern| {
            glob::Pattern::new(&join(root, pattern)).map_err(|e| ProgramError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// The lowered compilation unit: every loaded file and its declarations.
#[derive(Debug)]
pub struct Program {
    options: CompilerOptions,
    root_names: Vec<String>,
    files: IndexMap<String, SourceFile>,
    declarations: Vec<Declaration>,
    diagnostics: Vec<Diagnostic>,
}

impl Program {
    /// Build a program from `root_names`, loading every file they statically
    /// import that the host can provide. Files are parsed in parallel, one
    /// import wave at a time.
    pub fn from_host(
        host: &dyn ProgramHost,
        root_names: &[String],
        options: CompilerOptions,
    ) -> Result<Program, ProgramError> {
        if root_names.is_empty() {
            return Err(ProgramError::NoInputFiles);
        }

        let mut program = Program {
            options,
            root_names: root_names.iter().map(|p| normalize(p)).collect(),
            files: IndexMap::new(),
            declarations: Vec::new(),
            diagnostics: Vec::new(),
        };

        let mut seen: IndexSet<String> = IndexSet::new();
        let mut wave = Vec::new();
        for root in &program.root_names {
            if !seen.insert(root.clone()) {
                continue;
            }
            let text = host
                .read_file(root)
                .ok_or_else(|| ProgramError::FileNotFound(root.clone()))?;
            wave.push((root.clone(), text));
        }

        while !wave.is_empty() {
            let lowered: Vec<LoweredFile> = wave
                .into_par_iter()
                .map(|(path, text)| lower_file(&path, text))
                .collect();

            let mut next = Vec::new();
            for file in &lowered {
                for specifier in module_specifiers(file) {
                    let resolved = program.resolve_with(&file.path, specifier, |candidate| {
                        seen.contains(candidate) || host.file_exists(candidate)
                    });
                    let Some(resolved) = resolved else { continue };
                    if seen.insert(resolved.clone()) {
                        if let Some(text) = host.read_file(&resolved) {
                            next.push((resolved, text));
                        }
                    }
                }
            }
            for file in lowered {
                program.add_file(file);
            }
            wave = next;
        }

        Ok(program)
    }

    /// Convenience constructor over in-memory sources; every source is a root.
    pub fn from_sources<P, C>(sources: impl IntoIterator<Item = (P, C)>) -> Result<Program, ProgramError>
    where
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let mut host = InMemoryHost::new();
        for (path, content) in sources {
            host.add(path.as_ref(), content.as_ref());
        }
        let roots: Vec<String> = host.paths().map(|p| p.to_string()).collect();
        Program::from_host(&host, &roots, CompilerOptions::default())
    }

    fn add_file(&mut self, lowered: LoweredFile) {
        let mut ids = Vec::with_capacity(lowered.declarations.len());
        for decl in lowered.declarations {
            let id = DeclarationId(self.declarations.len() as u32);
            self.declarations.push(Declaration {
                id,
                name: decl.name,
                file: lowered.path.clone(),
                span: decl.span,
                exported: decl.exported,
                kind: decl.kind,
            });
            ids.push(id);
        }
        self.diagnostics.extend(lowered.diagnostics);
        self.files.insert(
            lowered.path.clone(),
            SourceFile {
                is_declaration_file: is_declaration_file(&lowered.path),
                path: lowered.path,
                text: lowered.text,
                declarations: ids,
                imports: lowered.imports,
                exports: lowered.exports,
            },
        );
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn root_names(&self) -> &[String] {
        &self.root_names
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn declaration(&self, id: DeclarationId) -> &Declaration {
        &self.declarations[id.index()]
    }

    /// Syntax diagnostics collected while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolve `specifier` as imported from `from` against the loaded files.
    pub fn resolve_module(&self, from: &str, specifier: &str) -> Option<String> {
        self.resolve_with(from, specifier, |candidate| self.files.contains_key(candidate))
    }

    fn resolve_with(&self, from: &str, specifier: &str, exists: impl Fn(&str) -> bool) -> Option<String> {
        let probe = |base: &str| -> Option<String> {
            let candidates = [
                format!("{}.ts", base),
                format!("{}.d.ts", base),
                format!("{}/index.ts", base),
                format!("{}/index.d.ts", base),
            ];
            if base.ends_with(".ts") && exists(base) {
                return Some(base.to_string());
            }
            let stem = strip_js_extension(base);
            if stem.len() < base.len() {
                let emitted = [format!("{}.ts", stem), format!("{}.d.ts", stem)];
                if let Some(found) = emitted.into_iter().find(|c| exists(c)) {
                    return Some(found);
                }
            }
            candidates.into_iter().find(|c| exists(c))
        };

        if is_local_relative_path(specifier) || is_rooted(specifier) {
            return probe(&join(&dirname(from), specifier));
        }

        let base_dir = self
            .options
            .base_url
            .clone()
            .or_else(|| self.options.root_dir.clone())
            .unwrap_or_else(|| "/".to_string());
        for (pattern, targets) in &self.options.paths {
            let Some(captured) = match_path_pattern(pattern, specifier) else {
                continue;
            };
            for target in targets {
                let mapped = target.replacen('*', captured, 1);
                if let Some(found) = probe(&join(&base_dir, &mapped)) {
                    return Some(found);
                }
            }
        }

        let mut dir = dirname(from);
        loop {
            if let Some(found) = probe(&join(&dir, &format!("node_modules/{}", specifier))) {
                return Some(found);
            }
            if dir == "/" || dir == "." {
                return None;
            }
            dir = dirname(&dir);
        }
    }
}

fn module_specifiers(file: &LoweredFile) -> impl Iterator<Item = &str> {
    let imports = file.imports.iter().map(|i| i.module.as_str());
    let exports = file.exports.iter().filter_map(|e| match e {
        ExportEntry::Reexport { module, .. } | ExportEntry::Star { module } => Some(module.as_str()),
        ExportEntry::Local { .. } => None,
    });
    imports.chain(exports).collect::<IndexSet<_>>().into_iter()
}

/// Match `specifier` against a `paths` key, returning the text captured by `*`.
pub fn match_path_pattern<'s>(pattern: &str, specifier: &'s str) -> Option<&'s str> {
    match pattern.split_once('*') {
        None => (pattern == specifier).then_some(""),
        Some((prefix, suffix)) => {
            if specifier.len() >= prefix.len() + suffix.len()
                && specifier.starts_with(prefix)
                && specifier.ends_with(suffix)
            {
                Some(&specifier[prefix.len()..specifier.len() - suffix.len()])
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_follow_imports_into_node_modules() -> anyhow::Result<()> {
        let mut host = InMemoryHost::new();
        host.add("/app/main.ts", "import { Lib } from 'lib';\nimport { Local } from './local';")
            .add("/app/local.ts", "export class Local {}")
            .add("/node_modules/lib/index.d.ts", "export declare class Lib {}")
            .add("/app/unused.ts", "export class Unused {}");

        let program = Program::from_host(&host, &["/app/main.ts".to_string()], CompilerOptions::default())?;
        assert!(program.file("/app/local.ts").is_some());
        assert!(program.file("/node_modules/lib/index.d.ts").is_some());
        assert!(program.file("/app/unused.ts").is_none());
        assert!(program.file("/node_modules/lib/index.d.ts").unwrap().is_declaration_file);
        Ok(())
    }

    #[test]
    fn should_resolve_paths_mappings() -> anyhow::Result<()> {
        let mut host = InMemoryHost::new();
        host.add("/app/main.ts", "import { Shared } from '@shared/util';")
            .add("/libs/shared/util.ts", "export class Shared {}");
        let mut options = CompilerOptions::default();
        options.paths.insert("@shared/*".to_string(), vec!["libs/shared/*".to_string()]);

        let program = Program::from_host(&host, &["/app/main.ts".to_string()], options)?;
        assert_eq!(
            program.resolve_module("/app/main.ts", "@shared/util").as_deref(),
            Some("/libs/shared/util.ts")
        );
        Ok(())
    }

    #[test]
    fn should_resolve_emitted_extensions_to_sources() -> anyhow::Result<()> {
        let mut host = InMemoryHost::new();
        host.add("/app/main.ts", "import { Svc } from './svc.js';\nimport { Lib } from 'lib/util.mjs';")
            .add("/app/svc.ts", "export class Svc {}")
            .add("/node_modules/lib/util.d.ts", "export declare class Lib {}");

        let program = Program::from_host(&host, &["/app/main.ts".to_string()], CompilerOptions::default())?;
        assert_eq!(program.resolve_module("/app/main.ts", "./svc.js").as_deref(), Some("/app/svc.ts"));
        assert_eq!(
            program.resolve_module("/app/main.ts", "lib/util.mjs").as_deref(),
            Some("/node_modules/lib/util.d.ts")
        );
        Ok(())
    }

    #[test]
    fn should_report_missing_root_files() {
        let host = InMemoryHost::new();
        let err = Program::from_host(&host, &["/missing.ts".to_string()], CompilerOptions::default())
            .unwrap_err();
        assert_eq!(err, ProgramError::FileNotFound("/missing.ts".to_string()));
    }

    #[test]
    fn should_list_files_by_glob() -> anyhow::Result<()> {
        let mut host = InMemoryHost::new();
        host.add("/app/a.ts", "").add("/app/feature/b.ts", "").add("/other/c.ts", "");
        let files = host.list_files("/app", &["**/*.ts".to_string()])?;
        assert_eq!(files, vec!["/app/a.ts".to_string(), "/app/feature/b.ts".to_string()]);
        Ok(())
    }

    #[test]
    fn should_match_path_patterns() {
        assert_eq!(match_path_pattern("@app/*", "@app/core"), Some("core"));
        assert_eq!(match_path_pattern("exact", "exact"), Some(""));
        assert_eq!(match_path_pattern("@app/*", "@lib/core"), None);
    }
}
