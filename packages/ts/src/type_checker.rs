// Type-Checking Context
//
// The read-only view of a `Program` that the analysis engine works against:
// declarations per file, identifier resolution through imports and re-exports,
// and class members.

use crate::declaration::{ClassMember, Declaration, DeclarationId, DeclarationKind, ExportEntry, ImportedName, SourceFile};
use crate::program::Program;
use crate::Diagnostic;
use std::collections::HashSet;

/// What an identifier refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedSymbol {
    Declaration(DeclarationId),
    /// `import * as ns from './file'`; holds the resolved file.
    Namespace(String),
    /// A name imported from a module that is not part of the program.
    External { module: String, name: String },
}

pub trait TypeCheckingContext {
    fn source_files(&self) -> Vec<&SourceFile>;

    fn source_file(&self, path: &str) -> Option<&SourceFile>;

    fn get_declarations(&self, file: &str) -> Vec<DeclarationId> {
        self.source_file(file)
            .map(|sf| sf.declarations.clone())
            .unwrap_or_default()
    }

    fn declaration(&self, id: DeclarationId) -> &Declaration;

    fn resolve_module(&self, from: &str, specifier: &str) -> Option<String>;

    fn diagnostics(&self) -> &[Diagnostic];

    fn is_class(&self, id: DeclarationId) -> bool {
        self.declaration(id).is_class()
    }

    fn get_members_of_class(&self, id: DeclarationId) -> &[ClassMember] {
        match &self.declaration(id).kind {
            DeclarationKind::Class(class) => &class.members,
            _ => &[],
        }
    }

    fn is_declaration_file(&self, file: &str) -> bool {
        self.source_file(file).map_or(false, |sf| sf.is_declaration_file)
    }

    /// Resolve an identifier used in `file`, following imports into other files.
    fn get_declaration_of_identifier(&self, name: &str, file: &str) -> Option<ResolvedSymbol> {
        let sf = self.source_file(file)?;
        if let Some(id) = sf
            .declarations
            .iter()
            .copied()
            .find(|id| self.declaration(*id).name == name)
        {
            return Some(ResolvedSymbol::Declaration(id));
        }

        let import = sf.import_for(name)?;
        let target = self.resolve_module(file, &import.module);
        match (&import.imported, target) {
            (ImportedName::Namespace, Some(target)) => Some(ResolvedSymbol::Namespace(target)),
            (ImportedName::Named(imported), Some(target)) => self.resolve_export(&target, imported),
            (ImportedName::Default, Some(target)) => self.resolve_export(&target, "default"),
            (ImportedName::Named(imported), None) => Some(ResolvedSymbol::External {
                module: import.module.clone(),
                name: imported.clone(),
            }),
            (ImportedName::Default, None) => Some(ResolvedSymbol::External {
                module: import.module.clone(),
                name: "default".to_string(),
            }),
            (ImportedName::Namespace, None) => Some(ResolvedSymbol::External {
                module: import.module.clone(),
                name: "*".to_string(),
            }),
        }
    }

    /// Resolve `name` as exported from `file`.
    fn resolve_export(&self, file: &str, name: &str) -> Option<ResolvedSymbol> {
        let mut visited = HashSet::new();
        resolve_export_inner(self, file, name, &mut visited)
    }

    /// Resolve a possibly qualified name such as `i1.FooDir`.
    fn resolve_entity_name(&self, name: &str, file: &str) -> Option<ResolvedSymbol> {
        let mut segments = name.split('.');
        let mut current = self.get_declaration_of_identifier(segments.next()?, file)?;
        for segment in segments {
            current = match current {
                ResolvedSymbol::Namespace(target) => self.resolve_export(&target, segment)?,
                ResolvedSymbol::External { module, name } => ResolvedSymbol::External {
                    module,
                    name: if name == "*" {
                        segment.to_string()
                    } else {
                        format!("{}.{}", name, segment)
                    },
                },
                ResolvedSymbol::Declaration(_) => return None,
            };
        }
        Some(current)
    }
}

fn resolve_export_inner<C: TypeCheckingContext + ?Sized>(
    cx: &C,
    file: &str,
    name: &str,
    visited: &mut HashSet<String>,
) -> Option<ResolvedSymbol> {
    if !visited.insert(file.to_string()) {
        return None;
    }
    let sf = cx.source_file(file)?;
    for entry in &sf.exports {
        match entry {
            ExportEntry::Local { exported, local } if exported == name => {
                return cx.get_declaration_of_identifier(local, file);
            }
            ExportEntry::Reexport {
                exported,
                name: original,
                module,
            } if exported == name => {
                return match cx.resolve_module(file, module) {
                    Some(target) => resolve_export_inner(cx, &target, original, visited),
                    None => Some(ResolvedSymbol::External {
                        module: module.clone(),
                        name: original.clone(),
                    }),
                };
            }
            _ => {}
        }
    }
    for entry in &sf.exports {
        if let ExportEntry::Star { module } = entry {
            if let Some(target) = cx.resolve_module(file, module) {
                if let Some(found) = resolve_export_inner(cx, &target, name, visited) {
                    return Some(found);
                }
            }
        }
    }
    None
}

impl TypeCheckingContext for Program {
    fn source_files(&self) -> Vec<&SourceFile> {
        self.files().collect()
    }

    fn source_file(&self, path: &str) -> Option<&SourceFile> {
        self.file(path)
    }

    fn declaration(&self, id: DeclarationId) -> &Declaration {
        Program::declaration(self, id)
    }

    fn resolve_module(&self, from: &str, specifier: &str) -> Option<String> {
        Program::resolve_module(self, from, specifier)
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        Program::diagnostics(self)
    }
}
