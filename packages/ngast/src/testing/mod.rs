//! Helpers for building workspaces over in-memory sources in tests.
//!
//! Everything here panics on setup failures so that tests can stay focused on
//! the behavior they check.

use crate::annotations::common::HandlerContext;
use crate::diagnostics::NgastResult;
use crate::logging::{Logger, NullLogger};
use crate::toolkit::{NgastOptions, Workspace};
use std::rc::Rc;
use ts::{DeclarationId, InMemoryHost, Program};

pub use crate::resource::InMemoryResourceResolver;

pub fn host_of(sources: &[(&str, &str)]) -> InMemoryHost {
    let mut host = InMemoryHost::new();
    for (path, content) in sources {
        host.add(path, content);
    }
    host
}

/// A workspace whose root files are exactly `sources`, rooted at `/`.
pub fn make_workspace(sources: &[(&str, &str)]) -> Workspace {
    make_workspace_with(sources, InMemoryResourceResolver::new(), NgastOptions::default())
        .expect("valid test workspace")
}

/// Like [`make_workspace`] with resources and options. `files` defaults to
/// every source path.
pub fn make_workspace_with(
    sources: &[(&str, &str)],
    resources: InMemoryResourceResolver,
    options: NgastOptions,
) -> NgastResult<Workspace> {
    make_workspace_logged(sources, resources, options, Rc::new(NullLogger::new()))
}

pub fn make_workspace_logged(
    sources: &[(&str, &str)],
    resources: InMemoryResourceResolver,
    mut options: NgastOptions,
    logger: Rc<dyn Logger>,
) -> NgastResult<Workspace> {
    if options.files.is_empty() && options.include.is_empty() {
        options.files = sources.iter().map(|(path, _)| path.to_string()).collect();
    }
    if options.root_dir.is_none() {
        options.root_dir = Some("/".to_string());
    }
    Workspace::with_logger(options, Rc::new(host_of(sources)), Rc::new(resources), logger)
}

pub fn make_handler_context(sources: &[(&str, &str)]) -> Rc<HandlerContext> {
    make_handler_context_with(sources, false)
}

pub fn make_handler_context_with(sources: &[(&str, &str)], strict_injection_parameters: bool) -> Rc<HandlerContext> {
    let options = NgastOptions {
        strict_injection_parameters,
        ..NgastOptions::default()
    };
    make_workspace_with(sources, InMemoryResourceResolver::new(), options)
        .and_then(|workspace| workspace.container().handler_context())
        .expect("handler context")
}

/// The first class named `name`.
pub fn find_class(program: &Program, name: &str) -> DeclarationId {
    program
        .declarations()
        .iter()
        .find(|decl| decl.name == name && decl.as_class().is_some())
        .map(|decl| decl.id)
        .unwrap_or_else(|| panic!("no class named '{}'", name))
}
