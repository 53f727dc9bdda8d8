// Lazy Route Discovery
//
// Follows `loadChildren` of the routes a module registers through
// `RouterModule.forRoot` / `RouterModule.forChild` to the modules they load.

use crate::diagnostics::{NgastError, NgastResult};
use crate::logging::Logger;
use crate::partial_evaluator::{DynamicReason, DynamicValue, PartialEvaluator, ResolvedValue};
use crate::toolkit::ToolkitContainer;
use crate::transform::TraitCompiler;
use indexmap::IndexSet;
use serde::Serialize;
use std::rc::Rc;
use ts::{ArrayElement, DeclarationId, Expression, ExpressionKind, Program, ResolvedSymbol, TypeCheckingContext};

const ROUTER_ENTRY_POINTS: [&str; 2] = ["RouterModule.forRoot", "RouterModule.forChild"];
const ROUTER_PACKAGE: &str = "@angular/router";
const LOAD_CHILDREN: &str = "loadChildren";
const CHILDREN: &str = "children";
const PATH: &str = "path";

/// A module loaded through a route's `loadChildren`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LazyRoute {
    pub path: String,
    pub module_name: String,
    pub module_file: String,
    #[serde(skip)]
    pub module: DeclarationId,
    /// Name of the module whose routes declared this one.
    pub parent: String,
}

pub struct LazyRouteDiscovery {
    program: Rc<Program>,
    evaluator: Rc<PartialEvaluator>,
    compiler: Rc<TraitCompiler>,
    logger: Rc<dyn Logger>,
    /// Files of every module discovered so far.
    seen: IndexSet<String>,
    /// Modules on the current discovery path.
    stack: Vec<(DeclarationId, String)>,
    routes: Vec<LazyRoute>,
}

impl LazyRouteDiscovery {
    pub fn new(container: &ToolkitContainer) -> NgastResult<Self> {
        Ok(Self {
            program: container.program()?,
            evaluator: container.evaluator()?,
            compiler: container.trait_compiler()?,
            logger: container.logger(),
            seen: IndexSet::new(),
            stack: Vec::new(),
            routes: Vec::new(),
        })
    }

    /// Lazy routes reachable from `module`, depth first. Each module file is
    /// reported once; loading a module already on the current path is a
    /// `LazyRouteCycle`.
    pub fn discover(mut self, module: DeclarationId) -> NgastResult<Vec<LazyRoute>> {
        let decl = self.program.declaration(module);
        self.seen.insert(decl.file.clone());
        self.stack.push((module, decl.name.clone()));
        self.visit_module(module)?;
        self.stack.pop();
        Ok(self.routes)
    }

    fn visit_module(&mut self, module: DeclarationId) -> NgastResult<()> {
        let analysis = match self.compiler.analysis_of(module) {
            Ok(Some(analysis)) => analysis,
            Ok(None) => return Ok(()),
            Err(error @ NgastError::Analysis { .. }) => {
                self.logger.warn(&format!("not following routes of errored module: {}", error));
                return Ok(());
            }
            Err(error) => return Err(error),
        };
        let Some(imports) = analysis.as_ng_module().and_then(|module| module.raw_imports.clone()) else {
            return Ok(());
        };

        let value = self.evaluator.evaluate(&imports.node, &imports.file);
        let mut calls = Vec::new();
        collect_router_calls(&value, &mut calls);
        for (argument, file) in calls {
            let routes = self.evaluator.evaluate(&argument, &file);
            self.visit_routes(&routes, &file)?;
        }
        Ok(())
    }

    fn visit_routes(&mut self, routes: &ResolvedValue, file: &str) -> NgastResult<()> {
        match routes {
            ResolvedValue::Array(items) => {
                for item in items {
                    self.visit_routes(item, file)?;
                }
            }
            ResolvedValue::Map(_) => {
                let path = routes.get(PATH).and_then(ResolvedValue::as_str).unwrap_or_default();
                if let Some(load) = routes.get(LOAD_CHILDREN) {
                    self.follow(path, load, file)?;
                }
                if let Some(children) = routes.get(CHILDREN) {
                    self.visit_routes(children, file)?;
                }
            }
            other => self
                .logger
                .debug(&format!("ignoring route entry of type {} in {}", other.type_name(), file)),
        }
        Ok(())
    }

    fn follow(&mut self, path: &str, load: &ResolvedValue, file: &str) -> NgastResult<()> {
        let target = match load {
            ResolvedValue::String(legacy) => parse_legacy_target(legacy).map(|(specifier, name)| (specifier, name, file.to_string())),
            ResolvedValue::Dynamic(dynamic) if dynamic.reason == DynamicReason::FunctionValue => {
                parse_import_target(&dynamic.node).map(|(specifier, name)| (specifier, name, dynamic.file.clone()))
            }
            _ => None,
        };
        let Some((specifier, export, from)) = target else {
            self.logger
                .debug(&format!("route '{}' in {}: unsupported loadChildren", path, file));
            return Ok(());
        };

        let Some(module_file) = self.program.resolve_module(&from, &specifier) else {
            self.logger
                .debug(&format!("route '{}': cannot resolve '{}' from {}", path, specifier, from));
            return Ok(());
        };
        let Some(ResolvedSymbol::Declaration(module)) = self.program.resolve_export(&module_file, &export) else {
            self.logger
                .debug(&format!("route '{}': '{}' is not exported by {}", path, export, module_file));
            return Ok(());
        };
        let decl = self.program.declaration(module);

        if let Some(start) = self.stack.iter().position(|(node, _)| *node == module) {
            let mut trail: Vec<String> = self.stack[start..].iter().map(|(_, name)| name.clone()).collect();
            trail.push(decl.name.clone());
            return Err(NgastError::LazyRouteCycle { trail });
        }
        if !self.seen.insert(decl.file.clone()) {
            self.logger
                .info(&format!("route '{}': {} already discovered", path, decl.file));
            return Ok(());
        }

        let parent = self.stack.last().map(|(_, name)| name.clone()).unwrap_or_default();
        self.logger
            .info(&format!("route '{}': {} loads {} ({})", path, parent, decl.name, decl.file));
        self.routes.push(LazyRoute {
            path: path.to_string(),
            module_name: decl.name.clone(),
            module_file: decl.file.clone(),
            module,
            parent,
        });

        self.stack.push((module, decl.name.clone()));
        let result = self.visit_module(module);
        self.stack.pop();
        result
    }
}

/// First argument and file of every `RouterModule.forRoot(...)` or
/// `RouterModule.forChild(...)` call in an evaluated imports list.
fn collect_router_calls(value: &ResolvedValue, out: &mut Vec<(Expression, String)>) {
    match value {
        ResolvedValue::Array(items) => {
            for item in items {
                collect_router_calls(item, out);
            }
        }
        ResolvedValue::Dynamic(dynamic) => {
            if let Some(call) = router_call(dynamic) {
                out.push(call);
            }
        }
        _ => {}
    }
}

/// The router call that made `dynamic` unresolvable, with its first argument.
fn router_call(dynamic: &DynamicValue) -> Option<(Expression, String)> {
    let call = router_call_site(dynamic)?;
    match &call.node.kind {
        ExpressionKind::Call { arguments, .. } => match arguments.first() {
            Some(ArrayElement::Expression(argument)) => Some((argument.clone(), call.file.clone())),
            _ => None,
        },
        _ => None,
    }
}

/// With the router typings in the program the call itself is the root cause,
/// a bodiless static method declared in the router package. Without them the
/// call sits just above an external `RouterModule.*` name in the chain.
fn router_call_site(dynamic: &DynamicValue) -> Option<&DynamicValue> {
    match &dynamic.reason {
        DynamicReason::DeclaredCall { name, file } => {
            (ROUTER_ENTRY_POINTS.contains(&name.as_str()) && file.contains(ROUTER_PACKAGE)).then_some(dynamic)
        }
        DynamicReason::DynamicInput(inner) => match &inner.reason {
            DynamicReason::External { name, .. } => ROUTER_ENTRY_POINTS.contains(&name.as_str()).then_some(dynamic),
            _ => router_call_site(inner),
        },
        _ => None,
    }
}

/// `'./path/to/module#ExportName'`
pub(crate) fn parse_legacy_target(value: &str) -> Option<(String, String)> {
    let (specifier, export) = value.split_once('#')?;
    if specifier.is_empty() || export.is_empty() {
        return None;
    }
    Some((specifier.to_string(), export.to_string()))
}

/// `() => import('./path').then(m => m.ExportName)`
fn parse_import_target(node: &Expression) -> Option<(String, String)> {
    let ExpressionKind::Function { body: Some(body), .. } = &node.kind else {
        return None;
    };
    let ExpressionKind::Call { callee, arguments } = &body.kind else {
        return None;
    };
    let ExpressionKind::PropertyAccess { object, property } = &callee.kind else {
        return None;
    };
    let ExpressionKind::DynamicImport(specifier) = &object.kind else {
        return None;
    };
    if property != "then" {
        return None;
    }
    let specifier = specifier.as_string_literal()?;

    let [ArrayElement::Expression(callback)] = arguments.as_slice() else {
        return None;
    };
    let ExpressionKind::Function {
        params,
        body: Some(selected),
    } = &callback.kind
    else {
        return None;
    };
    let ExpressionKind::PropertyAccess { object, property } = &selected.kind else {
        return None;
    };
    match (params.as_slice(), object.as_identifier()) {
        ([param], Some(receiver)) if param == receiver => Some((specifier.to_string(), property.clone())),
        _ => None,
    }
}
