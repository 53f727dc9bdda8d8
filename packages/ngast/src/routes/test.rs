use super::*;
use crate::routes::src::lazy_routes::parse_legacy_target;
use crate::diagnostics::NgastError;
use crate::logging::{CapturingLogger, LogLevel};
use crate::testing::{make_workspace, make_workspace_logged, InMemoryResourceResolver};
use crate::toolkit::{NgastOptions, Workspace};
use std::rc::Rc;

const APP_MODULE: &str = "import { NgModule } from '@angular/core';
     import { RouterModule } from '@angular/router';
     const routes = [
       { path: 'admin', loadChildren: () => import('./admin/admin.module').then(m => m.AdminModule) },
       { path: 'legacy', loadChildren: './legacy/legacy.module#LegacyModule' },
       { path: 'shell', children: [
         { path: 'inner', loadChildren: () => import('./inner/inner.module').then(m => m.InnerModule) },
       ] },
     ];
     @NgModule({ imports: [RouterModule.forRoot(routes)] })
     export class AppModule {}";

const ADMIN_MODULE: &str = "import { NgModule } from '@angular/core';
     import { RouterModule } from '@angular/router';
     @NgModule({
       imports: [RouterModule.forChild([
         { path: 'users', loadChildren: () => import('../inner/inner.module').then(m => m.InnerModule) },
       ])],
     })
     export class AdminModule {}";

const CORE_TYPINGS: &str = "export declare const NgModule: any;";

const ROUTER_TYPINGS: &str = "export declare class RouterModule {
       static forRoot(routes: any[]): any;
       static forChild(routes: any[]): any;
     }";

fn sources() -> Vec<(&'static str, &'static str)> {
    vec![
        ("/app/app.module.ts", APP_MODULE),
        ("/app/admin/admin.module.ts", ADMIN_MODULE),
        (
            "/app/legacy/legacy.module.ts",
            "import { NgModule } from '@angular/core';
             @NgModule({}) export class LegacyModule {}",
        ),
        (
            "/app/inner/inner.module.ts",
            "import { NgModule } from '@angular/core';
             @NgModule({}) export class InnerModule {}",
        ),
    ]
}

fn lazy_routes(workspace: &Workspace, module: &str) -> Result<Vec<LazyRoute>, NgastError> {
    let symbol = workspace.get_symbol_by_name(module)?.expect("module symbol");
    symbol.as_module().expect("module").get_lazy_routes()
}

#[test]
fn should_follow_load_children_depth_first() -> anyhow::Result<()> {
    let workspace = make_workspace(&sources());
    let routes = lazy_routes(&workspace, "AppModule")?;
    let found: Vec<(&str, &str, &str)> = routes
        .iter()
        .map(|route| (route.path.as_str(), route.module_name.as_str(), route.parent.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("admin", "AdminModule", "AppModule"),
            ("users", "InnerModule", "AdminModule"),
            ("legacy", "LegacyModule", "AppModule"),
        ]
    );
    assert_eq!(routes[2].module_file, "/app/legacy/legacy.module.ts");
    Ok(())
}

#[test]
fn should_follow_routes_with_router_typings_in_the_program() -> anyhow::Result<()> {
    let mut sources = sources();
    sources.push(("/node_modules/@angular/core/index.d.ts", CORE_TYPINGS));
    sources.push(("/node_modules/@angular/router/index.d.ts", ROUTER_TYPINGS));
    let workspace = make_workspace(&sources);
    let names: Vec<String> = lazy_routes(&workspace, "AppModule")?
        .into_iter()
        .map(|route| route.module_name)
        .collect();
    assert_eq!(names, vec!["AdminModule", "InnerModule", "LegacyModule"]);
    Ok(())
}

#[test]
fn should_ignore_look_alike_router_modules() -> anyhow::Result<()> {
    let workspace = make_workspace(&[
        (
            "/app/app.module.ts",
            "import { NgModule } from '@angular/core';
             import { RouterModule } from './fake-router';
             @NgModule({ imports: [RouterModule.forRoot([
               { path: 'inner', loadChildren: () => import('./inner.module').then(m => m.InnerModule) },
             ])] })
             export class AppModule {}",
        ),
        ("/app/fake-router.ts", "export declare class RouterModule { static forRoot(routes: any[]): any; }"),
        (
            "/app/inner.module.ts",
            "import { NgModule } from '@angular/core';
             @NgModule({}) export class InnerModule {}",
        ),
    ]);
    assert!(lazy_routes(&workspace, "AppModule")?.is_empty());
    Ok(())
}

#[test]
fn should_report_each_module_file_once() -> anyhow::Result<()> {
    let logger = Rc::new(CapturingLogger::new(LogLevel::Info));
    let workspace = make_workspace_logged(
        &sources(),
        InMemoryResourceResolver::new(),
        NgastOptions::default(),
        logger.clone(),
    )?;
    let routes = lazy_routes(&workspace, "AppModule")?;
    assert_eq!(routes.iter().filter(|route| route.module_name == "InnerModule").count(), 1);
    assert!(logger.contains("route 'inner': /app/inner/inner.module.ts already discovered"));
    Ok(())
}

#[test]
fn should_fail_on_cyclic_lazy_routes() {
    let workspace = make_workspace(&[
        (
            "/app/a.module.ts",
            "import { NgModule } from '@angular/core';
             import { RouterModule } from '@angular/router';
             @NgModule({ imports: [RouterModule.forRoot([
               { path: 'b', loadChildren: () => import('./b.module').then(m => m.BModule) },
             ])] })
             export class AModule {}",
        ),
        (
            "/app/b.module.ts",
            "import { NgModule } from '@angular/core';
             import { RouterModule } from '@angular/router';
             @NgModule({ imports: [RouterModule.forChild([
               { path: 'a', loadChildren: './a.module#AModule' },
             ])] })
             export class BModule {}",
        ),
    ]);
    match lazy_routes(&workspace, "AModule") {
        Err(NgastError::LazyRouteCycle { trail }) => assert_eq!(trail, vec!["AModule", "BModule", "AModule"]),
        other => panic!("expected a lazy route cycle, got {:?}", other),
    }
}

#[test]
fn should_ignore_unresolvable_targets() -> anyhow::Result<()> {
    let workspace = make_workspace(&[(
        "/app/app.module.ts",
        "import { NgModule } from '@angular/core';
         import { RouterModule } from '@angular/router';
         const load = () => fetchModule();
         @NgModule({ imports: [RouterModule.forRoot([
           { path: 'missing', loadChildren: () => import('./missing').then(m => m.Missing) },
           { path: 'no-export', loadChildren: './app.module#Nope' },
           { path: 'custom', loadChildren: load },
           { path: 'plain' },
         ])] })
         export class AppModule {}",
    )]);
    assert!(lazy_routes(&workspace, "AppModule")?.is_empty());
    Ok(())
}

#[test]
fn should_parse_load_children_forms() {
    assert_eq!(
        parse_legacy_target("./lazy/lazy.module#LazyModule"),
        Some(("./lazy/lazy.module".to_string(), "LazyModule".to_string()))
    );
    assert_eq!(parse_legacy_target("./lazy/lazy.module"), None);
    assert_eq!(parse_legacy_target("#LazyModule"), None);
}
