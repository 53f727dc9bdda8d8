use super::*;
use crate::logging::NullLogger;
use crate::metadata::{DirectiveMeta, LocalMetadataRegistry, MetadataReader, MetadataRegistry, NgModuleMeta, PipeMeta};
use crate::partial_evaluator::Reference;
use std::rc::Rc;
use ts::DeclarationId;

fn reference(id: u32, name: &str) -> Reference {
    Reference {
        id: DeclarationId(id),
        name: name.to_string(),
        file: "/app/test.ts".to_string(),
    }
}

fn directive(id: u32, name: &str, selector: &str) -> DirectiveMeta {
    DirectiveMeta {
        reference: reference(id, name),
        selector: Some(selector.to_string()),
        export_as: None,
        inputs: Vec::new(),
        outputs: Vec::new(),
        is_component: false,
        is_standalone: false,
        imports: Vec::new(),
    }
}

fn component(id: u32, name: &str, selector: &str) -> DirectiveMeta {
    DirectiveMeta {
        is_component: true,
        ..directive(id, name, selector)
    }
}

fn module(id: u32, name: &str, declarations: &[Reference], imports: &[Reference], exports: &[Reference]) -> NgModuleMeta {
    NgModuleMeta {
        reference: reference(id, name),
        declarations: declarations.to_vec(),
        imports: imports.to_vec(),
        exports: exports.to_vec(),
    }
}

fn reader(local: &Rc<LocalMetadataRegistry>) -> ComponentScopeReader {
    let modules = Rc::new(LocalModuleScopeRegistry::new(
        local.clone() as Rc<dyn MetadataReader>,
        Rc::new(NullLogger::new()),
    ));
    ComponentScopeReader::new(local.clone(), modules)
}

fn selectors(scope: &ModuleScope) -> Vec<String> {
    scope.directives.iter().filter_map(|d| d.selector.clone()).collect()
}

#[test]
fn should_include_own_declarations_and_imported_exports() {
    let local = Rc::new(LocalMetadataRegistry::new());
    local.register_directive_metadata(component(0, "AppCmp", "app-root"));
    local.register_directive_metadata(directive(1, "FooDir", "[foo]"));
    local.register_directive_metadata(directive(2, "HiddenDir", "[hidden-dir]"));
    local.register_pipe_metadata(PipeMeta {
        reference: reference(3, "UpperPipe"),
        name: "upper".to_string(),
        is_standalone: false,
    });
    local.register_ng_module_metadata(module(
        10,
        "SharedModule",
        &[reference(1, "FooDir"), reference(2, "HiddenDir"), reference(3, "UpperPipe")],
        &[],
        &[reference(1, "FooDir"), reference(3, "UpperPipe")],
    ));
    local.register_ng_module_metadata(module(11, "AppModule", &[reference(0, "AppCmp")], &[reference(10, "SharedModule")], &[]));

    let scope = reader(&local)
        .get_scope_for_component(DeclarationId(0))
        .expect("scope");
    assert_eq!(selectors(&scope), vec!["app-root", "[foo]"]);
    assert_eq!(scope.pipes.len(), 1);
    assert_eq!(scope.pipes[0].name, "upper");
}

#[test]
fn should_not_depend_on_import_order_for_membership() {
    let build = |imports: &[Reference]| {
        let local = Rc::new(LocalMetadataRegistry::new());
        local.register_directive_metadata(component(0, "AppCmp", "app-root"));
        local.register_directive_metadata(directive(1, "ADir", "[a]"));
        local.register_directive_metadata(directive(2, "BDir", "[b]"));
        local.register_ng_module_metadata(module(10, "AModule", &[reference(1, "ADir")], &[], &[reference(1, "ADir")]));
        local.register_ng_module_metadata(module(
            11,
            "BModule",
            &[reference(2, "BDir")],
            &[reference(10, "AModule")],
            &[reference(2, "BDir"), reference(10, "AModule")],
        ));
        local.register_ng_module_metadata(module(12, "AppModule", &[reference(0, "AppCmp")], imports, &[]));
        let scope = reader(&local).get_scope_for_component(DeclarationId(0)).expect("scope");
        let mut found = selectors(&scope);
        found.sort();
        (found, scope.directives.len())
    };

    let forward = build(&[reference(10, "AModule"), reference(11, "BModule")]);
    let backward = build(&[reference(11, "BModule"), reference(10, "AModule")]);
    assert_eq!(forward, backward);
    assert_eq!(forward.1, 3);
}

#[test]
fn should_return_none_for_orphan_components() {
    let local = Rc::new(LocalMetadataRegistry::new());
    local.register_directive_metadata(component(0, "Orphan", "orphan"));
    let reader = reader(&local);
    assert!(reader.get_scope_for_component(DeclarationId(0)).is_none());
    assert!(reader.get_owning_module(DeclarationId(0)).is_none());
}

#[test]
fn should_build_standalone_scopes_from_imports() {
    let local = Rc::new(LocalMetadataRegistry::new());
    local.register_directive_metadata(DirectiveMeta {
        is_standalone: true,
        imports: vec![reference(1, "StandaloneDir"), reference(2, "NotStandalone"), reference(10, "LibModule")],
        ..component(0, "Standalone", "app-standalone")
    });
    local.register_directive_metadata(DirectiveMeta {
        is_standalone: true,
        ..directive(1, "StandaloneDir", "[sa]")
    });
    local.register_directive_metadata(directive(2, "NotStandalone", "[ns]"));
    local.register_directive_metadata(directive(3, "LibDir", "[lib]"));
    local.register_ng_module_metadata(module(10, "LibModule", &[reference(3, "LibDir")], &[], &[reference(3, "LibDir")]));

    let scope = reader(&local).get_scope_for_component(DeclarationId(0)).expect("scope");
    assert_eq!(selectors(&scope), vec!["app-standalone", "[sa]", "[lib]"]);
}

#[test]
fn should_survive_cyclic_re_exports() {
    let local = Rc::new(LocalMetadataRegistry::new());
    local.register_directive_metadata(directive(1, "ADir", "[a]"));
    local.register_ng_module_metadata(module(
        10,
        "AModule",
        &[reference(1, "ADir")],
        &[],
        &[reference(1, "ADir"), reference(11, "BModule")],
    ));
    local.register_ng_module_metadata(module(11, "BModule", &[], &[], &[reference(10, "AModule")]));

    let modules = LocalModuleScopeRegistry::new(local.clone(), Rc::new(NullLogger::new()));
    let exported = modules.get_export_scope_of_module(DeclarationId(11)).expect("export scope");
    assert_eq!(selectors(&exported), vec!["[a]"]);
}

#[test]
fn should_not_depend_on_query_order_through_re_export_cycles() {
    let local = Rc::new(LocalMetadataRegistry::new());
    local.register_directive_metadata(directive(1, "ADir", "[a]"));
    local.register_directive_metadata(directive(2, "BDir", "[b]"));
    local.register_ng_module_metadata(module(
        10,
        "AModule",
        &[reference(1, "ADir")],
        &[],
        &[reference(1, "ADir"), reference(11, "BModule")],
    ));
    local.register_ng_module_metadata(module(
        11,
        "BModule",
        &[reference(2, "BDir")],
        &[],
        &[reference(2, "BDir"), reference(10, "AModule")],
    ));
    local.register_ng_module_metadata(module(12, "XModule", &[], &[reference(11, "BModule")], &[]));

    let sorted = |scope: &ModuleScope| {
        let mut all = selectors(scope);
        all.sort();
        all
    };

    let a_first = LocalModuleScopeRegistry::new(local.clone(), Rc::new(NullLogger::new()));
    a_first.get_export_scope_of_module(DeclarationId(10)).expect("export scope");
    let via_a = a_first.get_scope_of_module(DeclarationId(12)).expect("scope");

    let x_first = LocalModuleScopeRegistry::new(local.clone(), Rc::new(NullLogger::new()));
    let via_x = x_first.get_scope_of_module(DeclarationId(12)).expect("scope");

    assert_eq!(sorted(&via_a), vec!["[a]", "[b]"]);
    assert_eq!(sorted(&via_a), sorted(&via_x));
    let b_after_a = a_first.get_export_scope_of_module(DeclarationId(11)).expect("export scope");
    assert_eq!(sorted(&b_after_a), vec!["[a]", "[b]"]);
}

#[test]
fn should_pick_the_first_declaring_module_as_owner() {
    let local = Rc::new(LocalMetadataRegistry::new());
    local.register_directive_metadata(component(0, "Shared", "shared"));
    local.register_ng_module_metadata(module(12, "Second", &[reference(0, "Shared")], &[], &[]));
    local.register_ng_module_metadata(module(11, "First", &[reference(0, "Shared")], &[], &[]));
    assert_eq!(reader(&local).get_owning_module(DeclarationId(0)), Some(DeclarationId(11)));
}
