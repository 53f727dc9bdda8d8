use super::*;
use crate::partial_evaluator::Reference;
use crate::transform::AnnotationKind;
use std::rc::Rc;
use ts::{DeclarationId, Program, TypeCheckingContext};

const LIB_DTS: &str = "import * as i0 from '@angular/core';\n\
    import * as i1 from './button';\n\
    export declare class ButtonModule {\n\
      static ɵmod: i0.ɵɵNgModuleDeclaration<ButtonModule, [typeof i1.ButtonComponent], never, [typeof i1.ButtonComponent, typeof i1.UpperPipe]>;\n\
    }\n";

const BUTTON_DTS: &str = "import * as i0 from '@angular/core';\n\
    export declare class ButtonComponent {\n\
      static ɵcmp: i0.ɵɵComponentDeclaration<ButtonComponent, \"lib-button\", [\"button\"], {}, {}, never, never, false, never>;\n\
    }\n\
    export declare class UpperPipe {\n\
      static ɵpipe: i0.ɵɵPipeDeclaration<UpperPipe, \"upper\", true>;\n\
    }\n\
    export declare class Plain {}\n";

fn program() -> Rc<Program> {
    Rc::new(
        Program::from_sources([
            ("/lib/index.d.ts", LIB_DTS),
            ("/lib/button.d.ts", BUTTON_DTS),
            ("/app/local.ts", "export class Local {}"),
        ])
        .expect("program"),
    )
}

fn id_of(program: &Program, file: &str, name: &str) -> DeclarationId {
    program
        .get_declarations(file)
        .into_iter()
        .find(|id| program.declaration(*id).name == name)
        .expect("declaration")
}

fn reference(program: &Program, file: &str, name: &str) -> Reference {
    let id = id_of(program, file, name);
    Reference {
        id,
        name: name.to_string(),
        file: file.to_string(),
    }
}

#[test]
fn should_read_component_markers() {
    let program = program();
    let reader = DtsMetadataReader::new(program.clone());
    let button = id_of(&program, "/lib/button.d.ts", "ButtonComponent");

    let meta = reader.get_directive_metadata(button).expect("component metadata");
    assert!(meta.is_component);
    assert!(!meta.is_standalone);
    assert_eq!(meta.selector.as_deref(), Some("lib-button"));
    assert_eq!(meta.export_as, Some(vec!["button".to_string()]));
    assert!(reader.get_pipe_metadata(button).is_none());
}

#[test]
fn should_read_pipe_markers_with_standalone_flag() {
    let program = program();
    let reader = DtsMetadataReader::new(program.clone());
    let pipe = reader
        .get_pipe_metadata(id_of(&program, "/lib/button.d.ts", "UpperPipe"))
        .expect("pipe metadata");
    assert_eq!(pipe.name, "upper");
    assert!(pipe.is_standalone);
}

#[test]
fn should_resolve_module_tuples_through_namespace_imports() {
    let program = program();
    let reader = DtsMetadataReader::new(program.clone());
    let module = reader
        .get_ng_module_metadata(id_of(&program, "/lib/index.d.ts", "ButtonModule"))
        .expect("module metadata");
    let exports: Vec<&str> = module.exports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(exports, vec!["ButtonComponent", "UpperPipe"]);
    assert!(module.imports.is_empty());
    assert_eq!(module.declarations.len(), 1);
}

#[test]
fn should_detect_marker_kinds() {
    let program = program();
    let kind_of = |name: &str| {
        let id = id_of(&program, "/lib/button.d.ts", name);
        read_marker_kind(program.declaration(id).as_class().expect("class"))
    };
    assert_eq!(kind_of("ButtonComponent"), Some(AnnotationKind::Component));
    assert_eq!(kind_of("UpperPipe"), Some(AnnotationKind::Pipe));
    assert_eq!(kind_of("Plain"), None);
}

#[test]
fn should_ignore_classes_outside_declaration_files() {
    let program = program();
    let reader = DtsMetadataReader::new(program.clone());
    assert!(reader
        .get_directive_metadata(id_of(&program, "/app/local.ts", "Local"))
        .is_none());
}

#[test]
fn should_index_local_registrations_by_file_and_module() {
    let program = program();
    let registry = LocalMetadataRegistry::new();
    let local = reference(&program, "/app/local.ts", "Local");
    let button = reference(&program, "/lib/button.d.ts", "ButtonComponent");

    registry.register_directive_metadata(DirectiveMeta {
        reference: local.clone(),
        selector: Some("app-local".to_string()),
        export_as: None,
        inputs: vec![],
        outputs: vec![],
        is_component: true,
        is_standalone: false,
        imports: vec![],
    });
    registry.register_ng_module_metadata(NgModuleMeta {
        reference: button.clone(),
        declarations: vec![local.clone()],
        imports: vec![],
        exports: vec![],
    });

    assert_eq!(
        registry.declarations_in_file("/app/local.ts", Some(AnnotationKind::Component)),
        vec![local.id]
    );
    assert!(registry
        .declarations_in_file("/app/local.ts", Some(AnnotationKind::Pipe))
        .is_empty());
    assert_eq!(registry.get_declaring_modules(local.id), vec![button.id]);
}

#[test]
fn should_prefer_the_first_reader_in_a_compound() {
    let program = program();
    let local = Rc::new(LocalMetadataRegistry::new());
    let dts = Rc::new(DtsMetadataReader::new(program.clone()));
    let pipe_ref = reference(&program, "/lib/button.d.ts", "UpperPipe");
    local.register_pipe_metadata(PipeMeta {
        reference: pipe_ref.clone(),
        name: "shadowed".to_string(),
        is_standalone: false,
    });

    let compound = CompoundMetadataReader::new(vec![local as Rc<dyn MetadataReader>, dts]);
    assert_eq!(compound.get_pipe_metadata(pipe_ref.id).expect("pipe").name, "shadowed");
    let button = id_of(&program, "/lib/button.d.ts", "ButtonComponent");
    assert!(compound.get_directive_metadata(button).is_some());
}
