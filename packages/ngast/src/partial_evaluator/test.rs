// Partial Evaluator Tests

#[cfg(test)]
mod tests {
    use crate::incremental::{DependencyTracker, FileDependencyGraph};
    use crate::partial_evaluator::*;
    use std::rc::Rc;
    use ts::{Program, TypeCheckingContext};

    struct Fixture {
        program: Rc<Program>,
        graph: Rc<FileDependencyGraph>,
        evaluator: PartialEvaluator,
    }

    fn fixture(sources: &[(&str, &str)], max_depth: usize) -> Fixture {
        let program = Rc::new(Program::from_sources(sources.iter().copied()).expect("program"));
        let graph = Rc::new(FileDependencyGraph::new());
        let evaluator = PartialEvaluator::new(program.clone(), graph.clone(), max_depth);
        Fixture {
            program,
            graph,
            evaluator,
        }
    }

    impl Fixture {
        fn value_of(&self, file: &str, name: &str) -> ResolvedValue {
            let id = self
                .program
                .get_declarations(file)
                .into_iter()
                .find(|id| self.program.declaration(*id).name == name)
                .expect("declaration");
            self.evaluator.evaluate_declaration(id)
        }
    }

    fn evaluate(source: &str, name: &str) -> ResolvedValue {
        fixture(&[("/app/test.ts", source)], 64).value_of("/app/test.ts", name)
    }

    mod literal_tests {
        use super::*;

        #[test]
        fn should_evaluate_primitives() {
            assert_eq!(evaluate("const a = 'x';", "a"), ResolvedValue::String("x".into()));
            assert_eq!(evaluate("const a = 42;", "a"), ResolvedValue::Number(42.0));
            assert_eq!(evaluate("const a = true;", "a"), ResolvedValue::Boolean(true));
            assert_eq!(evaluate("const a = null;", "a"), ResolvedValue::Null);
            assert_eq!(evaluate("const a = undefined;", "a"), ResolvedValue::Undefined);
        }

        #[test]
        fn should_keep_object_key_order() {
            let value = evaluate("const a = { b: 1, a: 2, ['c' + 1]: 3 };", "a");
            let keys: Vec<&str> = value.as_map().unwrap().keys().map(|k| k.as_str()).collect();
            assert_eq!(keys, vec!["b", "a", "c1"]);
        }

        #[test]
        fn should_flatten_spreads() {
            let value = evaluate("const x = [2, 3]; const a = [1, ...x, 4];", "a");
            assert_eq!(value.to_string(), "[1, 2, 3, 4]");
            let value = evaluate("const x = { b: 2 }; const a = { a: 1, ...x };", "a");
            assert_eq!(value.get("b"), Some(&ResolvedValue::Number(2.0)));
        }

        #[test]
        fn should_fold_operators_and_templates() {
            assert_eq!(evaluate("const a = 'a' + 'b' + 1;", "a"), ResolvedValue::String("ab1".into()));
            assert_eq!(evaluate("const a = 2 * 3 - 1;", "a"), ResolvedValue::Number(5.0));
            assert_eq!(
                evaluate("const n = 3; const a = `n=${n}!`;", "a"),
                ResolvedValue::String("n=3!".into())
            );
            assert_eq!(evaluate("const a = 1 < 2 ? 'y' : 'n';", "a"), ResolvedValue::String("y".into()));
            assert_eq!(evaluate("const a = null ?? 'd';", "a"), ResolvedValue::String("d".into()));
            assert_eq!(evaluate("const a = !0;", "a"), ResolvedValue::Boolean(true));
        }

        #[test]
        fn should_read_length_and_elements() {
            assert_eq!(evaluate("const x = [1, 2, 3]; const a = x.length;", "a"), ResolvedValue::Number(3.0));
            assert_eq!(evaluate("const x = ['p', 'q']; const a = x[1];", "a"), ResolvedValue::String("q".into()));
            assert_eq!(evaluate("const x = { k: 'v' }; const a = x['k'];", "a"), ResolvedValue::String("v".into()));
            assert_eq!(evaluate("const x = [1]; const a = x[5];", "a"), ResolvedValue::Undefined);
        }
    }

    mod reference_tests {
        use super::*;

        #[test]
        fn should_resolve_classes_to_references() {
            let value = evaluate("class Foo {} const a = [Foo];", "a");
            let reference = value.as_array().unwrap()[0].as_reference().unwrap();
            assert_eq!(reference.name, "Foo");
            assert_eq!(reference.file, "/app/test.ts");
        }

        #[test]
        fn should_follow_imports_and_record_dependencies() {
            let fx = fixture(
                &[
                    ("/app/a.ts", "import { B } from './b'; export const a = B;"),
                    ("/app/b.ts", "export class B {}"),
                ],
                64,
            );
            let value = fx.value_of("/app/a.ts", "a");
            assert_eq!(value.as_reference().map(|r| r.name.as_str()), Some("B"));
            assert!(fx.graph.get_dependencies("/app/a.ts").contains("/app/b.ts"));
        }

        #[test]
        fn should_resolve_namespace_members() {
            let fx = fixture(
                &[
                    ("/app/a.ts", "import * as lib from './lib'; export const a = lib.Service;"),
                    ("/app/lib.ts", "export class Service {}"),
                ],
                64,
            );
            assert_eq!(fx.value_of("/app/a.ts", "a").as_reference().map(|r| r.name.as_str()), Some("Service"));
        }

        #[test]
        fn should_treat_new_expressions_as_identity_tokens() {
            let value = evaluate("class InjectionToken {} const TOKEN = new InjectionToken('t'); const a = TOKEN;", "a");
            assert_eq!(value.as_reference().map(|r| r.name.as_str()), Some("TOKEN"));
        }

        #[test]
        fn should_accumulate_external_property_paths() {
            let value = evaluate(
                "import { ChangeDetectionStrategy } from '@angular/core'; const a = ChangeDetectionStrategy.OnPush;",
                "a",
            );
            assert_eq!(value.as_external(), Some(("@angular/core", "ChangeDetectionStrategy.OnPush")));
        }

        #[test]
        fn should_resolve_enum_members() {
            let value = evaluate("enum E { A, B = 5, C } const a = [E.A, E.B, E.C];", "a");
            assert_eq!(value.to_string(), "[0, 5, 6]");
        }

        #[test]
        fn should_read_static_properties() {
            let value = evaluate("class Cfg { static url = '/api'; } const a = Cfg.url;", "a");
            assert_eq!(value, ResolvedValue::String("/api".into()));
        }
    }

    mod call_tests {
        use super::*;

        #[test]
        fn should_unwrap_forward_ref() {
            let value = evaluate(
                "import { forwardRef } from '@angular/core'; class Late {} const a = forwardRef(() => Late);",
                "a",
            );
            assert_eq!(value.as_reference().map(|r| r.name.as_str()), Some("Late"));
        }

        #[test]
        fn should_unwrap_forward_ref_declared_in_core_typings() {
            let f = fixture(
                &[
                    (
                        "/app/test.ts",
                        "import { forwardRef } from '@angular/core'; class Late {} const a = forwardRef(() => Late);",
                    ),
                    (
                        "/node_modules/@angular/core/index.d.ts",
                        "export declare function forwardRef<T>(fn: () => T): T;",
                    ),
                ],
                64,
            );
            let value = f.value_of("/app/test.ts", "a");
            assert_eq!(value.as_reference().map(|r| r.name.as_str()), Some("Late"));
        }

        #[test]
        fn should_call_local_forward_ref_functions() {
            let value = evaluate(
                "function forwardRef(fn) { return 'local'; } class Late {} const a = forwardRef(() => Late);",
                "a",
            );
            assert_eq!(value, ResolvedValue::String("local".into()));
        }

        #[test]
        fn should_evaluate_static_methods_with_arguments() {
            let value = evaluate(
                "class Svc {} class M { static forRoot(cfg) { return { ngModule: M, providers: [Svc, cfg] }; } } \
                 const a = M.forRoot('x');",
                "a",
            );
            assert_eq!(value.get("ngModule").and_then(|v| v.as_reference()).map(|r| r.name.as_str()), Some("M"));
            assert_eq!(value.get("providers").unwrap().to_string(), "[Svc, 'x']");
        }

        #[test]
        fn should_evaluate_functions_and_arrows() {
            assert_eq!(
                evaluate("function twice(x) { return x * 2; } const a = twice(4);", "a"),
                ResolvedValue::Number(8.0)
            );
            assert_eq!(
                evaluate("const inc = (x) => x + 1; const a = inc(1);", "a"),
                ResolvedValue::Number(2.0)
            );
        }

        #[test]
        fn should_report_unknown_calls_as_dynamic() {
            let value = evaluate("declare function make(): any; const a = [make(), 1];", "a");
            let items = value.as_array().unwrap();
            assert!(items[0].is_dynamic());
            assert_eq!(items[1], ResolvedValue::Number(1.0));
        }

        #[test]
        fn should_name_callees_declared_without_a_body() {
            let value = evaluate("declare class Lib { static make(): any; } const a = Lib.make();", "a");
            let dynamic = value.as_dynamic().unwrap();
            assert_eq!(dynamic.node.kind_name(), "call expression");
            assert_eq!(
                dynamic.reason,
                DynamicReason::DeclaredCall {
                    name: "Lib.make".to_string(),
                    file: "/app/test.ts".to_string(),
                }
            );
        }

        #[test]
        fn should_keep_the_call_node_for_external_calls() {
            let value = evaluate(
                "import { RouterModule } from '@angular/router'; const a = RouterModule.forRoot([]);",
                "a",
            );
            let dynamic = value.as_dynamic().unwrap();
            assert_eq!(dynamic.node.kind_name(), "call expression");
            assert!(matches!(
                &dynamic.root_cause().reason,
                DynamicReason::External { name, .. } if name == "RouterModule.forRoot"
            ));
        }
    }

    mod dynamic_tests {
        use super::*;

        #[test]
        fn should_report_unknown_identifiers() {
            let value = evaluate("const a = missing;", "a");
            assert!(matches!(
                value.as_dynamic().map(|d| &d.reason),
                Some(DynamicReason::UnknownIdentifier(name)) if name == "missing"
            ));
        }

        #[test]
        fn should_break_self_referential_variables() {
            let value = evaluate("const a = [b]; const b = [a];", "a");
            let inner = value.as_array().unwrap()[0].as_array().unwrap();
            assert!(matches!(
                inner[0].as_dynamic().map(|d| &d.reason),
                Some(DynamicReason::CircularReference(name)) if name == "a"
            ));
        }

        #[test]
        fn should_cap_evaluation_depth() {
            let fx = fixture(&[("/app/t.ts", "const a0 = 1; const a1 = a0; const a2 = a1; const a3 = a2; const a4 = a3;")], 3);
            let value = fx.value_of("/app/t.ts", "a4");
            assert!(matches!(
                value.as_dynamic().map(|d| &d.root_cause().reason),
                Some(DynamicReason::DepthExceeded)
            ));
        }

        #[test]
        fn should_mark_dynamic_imports_and_functions() {
            let value = evaluate("const a = [() => import('./x'), import('./y')];", "a");
            let items = value.as_array().unwrap();
            assert!(matches!(items[0].as_dynamic().map(|d| &d.reason), Some(DynamicReason::FunctionValue)));
            assert!(matches!(items[1].as_dynamic().map(|d| &d.reason), Some(DynamicReason::DynamicImport)));
        }

        #[test]
        fn should_compare_tokens_by_identity() {
            let value = evaluate("class A {} class B {} const a = [A, A, B, 'k', 'k'];", "a");
            let items = value.as_array().unwrap();
            assert!(items[0].same_token(&items[1]));
            assert!(!items[0].same_token(&items[2]));
            assert!(items[3].same_token(&items[4]));
        }
    }
}
