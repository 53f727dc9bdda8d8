//! R3 Template Transform Tests
//!
//! Attribute classification, structural templates and content projection.

#[cfg(test)]
mod tests {
    use angular_compiler::render3::{parse_template, BindingType, ParsedTemplate, R3Node, TemplateAttr};

    fn parse(html: &str) -> ParsedTemplate {
        let result = parse_template(html, "path://to/template");
        assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
        result
    }

    fn expect_element(node: &R3Node) -> &angular_compiler::render3::Element {
        match node {
            R3Node::Element(element) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    fn expect_template(node: &R3Node) -> &angular_compiler::render3::Template {
        match node {
            R3Node::Template(template) => template,
            other => panic!("expected template, got {:?}", other),
        }
    }

    mod attributes_tests {
        use super::*;

        #[test]
        fn should_parse_literal_attributes() {
            let result = parse("<div a=b></div>");
            let div = expect_element(&result.nodes[0]);
            assert_eq!(div.attributes[0].name, "a");
            assert_eq!(div.attributes[0].value, "b");
            assert!(div.inputs.is_empty());
        }

        #[test]
        fn should_parse_property_bindings() {
            let result = parse("<div [prop]=\"v\" bind-other=\"w\" [attr.aria-label]=\"x\" [class.on]=\"y\" [style.width]=\"z\"></div>");
            let div = expect_element(&result.nodes[0]);
            let inputs: Vec<(&str, BindingType)> =
                div.inputs.iter().map(|i| (i.name.as_str(), i.binding_type)).collect();
            assert_eq!(
                inputs,
                vec![
                    ("prop", BindingType::Property),
                    ("other", BindingType::Property),
                    ("aria-label", BindingType::Attribute),
                    ("on", BindingType::Class),
                    ("width", BindingType::Style),
                ]
            );
        }

        #[test]
        fn should_parse_interpolated_attributes_as_bindings() {
            let result = parse("<img src=\"{{ url }}\">");
            let img = expect_element(&result.nodes[0]);
            assert_eq!(img.inputs[0].name, "src");
            assert!(img.attributes.is_empty());
        }

        #[test]
        fn should_parse_events_and_two_way_bindings() {
            let result = parse("<input (blur)=\"a()\" on-focus=\"b()\" [(ngModel)]=\"m\" bindon-value=\"v\">");
            let input = expect_element(&result.nodes[0]);
            let outputs: Vec<&str> = input.outputs.iter().map(|o| o.name.as_str()).collect();
            assert_eq!(outputs, vec!["blur", "focus", "ngModelChange", "valueChange"]);
            let inputs: Vec<(&str, BindingType)> =
                input.inputs.iter().map(|i| (i.name.as_str(), i.binding_type)).collect();
            assert_eq!(
                inputs,
                vec![("ngModel", BindingType::TwoWay), ("value", BindingType::TwoWay)]
            );
        }

        #[test]
        fn should_parse_references() {
            let result = parse("<div #a ref-b=\"ngModel\"></div>");
            let div = expect_element(&result.nodes[0]);
            let refs: Vec<(&str, &str)> = div
                .references
                .iter()
                .map(|r| (r.name.as_str(), r.value.as_str()))
                .collect();
            assert_eq!(refs, vec![("a", ""), ("b", "ngModel")]);
        }

        #[test]
        fn should_report_duplicate_references() {
            let result = parse_template("<div #a #a></div>", "tpl");
            assert_eq!(result.errors[0].msg, "Reference \"#a\" is defined more than once");
        }

        #[test]
        fn should_flag_i18n_attributes() {
            let result = parse("<div i18n=\"meaning|desc\" i18n-title title=\"t\"></div>");
            let div = expect_element(&result.nodes[0]);
            let flags: Vec<(&str, bool)> = div
                .attributes
                .iter()
                .map(|a| (a.name.as_str(), a.is_i18n))
                .collect();
            assert_eq!(flags, vec![("i18n", true), ("i18n-title", true), ("title", false)]);
        }

        #[test]
        fn should_strip_data_prefix() {
            let result = parse("<div data-[prop]=\"v\"></div>");
            assert_eq!(expect_element(&result.nodes[0]).inputs[0].name, "prop");
        }
    }

    mod templates_tests {
        use super::*;

        #[test]
        fn should_parse_ng_template_with_variables() {
            let result = parse("<ng-template let-item let-i=\"index\"><b></b></ng-template>");
            let template = expect_template(&result.nodes[0]);
            assert_eq!(template.tag_name.as_deref(), Some("ng-template"));
            let vars: Vec<(&str, &str)> = template
                .variables
                .iter()
                .map(|v| (v.name.as_str(), v.value.as_str()))
                .collect();
            assert_eq!(vars, vec![("item", "$implicit"), ("i", "index")]);
            expect_element(&template.children[0]);
        }

        #[test]
        fn should_reject_let_outside_ng_template() {
            let result = parse_template("<div let-a></div>", "tpl");
            assert_eq!(result.errors[0].msg, "\"let-\" is only supported on ng-template elements.");
        }

        #[test]
        fn should_wrap_structural_directives_in_a_template() {
            let result = parse("<li *ngFor=\"let item of items; index as i\" class=\"row\"></li>");
            let template = expect_template(&result.nodes[0]);
            assert_eq!(template.tag_name, None);
            let names: Vec<&str> = template.template_attrs.iter().map(TemplateAttr::name).collect();
            assert_eq!(names, vec!["ngFor", "ngForOf"]);
            let li = expect_element(&template.children[0]);
            assert_eq!(li.name, "li");
            assert_eq!(li.attributes[0].name, "class");
        }

        #[test]
        fn should_reject_multiple_structural_directives() {
            let result = parse_template("<div *ngIf=\"a\" *ngFor=\"let b of c\"></div>", "tpl");
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].msg.starts_with("Can't have multiple template bindings"));
        }
    }

    mod content_tests {
        use super::*;

        #[test]
        fn should_parse_ng_content_with_selector() {
            let result = parse("<ng-content select=\"header\"></ng-content><ng-content></ng-content>");
            let selectors: Vec<&str> = result
                .nodes
                .iter()
                .map(|node| match node {
                    R3Node::Content(content) => content.selector.as_str(),
                    other => panic!("expected content, got {:?}", other),
                })
                .collect();
            assert_eq!(selectors, vec!["header", "*"]);
        }

        #[test]
        fn should_classify_text_nodes() {
            let result = parse("<p>plain</p><p>{{ bound }}</p><p>   </p>");
            let kinds: Vec<&str> = result
                .nodes
                .iter()
                .map(|node| match &expect_element(node).children[..] {
                    [R3Node::Text(_)] => "text",
                    [R3Node::BoundText(_)] => "bound",
                    [] => "empty",
                    _ => "other",
                })
                .collect();
            assert_eq!(kinds, vec!["text", "bound", "empty"]);
        }

        #[test]
        fn should_not_bind_inside_ng_non_bindable() {
            let result = parse("<div ngNonBindable><span [x]=\"y\">{{ z }}</span></div>");
            let div = expect_element(&result.nodes[0]);
            let span = expect_element(&div.children[0]);
            assert!(span.inputs.is_empty());
            assert_eq!(span.attributes[0].name, "[x]");
            assert!(matches!(span.children[0], R3Node::Text(_)));
        }

        #[test]
        fn should_collect_inline_styles() {
            let result = parse("<style>:host { display: block }</style><div></div>");
            assert_eq!(result.styles, vec![":host { display: block }"]);
            assert_eq!(result.nodes.len(), 1);
        }

        #[test]
        fn should_produce_icu_nodes() {
            let result = parse("{n, select, a {A} other {B}}");
            assert!(matches!(result.nodes[0], R3Node::Icu(_)));
        }
    }
}
