/**
 * HTML Parser Tests
 *
 * Covers tree building, attributes, namespaces, ICU expansions and error
 * recovery of the markup parser.
 */

#[cfg(test)]
mod tests {
    use angular_compiler::ml_parser::{parse, Element, Node, ParseTreeResult};

    fn parse_html(html: &str) -> ParseTreeResult {
        parse(html, "TestComp")
    }

    /// Flattens the tree into `[kind, name/value, depth]` rows.
    fn humanize_dom(result: &ParseTreeResult) -> Vec<(String, String, usize)> {
        fn visit(nodes: &[Node], depth: usize, out: &mut Vec<(String, String, usize)>) {
            for node in nodes {
                match node {
                    Node::Element(element) => {
                        out.push(("Element".to_string(), element.name.clone(), depth));
                        for attr in &element.attrs {
                            out.push(("Attribute".to_string(), format!("{}={}", attr.name, attr.value), depth + 1));
                        }
                        visit(&element.children, depth + 1, out);
                    }
                    Node::Text(text) => out.push(("Text".to_string(), text.value.clone(), depth)),
                    Node::Comment(comment) => {
                        out.push(("Comment".to_string(), comment.value.clone().unwrap_or_default(), depth))
                    }
                    Node::Expansion(expansion) => {
                        out.push(("Expansion".to_string(), expansion.switch_value.clone(), depth))
                    }
                }
            }
        }
        let mut out = Vec::new();
        visit(&result.root_nodes, 0, &mut out);
        out
    }

    fn row(kind: &str, value: &str, depth: usize) -> (String, String, usize) {
        (kind.to_string(), value.to_string(), depth)
    }

    fn first_element(result: &ParseTreeResult) -> &Element {
        match &result.root_nodes[0] {
            Node::Element(element) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    mod elements_tests {
        use super::*;

        #[test]
        fn should_parse_nested_elements_and_text() {
            let result = parse_html("<div><span>a</span>b</div>");
            assert!(result.errors.is_empty());
            assert_eq!(
                humanize_dom(&result),
                vec![
                    row("Element", "div", 0),
                    row("Element", "span", 1),
                    row("Text", "a", 2),
                    row("Text", "b", 1),
                ]
            );
        }

        #[test]
        fn should_support_void_and_self_closing_elements() {
            let result = parse_html("<div><input><br/><my-cmp/></div>");
            assert!(result.errors.is_empty(), "{:?}", result.errors);
            let names: Vec<String> = humanize_dom(&result).into_iter().map(|(_, name, _)| name).collect();
            assert_eq!(names, vec!["div", "input", "br", "my-cmp"]);
        }

        #[test]
        fn should_report_self_closed_html_elements() {
            let result = parse_html("<div/>");
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].msg.starts_with("Only void, custom and foreign elements can be self closed"));
        }

        #[test]
        fn should_close_p_implicitly() {
            let result = parse_html("<p>one<div>two</div>");
            assert_eq!(
                humanize_dom(&result),
                vec![
                    row("Element", "p", 0),
                    row("Text", "one", 1),
                    row("Element", "div", 0),
                    row("Text", "two", 1),
                ]
            );
        }

        #[test]
        fn should_keep_raw_text_in_style_and_script() {
            let result = parse_html("<style>a > b { color: red; }</style>");
            assert_eq!(
                humanize_dom(&result),
                vec![row("Element", "style", 0), row("Text", "a > b { color: red; }", 1)]
            );
        }

        #[test]
        fn should_parse_comments() {
            let result = parse_html("<!-- note -->text");
            assert_eq!(
                humanize_dom(&result),
                vec![row("Comment", "note", 0), row("Text", "text", 0)]
            );
        }

        #[test]
        fn should_keep_interpolations_in_text() {
            let result = parse_html("<b>{{ a < b ? '<i>' : c }}</b>");
            assert_eq!(
                humanize_dom(&result),
                vec![row("Element", "b", 0), row("Text", "{{ a < b ? '<i>' : c }}", 1)]
            );
        }

        #[test]
        fn should_decode_entities() {
            let result = parse_html("<p title=\"a &amp; b\">&lt;tag&gt;</p>");
            assert_eq!(
                humanize_dom(&result),
                vec![
                    row("Element", "p", 0),
                    row("Attribute", "title=a & b", 1),
                    row("Text", "<tag>", 1),
                ]
            );
        }
    }

    mod attributes_tests {
        use super::*;

        #[test]
        fn should_parse_angular_attribute_syntaxes() {
            let result = parse_html(
                "<input [value]=\"v\" (input)=\"set($event)\" [(ngModel)]=\"m\" #ref *ngIf=\"show\" disabled type=text>",
            );
            let element = first_element(&result);
            let attrs: Vec<(&str, &str)> = element
                .attrs
                .iter()
                .map(|attr| (attr.name.as_str(), attr.value.as_str()))
                .collect();
            assert_eq!(
                attrs,
                vec![
                    ("[value]", "v"),
                    ("(input)", "set($event)"),
                    ("[(ngModel)]", "m"),
                    ("#ref", ""),
                    ("*ngIf", "show"),
                    ("disabled", ""),
                    ("type", "text"),
                ]
            );
        }

        #[test]
        fn should_record_value_spans() {
            let result = parse_html("<a href='x'></a>");
            let attr = &first_element(&result).attrs[0];
            let value_span = attr.value_span.unwrap();
            assert_eq!(value_span.start.offset, 9);
            assert_eq!(value_span.end.offset, 10);
        }
    }

    mod namespace_tests {
        use super::*;

        #[test]
        fn should_apply_implicit_svg_namespace_to_children() {
            let result = parse_html("<svg><rect></rect><foreignObject><div></div></foreignObject></svg>");
            let names: Vec<String> = humanize_dom(&result).into_iter().map(|(_, name, _)| name).collect();
            assert_eq!(names, vec![":svg:svg", ":svg:rect", ":svg:foreignObject", "div"]);
        }

        #[test]
        fn should_keep_explicit_namespaces() {
            let result = parse_html("<:math:mi></:math:mi>");
            assert!(result.errors.is_empty());
            assert_eq!(first_element(&result).name, ":math:mi");
        }

        #[test]
        fn should_pass_malformed_namespaces_through() {
            let result = parse_html("<:svg></:svg>");
            assert_eq!(first_element(&result).name, ":svg");
        }
    }

    mod expansion_tests {
        use super::*;

        #[test]
        fn should_parse_icu_expansions() {
            let result = parse_html("<div>{count, plural, =0 {none} other {<b>many</b>}}</div>");
            assert!(result.errors.is_empty());
            let div = first_element(&result);
            match &div.children[0] {
                Node::Expansion(expansion) => {
                    assert_eq!(expansion.switch_value, "count");
                    assert_eq!(expansion.kind, "plural");
                    let values: Vec<&str> = expansion.cases.iter().map(|c| c.value.as_str()).collect();
                    assert_eq!(values, vec!["=0", "other"]);
                    assert!(matches!(&expansion.cases[1].expression[0], Node::Element(b) if b.name == "b"));
                }
                other => panic!("expected expansion, got {:?}", other),
            }
        }

        #[test]
        fn should_treat_unbalanced_braces_as_text() {
            let result = parse_html("a { b");
            assert_eq!(humanize_dom(&result), vec![row("Text", "a { b", 0)]);
        }
    }

    mod errors_tests {
        use super::*;

        #[test]
        fn should_report_unexpected_closing_tags() {
            let result = parse_html("<div></span></div>");
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].msg.starts_with("Unexpected closing tag \"span\""));
            assert_eq!(humanize_dom(&result), vec![row("Element", "div", 0)]);
        }

        #[test]
        fn should_report_end_tags_for_void_elements() {
            let result = parse_html("<input></input>");
            assert_eq!(result.errors[0].msg, "Void elements do not have end tags \"input\"");
        }

        #[test]
        fn should_report_unclosed_elements_and_keep_them() {
            let result = parse_html("<div><span>text");
            let messages: Vec<&str> = result.errors.iter().map(|e| e.msg.as_str()).collect();
            assert_eq!(messages, vec!["Unclosed element \"span\"", "Unclosed element \"div\""]);
            assert_eq!(humanize_dom(&result).len(), 3);
        }

        #[test]
        fn should_report_error_locations() {
            let result = parse_html("<div>\n  </b>\n</div>");
            let location = result.errors[0].span.start;
            assert_eq!((location.line, location.col), (1, 2));
        }
    }
}
