//! Style Parser Tests

use angular_compiler::style_parser::{parse_styles, AtRuleBlock, CssDeclaration, CssRule, StyleAst};

#[cfg(test)]
mod tests {
    use super::*;

    fn style_rule(ast: &StyleAst, idx: usize) -> (&[String], &[CssDeclaration]) {
        match &ast.rules[idx] {
            CssRule::Style(rule) => (&rule.selectors, &rule.declarations),
            other => panic!("expected style rule, got {:?}", other),
        }
    }

    fn decl(property: &str, value: &str) -> CssDeclaration {
        CssDeclaration {
            property: property.to_string(),
            value: value.to_string(),
            important: false,
        }
    }

    #[test]
    fn should_parse_empty_or_blank_strings() {
        assert_eq!(parse_styles(""), StyleAst::default());
        assert_eq!(parse_styles("   \n "), StyleAst::default());
    }

    #[test]
    fn should_parse_rules_with_selector_lists() {
        let ast = parse_styles("h1, .title > span { color: red; font-weight: bold }");
        let (selectors, declarations) = style_rule(&ast, 0);
        assert_eq!(selectors, ["h1", ".title > span"]);
        assert_eq!(declarations, [decl("color", "red"), decl("font-weight", "bold")]);
    }

    #[test]
    fn should_keep_colons_and_semicolons_inside_values() {
        let ast = parse_styles("a { background: url(\"data:image/png;base64,xyz\"); content: ';' }");
        let (_, declarations) = style_rule(&ast, 0);
        assert_eq!(
            declarations,
            [
                decl("background", "url(\"data:image/png;base64,xyz\")"),
                decl("content", "';'"),
            ]
        );
    }

    #[test]
    fn should_detect_important() {
        let ast = parse_styles(":host { display: block !important; }");
        let (_, declarations) = style_rule(&ast, 0);
        assert!(declarations[0].important);
        assert_eq!(declarations[0].value, "block");
    }

    #[test]
    fn should_parse_at_rules() {
        let ast = parse_styles(
            "@import 'theme.css';\n@media (max-width: 600px) { .a { margin: 0 } }\n@font-face { font-family: x; }",
        );
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        let names: Vec<(&str, &str)> = ast
            .rules
            .iter()
            .map(|rule| match rule {
                CssRule::At(at) => (at.name.as_str(), at.prelude.as_str()),
                other => panic!("expected at-rule, got {:?}", other),
            })
            .collect();
        assert_eq!(
            names,
            vec![("import", "'theme.css'"), ("media", "(max-width: 600px)"), ("font-face", "")]
        );
        match &ast.rules[1] {
            CssRule::At(at) => match &at.block {
                Some(AtRuleBlock::Rules(rules)) => assert_eq!(rules.len(), 1),
                other => panic!("expected nested rules, got {:?}", other),
            },
            _ => unreachable!(),
        }
        match &ast.rules[2] {
            CssRule::At(at) => assert!(matches!(&at.block, Some(AtRuleBlock::Declarations(d)) if d.len() == 1)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_keep_parsed_prefix_on_unclosed_block() {
        let ast = parse_styles("a { color: red; }\nb { color: blue;");
        assert_eq!(ast.rules.len(), 2);
        assert_eq!(ast.errors.len(), 1);
        assert_eq!(ast.errors[0].msg, "Unclosed block");
        assert_eq!(ast.errors[0].span.start.line, 1);
    }

    #[test]
    fn should_report_stray_closing_braces() {
        let ast = parse_styles("} a { b: c }");
        assert_eq!(ast.errors[0].msg, "Unexpected \"}\"");
        assert_eq!(ast.rules.len(), 1);
    }

    #[test]
    fn should_serialize_to_json() {
        let ast = parse_styles("a { color: red }");
        let json = serde_json::to_value(&ast.rules).unwrap();
        assert_eq!(json[0]["type"], "style");
        assert_eq!(json[0]["selectors"][0], "a");
        assert_eq!(json[0]["declarations"][0]["property"], "color");
    }
}
