use angular_compiler::directive_matching::{CssSelector, SelectorMatcher, SelectorParseError};

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to get a selector for given properties
    fn get_selector_for(tag: Option<&str>, attrs: Vec<(&str, &str)>, classes: Option<&str>) -> CssSelector {
        let mut selector = CssSelector::new();
        if let Some(t) = tag {
            selector.set_element(t);
        }
        for (name, value) in attrs {
            selector.add_attribute(name, value);
        }
        if let Some(c) = classes {
            for c_name in c.split_whitespace() {
                selector.add_class_name(c_name);
            }
        }
        selector
    }

    fn matched(matcher: &SelectorMatcher<i32>, selector: &CssSelector) -> Vec<i32> {
        let mut found = Vec::new();
        matcher.match_selector(selector, |_, data| found.push(*data));
        found
    }

    fn matcher_for(selectors: &[(&str, i32)]) -> SelectorMatcher<i32> {
        let mut matcher = SelectorMatcher::new();
        for (selector, data) in selectors {
            matcher.add_selectables(CssSelector::parse(selector).unwrap(), *data);
        }
        matcher
    }

    mod matching_tests {
        use super::*;

        #[test]
        fn should_select_by_element_name_case_sensitive() {
            let matcher = matcher_for(&[("someTag", 1)]);
            assert!(matched(&matcher, &get_selector_for(Some("SOMEOTHERTAG"), vec![], None)).is_empty());
            assert!(matched(&matcher, &get_selector_for(Some("SOMETAG"), vec![], None)).is_empty());
            assert_eq!(matched(&matcher, &get_selector_for(Some("someTag"), vec![], None)), vec![1]);
        }

        #[test]
        fn should_select_by_class_name_case_insensitive() {
            let matcher = matcher_for(&[(".someClass", 1), (".someClass.class2", 2)]);
            assert!(matched(&matcher, &get_selector_for(None, vec![], Some("SOMEOTHERCLASS"))).is_empty());
            assert_eq!(matched(&matcher, &get_selector_for(None, vec![], Some("SOMECLASS"))), vec![1]);
            assert_eq!(
                matched(&matcher, &get_selector_for(None, vec![], Some("someClass class2"))),
                vec![1, 2]
            );
        }

        #[test]
        fn should_select_by_attr_name_case_sensitive_independent_of_value() {
            let matcher = matcher_for(&[("[someAttr]", 1), ("[someAttr][someAttr2]", 2)]);
            assert!(matched(&matcher, &get_selector_for(None, vec![("SOMEOTHERATTR", "")], None)).is_empty());
            assert!(matched(&matcher, &get_selector_for(None, vec![("SOMEATTR", "")], None)).is_empty());
            assert_eq!(
                matched(&matcher, &get_selector_for(None, vec![("someAttr", "someValue")], None)),
                vec![1]
            );
            assert_eq!(
                matched(
                    &matcher,
                    &get_selector_for(None, vec![("someAttr", ""), ("someAttr2", "")], None)
                ),
                vec![1, 2]
            );
        }

        #[test]
        fn should_select_by_attr_name_case_sensitive_and_value_case_insensitive() {
            let matcher = matcher_for(&[("[someAttr=someValue]", 1)]);
            assert!(matched(&matcher, &get_selector_for(None, vec![("SOMEATTR", "SOMEOTHERATTR")], None)).is_empty());
            assert_eq!(
                matched(&matcher, &get_selector_for(None, vec![("someAttr", "SOMEVALUE")], None)),
                vec![1]
            );
        }

        #[test]
        fn should_select_by_element_name_class_name_and_attribute_name_with_value() {
            let matcher = matcher_for(&[("someTag.someClass[someAttr=someValue]", 1)]);
            assert!(matched(
                &matcher,
                &get_selector_for(Some("someOtherTag"), vec![("someAttr", "someValue")], Some("someClass"))
            )
            .is_empty());
            assert!(matched(
                &matcher,
                &get_selector_for(Some("someTag"), vec![("someAttr", "someValue")], Some("someOtherClass"))
            )
            .is_empty());
            assert_eq!(
                matched(
                    &matcher,
                    &get_selector_for(Some("someTag"), vec![("someAttr", "someValue")], Some("someClass"))
                ),
                vec![1]
            );
        }

        #[test]
        fn should_report_matches_in_registration_order() {
            let matcher = matcher_for(&[("[b]", 1), ("div", 2), ("[a]", 3), (".c", 4)]);
            assert_eq!(
                matched(
                    &matcher,
                    &get_selector_for(Some("div"), vec![("a", ""), ("b", "")], Some("c"))
                ),
                vec![1, 2, 3, 4]
            );
        }

        #[test]
        fn should_not_select_with_matching_not_selector() {
            let matcher = matcher_for(&[("p:not(.someClass)", 1), ("p:not([someAttr])", 2), (":not(.someClass)", 3)]);
            assert!(matched(
                &matcher,
                &get_selector_for(Some("p"), vec![("someAttr", "")], Some("someClass"))
            )
            .is_empty());
        }

        #[test]
        fn should_select_with_non_matching_not_selector() {
            let matcher = matcher_for(&[("p", 1), ("p:not(.someClass)", 2), (":not(.someClass)", 3)]);
            assert_eq!(
                matched(&matcher, &get_selector_for(Some("p"), vec![], Some("someOtherClass"))),
                vec![1, 2, 3]
            );
        }

        #[test]
        fn should_match_star_with_not_selector() {
            let matcher = matcher_for(&[("*:not(.someClass)", 1)]);
            assert_eq!(matched(&matcher, &get_selector_for(Some("div"), vec![], None)), vec![1]);
        }

        #[test]
        fn should_select_with_one_match_in_list() {
            let matcher = matcher_for(&[("input[type=text], textbox", 1)]);
            assert_eq!(matched(&matcher, &get_selector_for(Some("textbox"), vec![], None)), vec![1]);
            assert_eq!(
                matched(&matcher, &get_selector_for(Some("input"), vec![("type", "text")], None)),
                vec![1]
            );
        }

        #[test]
        fn should_not_select_twice_with_two_matches_in_list() {
            let matcher = matcher_for(&[("input, .someClass", 1)]);
            assert_eq!(
                matched(&matcher, &get_selector_for(Some("input"), vec![], Some("someclass"))),
                vec![1]
            );
        }

        #[test]
        fn should_collect_data_with_matches() {
            let matcher = matcher_for(&[("[foo]", 1), ("[bar]", 2)]);
            let found = matcher.matches(&get_selector_for(Some("div"), vec![("foo", "")], None));
            assert_eq!(found, vec![&1]);
        }
    }

    mod parsing_tests {
        use super::*;

        #[test]
        fn should_detect_element_names() {
            let css_selector = &CssSelector::parse("sometag").unwrap()[0];
            assert_eq!(css_selector.element.as_deref(), Some("sometag"));
            assert_eq!(css_selector.to_string(), "sometag");
        }

        #[test]
        fn should_detect_attr_names_with_escaped_dollar() {
            let css_selector = &CssSelector::parse("[attrname\\$]").unwrap()[0];
            assert_eq!(css_selector.attrs, vec![("attrname$".to_string(), String::new())]);
            assert_eq!(css_selector.to_string(), "[attrname\\$]");
        }

        #[test]
        fn should_error_on_attr_names_with_unescaped_dollar() {
            assert!(matches!(
                CssSelector::parse("[attrname$]"),
                Err(SelectorParseError::UnescapedDollar(_))
            ));
        }

        #[test]
        fn should_detect_class_names() {
            let css_selector = &CssSelector::parse(".someClass").unwrap()[0];
            assert_eq!(css_selector.class_names, vec!["someclass"]);
        }

        #[test]
        fn should_detect_attr_values_with_quotes() {
            let double = &CssSelector::parse("[attrname=\"attrvalue\"]").unwrap()[0];
            let single = &CssSelector::parse("[attrname='attrvalue']").unwrap()[0];
            assert_eq!(double.get_attr("attrname"), Some("attrvalue"));
            assert_eq!(single.get_attr("attrname"), Some("attrvalue"));
        }

        #[test]
        fn should_detect_hashed_syntax_and_treat_as_attribute() {
            let css_selector = &CssSelector::parse("#some-value").unwrap()[0];
            assert_eq!(css_selector.get_attr("id"), Some("some-value"));
        }

        #[test]
        fn should_detect_not() {
            let css_selector = &CssSelector::parse("sometag:not([attrname=attrvalue].someclass)").unwrap()[0];
            assert_eq!(css_selector.element.as_deref(), Some("sometag"));
            let not_selector = &css_selector.not_selectors[0];
            assert_eq!(not_selector.element, None);
            assert_eq!(not_selector.get_attr("attrname"), Some("attrvalue"));
            assert_eq!(not_selector.class_names, vec!["someclass"]);
        }

        #[test]
        fn should_throw_when_nested_not() {
            assert_eq!(
                CssSelector::parse("sometag:not(:not([attrname=attrvalue].someclass))"),
                Err(SelectorParseError::NestedNot)
            );
        }

        #[test]
        fn should_throw_when_multiple_selectors_in_not() {
            assert_eq!(CssSelector::parse("sometag:not(a,b)"), Err(SelectorParseError::MultipleInNot));
        }

        #[test]
        fn should_detect_lists_of_selectors() {
            let selectors = CssSelector::parse(".someclass,[attrname=attrvalue], sometag").unwrap();
            assert_eq!(selectors.len(), 3);
            assert_eq!(selectors[0].class_names, vec!["someclass"]);
            assert_eq!(selectors[1].get_attr("attrname"), Some("attrvalue"));
            assert_eq!(selectors[2].element.as_deref(), Some("sometag"));
        }
    }
}
