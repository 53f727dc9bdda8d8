//! Render3 Template Transform
//!
//! Converts the HTML AST into template nodes: attributes are classified into
//! literal attributes, bindings, events, references and variables, and `*`
//! microsyntax is expanded into an enclosing template.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ml_parser::ast as html;
use crate::ml_parser::tags::{is_ng_content, is_ng_template, local_name};
use crate::parse_util::{ParseError, ParseSourceSpan};

use super::r3_ast as t;

/// Regex to match binding prefixes
static BIND_NAME_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(bind-)|(let-)|(ref-|#)|(on-)|(bindon-))(.*)$").unwrap());

// Group indices for BIND_NAME_REGEXP
const KW_BIND_IDX: usize = 1;
const KW_LET_IDX: usize = 2;
const KW_REF_IDX: usize = 3;
const KW_ON_IDX: usize = 4;
const KW_BINDON_IDX: usize = 5;
const IDENT_KW_IDX: usize = 6;

/// Binding delimiters
struct BindingDelims {
    start: &'static str,
    end: &'static str,
}

const BANANA_BOX_DELIMS: BindingDelims = BindingDelims {
    start: "[(",
    end: ")]",
};
const PROPERTY_DELIMS: BindingDelims = BindingDelims {
    start: "[",
    end: "]",
};
const EVENT_DELIMS: BindingDelims = BindingDelims {
    start: "(",
    end: ")",
};

const TEMPLATE_ATTR_PREFIX: &str = "*";
const NG_NON_BINDABLE_ATTR: &str = "ngNonBindable";
const NG_CONTENT_SELECT_ATTR: &str = "select";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct R3ParseResult {
    pub nodes: Vec<t::R3Node>,
    pub errors: Vec<ParseError>,
    /// Bodies of inline `<style>` elements, which never become nodes.
    pub styles: Vec<String>,
}

pub fn html_ast_to_render3_ast(html_nodes: &[html::Node]) -> R3ParseResult {
    let mut transformer = HtmlAstToIvyAst::default();
    let nodes = transformer.visit_all(html_nodes);
    R3ParseResult {
        nodes,
        errors: transformer.errors,
        styles: transformer.styles,
    }
}

#[derive(Default)]
struct PreparedAttributes {
    attributes: Vec<t::TextAttribute>,
    inputs: Vec<t::BoundAttribute>,
    outputs: Vec<t::BoundEvent>,
    references: Vec<t::Reference>,
    variables: Vec<t::Variable>,
    template_attrs: Vec<t::TemplateAttr>,
    template_variables: Vec<t::Variable>,
    element_has_inline_template: bool,
}

#[derive(Default)]
struct HtmlAstToIvyAst {
    errors: Vec<ParseError>,
    styles: Vec<String>,
    in_non_bindable: bool,
}

impl HtmlAstToIvyAst {
    fn visit_all(&mut self, nodes: &[html::Node]) -> Vec<t::R3Node> {
        nodes.iter().filter_map(|node| self.visit_node(node)).collect()
    }

    fn visit_node(&mut self, node: &html::Node) -> Option<t::R3Node> {
        match node {
            html::Node::Element(element) => self.visit_element(element),
            html::Node::Text(text) => self.visit_text(text),
            html::Node::Expansion(expansion) => Some(t::R3Node::Icu(t::Icu {
                expansion: expansion.clone(),
                source_span: expansion.source_span,
            })),
            html::Node::Comment(_) => None,
        }
    }

    fn visit_element(&mut self, element: &html::Element) -> Option<t::R3Node> {
        match local_name(&element.name) {
            "script" => return None,
            "style" => {
                let contents = element
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        html::Node::Text(text) => Some(text.value.as_str()),
                        _ => None,
                    })
                    .collect::<String>();
                self.styles.push(contents);
                return None;
            }
            _ => {}
        }

        let is_template_element = is_ng_template(&element.name);
        let entering_non_bindable = !self.in_non_bindable && element.attr(NG_NON_BINDABLE_ATTR).is_some();
        let prepared = self.prepare_attributes(&element.attrs, is_template_element);

        if entering_non_bindable {
            self.in_non_bindable = true;
        }
        let children = self.visit_all(&element.children);
        if entering_non_bindable {
            self.in_non_bindable = false;
        }

        let parsed_element = if is_ng_content(&element.name) {
            let selector = element
                .attr(NG_CONTENT_SELECT_ATTR)
                .map(|attr| attr.value.trim().to_string())
                .filter(|selector| !selector.is_empty())
                .unwrap_or_else(|| "*".to_string());
            t::R3Node::Content(t::Content {
                selector,
                attributes: element.attrs.iter().map(text_attribute).collect(),
                children,
                source_span: element.source_span,
            })
        } else if is_template_element {
            t::R3Node::Template(t::Template {
                tag_name: Some(element.name.clone()),
                attributes: prepared.attributes,
                inputs: prepared.inputs,
                outputs: prepared.outputs,
                template_attrs: vec![],
                children,
                references: prepared.references,
                variables: prepared.variables,
                source_span: element.source_span,
                start_source_span: element.start_source_span,
                end_source_span: element.end_source_span,
            })
        } else {
            t::R3Node::Element(t::Element {
                name: element.name.clone(),
                attributes: prepared.attributes,
                inputs: prepared.inputs,
                outputs: prepared.outputs,
                children,
                references: prepared.references,
                source_span: element.source_span,
                start_source_span: element.start_source_span,
                end_source_span: element.end_source_span,
            })
        };

        if prepared.element_has_inline_template {
            Some(t::R3Node::Template(t::Template {
                tag_name: None,
                attributes: vec![],
                inputs: vec![],
                outputs: vec![],
                template_attrs: prepared.template_attrs,
                children: vec![parsed_element],
                references: vec![],
                variables: prepared.template_variables,
                source_span: element.source_span,
                start_source_span: element.start_source_span,
                end_source_span: element.end_source_span,
            }))
        } else {
            Some(parsed_element)
        }
    }

    fn visit_text(&mut self, text: &html::Text) -> Option<t::R3Node> {
        if text.value.trim().is_empty() {
            return None;
        }
        let has_interpolation = text
            .value
            .find("{{")
            .map_or(false, |start| text.value[start..].contains("}}"));
        if has_interpolation && !self.in_non_bindable {
            Some(t::R3Node::BoundText(t::BoundText {
                value: text.value.clone(),
                source_span: text.source_span,
            }))
        } else {
            Some(t::R3Node::Text(t::Text {
                value: text.value.clone(),
                source_span: text.source_span,
            }))
        }
    }

    fn prepare_attributes(&mut self, attrs: &[html::Attribute], is_template_element: bool) -> PreparedAttributes {
        let mut prepared = PreparedAttributes::default();

        for attribute in attrs {
            if self.in_non_bindable {
                prepared.attributes.push(text_attribute(attribute));
                continue;
            }

            if let Some(directive) = attribute.name.strip_prefix(TEMPLATE_ATTR_PREFIX) {
                if prepared.element_has_inline_template {
                    self.report_error(
                        "Can't have multiple template bindings on one element. Use only one attribute prefixed with *",
                        &attribute.source_span,
                    );
                    continue;
                }
                prepared.element_has_inline_template = true;
                let (template_attrs, variables) = parse_template_bindings(directive, &attribute.value, attribute.source_span);
                prepared.template_attrs = template_attrs;
                prepared.template_variables = variables;
                continue;
            }

            if attribute.name == "i18n" || attribute.name.starts_with("i18n-") {
                let mut attr = text_attribute(attribute);
                attr.is_i18n = true;
                prepared.attributes.push(attr);
                continue;
            }

            if !self.parse_attribute(is_template_element, attribute, &mut prepared) {
                prepared.attributes.push(text_attribute(attribute));
            }
        }

        prepared
    }

    fn parse_attribute(
        &mut self,
        is_template_element: bool,
        attribute: &html::Attribute,
        prepared: &mut PreparedAttributes,
    ) -> bool {
        let name = normalize_attribute_name(&attribute.name);
        let value = &attribute.value;
        let src_span = attribute.source_span;

        // Check for bind-/let-/ref-/on-/bindon- prefixes
        if let Some(captures) = BIND_NAME_REGEXP.captures(&name) {
            let identifier = captures.get(IDENT_KW_IDX).map_or("", |m| m.as_str());
            if captures.get(KW_BIND_IDX).is_some() {
                prepared.inputs.push(property_binding(identifier, value, src_span, false));
            } else if captures.get(KW_LET_IDX).is_some() {
                if is_template_element {
                    self.parse_variable(identifier, value, src_span, &mut prepared.variables);
                } else {
                    self.report_error("\"let-\" is only supported on ng-template elements.", &src_span);
                }
            } else if captures.get(KW_REF_IDX).is_some() {
                self.parse_reference(identifier, value, src_span, &mut prepared.references);
            } else if captures.get(KW_ON_IDX).is_some() {
                prepared.outputs.push(event_binding(identifier, value, src_span));
            } else if captures.get(KW_BINDON_IDX).is_some() {
                prepared.inputs.push(property_binding(identifier, value, src_span, true));
                prepared
                    .outputs
                    .push(event_binding(&format!("{}Change", identifier), value, src_span));
            }
            return true;
        }

        // Check for [(...)], [...], (...) delimiters
        let delims = if name.starts_with(BANANA_BOX_DELIMS.start) {
            Some(&BANANA_BOX_DELIMS)
        } else if name.starts_with(PROPERTY_DELIMS.start) {
            Some(&PROPERTY_DELIMS)
        } else if name.starts_with(EVENT_DELIMS.start) {
            Some(&EVENT_DELIMS)
        } else {
            None
        };

        if let Some(delims) = delims {
            if name.ends_with(delims.end) && name.len() > delims.start.len() + delims.end.len() {
                let identifier = &name[delims.start.len()..name.len() - delims.end.len()];
                if delims.start == BANANA_BOX_DELIMS.start {
                    prepared.inputs.push(property_binding(identifier, value, src_span, true));
                    prepared
                        .outputs
                        .push(event_binding(&format!("{}Change", identifier), value, src_span));
                } else if delims.start == PROPERTY_DELIMS.start {
                    prepared.inputs.push(property_binding(identifier, value, src_span, false));
                } else {
                    prepared.outputs.push(event_binding(identifier, value, src_span));
                }
                return true;
            }
        }

        // Interpolated values become property bindings
        let interpolated = value.find("{{").map_or(false, |start| value[start..].contains("}}"));
        if interpolated {
            prepared.inputs.push(property_binding(&name, value, src_span, false));
            return true;
        }
        false
    }

    fn parse_variable(
        &mut self,
        identifier: &str,
        value: &str,
        source_span: ParseSourceSpan,
        variables: &mut Vec<t::Variable>,
    ) {
        if identifier.contains('-') {
            self.report_error("\"-\" is not allowed in variable names", &source_span);
        } else if identifier.is_empty() {
            self.report_error("Variable does not have a name", &source_span);
        }

        variables.push(t::Variable {
            name: identifier.to_string(),
            value: if value.is_empty() { "$implicit".to_string() } else { value.to_string() },
            source_span,
        });
    }

    fn parse_reference(
        &mut self,
        identifier: &str,
        value: &str,
        source_span: ParseSourceSpan,
        references: &mut Vec<t::Reference>,
    ) {
        if identifier.contains('-') {
            self.report_error("\"-\" is not allowed in reference names", &source_span);
        } else if identifier.is_empty() {
            self.report_error("Reference does not have a name", &source_span);
        } else if references.iter().any(|r| r.name == identifier) {
            self.report_error(
                &format!("Reference \"#{}\" is defined more than once", identifier),
                &source_span,
            );
        }

        references.push(t::Reference {
            name: identifier.to_string(),
            value: value.to_string(),
            source_span,
        });
    }

    fn report_error(&mut self, message: &str, source_span: &ParseSourceSpan) {
        self.errors.push(ParseError::new(*source_span, message));
    }
}

fn text_attribute(attribute: &html::Attribute) -> t::TextAttribute {
    t::TextAttribute {
        name: attribute.name.clone(),
        value: attribute.value.clone(),
        source_span: attribute.source_span,
        value_span: attribute.value_span,
        is_i18n: false,
    }
}

fn property_binding(name: &str, value: &str, source_span: ParseSourceSpan, two_way: bool) -> t::BoundAttribute {
    let (binding_type, name) = if two_way {
        (t::BindingType::TwoWay, name)
    } else if let Some(rest) = name.strip_prefix("attr.") {
        (t::BindingType::Attribute, rest)
    } else if let Some(rest) = name.strip_prefix("class.") {
        (t::BindingType::Class, rest)
    } else if let Some(rest) = name.strip_prefix("style.") {
        (t::BindingType::Style, rest)
    } else {
        (t::BindingType::Property, name)
    };
    t::BoundAttribute {
        name: name.to_string(),
        binding_type,
        value: value.to_string(),
        source_span,
    }
}

fn event_binding(name: &str, handler: &str, source_span: ParseSourceSpan) -> t::BoundEvent {
    t::BoundEvent {
        name: name.to_string(),
        handler: handler.to_string(),
        source_span,
    }
}

fn normalize_attribute_name(attr_name: &str) -> String {
    if attr_name.len() > 5 && attr_name[..5].eq_ignore_ascii_case("data-") {
        attr_name[5..].to_string()
    } else {
        attr_name.to_string()
    }
}

/// Expand `*dir="..."` microsyntax into template attributes and variables.
///
/// `*ngFor="let item of items; index as i"` yields the attributes `ngFor` and
/// `ngForOf` plus the variables `item = $implicit` and `i = index`.
pub fn parse_template_bindings(
    directive: &str,
    value: &str,
    source_span: ParseSourceSpan,
) -> (Vec<t::TemplateAttr>, Vec<t::Variable>) {
    let mut attrs = vec![t::TemplateAttr::Text(t::TextAttribute {
        name: directive.to_string(),
        value: String::new(),
        source_span,
        value_span: None,
        is_i18n: false,
    })];
    let mut variables = Vec::new();
    let push_binding = |attrs: &mut Vec<t::TemplateAttr>, key: &str, expression: &str| {
        let bound = t::TemplateAttr::Bound(property_binding(key, expression, source_span, false));
        match attrs.iter().position(|attr| attr.name() == key) {
            Some(idx) => attrs[idx] = bound,
            None => attrs.push(bound),
        }
    };
    let push_variable = |variables: &mut Vec<t::Variable>, name: &str, value: &str| {
        variables.push(t::Variable {
            name: name.to_string(),
            value: value.to_string(),
            source_span,
        });
    };

    for (segment_idx, segment) in split_top_level(value).into_iter().enumerate() {
        let mut rest = segment.trim();
        if rest.is_empty() {
            continue;
        }

        if let Some(after_let) = strip_keyword(rest, "let") {
            let (name, remainder) = split_word(after_let);
            let remainder = remainder.trim_start();
            let (var_value, remainder) = match remainder.strip_prefix('=') {
                Some(assigned) => split_word(assigned.trim_start()),
                None => ("$implicit", remainder),
            };
            push_variable(&mut variables, name, var_value);
            rest = remainder.trim();
            if rest.is_empty() {
                continue;
            }
        } else if segment_idx == 0 {
            let (expression, alias) = split_as_alias(rest);
            push_binding(&mut attrs, directive, expression);
            if let Some(alias) = alias {
                push_variable(&mut variables, alias, directive);
            }
            continue;
        }

        let (key, expression) = split_word(rest);
        let key = key.trim_end_matches(':');
        let expression = expression.trim_start().trim_start_matches(':').trim();
        if let Some(alias) = strip_keyword(expression, "as") {
            push_variable(&mut variables, alias.trim(), key);
            continue;
        }
        let full_key = format!("{}{}", directive, capitalize(key));
        let (expression, alias) = split_as_alias(expression);
        push_binding(&mut attrs, &full_key, expression);
        if let Some(alias) = alias {
            push_variable(&mut variables, alias, &full_key);
        }
    }

    (attrs, variables)
}

fn split_top_level(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (idx, ch) in value.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(ch),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth -= 1,
            (None, ';' | ',') if depth == 0 => {
                segments.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    segments.push(&value[start..]);
    segments
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '=' || c == ';')
        .unwrap_or(text.len());
    (&text[..end], &text[end..])
}

fn split_as_alias(expression: &str) -> (&str, Option<&str>) {
    match expression.rfind(" as ") {
        Some(idx) => {
            let alias = expression[idx + 4..].trim();
            if !alias.is_empty() && alias.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
                (expression[..idx].trim(), Some(alias))
            } else {
                (expression, None)
            }
        }
        None => (expression, None),
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> ParseSourceSpan {
        ParseSourceSpan::default()
    }

    #[test]
    fn test_ng_for_microsyntax() {
        let (attrs, variables) = parse_template_bindings("ngFor", "let item of items; index as i; trackBy: byId", span());
        let names: Vec<&str> = attrs.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["ngFor", "ngForOf", "ngForTrackBy"]);
        let vars: Vec<(&str, &str)> = variables.iter().map(|v| (v.name.as_str(), v.value.as_str())).collect();
        assert_eq!(vars, vec![("item", "$implicit"), ("i", "index")]);
    }

    #[test]
    fn test_ng_if_with_alias_and_else() {
        let (attrs, variables) = parse_template_bindings("ngIf", "user$ | async as user; else loading", span());
        let names: Vec<&str> = attrs.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["ngIf", "ngIfElse"]);
        assert_eq!(variables[0].name, "user");
        assert_eq!(variables[0].value, "ngIf");
    }
}
