// Template Transform
//
// Binds parsed template nodes to the components and directives whose
// selectors they match in a component's scope.

use super::template_node::{NodeAttribute, TemplateNode};
use crate::diagnostics::{NgastError, NgastResult};
use crate::scope::ModuleScope;
use crate::toolkit::Workspace;
use angular_compiler::ml_parser::split_ns_name;
use angular_compiler::render3::{Content, Element, R3Node, Template, TemplateAttr, TextAttribute};
use angular_compiler::{CssSelector, SelectorMatcher};
use ts::DeclarationId;

const NG_TEMPLATE: &str = "ng-template";
const CLASS_ATTR: &str = "class";

/// Matcher data: the declaration and whether it is a component.
type Selectable = (DeclarationId, bool);

pub struct TemplateTransform<'w> {
    workspace: &'w Workspace,
    matcher: SelectorMatcher<Selectable>,
}

impl<'w> TemplateTransform<'w> {
    /// Registers every directive of `scope` that has a selector, in scope
    /// order. Unparsable selectors are logged and left out.
    pub fn new(workspace: &'w Workspace, scope: &ModuleScope) -> Self {
        let logger = workspace.container().logger();
        let mut matcher = SelectorMatcher::new();
        for directive in &scope.directives {
            let Some(selector) = directive.selector.as_deref() else {
                continue;
            };
            match CssSelector::parse(selector) {
                Ok(selectors) => {
                    matcher.add_selectables(selectors, (directive.reference.id, directive.is_component));
                }
                Err(e) => logger.debug(&format!(
                    "ignoring selector '{}' of {}: {}",
                    selector, directive.reference.name, e
                )),
            }
        }
        Self { workspace, matcher }
    }

    /// Bind `nodes`. Text, bound text and ICU nodes produce nothing.
    pub fn transform(&self, nodes: &[R3Node]) -> NgastResult<Vec<TemplateNode<'w>>> {
        let mut out = Vec::new();
        for node in nodes {
            match node {
                R3Node::Element(element) => out.push(self.visit_element(element)?),
                R3Node::Template(template) => out.push(self.visit_template(template)?),
                R3Node::Content(content) => out.push(self.visit_content(content)?),
                R3Node::Text(_) | R3Node::BoundText(_) | R3Node::Icu(_) => {}
            }
        }
        Ok(out)
    }

    fn visit_element(&self, element: &Element) -> NgastResult<TemplateNode<'w>> {
        let (namespace, name) = split_ns_name(&element.name, true).map_err(NgastError::MalformedInput)?;
        let mut node = TemplateNode::new(name, namespace, element.source_span);
        node.attributes = literal_attributes(&element.attributes);
        node.inputs = element.inputs.iter().map(|input| input.name.clone()).collect();
        node.outputs = element.outputs.iter().map(|output| output.name.clone()).collect();
        node.references = element
            .references
            .iter()
            .map(|r| NodeAttribute::new(&r.name, &r.value))
            .collect();

        let mut selector = CssSelector::new();
        selector.set_element(&node.name);
        add_text_attributes(&mut selector, &element.attributes);
        for name in node.inputs.iter().chain(node.outputs.iter()) {
            selector.add_attribute(name, "");
        }
        self.bind(&mut node, &selector)?;
        node.children = self.transform(&element.children)?;
        Ok(node)
    }

    fn visit_template(&self, template: &Template) -> NgastResult<TemplateNode<'w>> {
        let (namespace, name) = match template.tag_name.as_deref() {
            Some(tag) => split_ns_name(tag, true).map_err(NgastError::MalformedInput)?,
            None => (None, NG_TEMPLATE.to_string()),
        };
        let mut node = TemplateNode::new(name, namespace, template.source_span);
        node.attributes = literal_attributes(&template.attributes);
        node.inputs = template
            .inputs
            .iter()
            .map(|input| input.name.clone())
            .chain(template.template_attrs.iter().map(|attr| attr.name().to_string()))
            .collect();
        node.outputs = template.outputs.iter().map(|output| output.name.clone()).collect();
        node.references = template
            .references
            .iter()
            .map(|r| NodeAttribute::new(&r.name, &r.value))
            .collect();
        node.variables = template
            .variables
            .iter()
            .map(|v| NodeAttribute::new(&v.name, &v.value))
            .collect();

        let mut selector = CssSelector::new();
        selector.set_element(NG_TEMPLATE);
        add_text_attributes(&mut selector, &template.attributes);
        for attr in &template.template_attrs {
            match attr {
                TemplateAttr::Text(text) if !text.is_i18n => selector.add_attribute(&text.name, ""),
                TemplateAttr::Text(_) => {}
                TemplateAttr::Bound(bound) => selector.add_attribute(&bound.name, ""),
            }
        }
        for name in template
            .inputs
            .iter()
            .map(|input| &input.name)
            .chain(template.outputs.iter().map(|output| &output.name))
        {
            selector.add_attribute(name, "");
        }
        self.bind(&mut node, &selector)?;
        node.children = self.transform(&template.children)?;
        Ok(node)
    }

    /// Projection slots never match selectors.
    fn visit_content(&self, content: &Content) -> NgastResult<TemplateNode<'w>> {
        let mut node = TemplateNode::new("ng-content".to_string(), None, content.source_span);
        node.attributes = literal_attributes(&content.attributes);
        node.children = self.transform(&content.children)?;
        Ok(node)
    }

    /// The first matching component becomes `component`; matching directives
    /// follow in scope order. Further components are ignored.
    fn bind(&self, node: &mut TemplateNode<'w>, selector: &CssSelector) -> NgastResult<()> {
        for (id, is_component) in self.matcher.matches(selector) {
            let Some(symbol) = self.workspace.get_symbol(*id)? else {
                continue;
            };
            if *is_component {
                if node.component.is_none() {
                    node.component = Some(symbol);
                }
            } else {
                node.directives.push(symbol);
            }
        }
        Ok(())
    }
}

fn literal_attributes(attributes: &[TextAttribute]) -> Vec<NodeAttribute> {
    attributes
        .iter()
        .map(|attr| NodeAttribute::new(&attr.name, &attr.value))
        .collect()
}

/// Literal attributes keep their value; `class` also contributes its class
/// names. i18n markers are left out.
fn add_text_attributes(selector: &mut CssSelector, attributes: &[TextAttribute]) {
    for attr in attributes.iter().filter(|attr| !attr.is_i18n) {
        selector.add_attribute(&attr.name, &attr.value);
        if attr.name == CLASS_ATTR {
            for class_name in attr.value.split_whitespace() {
                selector.add_class_name(class_name);
            }
        }
    }
}
