// Bound template nodes

use crate::symbols::Symbol;
use angular_compiler::ParseSourceSpan;
use smallvec::SmallVec;

/// A `name="value"` pair: a literal attribute, a `#ref` or a `let-` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttribute {
    pub name: String,
    pub value: String,
}

impl NodeAttribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// An element or template with the declarations its selector matched.
#[derive(Debug, Clone)]
pub struct TemplateNode<'w> {
    /// Tag name without namespace; `ng-template` for templates.
    pub name: String,
    pub namespace: Option<String>,
    pub component: Option<Symbol<'w>>,
    pub directives: SmallVec<[Symbol<'w>; 2]>,
    pub attributes: Vec<NodeAttribute>,
    /// Names of bound properties, including `*` microsyntax bindings.
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub references: Vec<NodeAttribute>,
    pub variables: Vec<NodeAttribute>,
    pub children: Vec<TemplateNode<'w>>,
    pub source_span: ParseSourceSpan,
}

impl<'w> TemplateNode<'w> {
    pub(crate) fn new(name: String, namespace: Option<String>, source_span: ParseSourceSpan) -> Self {
        Self {
            name,
            namespace,
            component: None,
            directives: SmallVec::new(),
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            references: Vec::new(),
            variables: Vec::new(),
            children: Vec::new(),
            source_span,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Depth-first search for the first node named `name`, this one included.
    pub fn find(&self, name: &str) -> Option<&TemplateNode<'w>> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Names of the matched component and directives.
    pub fn matched_names(&self) -> Vec<&str> {
        self.component
            .iter()
            .chain(self.directives.iter())
            .map(|symbol| symbol.name())
            .collect()
    }
}
