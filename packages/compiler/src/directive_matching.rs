use once_cell::sync::Lazy;
/**
 * Directive Matching - CSS Selector Matching
 *
 * Parses directive selectors into structural `CssSelector`s and matches
 * template nodes against them.
 */
use regex::Regex;
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Regex for parsing CSS selectors
static SELECTOR_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\:not\()|(([\.\#]?)[-\w]+)|(?:\[([-.\w*\\$]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\]]*)))?\])|(\))|(\s*,\s*)"#)
        .unwrap()
});

/// Match groups in the selector regex
#[derive(Debug, Clone, Copy)]
enum SelectorRegexp {
    Not = 1,
    Tag = 2,
    Prefix = 3,
    Attribute = 4,
    AttributeValueDouble = 5,
    AttributeValueSingle = 6,
    AttributeValueUnquoted = 7,
    NotEnd = 8,
    Separator = 9,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    #[error("Nesting :not in a selector is not allowed")]
    NestedNot,
    #[error("Multiple selectors in :not are not supported")]
    MultipleInNot,
    #[error("Error in attribute selector \"{0}\". Unescaped \"$\" is not supported. Please escape with \"\\$\".")]
    UnescapedDollar(String),
}

/// A single structural selector: element, classes, attributes and `:not()` parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssSelector {
    pub element: Option<String>,
    pub class_names: Vec<String>,
    /// `(name, value)` pairs; an empty value means "attribute present".
    pub attrs: Vec<(String, String)>,
    pub not_selectors: Vec<CssSelector>,
}

impl CssSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a selector list (`a, b[c]`) into one `CssSelector` per entry.
    pub fn parse(selector: &str) -> Result<Vec<CssSelector>, SelectorParseError> {
        let mut results = Vec::new();
        let mut css_selector = CssSelector::new();
        let mut in_not = false;

        for cap in SELECTOR_REGEXP.captures_iter(selector) {
            if cap.get(SelectorRegexp::Not as usize).is_some() {
                if in_not {
                    return Err(SelectorParseError::NestedNot);
                }
                in_not = true;
                css_selector.not_selectors.push(CssSelector::new());
            }

            let current = match css_selector.not_selectors.last_mut() {
                Some(not_selector) if in_not => not_selector,
                _ => &mut css_selector,
            };

            if let Some(tag_match) = cap.get(SelectorRegexp::Tag as usize) {
                let tag = tag_match.as_str();
                match cap.get(SelectorRegexp::Prefix as usize).map(|m| m.as_str()) {
                    Some("#") => current.add_attribute("id", &tag[1..]),
                    Some(".") => current.add_class_name(&tag[1..]),
                    _ => current.set_element(tag),
                }
            }

            if let Some(attr_match) = cap.get(SelectorRegexp::Attribute as usize) {
                let value = [
                    SelectorRegexp::AttributeValueDouble,
                    SelectorRegexp::AttributeValueSingle,
                    SelectorRegexp::AttributeValueUnquoted,
                ]
                .iter()
                .find_map(|group| cap.get(*group as usize))
                .map_or("", |m| m.as_str());
                current.add_attribute(&unescape_attribute(attr_match.as_str())?, value);
            }

            if cap.get(SelectorRegexp::NotEnd as usize).is_some() {
                in_not = false;
            }

            if cap.get(SelectorRegexp::Separator as usize).is_some() {
                if in_not {
                    return Err(SelectorParseError::MultipleInNot);
                }
                push_result(&mut results, std::mem::take(&mut css_selector));
            }
        }

        push_result(&mut results, css_selector);
        Ok(results)
    }

    pub fn is_element_selector(&self) -> bool {
        self.has_element_selector() && self.class_names.is_empty() && self.attrs.is_empty()
    }

    pub fn has_element_selector(&self) -> bool {
        matches!(&self.element, Some(element) if element != "*")
    }

    pub fn set_element(&mut self, element: &str) {
        self.element = Some(element.to_string());
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_string(), value.to_lowercase()));
    }

    pub fn add_class_name(&mut self, name: &str) {
        self.class_names.push(name.to_lowercase());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether `self`, built from a template node, satisfies `pattern`.
    pub fn satisfies(&self, pattern: &CssSelector) -> bool {
        if let Some(expected) = &pattern.element {
            if expected != "*" && self.element.as_deref() != Some(expected.as_str()) {
                return false;
            }
        }

        if !pattern
            .class_names
            .iter()
            .all(|class_name| self.class_names.contains(class_name))
        {
            return false;
        }

        let attrs_match = pattern.attrs.iter().all(|(name, expected)| {
            self.attrs
                .iter()
                .any(|(attr, value)| attr == name && (expected.is_empty() || value == expected))
        });
        if !attrs_match {
            return false;
        }

        !pattern
            .not_selectors
            .iter()
            .any(|not_selector| self.satisfies_not(not_selector))
    }

    fn satisfies_not(&self, not_selector: &CssSelector) -> bool {
        // An empty element inside `:not()` never restricts the match.
        let mut pattern = not_selector.clone();
        if pattern.element.as_deref() == Some("*") {
            pattern.element = None;
        }
        self.satisfies(&pattern)
    }
}

fn push_result(results: &mut Vec<CssSelector>, mut css_sel: CssSelector) {
    if !css_sel.not_selectors.is_empty()
        && css_sel.element.is_none()
        && css_sel.class_names.is_empty()
        && css_sel.attrs.is_empty()
    {
        css_sel.element = Some("*".to_string());
    }
    results.push(css_sel);
}

/// Unescape `\$` sequences in an attribute selector.
fn unescape_attribute(attr: &str) -> Result<String, SelectorParseError> {
    let mut result = String::with_capacity(attr.len());
    let mut escaping = false;
    for ch in attr.chars() {
        if ch == '\\' {
            escaping = true;
            continue;
        }
        if ch == '$' && !escaping {
            return Err(SelectorParseError::UnescapedDollar(attr.to_string()));
        }
        escaping = false;
        result.push(ch);
    }
    Ok(result)
}

impl fmt::Display for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element.as_deref().unwrap_or(""))?;
        for class_name in &self.class_names {
            write!(f, ".{}", class_name)?;
        }
        for (name, value) in &self.attrs {
            let name = name.replace('$', "\\$");
            if value.is_empty() {
                write!(f, "[{}]", name)?;
            } else {
                write!(f, "[{}={}]", name, value)?;
            }
        }
        for not_selector in &self.not_selectors {
            write!(f, ":not({})", not_selector)?;
        }
        Ok(())
    }
}

struct Selectable {
    selector: CssSelector,
    /// Index into `lists`; every selector of one list shares it.
    list: usize,
}

/// Indexes registered selectors by element, class and attribute name. Matches
/// are reported in registration order, once per registered selector list.
pub struct SelectorMatcher<T> {
    selectables: Vec<Selectable>,
    lists: Vec<T>,
    element_map: HashMap<String, Vec<usize>>,
    class_map: HashMap<String, Vec<usize>>,
    attr_map: HashMap<String, Vec<usize>>,
    /// Selectors with no element, class or attribute part (`:not(...)` only).
    universal: Vec<usize>,
}

impl<T> SelectorMatcher<T> {
    pub fn new() -> Self {
        Self {
            selectables: Vec::new(),
            lists: Vec::new(),
            element_map: HashMap::new(),
            class_map: HashMap::new(),
            attr_map: HashMap::new(),
            universal: Vec::new(),
        }
    }

    /// Number of registered selector lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn add_selectable(&mut self, selector: CssSelector, data: T) {
        self.add_selectables(vec![selector], data);
    }

    /// Register a selector list (`a, [b]`) that matches at most once.
    pub fn add_selectables(&mut self, selectors: Vec<CssSelector>, data: T) {
        let list = self.lists.len();
        self.lists.push(data);
        for selector in selectors {
            self.add_to_index(selector, list);
        }
    }

    fn add_to_index(&mut self, selector: CssSelector, list: usize) {
        let id = self.selectables.len();
        if selector.has_element_selector() {
            if let Some(element) = &selector.element {
                self.element_map.entry(element.clone()).or_default().push(id);
            }
        }
        for class_name in &selector.class_names {
            self.class_map.entry(class_name.clone()).or_default().push(id);
        }
        for (name, _) in &selector.attrs {
            self.attr_map.entry(name.clone()).or_default().push(id);
        }
        if !selector.has_element_selector() && selector.class_names.is_empty() && selector.attrs.is_empty() {
            self.universal.push(id);
        }
        self.selectables.push(Selectable { selector, list });
    }

    /// Invoke `callback` for every registered selector list `css_selector`
    /// satisfies. Returns whether anything matched.
    pub fn match_selector<'a, F>(&'a self, css_selector: &CssSelector, mut callback: F) -> bool
    where
        F: FnMut(&'a CssSelector, &'a T),
    {
        let mut candidates: BTreeSet<usize> = BTreeSet::new();
        let mut extend = |ids: Option<&Vec<usize>>| candidates.extend(ids.into_iter().flatten().copied());

        if let Some(element) = &css_selector.element {
            extend(self.element_map.get(element));
        }
        for class_name in &css_selector.class_names {
            extend(self.class_map.get(class_name));
        }
        for (name, _) in &css_selector.attrs {
            extend(self.attr_map.get(name));
        }
        extend(Some(&self.universal));

        let mut matched_lists: SmallVec<[usize; 8]> = SmallVec::new();
        for id in candidates {
            let selectable = &self.selectables[id];
            if matched_lists.contains(&selectable.list) || !css_selector.satisfies(&selectable.selector) {
                continue;
            }
            matched_lists.push(selectable.list);
            callback(&selectable.selector, &self.lists[selectable.list]);
        }
        !matched_lists.is_empty()
    }

    /// All data whose selector `css_selector` satisfies, in registration order.
    pub fn matches(&self, css_selector: &CssSelector) -> Vec<&T> {
        let mut found = Vec::new();
        self.match_selector(css_selector, |_, data| found.push(data));
        found
    }
}

impl<T> Default for SelectorMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
