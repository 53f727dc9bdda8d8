//! ML Parser Tags
//!
//! Namespace handling and the small amount of HTML tag knowledge the markup
//! parser needs: void elements, raw text elements, implicit closing and
//! implicit namespaces.

/// Tag content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    RawText,
    EscapableRawText,
    ParsableData,
}

/// Split namespace and name from element name
///
/// Format: `:namespace:name`
/// Returns: (namespace, name) or (None, name)
pub fn split_ns_name(element_name: &str, fatal: bool) -> Result<(Option<String>, String), String> {
    if !element_name.starts_with(':') {
        return Ok((None, element_name.to_string()));
    }

    match element_name[1..].find(':') {
        None => {
            if fatal {
                Err(format!(
                    "Unsupported format \"{}\" expecting \":namespace:name\"",
                    element_name
                ))
            } else {
                Ok((None, element_name.to_string()))
            }
        }
        Some(idx) => {
            let namespace = element_name[1..=idx].to_string();
            let name = element_name[idx + 2..].to_string();
            Ok((Some(namespace), name))
        }
    }
}

/// The name without its namespace prefix. Malformed names come back unchanged.
pub fn local_name(full_name: &str) -> &str {
    if let Some(rest) = full_name.strip_prefix(':') {
        if let Some(idx) = rest.find(':') {
            return &rest[idx + 1..];
        }
    }
    full_name
}

/// Check if tag is `<ng-container>` (works same regardless of namespace)
pub fn is_ng_container(tag_name: &str) -> bool {
    local_name(tag_name) == "ng-container"
}

/// Check if tag is `<ng-content>` (works same regardless of namespace)
pub fn is_ng_content(tag_name: &str) -> bool {
    local_name(tag_name) == "ng-content"
}

/// Check if tag is `<ng-template>` (works same regardless of namespace)
pub fn is_ng_template(tag_name: &str) -> bool {
    local_name(tag_name) == "ng-template"
}

/// Get namespace prefix from full name
pub fn get_ns_prefix(full_name: Option<&str>) -> Option<String> {
    full_name.and_then(|name| split_ns_name(name, false).ok().and_then(|(ns, _)| ns))
}

pub fn merge_ns_and_name(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!(":{}:{}", prefix, local_name),
        _ => local_name.to_string(),
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

pub fn get_content_type(name: &str) -> TagContentType {
    match name.to_ascii_lowercase().as_str() {
        "script" | "style" => TagContentType::RawText,
        "textarea" | "title" => TagContentType::EscapableRawText,
        _ => TagContentType::ParsableData,
    }
}

pub fn implicit_namespace_prefix(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "svg" => Some("svg"),
        "math" => Some("math"),
        _ => None,
    }
}

/// Elements whose end tag may be omitted when the parent closes.
pub fn closed_by_parent(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "li" | "dt" | "dd" | "rb" | "rt" | "rtc" | "rp" | "optgroup" | "option" | "p" | "thead"
            | "tbody" | "tfoot" | "tr" | "td" | "th"
    )
}

/// Whether opening `child` implicitly closes an open `parent`.
pub fn is_closed_by_child(parent: &str, child: &str) -> bool {
    let parent = local_name(parent).to_ascii_lowercase();
    let child = local_name(child).to_ascii_lowercase();
    let closers: &[&str] = match parent.as_str() {
        "p" => &[
            "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "footer",
            "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "main", "nav",
            "ol", "p", "pre", "section", "table", "ul",
        ],
        "li" => &["li"],
        "dt" | "dd" => &["dt", "dd"],
        "option" => &["option", "optgroup"],
        "optgroup" => &["optgroup"],
        "thead" | "tbody" => &["tbody", "tfoot"],
        "tr" => &["tr"],
        "td" | "th" => &["td", "th"],
        _ => &[],
    };
    closers.contains(&child.as_str())
}

/// Void, custom (`x-y`), `ng-*` and foreign elements may be written `<x/>`.
pub fn can_self_close(full_name: &str) -> bool {
    let local = local_name(full_name);
    full_name.starts_with(':') || local.contains('-') || is_void_element(local)
}
