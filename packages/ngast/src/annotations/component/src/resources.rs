// Component Resources
//
// Templates and styles of a component, inline or loaded through the
// resource loader.

use crate::annotations::common::{error, ObjectReader};
use crate::diagnostics::ErrorCode;
use crate::resource::ResourceLoader;
use serde::Serialize;
use std::fmt;
use ts::Span;

/// Type of resource for diagnostic purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTypeForDiagnostics {
    Template,
    StylesheetFromDecorator,
}

impl fmt::Display for ResourceTypeForDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceTypeForDiagnostics::Template => f.write_str("template"),
            ResourceTypeForDiagnostics::StylesheetFromDecorator => f.write_str("stylesheet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTemplate {
    pub content: String,
    /// `templateUrl` as written, for external templates.
    pub template_url: Option<String>,
    /// `templateUrl` resolved against the component file.
    pub resolved_url: Option<String>,
}

impl ComponentTemplate {
    pub fn is_inline(&self) -> bool {
        self.template_url.is_none()
    }

    /// File the template text comes from.
    pub fn source_url<'a>(&'a self, component_file: &'a str) -> &'a str {
        self.resolved_url.as_deref().unwrap_or(component_file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStyle {
    pub url: String,
    pub resolved_url: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStyles {
    pub inline: Vec<String>,
    pub external: Vec<ExternalStyle>,
}

impl ComponentStyles {
    /// Inline styles first, then external ones in `styleUrls` order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.inline
            .iter()
            .map(String::as_str)
            .chain(self.external.iter().map(|style| style.content.as_str()))
    }
}

/// The template of a component. Reports a missing template or an
/// unresolvable `templateUrl`.
pub fn extract_template(loader: &ResourceLoader, reader: &mut ObjectReader<'_>, owner: &str, span: Span) -> Option<ComponentTemplate> {
    if reader.has("template") {
        return reader.string("template").map(|content| ComponentTemplate {
            content,
            template_url: None,
            resolved_url: None,
        });
    }
    if reader.has("templateUrl") {
        let url = reader.string("templateUrl")?;
        let url_span = reader.raw("templateUrl").map_or(span, |expr| expr.span);
        return load(loader, reader, &url, url_span, ResourceTypeForDiagnostics::Template).map(|(resolved, content)| {
            ComponentTemplate {
                content,
                template_url: Some(url),
                resolved_url: Some(resolved),
            }
        });
    }
    reader.report(error(
        ErrorCode::ComponentMissingTemplate,
        reader.file(),
        span,
        format!("component {} is missing a template", owner),
    ));
    None
}

/// `styles` (a string or a list) and `styleUrls` / `styleUrl`.
pub fn extract_styles(loader: &ResourceLoader, reader: &mut ObjectReader<'_>) -> ComponentStyles {
    let mut styles = ComponentStyles {
        inline: reader.string_array("styles", true).unwrap_or_default(),
        external: Vec::new(),
    };

    let mut urls = reader.string_array("styleUrls", false).unwrap_or_default();
    urls.extend(reader.string("styleUrl"));
    let span = reader
        .raw("styleUrls")
        .or_else(|| reader.raw("styleUrl"))
        .map(|expr| expr.span)
        .unwrap_or_default();
    for url in urls {
        if let Some((resolved_url, content)) = load(loader, reader, &url, span, ResourceTypeForDiagnostics::StylesheetFromDecorator) {
            styles.external.push(ExternalStyle {
                url,
                resolved_url,
                content,
            });
        }
    }
    styles
}

fn load(
    loader: &ResourceLoader,
    reader: &mut ObjectReader<'_>,
    url: &str,
    span: Span,
    kind: ResourceTypeForDiagnostics,
) -> Option<(String, String)> {
    let (resolved, loaded) = loader.fetch(url, reader.file());
    match loaded {
        Ok(content) => Some((resolved, content)),
        Err(err) => {
            reader.report(error(
                ErrorCode::ComponentResourceNotFound,
                reader.file(),
                span,
                format!("Could not find {} file '{}': {}", kind, url, err),
            ));
            None
        }
    }
}
