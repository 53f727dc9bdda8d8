// Directive Metadata
//
// Metadata shared by directives and components, read from the decorator
// argument or from a pre-compiled declaration.

use crate::annotations::common::{find_angular_decorator, HandlerContext, ObjectReader, R3Dependency, SourceExpression};
use crate::metadata::DirectiveMeta;
use crate::partial_evaluator::{Reference, ResolvedValue};
use indexmap::IndexMap;
use serde::Serialize;
use ts::DeclarationId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct R3DirectiveMetadata {
    pub reference: Reference,
    pub selector: Option<String>,
    pub export_as: Option<Vec<String>>,
    /// Class property to public binding name.
    pub inputs: IndexMap<String, String>,
    pub outputs: IndexMap<String, String>,
    pub host: IndexMap<String, String>,
    pub is_standalone: bool,
    /// `None` when strict injection rejected the constructor.
    pub deps: Option<Vec<R3Dependency>>,
}

impl R3DirectiveMetadata {
    pub fn new(reference: Reference) -> Self {
        Self {
            reference,
            selector: None,
            export_as: None,
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            host: IndexMap::new(),
            is_standalone: false,
            deps: None,
        }
    }

    /// The part of the metadata that scopes need.
    pub fn to_directive_meta(&self, is_component: bool, imports: Vec<Reference>) -> DirectiveMeta {
        DirectiveMeta {
            reference: self.reference.clone(),
            selector: self.selector.clone(),
            export_as: self.export_as.clone(),
            inputs: self.inputs.values().cloned().collect(),
            outputs: self.outputs.values().cloned().collect(),
            is_component,
            is_standalone: self.is_standalone,
            imports,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveAnalysis {
    pub meta: R3DirectiveMetadata,
    #[serde(skip)]
    pub providers: Option<SourceExpression>,
    /// Read from a declaration file rather than a decorator.
    pub is_compiled: bool,
}

/// `['a', 'b: c']` into `{a: a, b: c}`.
pub fn parse_binding_list(items: &[String]) -> IndexMap<String, String> {
    items
        .iter()
        .map(|item| match item.split_once(':') {
            Some((property, public)) => (property.trim().to_string(), public.trim().to_string()),
            None => (item.trim().to_string(), item.trim().to_string()),
        })
        .collect()
}

/// Reads the directive fields of a `@Directive` or `@Component` argument.
pub fn extract_directive_metadata(
    cx: &HandlerContext,
    node: DeclarationId,
    reader: &mut ObjectReader<'_>,
    deps: Option<Vec<R3Dependency>>,
) -> R3DirectiveMetadata {
    let mut meta = R3DirectiveMetadata::new(cx.reference_to(node));
    meta.deps = deps;
    meta.selector = reader.string("selector");
    meta.export_as = reader
        .string("exportAs")
        .map(|names| names.split(',').map(|name| name.trim().to_string()).collect());

    meta.inputs = parse_binding_list(&reader.string_array("inputs", false).unwrap_or_default());
    meta.inputs.extend(member_bindings(cx, node, "Input"));
    meta.outputs = parse_binding_list(&reader.string_array("outputs", false).unwrap_or_default());
    meta.outputs.extend(member_bindings(cx, node, "Output"));

    meta.host = reader.string_map("host");
    meta.is_standalone = reader.boolean("standalone").unwrap_or(false);
    meta
}

/// `@Input()` / `@Output()` members, keyed by property name. The public name
/// is the decorator's alias when it has one.
fn member_bindings(cx: &HandlerContext, node: DeclarationId, decorator: &str) -> IndexMap<String, String> {
    let file = &cx.declaration(node).file;
    let mut bindings = IndexMap::new();
    for member in cx.reflector.get_members_of_class(node) {
        let Some(found) = find_angular_decorator(&member.decorators, decorator) else {
            continue;
        };
        let alias = found
            .args
            .as_ref()
            .and_then(|args| args.first())
            .map(|arg| cx.evaluator.evaluate(arg, file))
            .and_then(|value| match value {
                ResolvedValue::String(alias) => Some(alias),
                other => other.get("alias").and_then(ResolvedValue::as_str).map(str::to_string),
            });
        bindings.insert(member.name.clone(), alias.unwrap_or_else(|| member.name.clone()));
    }
    bindings
}

/// Metadata of a pre-compiled directive or component.
pub fn directive_metadata_from_dts(cx: &HandlerContext, node: DeclarationId) -> Option<R3DirectiveMetadata> {
    let compiled = cx.metadata.get_directive_metadata(node)?;
    let mut meta = R3DirectiveMetadata::new(compiled.reference.clone());
    meta.selector = compiled.selector.clone();
    meta.export_as = compiled.export_as.clone();
    meta.inputs = compiled.inputs.iter().map(|name| (name.clone(), name.clone())).collect();
    meta.outputs = compiled.outputs.iter().map(|name| (name.clone(), name.clone())).collect();
    meta.is_standalone = compiled.is_standalone;
    Some(meta)
}
