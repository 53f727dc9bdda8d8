// Dependency Injection Utilities
//
// Constructor dependencies and their injection tokens.

use super::api::HandlerContext;
use super::evaluation::error;
use super::util::{decorator_short_name, is_angular_core};
use crate::diagnostics::ErrorCode;
use crate::partial_evaluator::{DynamicReason, DynamicValue, ResolvedValue};
use bitflags::bitflags;
use serde::{Serialize, Serializer};
use ts::{
    CtorParameter, DeclarationId, Diagnostic, Expression, ExpressionKind, ResolvedSymbol, Span, TypeCheckingContext,
    TypeNode,
};

bitflags! {
    /// Resolution modifiers from `@Optional`, `@Host`, `@Self` and `@SkipSelf`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InjectFlags: u8 {
        const OPTIONAL = 1;
        const HOST = 1 << 1;
        const SELF = 1 << 2;
        const SKIP_SELF = 1 << 3;
    }
}

fn serialize_flags<S: Serializer>(flags: &InjectFlags, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(flags.iter_names().map(|(name, _)| name))
}

/// Represents a constructor dependency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct R3Dependency {
    /// The injection token. `None` when it could not be determined.
    #[serde(skip)]
    pub token: Option<ResolvedValue>,

    /// Printable form of the token.
    pub token_name: Option<String>,

    /// Set for `@Attribute('name')` parameters, which are not DI lookups.
    pub attribute: Option<String>,

    #[serde(serialize_with = "serialize_flags")]
    pub flags: InjectFlags,

    pub param_name: Option<String>,
}

impl R3Dependency {
    pub fn is_attribute(&self) -> bool {
        self.attribute.is_some()
    }

    pub fn is_optional(&self) -> bool {
        self.flags.contains(InjectFlags::OPTIONAL)
    }
}

/// Result of analyzing constructor dependencies.
#[derive(Debug, Clone)]
pub enum ConstructorDeps {
    Valid(Vec<R3Dependency>),
    /// Some parameters have no usable token. `deps` still lists every
    /// parameter, with `token: None` for the failing ones.
    Invalid {
        deps: Vec<R3Dependency>,
        errors: Vec<ConstructorDepError>,
    },
}

/// Error when analyzing a constructor parameter.
#[derive(Debug, Clone)]
pub struct ConstructorDepError {
    pub index: usize,
    pub name: Option<String>,
    /// File of the constructor, which may belong to a base class.
    pub file: String,
    pub span: Span,
    pub reason: UnavailableValueKind,
}

/// Reason a token is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub enum UnavailableValueKind {
    MissingType,
    /// The type names nothing the program can resolve.
    UnknownReference(String),
    /// A primitive or structural type.
    Unsupported(String),
    /// The type is a namespace import.
    NamespaceImport(String),
}

impl UnavailableValueKind {
    pub fn message(&self) -> String {
        match self {
            UnavailableValueKind::MissingType => "it has no type annotation".to_string(),
            UnavailableValueKind::UnknownReference(name) => format!("'{}' could not be resolved", name),
            UnavailableValueKind::Unsupported(ty) => format!("'{}' is not a valid injection token", ty),
            UnavailableValueKind::NamespaceImport(name) => {
                format!("'{}' is a namespace import, not a value", name)
            }
        }
    }
}

const OPTIONAL_DECORATOR: &str = "Optional";
const SELF_DECORATOR: &str = "Self";
const SKIP_SELF_DECORATOR: &str = "SkipSelf";
const HOST_DECORATOR: &str = "Host";
const INJECT_DECORATOR: &str = "Inject";
const ATTRIBUTE_DECORATOR: &str = "Attribute";

/// Dependencies of the nearest constructor up the class chain. A class with
/// no constructor anywhere in its chain has no dependencies.
pub fn get_constructor_dependencies(cx: &HandlerContext, node: DeclarationId) -> ConstructorDeps {
    let Some(ctor) = cx.reflector.get_constructor_parameters(node) else {
        return ConstructorDeps::Valid(Vec::new());
    };
    // Parameter types are written in the file of the class that declares the constructor.
    let file = cx.declaration(ctor.owner).file.clone();

    let mut deps = Vec::with_capacity(ctor.parameters.len());
    let mut errors = Vec::new();
    for (index, param) in ctor.parameters.iter().enumerate() {
        let (dep, reason) = analyze_ctor_parameter(cx, param, &file);
        if let Some(reason) = reason {
            errors.push(ConstructorDepError {
                index,
                name: param.name.clone(),
                file: file.clone(),
                span: param.span,
                reason,
            });
        }
        deps.push(dep);
    }

    if errors.is_empty() {
        ConstructorDeps::Valid(deps)
    } else {
        ConstructorDeps::Invalid { deps, errors }
    }
}

fn analyze_ctor_parameter(
    cx: &HandlerContext,
    param: &CtorParameter,
    file: &str,
) -> (R3Dependency, Option<UnavailableValueKind>) {
    let mut token = None;
    let mut attribute = None;
    let mut flags = InjectFlags::empty();

    for decorator in param.decorators.iter().filter(|d| is_angular_core(d)) {
        let first_arg = decorator.args.as_ref().and_then(|args| args.first());
        match decorator_short_name(decorator) {
            OPTIONAL_DECORATOR => flags |= InjectFlags::OPTIONAL,
            HOST_DECORATOR => flags |= InjectFlags::HOST,
            SELF_DECORATOR => flags |= InjectFlags::SELF,
            SKIP_SELF_DECORATOR => flags |= InjectFlags::SKIP_SELF,
            INJECT_DECORATOR => {
                if let Some(arg) = first_arg {
                    token = Some(cx.evaluator.evaluate(arg, file));
                }
            }
            ATTRIBUTE_DECORATOR => {
                if let Some(arg) = first_arg {
                    let value = cx.evaluator.evaluate(arg, file);
                    attribute = value.as_str().map(str::to_string);
                    token = Some(value);
                }
            }
            _ => {}
        }
    }

    let mut reason = None;
    if token.is_none() {
        match token_from_type(cx, param, file) {
            Ok(found) => token = Some(found),
            Err(why) => reason = Some(why),
        }
    }

    let dep = R3Dependency {
        token_name: token.as_ref().map(ToString::to_string),
        token,
        attribute,
        flags,
        param_name: param.name.clone(),
    };
    (dep, reason)
}

/// The token implied by a parameter's type annotation.
fn token_from_type(cx: &HandlerContext, param: &CtorParameter, file: &str) -> Result<ResolvedValue, UnavailableValueKind> {
    let name = match param.type_node.as_ref() {
        None => return Err(UnavailableValueKind::MissingType),
        Some(TypeNode::Reference { name, .. }) => name,
        Some(TypeNode::Keyword(keyword)) => return Err(UnavailableValueKind::Unsupported(keyword.clone())),
        Some(_) => return Err(UnavailableValueKind::Unsupported("type literal".to_string())),
    };

    match cx.program.resolve_entity_name(name, file) {
        Some(ResolvedSymbol::Declaration(id)) => Ok(ResolvedValue::Reference(cx.reference_to(id))),
        Some(ResolvedSymbol::External { module, name: imported }) => {
            let node = Expression::new(ExpressionKind::Identifier(name.clone()), param.span);
            Ok(ResolvedValue::Dynamic(DynamicValue::new(
                &node,
                file,
                DynamicReason::External {
                    module,
                    name: imported,
                },
            )))
        }
        Some(ResolvedSymbol::Namespace(_)) => Err(UnavailableValueKind::NamespaceImport(name.clone())),
        None => Err(UnavailableValueKind::UnknownReference(name.clone())),
    }
}

/// Turn constructor dependencies into the analysis value plus diagnostics.
///
/// With `strict` set every parameter without a token is an error. Otherwise
/// the dependencies are kept, unusable tokens left as `None`.
pub fn unwrap_constructor_dependencies(
    cx: &HandlerContext,
    node: DeclarationId,
    deps: ConstructorDeps,
    strict: bool,
) -> (Option<Vec<R3Dependency>>, Vec<Diagnostic>) {
    match deps {
        ConstructorDeps::Valid(deps) => (Some(deps), Vec::new()),
        ConstructorDeps::Invalid { deps, errors } if !strict => {
            cx.logger.debug(&format!(
                "{}: {} constructor parameter(s) without a token",
                cx.declaration(node).name,
                errors.len()
            ));
            (Some(deps), Vec::new())
        }
        ConstructorDeps::Invalid { errors, .. } => {
            let decl = cx.declaration(node);
            let diagnostics = errors
                .iter()
                .map(|e| {
                    error(
                        ErrorCode::ParamMissingToken,
                        &e.file,
                        e.span,
                        format!(
                            "No suitable injection token for parameter '{}' of class '{}': {}.",
                            e.name.as_deref().unwrap_or("<unknown>"),
                            decl.name,
                            e.reason.message()
                        ),
                    )
                })
                .collect();
            (None, diagnostics)
        }
    }
}

/// Constructor dependencies of `node`, strict or not as configured.
pub fn analyze_constructor_dependencies(
    cx: &HandlerContext,
    node: DeclarationId,
) -> (Option<Vec<R3Dependency>>, Vec<Diagnostic>) {
    let deps = get_constructor_dependencies(cx, node);
    unwrap_constructor_dependencies(cx, node, deps, cx.strict_injection_parameters)
}
