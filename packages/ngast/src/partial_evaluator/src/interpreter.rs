// Interpreter
//
// Walks an `Expression` tree and folds it into a `ResolvedValue`, following
// identifiers into their declarations across files. Anything that cannot be
// folded becomes a `DynamicValue`; evaluation itself never fails.

use super::dynamic::{DynamicReason, DynamicValue};
use super::result::{format_number, Reference, ResolvedValue};
use crate::incremental::{DependencyTracker, FileDependencyGraph};
use indexmap::IndexMap;
use std::collections::HashMap;
use ts::{
    ArrayElement, ClassMemberKind, Declaration, DeclarationId, DeclarationKind, EnumMember, Expression,
    ExpressionKind, ObjectMember, Program, PropertyName, ResolvedSymbol, TypeCheckingContext,
};

pub type Scope = HashMap<String, ResolvedValue>;

/// Where an expression is being evaluated: its file and the parameter
/// bindings of the enclosing function call, if any.
pub struct Context<'c> {
    pub file: &'c str,
    pub scope: &'c Scope,
}

struct FunctionTarget<'p> {
    id: DeclarationId,
    /// Class of a static method.
    owner: Option<&'p str>,
    name: &'p str,
    file: &'p str,
    parameters: &'p [String],
    body: Option<&'p Expression>,
}

pub(crate) fn reference_to(decl: &Declaration) -> Reference {
    Reference {
        id: decl.id,
        name: decl.name.clone(),
        file: decl.file.clone(),
    }
}

fn dynamic(node: &Expression, cx: &Context<'_>, reason: DynamicReason) -> ResolvedValue {
    ResolvedValue::Dynamic(DynamicValue::new(node, cx.file, reason))
}

fn dynamic_input(node: &Expression, cx: &Context<'_>, inner: DynamicValue) -> ResolvedValue {
    dynamic(node, cx, DynamicReason::DynamicInput(Box::new(inner)))
}

pub struct StaticInterpreter<'a> {
    program: &'a Program,
    dependencies: &'a FileDependencyGraph,
    max_depth: usize,
    depth: usize,
    variables: Vec<DeclarationId>,
    calls: Vec<(DeclarationId, &'a str)>,
}

impl<'a> StaticInterpreter<'a> {
    pub fn new(program: &'a Program, dependencies: &'a FileDependencyGraph, max_depth: usize) -> Self {
        Self {
            program,
            dependencies,
            max_depth,
            depth: 0,
            variables: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn visit(&mut self, node: &Expression, cx: &Context<'_>) -> ResolvedValue {
        if self.depth >= self.max_depth {
            return dynamic(node, cx, DynamicReason::DepthExceeded);
        }
        self.depth += 1;
        let result = self.visit_expression(node, cx);
        self.depth -= 1;
        result
    }

    fn visit_expression(&mut self, node: &Expression, cx: &Context<'_>) -> ResolvedValue {
        match &node.kind {
            ExpressionKind::StringLiteral(value) => ResolvedValue::String(value.clone()),
            ExpressionKind::NumericLiteral(value) => ResolvedValue::Number(*value),
            ExpressionKind::BooleanLiteral(value) => ResolvedValue::Boolean(*value),
            ExpressionKind::NullLiteral => ResolvedValue::Null,
            ExpressionKind::TemplateLiteral { quasis, expressions } => {
                self.visit_template_literal(node, quasis, expressions, cx)
            }
            ExpressionKind::Identifier(name) => self.visit_identifier(node, name, cx),
            ExpressionKind::PropertyAccess { object, property } => {
                self.visit_property_access(node, object, property, cx)
            }
            ExpressionKind::ElementAccess { object, index } => self.visit_element_access(node, object, index, cx),
            ExpressionKind::Call { callee, arguments } => self.visit_call(node, callee, arguments, cx),
            ExpressionKind::New { .. } => dynamic(node, cx, DynamicReason::UnsupportedSyntax("new expression")),
            ExpressionKind::Array(elements) => ResolvedValue::Array(self.visit_elements(elements, cx)),
            ExpressionKind::Object(members) => self.visit_object(node, members, cx),
            ExpressionKind::Function { .. } => dynamic(node, cx, DynamicReason::FunctionValue),
            ExpressionKind::DynamicImport(_) => dynamic(node, cx, DynamicReason::DynamicImport),
            ExpressionKind::Unary { operator, argument } => self.visit_unary(node, operator, argument, cx),
            ExpressionKind::Binary { operator, left, right } => self.visit_binary(node, operator, left, right, cx),
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => match self.visit(test, cx) {
                ResolvedValue::Dynamic(inner) => dynamic_input(node, cx, inner),
                value => {
                    if value.truthiness() == Some(true) {
                        self.visit(consequent, cx)
                    } else {
                        self.visit(alternate, cx)
                    }
                }
            },
            ExpressionKind::Unsupported(kind) => dynamic(node, cx, DynamicReason::UnsupportedSyntax(kind)),
        }
    }

    // ========================================================================
    // References
    // ========================================================================

    fn visit_identifier(&mut self, node: &Expression, name: &str, cx: &Context<'_>) -> ResolvedValue {
        if let Some(value) = cx.scope.get(name) {
            return value.clone();
        }
        if name == "undefined" {
            return ResolvedValue::Undefined;
        }
        match self.program.get_declaration_of_identifier(name, cx.file) {
            Some(symbol) => self.visit_symbol(node, symbol, cx),
            None => dynamic(node, cx, DynamicReason::UnknownIdentifier(name.to_string())),
        }
    }

    fn visit_symbol(&mut self, node: &Expression, symbol: ResolvedSymbol, cx: &Context<'_>) -> ResolvedValue {
        match symbol {
            ResolvedSymbol::Declaration(id) => self.visit_declaration(node, id, cx),
            ResolvedSymbol::Namespace(file) => dynamic(node, cx, DynamicReason::NamespaceImport(file)),
            ResolvedSymbol::External { module, name } => dynamic(node, cx, DynamicReason::External { module, name }),
        }
    }

    /// Variables evaluate to their initializer. Everything else, and
    /// variables initialized with `new X(...)`, is an identity reference.
    pub(crate) fn visit_declaration(&mut self, node: &Expression, id: DeclarationId, cx: &Context<'_>) -> ResolvedValue {
        let program = self.program;
        let decl = program.declaration(id);
        self.dependencies.add_dependency(cx.file, &decl.file);

        let DeclarationKind::Variable {
            initializer: Some(init),
            ..
        } = &decl.kind
        else {
            return ResolvedValue::Reference(reference_to(decl));
        };
        if matches!(init.kind, ExpressionKind::New { .. }) {
            return ResolvedValue::Reference(reference_to(decl));
        }
        if self.variables.contains(&id) {
            return dynamic(node, cx, DynamicReason::CircularReference(decl.name.clone()));
        }
        self.variables.push(id);
        let empty = Scope::new();
        let value = self.visit(
            init,
            &Context {
                file: &decl.file,
                scope: &empty,
            },
        );
        self.variables.pop();
        value
    }

    fn visit_property_access(
        &mut self,
        node: &Expression,
        object: &Expression,
        property: &str,
        cx: &Context<'_>,
    ) -> ResolvedValue {
        // `ns.Name` on a namespace import goes through the target's exports.
        if let Some(name) = object.as_identifier() {
            if !cx.scope.contains_key(name) {
                if let Some(ResolvedSymbol::Namespace(target)) =
                    self.program.get_declaration_of_identifier(name, cx.file)
                {
                    return match self.program.resolve_export(&target, property) {
                        Some(symbol) => self.visit_symbol(node, symbol, cx),
                        None => dynamic(node, cx, DynamicReason::UnknownIdentifier(format!("{}.{}", name, property))),
                    };
                }
            }
        }
        let receiver = self.visit(object, cx);
        self.access_property(node, receiver, property, cx)
    }

    fn access_property(
        &mut self,
        node: &Expression,
        receiver: ResolvedValue,
        property: &str,
        cx: &Context<'_>,
    ) -> ResolvedValue {
        match receiver {
            ResolvedValue::Map(mut map) => map.shift_remove(property).unwrap_or(ResolvedValue::Undefined),
            ResolvedValue::Array(items) if property == "length" => ResolvedValue::Number(items.len() as f64),
            ResolvedValue::String(s) if property == "length" => ResolvedValue::Number(s.chars().count() as f64),
            ResolvedValue::Reference(reference) => self.visit_reference_member(node, &reference, property, cx),
            ResolvedValue::Dynamic(DynamicValue {
                reason: DynamicReason::External { module, name },
                ..
            }) => dynamic(
                node,
                cx,
                DynamicReason::External {
                    module,
                    name: format!("{}.{}", name, property),
                },
            ),
            ResolvedValue::Dynamic(inner) => dynamic_input(node, cx, inner),
            ResolvedValue::Null | ResolvedValue::Undefined => {
                dynamic(node, cx, DynamicReason::InvalidExpressionType("property access"))
            }
            _ => ResolvedValue::Undefined,
        }
    }

    fn visit_reference_member(
        &mut self,
        node: &Expression,
        reference: &Reference,
        property: &str,
        cx: &Context<'_>,
    ) -> ResolvedValue {
        let program = self.program;
        let decl = program.declaration(reference.id);
        let empty = Scope::new();
        let decl_cx = Context {
            file: &decl.file,
            scope: &empty,
        };
        match &decl.kind {
            DeclarationKind::Class(class) => match class.static_member(property) {
                Some(member) if member.kind == ClassMemberKind::Method => {
                    dynamic(node, cx, DynamicReason::FunctionValue)
                }
                Some(member) => match &member.value {
                    Some(value) => self.visit(value, &decl_cx),
                    None => ResolvedValue::Undefined,
                },
                None => ResolvedValue::Undefined,
            },
            DeclarationKind::Enum(members) => self.visit_enum_member(members, property, &decl_cx),
            _ => dynamic(node, cx, DynamicReason::InvalidExpressionType("property access")),
        }
    }

    fn visit_enum_member(&mut self, members: &[EnumMember], property: &str, cx: &Context<'_>) -> ResolvedValue {
        let mut next = 0.0;
        for member in members {
            let value = match &member.initializer {
                Some(init) => self.visit(init, cx),
                None => ResolvedValue::Number(next),
            };
            if let ResolvedValue::Number(n) = value {
                next = n + 1.0;
            }
            if member.name == property {
                return value;
            }
        }
        ResolvedValue::Undefined
    }

    fn visit_element_access(
        &mut self,
        node: &Expression,
        object: &Expression,
        index: &Expression,
        cx: &Context<'_>,
    ) -> ResolvedValue {
        let receiver = self.visit(object, cx);
        let index = self.visit(index, cx);
        match (receiver, index) {
            (_, ResolvedValue::Dynamic(inner)) => dynamic_input(node, cx, inner),
            (ResolvedValue::Array(items), ResolvedValue::Number(n)) => {
                if n < 0.0 || n.fract() != 0.0 {
                    return ResolvedValue::Undefined;
                }
                items.into_iter().nth(n as usize).unwrap_or(ResolvedValue::Undefined)
            }
            (receiver, ResolvedValue::String(key)) => self.access_property(node, receiver, &key, cx),
            (receiver, ResolvedValue::Number(n)) => self.access_property(node, receiver, &format_number(n), cx),
            (ResolvedValue::Dynamic(inner), _) => dynamic_input(node, cx, inner),
            _ => dynamic(node, cx, DynamicReason::InvalidExpressionType("element access")),
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn visit_call(
        &mut self,
        node: &Expression,
        callee: &Expression,
        arguments: &[ArrayElement],
        cx: &Context<'_>,
    ) -> ResolvedValue {
        if let Some(target) = self.forward_ref_target(callee, arguments, cx) {
            return self.visit(target, cx);
        }

        match self.resolve_callee(callee, cx) {
            Ok(target) => {
                let Some(body) = target.body else {
                    let name = match target.owner {
                        Some(owner) => format!("{}.{}", owner, target.name),
                        None => target.name.to_string(),
                    };
                    let file = target.file.to_string();
                    return dynamic(node, cx, DynamicReason::DeclaredCall { name, file });
                };
                let key = (target.id, target.name);
                if self.calls.contains(&key) {
                    return dynamic(node, cx, DynamicReason::CircularReference(target.name.to_string()));
                }
                let args = self.visit_elements(arguments, cx);
                let scope = bind_parameters(target.parameters, args);
                self.calls.push(key);
                let result = self.visit(
                    body,
                    &Context {
                        file: target.file,
                        scope: &scope,
                    },
                );
                self.calls.pop();
                result
            }
            // A function expression held in a variable, or called in place.
            Err(ResolvedValue::Dynamic(value)) => match &value.node.kind {
                ExpressionKind::Function {
                    params,
                    body: Some(body),
                } if value.reason == DynamicReason::FunctionValue => {
                    let args = self.visit_elements(arguments, cx);
                    let scope = bind_parameters(params, args);
                    self.visit(
                        body,
                        &Context {
                            file: &value.file,
                            scope: &scope,
                        },
                    )
                }
                _ => dynamic_input(node, cx, value),
            },
            Err(_) => dynamic(node, cx, DynamicReason::UnknownCall),
        }
    }

    /// `forwardRef(() => X)` evaluates to `X`.
    fn forward_ref_target<'e>(
        &self,
        callee: &Expression,
        arguments: &'e [ArrayElement],
        cx: &Context<'_>,
    ) -> Option<&'e Expression> {
        if callee.as_identifier() != Some("forwardRef") || cx.scope.contains_key("forwardRef") {
            return None;
        }
        // A local `forwardRef` with a body is evaluated like any other call.
        // The bodiless one from the core typings is unwrapped.
        if let Some(ResolvedSymbol::Declaration(id)) = self.program.get_declaration_of_identifier("forwardRef", cx.file) {
            if let DeclarationKind::Function(function) = &self.program.declaration(id).kind {
                if function.return_expression.is_some() {
                    return None;
                }
            }
        }
        match arguments {
            [ArrayElement::Expression(Expression {
                kind: ExpressionKind::Function { body: Some(body), .. },
                ..
            })] => Some(&**body),
            _ => None,
        }
    }

    /// The function a callee names: a top-level function or a static method.
    /// Anything else comes back as its evaluated value.
    fn resolve_callee(&mut self, callee: &Expression, cx: &Context<'_>) -> Result<FunctionTarget<'a>, ResolvedValue> {
        let program = self.program;
        if let ExpressionKind::PropertyAccess { object, property } = &callee.kind {
            let receiver = self.visit(object, cx);
            if let ResolvedValue::Reference(reference) = &receiver {
                let decl = program.declaration(reference.id);
                let method = decl
                    .as_class()
                    .and_then(|class| class.static_member(property))
                    .filter(|member| member.kind == ClassMemberKind::Method);
                if let Some(member) = method {
                    return Ok(FunctionTarget {
                        id: decl.id,
                        owner: Some(&decl.name),
                        name: &member.name,
                        file: &decl.file,
                        parameters: &member.parameters,
                        body: member.return_expression.as_ref(),
                    });
                }
            }
            return Err(self.access_property(callee, receiver, property, cx));
        }

        match self.visit(callee, cx) {
            ResolvedValue::Reference(reference) => {
                let decl = program.declaration(reference.id);
                match &decl.kind {
                    DeclarationKind::Function(function) => Ok(FunctionTarget {
                        id: decl.id,
                        owner: None,
                        name: &decl.name,
                        file: &decl.file,
                        parameters: &function.parameters,
                        body: function.return_expression.as_ref(),
                    }),
                    _ => Err(ResolvedValue::Reference(reference)),
                }
            }
            other => Err(other),
        }
    }

    // ========================================================================
    // Literals and operators
    // ========================================================================

    /// Array elements and call arguments, with spreads flattened.
    fn visit_elements(&mut self, elements: &[ArrayElement], cx: &Context<'_>) -> Vec<ResolvedValue> {
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                ArrayElement::Expression(expr) => items.push(self.visit(expr, cx)),
                ArrayElement::Spread(expr) => match self.visit(expr, cx) {
                    ResolvedValue::Array(inner) => items.extend(inner),
                    value @ ResolvedValue::Dynamic(_) => items.push(value),
                    _ => items.push(dynamic(expr, cx, DynamicReason::InvalidExpressionType("spread"))),
                },
                ArrayElement::Hole => items.push(ResolvedValue::Undefined),
            }
        }
        items
    }

    fn visit_object(&mut self, node: &Expression, members: &[ObjectMember], cx: &Context<'_>) -> ResolvedValue {
        let mut map = IndexMap::new();
        for member in members {
            match member {
                ObjectMember::Property { key, value } => {
                    let key = match key {
                        PropertyName::Static(name) => name.clone(),
                        PropertyName::Computed(expr) => match self.visit(expr, cx) {
                            ResolvedValue::String(s) => s,
                            ResolvedValue::Number(n) => format_number(n),
                            ResolvedValue::Dynamic(inner) => return dynamic_input(node, cx, inner),
                            _ => {
                                return dynamic(node, cx, DynamicReason::InvalidExpressionType("computed property name"))
                            }
                        },
                    };
                    let value = self.visit(value, cx);
                    map.insert(key, value);
                }
                ObjectMember::Spread(expr) => match self.visit(expr, cx) {
                    ResolvedValue::Map(inner) => map.extend(inner),
                    ResolvedValue::Dynamic(inner) => return dynamic_input(node, cx, inner),
                    _ => return dynamic(node, cx, DynamicReason::InvalidExpressionType("object spread")),
                },
            }
        }
        ResolvedValue::Map(map)
    }

    fn visit_template_literal(
        &mut self,
        node: &Expression,
        quasis: &[String],
        expressions: &[Expression],
        cx: &Context<'_>,
    ) -> ResolvedValue {
        let mut out = String::new();
        for (i, quasi) in quasis.iter().enumerate() {
            out.push_str(quasi);
            let Some(expr) = expressions.get(i) else {
                continue;
            };
            match self.visit(expr, cx) {
                ResolvedValue::Dynamic(inner) => return dynamic_input(node, cx, inner),
                value => match value.to_js_string() {
                    Some(s) => out.push_str(&s),
                    None => return dynamic(node, cx, DynamicReason::InvalidExpressionType("template literal")),
                },
            }
        }
        ResolvedValue::String(out)
    }

    fn visit_unary(
        &mut self,
        node: &Expression,
        operator: &str,
        argument: &Expression,
        cx: &Context<'_>,
    ) -> ResolvedValue {
        let operand = match self.visit(argument, cx) {
            ResolvedValue::Dynamic(inner) => return dynamic_input(node, cx, inner),
            value => value,
        };
        let result = match operator {
            "!" => operand.truthiness().map(|t| ResolvedValue::Boolean(!t)),
            "-" => operand.as_number().map(|n| ResolvedValue::Number(-n)),
            "+" => operand.as_number().map(ResolvedValue::Number),
            "void" => Some(ResolvedValue::Undefined),
            _ => None,
        };
        result.unwrap_or_else(|| dynamic(node, cx, DynamicReason::InvalidExpressionType("unary operator")))
    }

    fn visit_binary(
        &mut self,
        node: &Expression,
        operator: &str,
        left: &Expression,
        right: &Expression,
        cx: &Context<'_>,
    ) -> ResolvedValue {
        let lhs = self.visit(left, cx);
        if let ResolvedValue::Dynamic(inner) = lhs {
            return dynamic_input(node, cx, inner);
        }
        match operator {
            "&&" if lhs.truthiness() == Some(false) => return lhs,
            "&&" => return self.visit(right, cx),
            "||" if lhs.truthiness() == Some(true) => return lhs,
            "||" => return self.visit(right, cx),
            "??" if matches!(lhs, ResolvedValue::Null | ResolvedValue::Undefined) => return self.visit(right, cx),
            "??" => return lhs,
            _ => {}
        }
        let rhs = match self.visit(right, cx) {
            ResolvedValue::Dynamic(inner) => return dynamic_input(node, cx, inner),
            value => value,
        };
        binary_operation(operator, &lhs, &rhs)
            .unwrap_or_else(|| dynamic(node, cx, DynamicReason::InvalidExpressionType("binary operator")))
    }
}

fn bind_parameters(parameters: &[String], args: Vec<ResolvedValue>) -> Scope {
    let mut args = args.into_iter();
    parameters
        .iter()
        .map(|param| (param.clone(), args.next().unwrap_or(ResolvedValue::Undefined)))
        .collect()
}

fn binary_operation(operator: &str, lhs: &ResolvedValue, rhs: &ResolvedValue) -> Option<ResolvedValue> {
    use ResolvedValue::{Boolean, Number};
    let value = match (operator, lhs, rhs) {
        ("+", ResolvedValue::String(a), b) => ResolvedValue::String(format!("{}{}", a, b.to_js_string()?)),
        ("+", a, ResolvedValue::String(b)) => ResolvedValue::String(format!("{}{}", a.to_js_string()?, b)),
        ("+", Number(a), Number(b)) => Number(a + b),
        ("-", Number(a), Number(b)) => Number(a - b),
        ("*", Number(a), Number(b)) => Number(a * b),
        ("/", Number(a), Number(b)) => Number(a / b),
        ("%", Number(a), Number(b)) => Number(a % b),
        ("**", Number(a), Number(b)) => Number(a.powf(*b)),
        ("<", Number(a), Number(b)) => Boolean(a < b),
        (">", Number(a), Number(b)) => Boolean(a > b),
        ("<=", Number(a), Number(b)) => Boolean(a <= b),
        (">=", Number(a), Number(b)) => Boolean(a >= b),
        ("===" | "==", a, b) => Boolean(strict_equals(a, b)),
        ("!==" | "!=", a, b) => Boolean(!strict_equals(a, b)),
        _ => return None,
    };
    Some(value)
}

fn strict_equals(a: &ResolvedValue, b: &ResolvedValue) -> bool {
    match (a, b) {
        (ResolvedValue::Null, ResolvedValue::Null) | (ResolvedValue::Undefined, ResolvedValue::Undefined) => true,
        _ => a.same_token(b),
    }
}
