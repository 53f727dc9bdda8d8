// Lowering
//
// Converts one oxc `Program` into the owned declaration model. Everything that
// borrows from the oxc arena stays inside this module.

use crate::declaration::*;
use crate::node::*;
use crate::path::is_declaration_file;
use crate::{Diagnostic, DiagnosticCategory};
use oxc_allocator::Allocator;
use oxc_ast::ast;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

/// Code reported for syntax errors coming out of the parser.
pub const SYNTAX_ERROR_CODE: i32 = 1005;

pub(crate) struct LoweredDeclaration {
    pub name: String,
    pub span: Span,
    pub exported: bool,
    pub kind: DeclarationKind,
}

pub(crate) struct LoweredFile {
    pub path: String,
    pub text: String,
    pub declarations: Vec<LoweredDeclaration>,
    pub imports: Vec<Import>,
    pub exports: Vec<ExportEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

pub(crate) fn lower_file(path: &str, text: String) -> LoweredFile {
    let (declarations, imports, exports, diagnostics) = {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts());
        let ret = Parser::new(&allocator, &text, source_type).parse();

        let diagnostics: Vec<Diagnostic> = ret
            .errors
            .iter()
            .map(|error| Diagnostic {
                category: DiagnosticCategory::Error,
                code: SYNTAX_ERROR_CODE,
                file: Some(path.to_string()),
                start: 0,
                length: 0,
                message_text: error.to_string().into(),
                related_information: None,
            })
            .collect();

        let mut lowerer = Lowerer {
            source: &text,
            ambient_file: is_declaration_file(path),
            declarations: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        };
        for stmt in &ret.program.body {
            lowerer.lower_statement(stmt);
        }
        lowerer.link_decorator_imports();
        (lowerer.declarations, lowerer.imports, lowerer.exports, diagnostics)
    };

    LoweredFile {
        path: path.to_string(),
        text,
        declarations,
        imports,
        exports,
        diagnostics,
    }
}

struct Lowerer<'s> {
    source: &'s str,
    ambient_file: bool,
    declarations: Vec<LoweredDeclaration>,
    imports: Vec<Import>,
    exports: Vec<ExportEntry>,
}

impl<'s> Lowerer<'s> {
    fn text(&self, span: oxc_span::Span) -> String {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
            .to_string()
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn lower_statement(&mut self, stmt: &ast::Statement<'_>) {
        match stmt {
            ast::Statement::ImportDeclaration(decl) => {
                let module = decl.source.value.to_string();
                for spec in decl.specifiers.iter().flatten() {
                    let (local, imported) = match spec {
                        ast::ImportDeclarationSpecifier::ImportSpecifier(s) => (
                            s.local.name.to_string(),
                            ImportedName::Named(s.imported.name().to_string()),
                        ),
                        ast::ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                            (s.local.name.to_string(), ImportedName::Default)
                        }
                        ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                            (s.local.name.to_string(), ImportedName::Namespace)
                        }
                    };
                    self.imports.push(Import {
                        local,
                        imported,
                        module: module.clone(),
                    });
                }
            }
            ast::Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    self.lower_declaration(declaration, true);
                } else if let Some(source) = &decl.source {
                    for spec in &decl.specifiers {
                        self.exports.push(ExportEntry::Reexport {
                            exported: spec.exported.name().to_string(),
                            name: spec.local.name().to_string(),
                            module: source.value.to_string(),
                        });
                    }
                } else {
                    for spec in &decl.specifiers {
                        self.exports.push(ExportEntry::Local {
                            exported: spec.exported.name().to_string(),
                            local: spec.local.name().to_string(),
                        });
                    }
                }
            }
            ast::Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
                ast::ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                    if let Some(name) = self.lower_class(class, true) {
                        self.exports.push(ExportEntry::Local {
                            exported: "default".to_string(),
                            local: name,
                        });
                    }
                }
                ast::ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    if let Some(name) = self.lower_function(func, true) {
                        self.exports.push(ExportEntry::Local {
                            exported: "default".to_string(),
                            local: name,
                        });
                    }
                }
                _ => {}
            },
            ast::Statement::ExportAllDeclaration(decl) => {
                if decl.exported.is_none() {
                    self.exports.push(ExportEntry::Star {
                        module: decl.source.value.to_string(),
                    });
                }
            }
            ast::Statement::ClassDeclaration(class) => {
                self.lower_class(class, false);
            }
            ast::Statement::FunctionDeclaration(func) => {
                self.lower_function(func, false);
            }
            ast::Statement::VariableDeclaration(decl) => self.lower_variables(decl, false),
            ast::Statement::TSEnumDeclaration(decl) => self.lower_enum(decl, false),
            _ => {}
        }
    }

    fn lower_declaration(&mut self, declaration: &ast::Declaration<'_>, exported: bool) {
        match declaration {
            ast::Declaration::ClassDeclaration(class) => {
                self.lower_class(class, exported);
            }
            ast::Declaration::FunctionDeclaration(func) => {
                self.lower_function(func, exported);
            }
            ast::Declaration::VariableDeclaration(decl) => self.lower_variables(decl, exported),
            ast::Declaration::TSEnumDeclaration(decl) => self.lower_enum(decl, exported),
            _ => {}
        }
    }

    fn push_declaration(&mut self, name: String, span: oxc_span::Span, exported: bool, kind: DeclarationKind) {
        if exported {
            self.exports.push(ExportEntry::Local {
                exported: name.clone(),
                local: name.clone(),
            });
        }
        self.declarations.push(LoweredDeclaration {
            name,
            span: span.into(),
            exported,
            kind,
        });
    }

    fn lower_class(&mut self, class: &ast::Class<'_>, exported: bool) -> Option<String> {
        let name = class.id.as_ref()?.name.to_string();
        let mut members = Vec::new();
        let mut constructor_parameters = None;

        for element in &class.body.body {
            match element {
                ast::ClassElement::MethodDefinition(method) => {
                    if method.kind == ast::MethodDefinitionKind::Constructor {
                        constructor_parameters = Some(
                            method
                                .value
                                .params
                                .items
                                .iter()
                                .map(|param| self.lower_ctor_parameter(param))
                                .collect(),
                        );
                        continue;
                    }
                    let Some(member_name) = method.key.static_name() else {
                        continue;
                    };
                    let kind = match method.kind {
                        ast::MethodDefinitionKind::Get => ClassMemberKind::Getter,
                        ast::MethodDefinitionKind::Set => ClassMemberKind::Setter,
                        _ => ClassMemberKind::Method,
                    };
                    members.push(ClassMember {
                        name: member_name.to_string(),
                        kind,
                        is_static: method.r#static,
                        value: None,
                        type_node: None,
                        decorators: self.lower_decorators(&method.decorators),
                        parameters: parameter_names(&method.value.params),
                        return_expression: method
                            .value
                            .body
                            .as_ref()
                            .and_then(|body| self.single_return(&body.statements)),
                        span: method.span.into(),
                    });
                }
                ast::ClassElement::PropertyDefinition(prop) => {
                    let Some(member_name) = prop.key.static_name() else {
                        continue;
                    };
                    members.push(ClassMember {
                        name: member_name.to_string(),
                        kind: ClassMemberKind::Property,
                        is_static: prop.r#static,
                        value: prop.value.as_ref().map(|value| self.lower_expr(value)),
                        type_node: prop
                            .type_annotation
                            .as_ref()
                            .map(|t| self.lower_type(&t.type_annotation)),
                        decorators: self.lower_decorators(&prop.decorators),
                        parameters: Vec::new(),
                        return_expression: None,
                        span: prop.span.into(),
                    });
                }
                _ => {}
            }
        }

        let kind = DeclarationKind::Class(ClassDeclaration {
            decorators: self.lower_decorators(&class.decorators),
            members,
            constructor_parameters,
            heritage: class.super_class.as_ref().map(|e| self.lower_expr(e)),
            is_ambient: self.ambient_file || class.declare,
            is_abstract: class.r#abstract,
        });
        self.push_declaration(name.clone(), class.span, exported, kind);
        Some(name)
    }

    fn lower_function(&mut self, func: &ast::Function<'_>, exported: bool) -> Option<String> {
        let name = func.id.as_ref()?.name.to_string();
        let kind = DeclarationKind::Function(FunctionDeclaration {
            parameters: parameter_names(&func.params),
            return_expression: func
                .body
                .as_ref()
                .and_then(|body| self.single_return(&body.statements)),
        });
        self.push_declaration(name.clone(), func.span, exported, kind);
        Some(name)
    }

    fn lower_variables(&mut self, decl: &ast::VariableDeclaration<'_>, exported: bool) {
        for declarator in &decl.declarations {
            let ast::BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
                continue;
            };
            let kind = DeclarationKind::Variable {
                initializer: declarator.init.as_ref().map(|init| self.lower_expr(init)),
                type_node: declarator
                    .id
                    .type_annotation
                    .as_ref()
                    .map(|t| self.lower_type(&t.type_annotation)),
            };
            self.push_declaration(id.name.to_string(), declarator.span, exported, kind);
        }
    }

    fn lower_enum(&mut self, decl: &ast::TSEnumDeclaration<'_>, exported: bool) {
        let members = decl
            .body
            .members
            .iter()
            .map(|member| EnumMember {
                name: self
                    .text(member.id.span())
                    .trim_matches(|c| c == '\'' || c == '"')
                    .to_string(),
                initializer: member.initializer.as_ref().map(|init| self.lower_expr(init)),
            })
            .collect();
        self.push_declaration(decl.id.name.to_string(), decl.span, exported, DeclarationKind::Enum(members));
    }

    fn lower_ctor_parameter(&self, param: &ast::FormalParameter<'_>) -> CtorParameter {
        let name = match &param.pattern.kind {
            ast::BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
            _ => None,
        };
        CtorParameter {
            name,
            type_node: param
                .pattern
                .type_annotation
                .as_ref()
                .map(|t| self.lower_type(&t.type_annotation)),
            decorators: self.lower_decorators(&param.decorators),
            span: param.span.into(),
        }
    }

    fn lower_decorators(&self, decorators: &[ast::Decorator<'_>]) -> Vec<Decorator> {
        decorators
            .iter()
            .filter_map(|decorator| match &decorator.expression {
                ast::Expression::CallExpression(call) => Some(Decorator {
                    name: self.text(call.callee.span()),
                    import: None,
                    args: Some(self.lower_arguments(&call.arguments)
                        .into_iter()
                        .filter_map(|arg| match arg {
                            ArrayElement::Expression(e) => Some(e),
                            _ => None,
                        })
                        .collect()),
                    span: decorator.span.into(),
                }),
                ast::Expression::Identifier(ident) => Some(Decorator {
                    name: ident.name.to_string(),
                    import: None,
                    args: None,
                    span: decorator.span.into(),
                }),
                ast::Expression::StaticMemberExpression(member) => Some(Decorator {
                    name: self.text(member.span),
                    import: None,
                    args: None,
                    span: decorator.span.into(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Fill `Decorator::import` from the file's import table. A namespaced
    /// decorator (`core.Component`) is looked up by its namespace.
    fn link_decorator_imports(&mut self) {
        let imports = &self.imports;
        let link = |decorator: &mut Decorator| {
            let head = decorator.name.split('.').next().unwrap_or_default();
            decorator.import = imports
                .iter()
                .find(|import| import.local == head)
                .map(|import| import.module.clone());
        };
        for declaration in &mut self.declarations {
            let DeclarationKind::Class(class) = &mut declaration.kind else {
                continue;
            };
            class.decorators.iter_mut().for_each(&link);
            for member in &mut class.members {
                member.decorators.iter_mut().for_each(&link);
            }
            for param in class.constructor_parameters.iter_mut().flatten() {
                param.decorators.iter_mut().for_each(&link);
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn single_return(&self, statements: &[ast::Statement<'_>]) -> Option<Expression> {
        match statements {
            [ast::Statement::ReturnStatement(ret)] => {
                ret.argument.as_ref().map(|arg| self.lower_expr(arg))
            }
            _ => None,
        }
    }

    fn lower_arguments(&self, arguments: &[ast::Argument<'_>]) -> Vec<ArrayElement> {
        arguments
            .iter()
            .map(|arg| match arg {
                ast::Argument::SpreadElement(spread) => {
                    ArrayElement::Spread(self.lower_expr(&spread.argument))
                }
                other => match other.as_expression() {
                    Some(expr) => ArrayElement::Expression(self.lower_expr(expr)),
                    None => ArrayElement::Hole,
                },
            })
            .collect()
    }

    fn lower_expr(&self, expr: &ast::Expression<'_>) -> Expression {
        let span = Span::from(expr.span());
        let kind = match expr {
            ast::Expression::StringLiteral(lit) => ExpressionKind::StringLiteral(lit.value.to_string()),
            ast::Expression::NumericLiteral(lit) => ExpressionKind::NumericLiteral(lit.value),
            ast::Expression::BooleanLiteral(lit) => ExpressionKind::BooleanLiteral(lit.value),
            ast::Expression::NullLiteral(_) => ExpressionKind::NullLiteral,
            ast::Expression::TemplateLiteral(tpl) => ExpressionKind::TemplateLiteral {
                quasis: tpl
                    .quasis
                    .iter()
                    .map(|quasi| match &quasi.value.cooked {
                        Some(cooked) => cooked.to_string(),
                        None => quasi.value.raw.to_string(),
                    })
                    .collect(),
                expressions: tpl.expressions.iter().map(|e| self.lower_expr(e)).collect(),
            },
            ast::Expression::Identifier(ident) => ExpressionKind::Identifier(ident.name.to_string()),
            ast::Expression::StaticMemberExpression(member) => ExpressionKind::PropertyAccess {
                object: Box::new(self.lower_expr(&member.object)),
                property: member.property.name.to_string(),
            },
            ast::Expression::ComputedMemberExpression(member) => ExpressionKind::ElementAccess {
                object: Box::new(self.lower_expr(&member.object)),
                index: Box::new(self.lower_expr(&member.expression)),
            },
            ast::Expression::CallExpression(call) => ExpressionKind::Call {
                callee: Box::new(self.lower_expr(&call.callee)),
                arguments: self.lower_arguments(&call.arguments),
            },
            ast::Expression::NewExpression(new_expr) => ExpressionKind::New {
                callee: Box::new(self.lower_expr(&new_expr.callee)),
                arguments: self.lower_arguments(&new_expr.arguments),
            },
            ast::Expression::ArrayExpression(array) => ExpressionKind::Array(
                array
                    .elements
                    .iter()
                    .map(|element| match element {
                        ast::ArrayExpressionElement::SpreadElement(spread) => {
                            ArrayElement::Spread(self.lower_expr(&spread.argument))
                        }
                        ast::ArrayExpressionElement::Elision(_) => ArrayElement::Hole,
                        other => match other.as_expression() {
                            Some(expr) => ArrayElement::Expression(self.lower_expr(expr)),
                            None => ArrayElement::Hole,
                        },
                    })
                    .collect(),
            ),
            ast::Expression::ObjectExpression(object) => ExpressionKind::Object(
                object
                    .properties
                    .iter()
                    .filter_map(|property| self.lower_object_member(property))
                    .collect(),
            ),
            ast::Expression::ArrowFunctionExpression(arrow) => {
                let body = if arrow.expression {
                    match arrow.body.statements.first() {
                        Some(ast::Statement::ExpressionStatement(stmt)) => {
                            Some(Box::new(self.lower_expr(&stmt.expression)))
                        }
                        _ => None,
                    }
                } else {
                    self.single_return(&arrow.body.statements).map(Box::new)
                };
                ExpressionKind::Function {
                    params: parameter_names(&arrow.params),
                    body,
                }
            }
            ast::Expression::FunctionExpression(func) => ExpressionKind::Function {
                params: parameter_names(&func.params),
                body: func
                    .body
                    .as_ref()
                    .and_then(|body| self.single_return(&body.statements))
                    .map(Box::new),
            },
            ast::Expression::ImportExpression(import) => {
                ExpressionKind::DynamicImport(Box::new(self.lower_expr(&import.source)))
            }
            ast::Expression::UnaryExpression(unary) => ExpressionKind::Unary {
                operator: unary.operator.as_str().to_string(),
                argument: Box::new(self.lower_expr(&unary.argument)),
            },
            ast::Expression::BinaryExpression(binary) => ExpressionKind::Binary {
                operator: binary.operator.as_str().to_string(),
                left: Box::new(self.lower_expr(&binary.left)),
                right: Box::new(self.lower_expr(&binary.right)),
            },
            ast::Expression::LogicalExpression(logical) => ExpressionKind::Binary {
                operator: logical.operator.as_str().to_string(),
                left: Box::new(self.lower_expr(&logical.left)),
                right: Box::new(self.lower_expr(&logical.right)),
            },
            ast::Expression::ConditionalExpression(cond) => ExpressionKind::Conditional {
                test: Box::new(self.lower_expr(&cond.test)),
                consequent: Box::new(self.lower_expr(&cond.consequent)),
                alternate: Box::new(self.lower_expr(&cond.alternate)),
            },
            // Transparent wrappers.
            ast::Expression::ParenthesizedExpression(paren) => return self.lower_expr(&paren.expression),
            ast::Expression::TSAsExpression(e) => return self.lower_expr(&e.expression),
            ast::Expression::TSSatisfiesExpression(e) => return self.lower_expr(&e.expression),
            ast::Expression::TSNonNullExpression(e) => return self.lower_expr(&e.expression),
            ast::Expression::TSTypeAssertion(e) => return self.lower_expr(&e.expression),
            ast::Expression::ThisExpression(_) => ExpressionKind::Unsupported("this"),
            ast::Expression::ClassExpression(_) => ExpressionKind::Unsupported("class expression"),
            ast::Expression::TaggedTemplateExpression(_) => {
                ExpressionKind::Unsupported("tagged template")
            }
            _ => ExpressionKind::Unsupported("expression"),
        };
        Expression::new(kind, span)
    }

    fn lower_object_member(&self, property: &ast::ObjectPropertyKind<'_>) -> Option<ObjectMember> {
        match property {
            ast::ObjectPropertyKind::ObjectProperty(prop) => {
                let key = if prop.computed {
                    PropertyName::Computed(self.lower_expr(prop.key.as_expression()?))
                } else {
                    PropertyName::Static(prop.key.static_name()?.to_string())
                };
                Some(ObjectMember::Property {
                    key,
                    value: self.lower_expr(&prop.value),
                })
            }
            ast::ObjectPropertyKind::SpreadProperty(spread) => {
                Some(ObjectMember::Spread(self.lower_expr(&spread.argument)))
            }
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn lower_type(&self, ty: &ast::TSType<'_>) -> TypeNode {
        match ty {
            ast::TSType::TSTypeReference(reference) => TypeNode::Reference {
                name: self.text(reference.type_name.span()),
                args: reference
                    .type_arguments
                    .as_ref()
                    .map(|args| args.params.iter().map(|p| self.lower_type(p)).collect())
                    .unwrap_or_default(),
            },
            ast::TSType::TSTypeQuery(query) => TypeNode::Query(self.text(query.expr_name.span())),
            ast::TSType::TSTupleType(tuple) => TypeNode::Tuple(
                tuple
                    .element_types
                    .iter()
                    .filter_map(|element| element.as_ts_type())
                    .map(|element| self.lower_type(element))
                    .collect(),
            ),
            ast::TSType::TSLiteralType(literal) => match &literal.literal {
                ast::TSLiteral::StringLiteral(s) => TypeNode::StringLiteral(s.value.to_string()),
                ast::TSLiteral::BooleanLiteral(b) => TypeNode::Keyword(b.value.to_string()),
                _ => TypeNode::Unknown,
            },
            ast::TSType::TSUnionType(union) => {
                TypeNode::Union(union.types.iter().map(|t| self.lower_type(t)).collect())
            }
            other => {
                let text = self.text(other.span());
                if !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic()) {
                    TypeNode::Keyword(text)
                } else {
                    TypeNode::Unknown
                }
            }
        }
    }
}

fn parameter_names(params: &ast::FormalParameters<'_>) -> Vec<String> {
    params
        .items
        .iter()
        .filter_map(|param| match &param.pattern.kind {
            ast::BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_named<'f>(file: &'f LoweredFile, name: &str) -> &'f ClassDeclaration {
        file.declarations
            .iter()
            .find(|d| d.name == name)
            .and_then(|d| match &d.kind {
                DeclarationKind::Class(class) => Some(class),
                _ => None,
            })
            .expect("class not lowered")
    }

    #[test]
    fn should_lower_decorated_class_with_constructor() {
        let file = lower_file(
            "/app/foo.ts",
            r#"
            import { Injectable, Inject } from '@angular/core';
            import { Dep } from './dep';

            @Injectable({ providedIn: 'root' })
            export class Foo {
                constructor(private dep: Dep, @Inject('token') value: string) {}
            }
            "#
            .to_string(),
        );
        assert!(file.diagnostics.is_empty());
        let class = class_named(&file, "Foo");
        assert_eq!(class.decorators.len(), 1);
        assert_eq!(class.decorators[0].name, "Injectable");
        assert_eq!(class.decorators[0].import.as_deref(), Some("@angular/core"));

        let params = class.constructor_parameters.as_ref().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].type_node.as_ref().and_then(|t| t.reference_name()), Some("Dep"));
        assert_eq!(params[1].decorators[0].name, "Inject");
        assert_eq!(
            params[1].decorators[0].args.as_ref().unwrap()[0].as_string_literal(),
            Some("token")
        );
        assert!(file.exports.contains(&ExportEntry::Local {
            exported: "Foo".to_string(),
            local: "Foo".to_string()
        }));
    }

    #[test]
    fn should_lower_static_markers_in_declaration_files() {
        let file = lower_file(
            "/node_modules/lib/index.d.ts",
            r#"
            import * as i0 from '@angular/core';
            import * as i1 from './dir';
            export declare class LibModule {
                static ɵmod: i0.ɵɵNgModuleDeclaration<LibModule, [typeof i1.LibDir], never, [typeof i1.LibDir]>;
            }
            "#
            .to_string(),
        );
        let class = class_named(&file, "LibModule");
        assert!(class.is_ambient);
        let marker = class.static_member("ɵmod").unwrap();
        match marker.type_node.as_ref().unwrap() {
            TypeNode::Reference { name, args } => {
                assert_eq!(name, "i0.ɵɵNgModuleDeclaration");
                assert_eq!(args.len(), 4);
                assert_eq!(args[1], TypeNode::Tuple(vec![TypeNode::Query("i1.LibDir".to_string())]));
                assert!(args[2].is_never());
            }
            other => panic!("unexpected marker type {:?}", other),
        }
    }

    #[test]
    fn should_unwrap_transparent_expressions() {
        let file = lower_file(
            "/app/consts.ts",
            "export const VALUE = (('a' as string)!);\nexport function make() { return [VALUE, ...OTHER]; }".to_string(),
        );
        let DeclarationKind::Variable { initializer, .. } = &file.declarations[0].kind else {
            panic!("expected variable");
        };
        assert_eq!(initializer.as_ref().unwrap().as_string_literal(), Some("a"));

        let DeclarationKind::Function(func) = &file.declarations[1].kind else {
            panic!("expected function");
        };
        let ret = func.return_expression.as_ref().unwrap();
        let ExpressionKind::Array(elements) = &ret.kind else {
            panic!("expected array");
        };
        assert!(matches!(elements[1], ArrayElement::Spread(_)));
    }

    #[test]
    fn should_record_reexports() {
        let file = lower_file(
            "/app/index.ts",
            "export * from './a';\nexport { B as C } from './b';".to_string(),
        );
        assert_eq!(
            file.exports,
            vec![
                ExportEntry::Star { module: "./a".to_string() },
                ExportEntry::Reexport {
                    exported: "C".to_string(),
                    name: "B".to_string(),
                    module: "./b".to_string()
                },
            ]
        );
    }
}
