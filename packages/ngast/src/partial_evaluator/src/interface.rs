// Interface
//
// Public entry point of the partial evaluator.

use super::interpreter::{Context, Scope, StaticInterpreter};
use super::result::ResolvedValue;
use crate::incremental::FileDependencyGraph;
use std::rc::Rc;
use ts::{DeclarationId, Expression, ExpressionKind, Program};

pub struct PartialEvaluator {
    program: Rc<Program>,
    dependencies: Rc<FileDependencyGraph>,
    max_depth: usize,
}

impl PartialEvaluator {
    pub fn new(program: Rc<Program>, dependencies: Rc<FileDependencyGraph>, max_depth: usize) -> Self {
        Self {
            program,
            dependencies,
            max_depth,
        }
    }

    /// Evaluate `expr` as it appears in `file`.
    pub fn evaluate(&self, expr: &Expression, file: &str) -> ResolvedValue {
        self.evaluate_with_bindings(expr, file, &Scope::new())
    }

    /// Evaluate `expr` with some identifiers already bound, as inside a
    /// function body.
    pub fn evaluate_with_bindings(&self, expr: &Expression, file: &str, bindings: &Scope) -> ResolvedValue {
        let mut interpreter = StaticInterpreter::new(&self.program, &self.dependencies, self.max_depth);
        interpreter.visit(expr, &Context { file, scope: bindings })
    }

    /// Value of a declaration as if referenced by name in its own file.
    pub fn evaluate_declaration(&self, id: DeclarationId) -> ResolvedValue {
        let decl = self.program.declaration(id);
        let node = Expression::new(ExpressionKind::Identifier(decl.name.clone()), decl.span);
        let empty = Scope::new();
        let mut interpreter = StaticInterpreter::new(&self.program, &self.dependencies, self.max_depth);
        interpreter.visit_declaration(
            &node,
            id,
            &Context {
                file: &decl.file,
                scope: &empty,
            },
        )
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn dependencies(&self) -> &FileDependencyGraph {
        &self.dependencies
    }
}
