// TypeScript Reflection Host
//
// `ReflectionHost` over the lowered declarations of a `ts::Program`.

use super::host::{ConstructorParameters, ReflectionHost};
use std::collections::HashSet;
use std::rc::Rc;
use ts::{ClassMember, Decorator, DeclarationId, Expression, Program, ResolvedSymbol, TypeCheckingContext};

pub struct TypeScriptReflectionHost {
    program: Rc<Program>,
}

impl TypeScriptReflectionHost {
    pub fn new(program: Rc<Program>) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl ReflectionHost for TypeScriptReflectionHost {
    fn get_decorators_of_declaration(&self, id: DeclarationId) -> &[Decorator] {
        match self.program.declaration(id).as_class() {
            Some(class) => &class.decorators,
            None => &[],
        }
    }

    fn get_members_of_class(&self, id: DeclarationId) -> &[ClassMember] {
        TypeCheckingContext::get_members_of_class(&*self.program, id)
    }

    fn get_constructor_parameters(&self, id: DeclarationId) -> Option<ConstructorParameters<'_>> {
        let mut visited = HashSet::new();
        let mut current = id;
        loop {
            let class = self.program.declaration(current).as_class()?;
            if let Some(parameters) = &class.constructor_parameters {
                return Some(ConstructorParameters {
                    owner: current,
                    parameters,
                });
            }
            visited.insert(current);
            let base = self.get_base_class(current)?;
            if visited.contains(&base) {
                return None;
            }
            current = base;
        }
    }

    fn get_base_class_expression(&self, id: DeclarationId) -> Option<&Expression> {
        self.program.declaration(id).as_class()?.heritage.as_ref()
    }

    fn get_base_class(&self, id: DeclarationId) -> Option<DeclarationId> {
        let heritage = self.get_base_class_expression(id)?;
        let file = &self.program.declaration(id).file;
        match self.program.resolve_entity_name(&heritage.to_string(), file)? {
            ResolvedSymbol::Declaration(base) if self.program.declaration(base).is_class() => Some(base),
            _ => None,
        }
    }

    fn is_class(&self, id: DeclarationId) -> bool {
        self.program.declaration(id).is_class()
    }

    fn is_ambient(&self, id: DeclarationId) -> bool {
        self.program
            .declaration(id)
            .as_class()
            .map_or(false, |class| class.is_ambient)
    }
}
