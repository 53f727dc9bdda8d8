use ts::{ClassMember, CtorParameter, Decorator, DeclarationId, Expression};

/// Constructor parameters of a class, possibly inherited from a base class.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorParameters<'a> {
    /// The class that declares the constructor.
    pub owner: DeclarationId,
    pub parameters: &'a [CtorParameter],
}

/// Abstracts reflection operations over the declaration model.
pub trait ReflectionHost {
    fn get_decorators_of_declaration(&self, id: DeclarationId) -> &[Decorator];

    fn get_members_of_class(&self, id: DeclarationId) -> &[ClassMember];

    /// Parameters of the nearest constructor up the `extends` chain. `None`
    /// when no class in the chain declares one.
    fn get_constructor_parameters(&self, id: DeclarationId) -> Option<ConstructorParameters<'_>>;

    fn get_base_class_expression(&self, id: DeclarationId) -> Option<&Expression>;

    /// The base class, when it is a class of this program.
    fn get_base_class(&self, id: DeclarationId) -> Option<DeclarationId>;

    fn has_base_class(&self, id: DeclarationId) -> bool {
        self.get_base_class_expression(id).is_some()
    }

    fn is_class(&self, id: DeclarationId) -> bool;

    /// `declare class` or a class from a declaration file.
    fn is_ambient(&self, id: DeclarationId) -> bool;
}
