// Annotations Common Source Module

pub mod api;
pub mod di;
pub mod evaluation;
pub mod util;

// Re-exports
pub use api::{HandlerContext, SourceExpression};
pub use di::{
    analyze_constructor_dependencies, get_constructor_dependencies, unwrap_constructor_dependencies,
    ConstructorDepError, ConstructorDeps, InjectFlags, R3Dependency, UnavailableValueKind,
};
pub(crate) use evaluation::error;
pub use evaluation::{
    core_enum_member, read_decorator_argument, ChangeDetectionStrategy, ObjectReader, ViewEncapsulation,
};
pub use util::{
    decorator_short_name, find_angular_decorator, flatten_list, get_angular_decorators, is_angular_core,
    is_angular_decorator, ListEntry, CORE_MODULE,
};
