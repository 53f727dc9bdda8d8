pub mod src {
    pub mod component;
    pub mod declarable;
    pub mod module;
    pub mod symbol;
}

pub use src::component::*;
pub use src::declarable::*;
pub use src::module::*;
pub use src::symbol::*;
