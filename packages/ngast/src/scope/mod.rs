pub mod src {
    pub mod api;
    pub mod component_scope;
    pub mod local;
    pub mod standalone;
}

pub use src::api::*;
pub use src::component_scope::*;
pub use src::local::*;
pub use src::standalone::*;

#[cfg(test)]
mod test;
