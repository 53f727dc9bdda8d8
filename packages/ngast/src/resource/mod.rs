pub mod src {
    pub mod api;
    pub mod loader;
    pub mod resolvers;
}

pub use src::api::*;
pub use src::loader::*;
pub use src::resolvers::*;
