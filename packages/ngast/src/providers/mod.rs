pub mod src {
    pub mod api;
    pub mod registry;
}

pub use src::api::*;
pub use src::registry::*;
