pub mod src {
    pub mod api;
    pub mod dependency_tracking;
}

pub use src::api::*;
pub use src::dependency_tracking::*;
