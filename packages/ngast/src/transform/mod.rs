pub mod src {
    pub mod api;
    pub mod compilation;
    pub mod trait_;
}


pub use src::api::*;
pub use src::compilation::*;
pub use src::trait_::*;
