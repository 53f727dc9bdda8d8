pub mod src {
    pub mod config;
    pub mod container;
    pub mod workspace;
}

pub use src::config::*;
pub use src::container::*;
pub use src::workspace::*;
