pub mod src {
    pub mod capturing_logger;
    pub mod console_logger;
    pub mod logger;
}

pub use src::capturing_logger::*;
pub use src::console_logger::*;
pub use src::logger::*;
