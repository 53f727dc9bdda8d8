pub mod src {
    pub mod api;
    pub mod dts;
    pub mod registry;
}

pub use src::api::*;
pub use src::dts::*;
pub use src::registry::*;

#[cfg(test)]
mod test;
