pub mod src {
    pub mod dynamic;
    pub mod interface;
    pub mod interpreter;
    pub mod result;
}

pub use src::dynamic::*;
pub use src::interface::*;
pub use src::interpreter::Scope;
pub use src::result::*;

#[cfg(test)]
mod test;
