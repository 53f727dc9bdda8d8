pub mod src {
    pub mod template_node;
    pub mod transform;
}

pub use src::template_node::*;
pub use src::transform::*;
