pub mod src {
    pub mod lazy_routes;
}

pub use src::lazy_routes::*;

#[cfg(test)]
mod test;
