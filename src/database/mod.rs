pub mod connection;

pub use connection::{DbPool, create_pool, run_migrations};

#[cfg(test)]
pub mod test_support;
