pub mod client;
pub mod common;
pub mod order;
pub mod product;
pub mod stats;

pub use client::*;
pub use common::*;
pub use order::*;
pub use product::*;
pub use stats::*;
