pub mod client;
pub mod email;
pub mod order;
pub mod product;

pub use client::client_config;
pub use email::email_config;
pub use order::order_config;
pub use product::product_config;
