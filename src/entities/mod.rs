pub mod clients;
pub mod order_products;
pub mod orders;
pub mod products;

pub use clients as client_entity;
pub use order_products as order_product_entity;
pub use orders as order_entity;
pub use products as product_entity;
