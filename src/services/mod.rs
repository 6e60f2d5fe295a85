pub mod catalog_service;
pub mod client_service;
pub mod invoice_service;
pub mod notification_service;
pub mod order_service;

pub use catalog_service::*;
pub use client_service::*;
pub use invoice_service::*;
pub use notification_service::*;
pub use order_service::*;
