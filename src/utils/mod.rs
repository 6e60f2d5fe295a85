pub mod invoice_number;

pub use invoice_number::{format_invoice_number, parse_invoice_number};
