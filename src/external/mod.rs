pub mod resend;

pub use resend::{EmailMessage, ResendService};
