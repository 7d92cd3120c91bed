//! Wire-level types shared by the client and resource accessors.

pub mod envelope;
pub mod payload;

pub use envelope::{ApiErrorBody, Envelope, Page, Wrapped};
pub use payload::Payload;
