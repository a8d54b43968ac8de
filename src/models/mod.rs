//! Data models for the photo tagging service.
//!
//! Wire models use camelCase to match the backend and the presentation client.

mod attendee;
mod page;
mod tag;

pub use attendee::*;
pub use page::*;
pub use tag::*;
