//! The tagging page: attendee loading, filtering, paging, selection and submission.

mod loader;
mod normalize;
mod page;
mod pager;
mod registry;
mod selection;
mod submitter;
mod view;

pub use page::{PageAction, PageHandle, PageSettings};
pub use registry::{spawn_idle_sweeper, PageRegistry};
