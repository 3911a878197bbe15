//! # Pagination
//!
//! Interactive browsing of an already-fetched result set. A [`PaginationSession`] splits the items into
//! pages of [`PAGE_SIZE`], honors navigation only from the requester, and closes once no accepted input
//! arrives before its deadline. [`SessionRegistry`] drives sessions on background tasks and routes
//! navigation events to them by rendered-surface id.

mod input;
mod registry;
mod session;

pub use input::ChannelInput;
pub use registry::SessionRegistry;
pub use session::{
    paginate, PaginationSession, SessionState, Transition, DEFAULT_PAGE_TIMEOUT, PAGE_SIZE,
};
