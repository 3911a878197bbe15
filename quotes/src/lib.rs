//! # quotes
//!
//! Request-level quote operations: [`AccessFilter`] computes which channels a requester may see,
//! [`QuoteService`] runs every store query through it, and [`present`] turns results into a single
//! page or a pagination session.

mod access;
mod browse;
mod command;
mod error;
mod service;

#[cfg(test)]
mod test;

pub use access::{AccessFilter, AccessSet};
pub use browse::{present, Presentation};
pub use command::{parse_add_command, ADD_SEPARATOR};
pub use error::QuoteError;
pub use service::{QuoteService, ReferencedMessage, RequestContext};
