//! # qbot-core
//!
//! Core types and traits shared by the quote bot crates: identifiers, navigation events, [`Page`],
//! the platform collaborator traits ([`ChannelPermissionOracle`], [`ControlInputSource`], [`RenderSink`])
//! and tracing initialization. Transport-agnostic; the chat platform plugs in through the traits.

pub mod error;
pub mod logger;
pub mod platform;
pub mod types;

pub use error::{QbotError, Result};
pub use logger::init_tracing;
pub use platform::{ChannelPermissionOracle, ControlInputSource, RenderSink};
pub use types::{
    ChannelId, GuildId, NavEvent, NavKind, Page, SurfaceId, UserId, LEGACY_CHANNEL_ID,
};
