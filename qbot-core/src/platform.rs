//! Collaborator traits implemented by the chat platform integration.
//!
//! The core never talks to a concrete platform: channel visibility, navigation input and page
//! rendering all come through these traits.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChannelId, GuildId, NavEvent, Page, SurfaceId, UserId};

/// Answers "can this member view this channel". Every channel kind that supports a view check
/// is exposed through the same capability.
#[async_trait]
pub trait ChannelPermissionOracle: Send + Sync {
    /// Channels that currently exist in the guild. Deleted channels are absent.
    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelId>>;
    /// Whether `requester` may view `channel_id`.
    async fn can_view(&self, requester: UserId, channel_id: ChannelId) -> Result<bool>;
}

/// Source of navigation input for one rendered surface.
#[async_trait]
pub trait ControlInputSource: Send {
    /// Waits up to `timeout` for the next event. `Ok(None)` means the wait timed out.
    async fn next_event(&mut self, timeout: Duration) -> Result<Option<NavEvent>>;
}

/// Displays a page on a rendered surface.
#[async_trait]
pub trait RenderSink<T: Send + Sync>: Send + Sync {
    async fn show(&self, surface_id: SurfaceId, page: &Page<T>) -> Result<()>;
}
