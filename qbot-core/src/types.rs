//! Core types: identifiers, navigation input and page views.

use serde::{Deserialize, Serialize};

pub type GuildId = i64;
pub type ChannelId = i64;
pub type UserId = i64;
/// Identity of a rendered message a pagination session is attached to.
pub type SurfaceId = i64;

/// Channel id recorded for quotes whose origin is unknown. Always visible.
pub const LEGACY_CHANNEL_ID: ChannelId = 0;

/// Direction of a navigation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKind {
    Next,
    Prev,
}

/// A navigation input as delivered by the interactive surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEvent {
    pub actor_id: UserId,
    pub kind: NavKind,
}

impl NavEvent {
    pub fn next(actor_id: UserId) -> Self {
        Self {
            actor_id,
            kind: NavKind::Next,
        }
    }

    pub fn prev(actor_id: UserId) -> Self {
        Self {
            actor_id,
            kind: NavKind::Prev,
        }
    }
}

/// One page of a result set, as handed to a [`crate::RenderSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Zero-based page index.
    pub index: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// One-based label such as `2/3`, used in page titles.
    pub fn label(&self) -> String {
        format!("{}/{}", self.index + 1, self.total_pages)
    }
}
