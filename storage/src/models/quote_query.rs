//! Filter for multi-row quote queries.
//!
//! Used by QuoteRepository::list, count and random_one.

use qbot_core::{ChannelId, GuildId};
use serde::{Deserialize, Serialize};

/// Guild scope, optional author substring and the channel scope a query is restricted to.
///
/// `channels` is the complete allow-list: a quote whose `channel_id` is not in it never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteQuery {
    pub guild_id: GuildId,
    /// Case-insensitive substring of the author; `None` matches every author.
    pub author: Option<String>,
    pub channels: Vec<ChannelId>,
}

impl QuoteQuery {
    pub fn new(guild_id: GuildId, channels: Vec<ChannelId>) -> Self {
        Self {
            guild_id,
            author: None,
            channels,
        }
    }

    /// Sets the author filter. Blank filters are dropped.
    pub fn with_author(mut self, author: Option<&str>) -> Self {
        self.author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        self
    }
}
