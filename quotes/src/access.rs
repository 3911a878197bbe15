//! Channel visibility for a requester.
//!
//! The access set is `{0} ∪ {visible channels of the guild}`. It is recomputed on every call so
//! permission changes apply immediately.

use std::collections::BTreeSet;
use std::sync::Arc;

use qbot_core::{ChannelId, ChannelPermissionOracle, GuildId, Result, UserId, LEGACY_CHANNEL_ID};
use tracing::{debug, instrument};

/// Channel ids a requester may currently view. Always contains the legacy channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSet {
    channels: BTreeSet<ChannelId>,
}

impl AccessSet {
    pub fn legacy_only() -> Self {
        Self {
            channels: BTreeSet::from([LEGACY_CHANNEL_ID]),
        }
    }

    pub fn contains(&self, channel_id: ChannelId) -> bool {
        self.channels.contains(&channel_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Ascending channel ids, ready to bind into a query scope.
    pub fn to_vec(&self) -> Vec<ChannelId> {
        self.channels.iter().copied().collect()
    }
}

impl Extend<ChannelId> for AccessSet {
    fn extend<I: IntoIterator<Item = ChannelId>>(&mut self, iter: I) {
        self.channels.extend(iter);
    }
}

/// Computes visibility through a [`ChannelPermissionOracle`]. Never touches storage.
#[derive(Clone)]
pub struct AccessFilter {
    oracle: Arc<dyn ChannelPermissionOracle>,
}

impl AccessFilter {
    pub fn new(oracle: Arc<dyn ChannelPermissionOracle>) -> Self {
        Self { oracle }
    }

    #[instrument(skip(self))]
    pub async fn accessible_channel_ids(
        &self,
        requester: UserId,
        guild_id: GuildId,
    ) -> Result<AccessSet> {
        let mut access = AccessSet::legacy_only();
        for channel_id in self.oracle.guild_channels(guild_id).await? {
            if channel_id == LEGACY_CHANNEL_ID {
                continue;
            }
            if self.oracle.can_view(requester, channel_id).await? {
                access.extend([channel_id]);
            }
        }

        debug!(channels = access.len(), "Computed access set");
        Ok(access)
    }

    /// Whether `requester` may see quotes from `channel_id`. Channels no longer in the guild are hidden.
    pub async fn can_access(
        &self,
        requester: UserId,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<bool> {
        if channel_id == LEGACY_CHANNEL_ID {
            return Ok(true);
        }

        let exists = self
            .oracle
            .guild_channels(guild_id)
            .await?
            .contains(&channel_id);
        if !exists {
            return Ok(false);
        }

        self.oracle.can_view(requester, channel_id).await
    }
}
