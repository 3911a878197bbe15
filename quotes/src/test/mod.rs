//! Unit test module
//!
//! Service and access tests run against an in-memory QuoteRepository and a scripted
//! permission oracle.


use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use qbot_core::{ChannelId, ChannelPermissionOracle, GuildId, QbotError, UserId};

/// Permission oracle whose channels and grants can change mid-test.
#[derive(Default)]
pub(crate) struct MockOracle {
    channels: Mutex<HashMap<GuildId, Vec<ChannelId>>>,
    grants: Mutex<HashSet<(UserId, ChannelId)>>,
    failing: Mutex<bool>,
    calls: AtomicUsize,
}

impl MockOracle {
    pub(crate) fn with_channels(guild_id: GuildId, channels: &[ChannelId]) -> Self {
        let oracle = Self::default();
        oracle.channels.lock().unwrap().insert(guild_id, channels.to_vec());
        oracle
    }

    pub(crate) fn grant(&self, user: UserId, channel_id: ChannelId) {
        self.grants.lock().unwrap().insert((user, channel_id));
    }

    pub(crate) fn revoke(&self, user: UserId, channel_id: ChannelId) {
        self.grants.lock().unwrap().remove(&(user, channel_id));
    }

    pub(crate) fn delete_channel(&self, guild_id: GuildId, channel_id: ChannelId) {
        if let Some(channels) = self.channels.lock().unwrap().get_mut(&guild_id) {
            channels.retain(|c| *c != channel_id);
        }
    }

    pub(crate) fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelPermissionOracle for MockOracle {
    async fn guild_channels(&self, guild_id: GuildId) -> qbot_core::Result<Vec<ChannelId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(QbotError::Platform("oracle unavailable".to_string()));
        }
        Ok(self
            .channels
            .lock()
            .unwrap()
            .get(&guild_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn can_view(&self, requester: UserId, channel_id: ChannelId) -> qbot_core::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.grants.lock().unwrap().contains(&(requester, channel_id)))
    }
}
