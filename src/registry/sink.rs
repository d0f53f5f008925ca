//! Outbound broadcast boundary.
//!
//! After every committed command the session's worker publishes a
//! [`MatchUpdate`]: one snapshot per bound participant (each with only
//! their own hand) plus a spectator snapshot. The transport routes each
//! view to the matching connections.

use smallvec::SmallVec;
use tokio::sync::broadcast;
use tracing::debug;

use crate::core::{MatchId, ParticipantId, RegistryConfig};
use crate::session::MatchSnapshot;

/// A snapshot addressed to one viewer. `viewer: None` is the spectator view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerSnapshot {
    pub viewer: Option<ParticipantId>,
    pub snapshot: MatchSnapshot,
}

/// Post-command state of a match, per viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchUpdate {
    pub match_id: MatchId,
    pub views: SmallVec<[ViewerSnapshot; 3]>,
}

impl MatchUpdate {
    /// Snapshot for `viewer`, falling back to the spectator view.
    #[must_use]
    pub fn for_viewer(&self, viewer: Option<&ParticipantId>) -> Option<&MatchSnapshot> {
        self.views
            .iter()
            .find(|v| v.viewer.as_ref() == viewer)
            .or_else(|| self.views.iter().find(|v| v.viewer.is_none()))
            .map(|v| &v.snapshot)
    }
}

/// Receives post-command updates. Publishing is fire-and-forget.
pub trait BroadcastSink: Send + Sync {
    fn publish(&self, update: MatchUpdate);
}

/// Sink backed by a `tokio` broadcast channel.
pub struct ChannelSink {
    sender: broadcast::Sender<MatchUpdate>,
}

impl ChannelSink {
    /// Sink whose subscribers each buffer up to `capacity` updates.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sink sized by `broadcast_buffer_size`.
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.broadcast_buffer_size)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchUpdate> {
        self.sender.subscribe()
    }
}

impl BroadcastSink for ChannelSink {
    fn publish(&self, update: MatchUpdate) {
        let match_id = update.match_id.clone();
        if self.sender.send(update).is_err() {
            debug!(match_id = %match_id, "no subscribers for match update");
        }
    }
}

/// Sink that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BroadcastSink for NullSink {
    fn publish(&self, _update: MatchUpdate) {}
}
