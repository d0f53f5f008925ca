//! Process-wide map from match id to its serial executor.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info};

use super::handle::SessionHandle;
use super::sink::BroadcastSink;
use super::store::SessionStore;
use super::worker::SessionWorker;
use crate::cards::CardCatalog;
use crate::core::{
    GameError, GameRng, InboundCommand, MatchId, ParticipantId, RegistryConfig, Result, SlotId,
};
use crate::session::{GameSession, MatchSnapshot};

/// One row of the room list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub match_id: MatchId,
    /// `None` while the slot is free.
    pub first: Option<String>,
    pub second: Option<String>,
    pub started: bool,
    pub ended: bool,
}

impl From<&GameSession> for RoomSummary {
    fn from(session: &GameSession) -> Self {
        Self {
            match_id: session.match_id().clone(),
            first: session.slot(SlotId::First).name().map(str::to_string),
            second: session.slot(SlotId::Second).name().map(str::to_string),
            started: session.is_started(),
            ended: session.is_ended(),
        }
    }
}

/// Live matches, each behind its own worker.
///
/// The registry lock guards only the id map; commands run inside the
/// owning worker, so matches proceed in parallel. A worker that stops
/// (after a delete, however it was sent) drops out of the map; until that
/// cleanup runs, a closed entry is treated as absent.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use ccg_arena::cards::{CardCatalog, DeckList};
/// use ccg_arena::core::{Command, InboundCommand, RegistryConfig};
/// use ccg_arena::registry::{MemoryStore, NullSink, SessionRegistry};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let registry = SessionRegistry::new(
///         RegistryConfig::default().with_seed(1),
///         Arc::new(CardCatalog::new()),
///         Arc::new(MemoryStore::new()),
///         Arc::new(NullSink),
///     );
///
///     registry.host("room").await.unwrap();
///     let register = Command::Register { deck: DeckList::new() };
///     registry
///         .execute(InboundCommand::new("room", "alice", register))
///         .await
///         .unwrap();
///
///     let rooms = registry.list().await.unwrap();
///     assert_eq!(rooms.len(), 1);
///     assert!(rooms[0].first.is_some() || rooms[0].second.is_some());
/// });
/// ```
pub struct SessionRegistry {
    config: RegistryConfig,
    catalog: Arc<CardCatalog>,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn BroadcastSink>,
    sessions: Arc<RwLock<FxHashMap<MatchId, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new(
        config: RegistryConfig,
        catalog: Arc<CardCatalog>,
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn BroadcastSink>,
    ) -> Self {
        Self {
            config,
            catalog,
            store,
            sink,
            sessions: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Create a new, unstarted match.
    ///
    /// Fails with `SessionExists` if the id is live or stored.
    pub async fn host(&self, match_id: impl Into<MatchId>) -> Result<SessionHandle> {
        let match_id = match_id.into();
        let mut sessions = self.sessions.write().await;

        if is_live(&sessions, &match_id) || self.store.exists(&match_id) {
            return Err(GameError::SessionExists(match_id));
        }

        let rng = match self.config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let session = GameSession::new(match_id.clone(), self.config.match_config.clone(), rng);
        self.store.save(&session)?;

        let handle = self.spawn(session);
        sessions.insert(match_id.clone(), handle.clone());
        info!(match_id = %match_id, "match hosted");
        Ok(handle)
    }

    /// Bring a stored match back online.
    ///
    /// Fails with `SessionExists` if it is already live and `NotFound` if
    /// the store has no such match.
    pub async fn restore(&self, match_id: impl Into<MatchId>) -> Result<SessionHandle> {
        let match_id = match_id.into();
        let mut sessions = self.sessions.write().await;

        if is_live(&sessions, &match_id) {
            return Err(GameError::SessionExists(match_id));
        }

        let session = self
            .store
            .load(&match_id)?
            .ok_or_else(|| GameError::NotFound(format!("match {}", match_id)))?;

        let handle = self.spawn(session);
        sessions.insert(match_id.clone(), handle.clone());
        info!(match_id = %match_id, "match restored");
        Ok(handle)
    }

    /// Handle to a live match.
    pub async fn handle(&self, match_id: &MatchId) -> Result<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(match_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("match {}", match_id)))
    }

    /// Route an inbound command to its match.
    ///
    /// After a successful `Delete` the match is gone: lookups fail with
    /// `NotFound` and the id can be hosted again.
    pub async fn execute(&self, inbound: InboundCommand) -> Result<()> {
        let InboundCommand {
            match_id,
            actor,
            command,
        } = inbound;

        self.handle(&match_id).await?.execute(actor, command).await
    }

    /// Snapshot of a live match as `viewer` sees it.
    pub async fn snapshot(
        &self,
        match_id: &MatchId,
        viewer: Option<ParticipantId>,
    ) -> Result<MatchSnapshot> {
        self.handle(match_id).await?.snapshot(viewer).await
    }

    /// Summaries of all live matches, sorted by id.
    pub async fn list(&self) -> Result<Vec<RoomSummary>> {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();

        let mut rooms = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.query().await {
                Ok(session) => rooms.push(RoomSummary::from(&session)),
                // deleted between the read and the query
                Err(GameError::ChannelClosed | GameError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        rooms.sort_by(|a, b| a.match_id.cmp(&b.match_id));
        Ok(rooms)
    }

    /// Number of live matches.
    pub async fn len(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|handle| !handle.is_closed())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains(&self, match_id: &MatchId) -> bool {
        is_live(&*self.sessions.read().await, match_id)
    }

    fn spawn(&self, session: GameSession) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let match_id = session.match_id().clone();
        let worker = SessionWorker::new(
            session,
            Arc::clone(&self.catalog),
            Arc::clone(&self.store),
            Arc::clone(&self.sink),
            command_rx,
        );
        let sessions = Arc::clone(&self.sessions);
        let task_match_id = match_id.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::spawn(worker.run()).await {
                error!(match_id = %task_match_id, error = %err, "session worker aborted");
            }

            let mut sessions = sessions.write().await;
            if sessions.get(&task_match_id).is_some_and(SessionHandle::is_closed) {
                sessions.remove(&task_match_id);
                debug!(match_id = %task_match_id, "match dropped from registry");
            }
        });

        SessionHandle::new(match_id, command_tx)
    }
}

fn is_live(sessions: &FxHashMap<MatchId, SessionHandle>, match_id: &MatchId) -> bool {
    sessions.get(match_id).is_some_and(|handle| !handle.is_closed())
}
