//! Durable session store boundary.
//!
//! The registry saves a session after every committed command and deletes
//! it when the match is torn down. Sessions never reach the store on their
//! own; the store is always an injected collaborator.

use std::sync::RwLock;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::MatchId;
use crate::session::GameSession;

/// Infrastructure failures surfaced by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session store lock was poisoned")]
    LockPoisoned,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted session data: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence for match sessions, keyed by match id.
pub trait SessionStore: Send + Sync {
    /// Save (or overwrite) a session.
    fn save(&self, session: &GameSession) -> StoreResult<()>;

    /// Load a session, `None` if absent.
    fn load(&self, match_id: &MatchId) -> StoreResult<Option<GameSession>>;

    fn exists(&self, match_id: &MatchId) -> bool;

    /// Delete a session. Deleting an absent id is not an error.
    fn delete(&self, match_id: &MatchId) -> StoreResult<()>;

    /// All stored match ids, sorted.
    fn list(&self) -> StoreResult<Vec<MatchId>> {
        Ok(vec![])
    }
}

/// In-memory store holding bincode-encoded sessions.
///
/// Encoding on every save keeps the same round trip a durable backend
/// would perform.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<FxHashMap<MatchId, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &GameSession) -> StoreResult<()> {
        let bytes =
            bincode::serialize(session).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut sessions = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        sessions.insert(session.match_id().clone(), bytes);
        Ok(())
    }

    fn load(&self, match_id: &MatchId) -> StoreResult<Option<GameSession>> {
        let sessions = self.sessions.read().map_err(|_| StoreError::LockPoisoned)?;
        sessions
            .get(match_id)
            .map(|bytes| {
                bincode::deserialize(bytes)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {}", match_id, e)))
            })
            .transpose()
    }

    fn exists(&self, match_id: &MatchId) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.contains_key(match_id))
            .unwrap_or(false)
    }

    fn delete(&self, match_id: &MatchId) -> StoreResult<()> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        sessions.remove(match_id);
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<MatchId>> {
        let sessions = self.sessions.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut ids: Vec<MatchId> = sessions.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, MatchConfig};

    fn session(id: &str) -> GameSession {
        GameSession::new(id, MatchConfig::default(), GameRng::new(3))
    }

    #[test]
    fn test_save_load_delete() {
        let store = MemoryStore::new();
        let original = session("room");

        store.save(&original).unwrap();
        assert!(store.exists(&MatchId::new("room")));

        let loaded = store.load(&MatchId::new("room")).unwrap();
        assert_eq!(loaded, Some(original));

        store.delete(&MatchId::new("room")).unwrap();
        assert!(!store.exists(&MatchId::new("room")));
        assert_eq!(store.load(&MatchId::new("room")).unwrap(), None);
    }

    #[test]
    fn test_list_is_sorted() {
        let store = MemoryStore::new();
        store.save(&session("b")).unwrap();
        store.save(&session("a")).unwrap();

        assert_eq!(
            store.list().unwrap(),
            vec![MatchId::new("a"), MatchId::new("b")]
        );
    }

    #[test]
    fn test_corrupt_bytes() {
        let store = MemoryStore::new();
        store
            .sessions
            .write()
            .unwrap()
            .insert(MatchId::new("room"), vec![0xff, 0x01]);

        let err = store.load(&MatchId::new("room")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
