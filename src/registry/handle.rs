//! Cloneable façade over a session worker.

use tokio::sync::{mpsc, oneshot};

use super::worker::SessionCommand;
use crate::core::{Command, GameError, MatchId, ParticipantId, Result};
use crate::session::{GameSession, MatchSnapshot};

/// Client-facing handle to one hosted match.
///
/// Every clone talks to the same worker, so commands sent from any clone
/// are applied in a single total order.
#[derive(Clone)]
pub struct SessionHandle {
    match_id: MatchId,
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(match_id: MatchId, command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self {
            match_id,
            command_tx,
        }
    }

    #[must_use]
    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    /// Whether the worker has stopped (match deleted).
    ///
    /// Commands sent through a closed handle fail with `NotFound`.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// Apply a command as `actor`.
    pub async fn execute(&self, actor: ParticipantId, command: Command) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::Execute {
                actor,
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;

        reply_rx.await.map_err(|_| GameError::ChannelClosed)?
    }

    /// Snapshot as seen by `viewer` (`None` for a spectator).
    pub async fn snapshot(&self, viewer: Option<ParticipantId>) -> Result<MatchSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::Snapshot {
                viewer,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;

        reply_rx.await.map_err(|_| GameError::ChannelClosed)?
    }

    /// Clone of the committed session (read-only).
    pub async fn query(&self) -> Result<GameSession> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SessionCommand::Query { reply: reply_tx })
            .await
            .map_err(|_| self.gone())?;

        reply_rx.await.map_err(|_| GameError::ChannelClosed)?
    }

    fn gone(&self) -> GameError {
        GameError::NotFound(format!("match {}", self.match_id))
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("match_id", &self.match_id)
            .finish()
    }
}
