//! Per-match serial executor.
//!
//! Each hosted match gets one `SessionWorker` task that owns the
//! authoritative [`GameSession`]. Commands reach it over an mpsc channel and
//! are applied strictly one at a time, so two commands for the same match
//! never interleave. Workers for different matches share nothing but the
//! read-only catalog and the store/sink collaborators.

use std::sync::Arc;

use smallvec::SmallVec;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::sink::{BroadcastSink, MatchUpdate, ViewerSnapshot};
use super::store::SessionStore;
use crate::cards::CardCatalog;
use crate::core::{Command, CommandKind, GameError, ParticipantId, Result};
use crate::session::{GameSession, MatchSnapshot};

/// Messages accepted by a session worker.
pub(crate) enum SessionCommand {
    /// Apply a match command.
    Execute {
        actor: ParticipantId,
        command: Command,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Build the snapshot `viewer` may see.
    Snapshot {
        viewer: Option<ParticipantId>,
        reply: oneshot::Sender<Result<MatchSnapshot>>,
    },
    /// Clone the committed session (read-only).
    Query {
        reply: oneshot::Sender<Result<GameSession>>,
    },
}

/// Background task owning one match.
pub(crate) struct SessionWorker {
    session: GameSession,
    catalog: Arc<CardCatalog>,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn BroadcastSink>,
    command_rx: mpsc::Receiver<SessionCommand>,
}

impl SessionWorker {
    pub(crate) fn new(
        session: GameSession,
        catalog: Arc<CardCatalog>,
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn BroadcastSink>,
        command_rx: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        Self {
            session,
            catalog,
            store,
            sink,
            command_rx,
        }
    }

    /// Main worker loop. Ends when every handle is dropped or the match is
    /// deleted.
    ///
    /// Commands already queued behind a successful delete are answered with
    /// `NotFound`.
    pub(crate) async fn run(mut self) {
        debug!(match_id = %self.session.match_id(), "session worker started");

        while let Some(cmd) = self.command_rx.recv().await {
            if self.handle_command(cmd) {
                break;
            }
        }

        self.command_rx.close();
        while let Some(cmd) = self.command_rx.recv().await {
            self.reject(cmd);
        }

        debug!(match_id = %self.session.match_id(), "session worker stopped");
    }

    /// Returns `true` once the match has been deleted.
    fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Execute {
                actor,
                command,
                reply,
            } => {
                let deleting = command.kind() == CommandKind::Delete;
                let result = self.execute(&actor, command);
                let deleted = deleting && result.is_ok();
                if deleted {
                    // handles observe the closed channel before the reply lands
                    self.command_rx.close();
                }
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
                deleted
            }
            SessionCommand::Snapshot { viewer, reply } => {
                let snapshot = MatchSnapshot::build(&self.session, viewer.as_ref(), &self.catalog);
                if reply.send(snapshot).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
                false
            }
            SessionCommand::Query { reply } => {
                if reply.send(Ok(self.session.clone())).is_err() {
                    debug!("Query reply channel closed (caller dropped)");
                }
                false
            }
        }
    }

    fn reject(&self, cmd: SessionCommand) {
        let gone = GameError::NotFound(format!("match {}", self.session.match_id()));
        let delivered = match cmd {
            SessionCommand::Execute { reply, .. } => reply.send(Err(gone)).is_ok(),
            SessionCommand::Snapshot { reply, .. } => reply.send(Err(gone)).is_ok(),
            SessionCommand::Query { reply } => reply.send(Err(gone)).is_ok(),
        };
        if !delivered {
            debug!("Rejection reply channel closed (caller dropped)");
        }
    }

    /// Apply, persist, then publish.
    ///
    /// A store failure rolls the in-memory session back to the last saved
    /// state, so memory and store never diverge.
    fn execute(&mut self, actor: &ParticipantId, command: Command) -> Result<()> {
        let kind = command.kind();
        let previous = self.session.clone();

        self.session.apply(actor, command, &self.catalog)?;

        if kind == CommandKind::Delete {
            if let Err(err) = self.store.delete(self.session.match_id()) {
                warn!(
                    match_id = %self.session.match_id(),
                    error = %err,
                    "failed to delete session"
                );
                self.session = previous;
                return Err(err.into());
            }
            info!(match_id = %self.session.match_id(), actor = %actor, "match deleted");
            return Ok(());
        }

        if let Err(err) = self.store.save(&self.session) {
            warn!(match_id = %self.session.match_id(), error = %err, "failed to save session");
            self.session = previous;
            return Err(err.into());
        }

        if kind == CommandKind::Start {
            info!(match_id = %self.session.match_id(), "match started");
        }
        if self.session.is_ended() && !previous.is_ended() {
            info!(
                match_id = %self.session.match_id(),
                winner = ?self.session.winner(),
                "match ended"
            );
        }

        self.publish();
        Ok(())
    }

    fn publish(&self) {
        match self.build_update() {
            Ok(update) => self.sink.publish(update),
            Err(err) => {
                warn!(
                    match_id = %self.session.match_id(),
                    error = %err,
                    "failed to build match update"
                );
            }
        }
    }

    fn build_update(&self) -> Result<MatchUpdate> {
        let mut views = SmallVec::new();
        views.push(ViewerSnapshot {
            viewer: None,
            snapshot: MatchSnapshot::build(&self.session, None, &self.catalog)?,
        });
        for (_, slot) in self.session.slots().iter() {
            if let Some(participant) = &slot.participant {
                views.push(ViewerSnapshot {
                    viewer: Some(participant.clone()),
                    snapshot: MatchSnapshot::build(
                        &self.session,
                        Some(participant),
                        &self.catalog,
                    )?,
                });
            }
        }
        Ok(MatchUpdate {
            match_id: self.session.match_id().clone(),
            views,
        })
    }
}
