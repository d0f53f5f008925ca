//! Session registry integration tests.
//!
//! Exercises hosting, routing, broadcast, persistence and the per-match
//! serial executor under concurrent load.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ccg_arena::cards::{CardCatalog, CardRef, CardTemplate, DeckList, TemplateId};
use ccg_arena::core::{
    Command, ErrorKind, GameError, InboundCommand, MatchId, ParticipantId, RegistryConfig, SlotId,
};
use ccg_arena::registry::{
    BroadcastSink, ChannelSink, MemoryStore, NullSink, SessionRegistry, SessionStore, StoreError,
    StoreResult,
};
use ccg_arena::session::GameSession;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn catalog() -> Arc<CardCatalog> {
    let mut catalog = CardCatalog::new();
    catalog
        .publish(CardTemplate::monster(TemplateId::new(1), "Squire", 1, 2, 3))
        .unwrap();
    Arc::new(catalog)
}

fn deck() -> DeckList {
    DeckList::new().with(CardRef::monster(1), 10)
}

fn registry_with(store: Arc<dyn SessionStore>) -> Arc<SessionRegistry> {
    Arc::new(SessionRegistry::new(
        RegistryConfig::default().with_seed(9),
        catalog(),
        store,
        Arc::new(NullSink),
    ))
}

fn cmd(match_id: &str, actor: &ParticipantId, command: Command) -> InboundCommand {
    InboundCommand::new(match_id, actor.clone(), command)
}

/// Host, register alice and bob, start. Returns (first mover, second).
async fn start_match(registry: &SessionRegistry, match_id: &str) -> (ParticipantId, ParticipantId) {
    let alice = ParticipantId::new("alice");
    let bob = ParticipantId::new("bob");

    registry.host(match_id).await.unwrap();
    for who in [&alice, &bob] {
        registry
            .execute(cmd(match_id, who, Command::Register { deck: deck() }))
            .await
            .unwrap();
    }
    registry
        .execute(cmd(match_id, &alice, Command::Start))
        .await
        .unwrap();

    let session = query(registry, match_id).await;
    let first = session.slot(SlotId::First).participant.clone().unwrap();
    let second = session.slot(SlotId::Second).participant.clone().unwrap();
    (first, second)
}

async fn query(registry: &SessionRegistry, match_id: &str) -> GameSession {
    registry
        .handle(&MatchId::new(match_id))
        .await
        .unwrap()
        .query()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_host_and_play() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));

    let (first, second) = start_match(&registry, "room").await;
    registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap();
    registry
        .execute(cmd(
            "room",
            &second,
            Command::Summon {
                hand_position: 0,
                field_position: 0,
            },
        ))
        .await
        .unwrap();

    let session = query(&registry, "room").await;
    assert_eq!(session.turn(), 1);
    assert_eq!(session.slot(SlotId::Second).field.len(), 1);
    assert_eq!(session.history().len(), 5);
}

#[tokio::test]
async fn test_host_conflict() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));

    registry.host("room").await.unwrap();
    let err = registry.host("room").await.unwrap_err();

    assert_eq!(err, GameError::SessionExists(MatchId::new("room")));
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn test_unknown_match() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let alice = ParticipantId::new("alice");

    let err = registry
        .execute(cmd("nowhere", &alice, Command::EndTurn))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = registry
        .snapshot(&MatchId::new("nowhere"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_room_list() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let alice = ParticipantId::new("alice");

    registry.host("b").await.unwrap();
    registry.host("a").await.unwrap();
    registry
        .execute(cmd("b", &alice, Command::Register { deck: deck() }))
        .await
        .unwrap();

    let rooms = registry.list().await.unwrap();

    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].match_id, MatchId::new("a"));
    assert_eq!(rooms[0].first, None);
    assert_eq!(rooms[0].second, None);
    assert!(!rooms[0].started);

    let seated: Vec<_> = [&rooms[1].first, &rooms[1].second]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    assert_eq!(seated, vec!["alice".to_string()]);
}

#[tokio::test]
async fn test_broadcast_hides_opponent_hand() {
    init_tracing();
    let config = RegistryConfig::default().with_seed(9);
    let sink = Arc::new(ChannelSink::from_config(&config));
    let mut updates = sink.subscribe();
    let registry = SessionRegistry::new(
        config,
        catalog(),
        Arc::new(MemoryStore::new()),
        Arc::clone(&sink) as Arc<dyn BroadcastSink>,
    );

    let (first, second) = start_match(&registry, "room").await;
    registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap();

    // register, register, start, end turn
    let mut last = None;
    for _ in 0..4 {
        last = Some(updates.recv().await.unwrap());
    }
    let update = last.unwrap();

    let theirs = update.for_viewer(Some(&second)).unwrap();
    assert_eq!(theirs.hand.as_ref().map(|h| h.len()), Some(1));

    let mine = update.for_viewer(Some(&first)).unwrap();
    assert_eq!(mine.hand.as_ref().map(|h| h.len()), Some(0));

    let spectator = update.for_viewer(None).unwrap();
    assert!(spectator.hand.is_none());
    assert_eq!(spectator.turn, 1);
    assert_eq!(spectator.player(SlotId::Second).unwrap().deck_count, 9);
}

#[tokio::test]
async fn test_failed_command_is_not_broadcast() {
    init_tracing();
    let sink = Arc::new(ChannelSink::new(64));
    let mut updates = sink.subscribe();
    let registry = SessionRegistry::new(
        RegistryConfig::default(),
        catalog(),
        Arc::new(MemoryStore::new()),
        Arc::clone(&sink) as Arc<dyn BroadcastSink>,
    );

    let (_, second) = start_match(&registry, "room").await;
    for _ in 0..3 {
        updates.recv().await.unwrap();
    }

    let err = registry
        .execute(cmd("room", &second, Command::EndTurn))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn test_per_viewer_snapshot() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let id = MatchId::new("room");

    registry.host("room").await.unwrap();
    let bare = registry.snapshot(&id, None).await.unwrap();
    assert!(!bare.started);
    assert!(bare.players.is_empty());

    let (first, second) = start_match(&registry, "game").await;
    registry
        .execute(cmd("game", &first, Command::EndTurn))
        .await
        .unwrap();

    let game = MatchId::new("game");
    let view = registry.snapshot(&game, Some(second)).await.unwrap();
    assert!(view.started);
    assert_eq!(view.players.len(), 2);
    assert_eq!(view.hand.map(|h| h.len()), Some(1));

    let outsider = registry
        .snapshot(&game, Some(ParticipantId::new("eve")))
        .await
        .unwrap();
    assert!(outsider.hand.is_none());
}

#[tokio::test]
async fn test_delete_match() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let alice = ParticipantId::new("alice");

    registry.host("lobby").await.unwrap();
    registry
        .execute(cmd("lobby", &alice, Command::Register { deck: deck() }))
        .await
        .unwrap();
    let err = registry
        .execute(cmd("lobby", &alice, Command::Delete))
        .await
        .unwrap_err();
    assert_eq!(err, GameError::NotStarted);
    assert!(registry.contains(&MatchId::new("lobby")).await);

    let (first, _) = start_match(&registry, "room").await;
    let err = registry
        .execute(cmd("room", &ParticipantId::new("eve"), Command::Delete))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    registry
        .execute(cmd("room", &first, Command::Delete))
        .await
        .unwrap();
    assert!(!registry.contains(&MatchId::new("room")).await);
    assert_eq!(registry.len().await, 1);

    let err = registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_removes_stored_session() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store) as Arc<dyn SessionStore>);
    let id = MatchId::new("room");

    let (first, _) = start_match(&registry, "room").await;
    assert!(store.exists(&id));

    registry
        .execute(cmd("room", &first, Command::Delete))
        .await
        .unwrap();

    assert!(!store.exists(&id));
    assert_eq!(
        registry.restore("room").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_delete_through_handle() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let id = MatchId::new("room");

    let (first, _) = start_match(&registry, "room").await;
    let handle = registry.handle(&id).await.unwrap();

    // the end turn is queued behind the delete
    let (deleted, queued) = tokio::join!(
        handle.execute(first.clone(), Command::Delete),
        handle.execute(first.clone(), Command::EndTurn),
    );
    deleted.unwrap();
    assert_eq!(queued.unwrap_err().kind(), ErrorKind::NotFound);

    assert!(handle.is_closed());
    assert!(!registry.contains(&id).await);
    assert!(registry.is_empty().await);
    assert!(registry.list().await.unwrap().is_empty());

    let err = registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = handle
        .execute(first.clone(), Command::EndTurn)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    registry.host("room").await.unwrap();
    assert!(registry.contains(&id).await);
    assert!(!query(&registry, "room").await.is_started());
}

#[tokio::test]
async fn test_restore_from_store() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store) as Arc<dyn SessionStore>);

    let (first, _) = start_match(&registry, "room").await;
    registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap();
    let played = query(&registry, "room").await;

    let err = registry.restore("room").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SessionExists);

    // A fresh process over the same store.
    let revived = registry_with(Arc::clone(&store) as Arc<dyn SessionStore>);
    assert_eq!(
        revived.host("room").await.unwrap_err().kind(),
        ErrorKind::SessionExists
    );
    revived.restore("room").await.unwrap();

    let restored = query(&revived, "room").await;
    assert_eq!(restored, played);
    assert_eq!(restored.turn(), 1);
}

#[tokio::test]
async fn test_concurrent_commands_apply_serially() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let (first, second) = start_match(&registry, "busy").await;

    let mut tasks = Vec::new();
    for i in 0..40 {
        let registry = Arc::clone(&registry);
        let actor = if i % 2 == 0 { first.clone() } else { second.clone() };
        tasks.push(tokio::spawn(async move {
            registry
                .execute(InboundCommand::new("busy", actor, Command::EndTurn))
                .await
        }));
    }

    let mut applied = 0u32;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            applied += 1;
        }
    }

    let session = query(&registry, "busy").await;
    assert!(applied > 0);
    assert_eq!(session.turn(), applied);
    assert_eq!(session.history().len(), 3 + applied as usize);

    let movers = SlotId::BOTH
        .iter()
        .filter(|&&slot| session.slot(slot).is_moving)
        .count();
    assert_eq!(movers, 1);
}

#[tokio::test]
async fn test_matches_run_independently() {
    init_tracing();
    let registry = registry_with(Arc::new(MemoryStore::new()));

    let mut tasks = Vec::new();
    for n in 0..8 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            let id = format!("room-{}", n);
            let (first, second) = start_match(&registry, &id).await;
            for turn in 0..n {
                let mover = if turn % 2 == 0 { &first } else { &second };
                registry
                    .execute(cmd(&id, mover, Command::EndTurn))
                    .await
                    .unwrap();
            }
            (id, n)
        }));
    }

    for task in tasks {
        let (id, turns) = task.await.unwrap();
        assert_eq!(query(&registry, &id).await.turn(), turns);
    }
    assert_eq!(registry.len().await, 8);
}

/// Store whose saves can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl SessionStore for FlakyStore {
    fn save(&self, session: &GameSession) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Serialization("disk full".into()));
        }
        self.inner.save(session)
    }

    fn load(&self, match_id: &MatchId) -> StoreResult<Option<GameSession>> {
        self.inner.load(match_id)
    }

    fn exists(&self, match_id: &MatchId) -> bool {
        self.inner.exists(match_id)
    }

    fn delete(&self, match_id: &MatchId) -> StoreResult<()> {
        self.inner.delete(match_id)
    }
}

#[tokio::test]
async fn test_store_failure_rolls_back() {
    init_tracing();
    let store = Arc::new(FlakyStore::default());
    let registry = registry_with(Arc::clone(&store) as Arc<dyn SessionStore>);
    let (first, _) = start_match(&registry, "room").await;

    store.failing.store(true, Ordering::SeqCst);
    let err = registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(query(&registry, "room").await.turn(), 0);

    store.failing.store(false, Ordering::SeqCst);
    registry
        .execute(cmd("room", &first, Command::EndTurn))
        .await
        .unwrap();
    assert_eq!(query(&registry, "room").await.turn(), 1);
}
