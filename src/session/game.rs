//! The match aggregate and its command state machine.
//!
//! ## Lifecycle
//!
//! `Unregistered -> Registered -> Started -> Ended`. Registration binds the
//! two slots, start instantiates decks and resources once, and the match
//! ends when an attack on a player drops that player's life to zero or
//! below.
//!
//! ## Atomicity
//!
//! Every command runs against a staged clone of the session and is
//! committed only when it succeeds. Zones are `im` collections, so the
//! clone is O(1) and a rejected command leaves the session exactly as it
//! was, including the RNG stream.
//!
//! ## Check order
//!
//! Gameplay commands check authorization first (the actor must hold the
//! moving slot), then lifecycle (`NotStarted`, `AlreadyEnded`), then cards
//! and zones, then resources.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combat::{resolve_creature_combat, resolve_player_strike};
use super::player::PlayerSlot;
use super::resources::MatchResources;
use crate::cards::{CardCatalog, CardInstance, DeckList};
use crate::core::{
    Command, CommandRecord, EntityId, GameError, GameRng, MatchConfig, MatchId, ParticipantId,
    Result, SlotId, SlotPair,
};
use crate::zones::ZoneKind;

/// A two-player match.
///
/// ## Example
///
/// ```
/// use ccg_arena::cards::{CardCatalog, DeckList};
/// use ccg_arena::core::{GameRng, MatchConfig, ParticipantId};
/// use ccg_arena::session::GameSession;
///
/// let catalog = CardCatalog::new();
/// let alice = ParticipantId::new("alice");
/// let bob = ParticipantId::new("bob");
///
/// let mut session = GameSession::new("room", MatchConfig::default(), GameRng::new(7));
/// session.register(&alice, DeckList::new()).unwrap();
/// session.register(&bob, DeckList::new()).unwrap();
/// session.start(&alice, &catalog).unwrap();
///
/// assert!(session.is_started());
/// assert_eq!(session.turn(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    match_id: MatchId,
    config: MatchConfig,
    slots: SlotPair<PlayerSlot>,

    /// Incremented on every end of turn; 0 at start.
    turn: u32,

    started: bool,
    ended: bool,
    winner: Option<ParticipantId>,

    rng: GameRng,

    /// Next card instance id.
    next_entity: EntityId,

    /// Most recent successfully applied commands, oldest first, capped at
    /// `config.history_limit`.
    history: Vector<CommandRecord>,

    /// Successful commands over the whole match.
    commands_applied: u64,
}

impl GameSession {
    /// Create an unstarted session with two free slots.
    #[must_use]
    pub fn new(match_id: impl Into<MatchId>, config: MatchConfig, rng: GameRng) -> Self {
        let slots = SlotPair::new(|slot| PlayerSlot::empty(&config, slot == SlotId::First));
        Self {
            match_id: match_id.into(),
            config,
            slots,
            turn: 0,
            started: false,
            ended: false,
            winner: None,
            rng,
            next_entity: EntityId::FIRST,
            history: Vector::new(),
            commands_applied: 0,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Both slots bound to a participant.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.slots.iter().all(|(_, slot)| slot.is_bound())
    }

    #[must_use]
    pub fn winner(&self) -> Option<&ParticipantId> {
        self.winner.as_ref()
    }

    #[must_use]
    pub fn slot(&self, slot: SlotId) -> &PlayerSlot {
        &self.slots[slot]
    }

    #[must_use]
    pub fn slots(&self) -> &SlotPair<PlayerSlot> {
        &self.slots
    }

    /// The slot whose turn it is.
    #[must_use]
    pub fn moving_slot(&self) -> SlotId {
        SlotId::BOTH
            .into_iter()
            .find(|&slot| self.slots[slot].is_moving)
            .unwrap_or(SlotId::First)
    }

    #[must_use]
    pub fn waiting_slot(&self) -> SlotId {
        self.moving_slot().other()
    }

    /// Slot bound to `actor`, if any.
    #[must_use]
    pub fn slot_of(&self, actor: &ParticipantId) -> Option<SlotId> {
        SlotId::BOTH
            .into_iter()
            .find(|&slot| self.slots[slot].is_held_by(actor))
    }

    #[must_use]
    pub fn history(&self) -> &Vector<CommandRecord> {
        &self.history
    }

    /// Successful commands over the whole match, including records already
    /// dropped from [`history`](Self::history).
    #[must_use]
    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    // === Commands ===

    /// Apply an inbound command.
    pub fn apply(
        &mut self,
        actor: &ParticipantId,
        command: Command,
        catalog: &CardCatalog,
    ) -> Result<()> {
        match command {
            Command::Register { deck } => self.register(actor, deck),
            Command::Start => self.start(actor, catalog),
            Command::EndTurn => self.end_turn(actor),
            Command::Summon {
                hand_position,
                field_position,
            } => self.summon(actor, hand_position, field_position, catalog),
            Command::Attack {
                attacker_position,
                defender_position,
            } => self.attack(actor, attacker_position, defender_position),
            Command::AttackPlayer {
                attacker_position,
                defending_player,
            } => self.attack_player(actor, attacker_position, &defending_player),
            Command::Delete => self.delete(actor),
        }
    }

    /// Claim a slot.
    ///
    /// With both slots free a fair coin picks the actor's slot. With one
    /// free, the actor takes it unless already bound. Otherwise a no-op.
    pub fn register(&mut self, actor: &ParticipantId, deck: DeckList) -> Result<()> {
        let command = Command::Register { deck: deck.clone() };
        self.commit(actor, command, |session| {
            session.bind_participant(actor, deck);
            Ok(())
        })
    }

    /// Start the match.
    ///
    /// Instantiates every deck-list entry into the owner's deck zone and
    /// sets starting resources. Hands start empty.
    pub fn start(&mut self, actor: &ParticipantId, catalog: &CardCatalog) -> Result<()> {
        self.commit(actor, Command::Start, |session| {
            session.stage_start(actor, catalog)
        })
    }

    /// Pass the turn to the waiting slot.
    pub fn end_turn(&mut self, actor: &ParticipantId) -> Result<()> {
        self.commit(actor, Command::EndTurn, |session| {
            session.stage_end_turn(actor)
        })
    }

    /// Move a creature from hand to field, paying its cost.
    pub fn summon(
        &mut self,
        actor: &ParticipantId,
        hand_position: usize,
        field_position: usize,
        catalog: &CardCatalog,
    ) -> Result<()> {
        let command = Command::Summon {
            hand_position,
            field_position,
        };
        self.commit(actor, command, |session| {
            session.stage_summon(actor, hand_position, field_position, catalog)
        })
    }

    /// Fight an opposing creature.
    pub fn attack(
        &mut self,
        actor: &ParticipantId,
        attacker_position: usize,
        defender_position: usize,
    ) -> Result<()> {
        let command = Command::Attack {
            attacker_position,
            defender_position,
        };
        self.commit(actor, command, |session| {
            session.stage_attack(actor, attacker_position, defender_position)
        })
    }

    /// Strike the waiting player directly.
    pub fn attack_player(
        &mut self,
        actor: &ParticipantId,
        attacker_position: usize,
        defending_player: &str,
    ) -> Result<()> {
        let command = Command::AttackPlayer {
            attacker_position,
            defending_player: defending_player.to_string(),
        };
        self.commit(actor, command, |session| {
            session.stage_attack_player(actor, attacker_position, defending_player)
        })
    }

    /// Validate deletion of a started match by one of its participants.
    ///
    /// The owner discards the session once this succeeds.
    pub fn delete(&mut self, actor: &ParticipantId) -> Result<()> {
        self.commit(actor, Command::Delete, |session| {
            if session.slot_of(actor).is_none() {
                return Err(GameError::unauthorized(actor));
            }
            if !session.started {
                return Err(GameError::NotStarted);
            }
            Ok(())
        })
    }

    // === Staging ===

    /// Run `stage` on a clone and swap it in on success.
    fn commit(
        &mut self,
        actor: &ParticipantId,
        command: Command,
        stage: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let kind = command.kind();
        let mut staged = self.clone();

        if let Err(err) = stage(&mut staged) {
            debug!(
                match_id = %self.match_id,
                actor = %actor,
                command = ?kind,
                error = ?err.kind(),
                "command rejected"
            );
            return Err(err);
        }

        let sequence = staged.commands_applied;
        staged.commands_applied = sequence.saturating_add(1);
        staged
            .history
            .push_back(CommandRecord::new(actor.clone(), command, self.turn, sequence));
        while staged.history.len() > staged.config.history_limit {
            staged.history.pop_front();
        }
        *self = staged;

        debug!(
            match_id = %self.match_id,
            actor = %actor,
            command = ?kind,
            turn = self.turn,
            "command applied"
        );
        Ok(())
    }

    fn bind_participant(&mut self, actor: &ParticipantId, deck: DeckList) {
        let first_free = !self.slots[SlotId::First].is_bound();
        let second_free = !self.slots[SlotId::Second].is_bound();

        let target = match (first_free, second_free) {
            (true, true) => {
                if self.rng.coin_flip() {
                    SlotId::First
                } else {
                    SlotId::Second
                }
            }
            (true, false) => SlotId::First,
            (false, true) => SlotId::Second,
            (false, false) => return,
        };

        if self.slot_of(actor).is_none() {
            self.slots[target].bind(actor.clone(), deck);
        }
    }

    fn stage_start(&mut self, actor: &ParticipantId, catalog: &CardCatalog) -> Result<()> {
        if self.slot_of(actor).is_none() {
            return Err(GameError::unauthorized(actor));
        }
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        if !self.is_registered() {
            return Err(GameError::NotRegistered);
        }

        for slot in SlotId::BOTH {
            let deck_list = self.slots[slot].deck_list.clone();
            for card in deck_list.expand() {
                catalog.resolve(card)?;
                let entity_id = self.allocate_entity();
                self.slots[slot]
                    .deck
                    .add(CardInstance::new(entity_id, card), None)?;
            }
            self.slots[slot].resources = MatchResources::starting(&self.config);
            self.slots[slot].is_moving = slot == SlotId::First;
        }

        self.turn = 0;
        self.started = true;
        Ok(())
    }

    fn stage_end_turn(&mut self, actor: &ParticipantId) -> Result<()> {
        let mover = self.authorize_mover(actor)?;
        let next = mover.other();

        for (_, slot) in self.slots.iter_mut() {
            slot.is_moving = !slot.is_moving;
            slot.field.for_each_mut(|card| {
                if let Some(stats) = card.combat_mut() {
                    stats.upkeep();
                }
            });
        }
        self.turn += 1;

        let hand_capacity = self.config.hand_capacity;
        let player = &mut self.slots[next];
        let drawn = player.deck.remove_random(&mut self.rng)?;
        let position = player.hand.next_free_position().ok_or(GameError::ZoneFull {
            zone: ZoneKind::Hand,
            capacity: hand_capacity,
        })?;
        player.hand.add(drawn, Some(position))?;
        player.resources.grow_and_refill(self.config.mana_growth);

        Ok(())
    }

    fn stage_summon(
        &mut self,
        actor: &ParticipantId,
        hand_position: usize,
        field_position: usize,
        catalog: &CardCatalog,
    ) -> Result<()> {
        let mover = self.authorize_mover(actor)?;
        let attacks_per_turn = self.config.attacks_per_turn;
        let player = &mut self.slots[mover];

        let in_hand = player.hand.get(hand_position).ok_or_else(|| {
            GameError::InvalidCard(format!("no card at hand position {}", hand_position))
        })?;
        let template = catalog.resolve(in_hand.card)?;
        let summoned = in_hand.enter_field(template, attacks_per_turn)?;

        player.field.check_insert(Some(field_position))?;
        player.resources.spend(template.cost)?;

        player.hand.remove_at(hand_position)?;
        player.field.add(summoned, Some(field_position))?;
        Ok(())
    }

    fn stage_attack(
        &mut self,
        actor: &ParticipantId,
        attacker_position: usize,
        defender_position: usize,
    ) -> Result<()> {
        let mover = self.authorize_mover(actor)?;
        let (mine, theirs) = self.slots.split_mut(mover);

        let attacker = field_creature(mine, attacker_position)?;
        let defender = field_creature(theirs, defender_position)?;
        attacker.field_stats()?.ensure_can_attack()?;

        let outcome =
            resolve_creature_combat(attacker.field_stats_mut()?, defender.field_stats_mut()?);

        if outcome.attacker_destroyed {
            mine.field.remove_at(attacker_position)?;
        }
        if outcome.defender_destroyed {
            theirs.field.remove_at(defender_position)?;
        }
        Ok(())
    }

    fn stage_attack_player(
        &mut self,
        actor: &ParticipantId,
        attacker_position: usize,
        defending_player: &str,
    ) -> Result<()> {
        let mover = self.authorize_mover(actor)?;
        let (mine, theirs) = self.slots.split_mut(mover);

        let attacker = field_creature(mine, attacker_position)?;
        if theirs.name() != Some(defending_player) {
            return Err(GameError::AttackInvalidPlayer {
                named: defending_player.to_string(),
            });
        }
        attacker.field_stats()?.ensure_can_attack()?;

        let defeated = resolve_player_strike(attacker.field_stats_mut()?, &mut theirs.resources);
        if defeated {
            self.ended = true;
            self.winner = Some(actor.clone());
        }
        Ok(())
    }

    /// Gameplay precondition: actor holds the moving slot, match is live.
    fn authorize_mover(&self, actor: &ParticipantId) -> Result<SlotId> {
        let mover = self.moving_slot();
        if !self.slots[mover].is_held_by(actor) {
            return Err(GameError::unauthorized(actor));
        }
        if !self.started {
            return Err(GameError::NotStarted);
        }
        if self.ended {
            return Err(GameError::AlreadyEnded);
        }
        Ok(mover)
    }

    fn allocate_entity(&mut self) -> EntityId {
        let id = self.next_entity;
        self.next_entity = id.next();
        id
    }
}

/// Creature on `slot`'s field at `position`, or `InvalidCard`.
fn field_creature(slot: &mut PlayerSlot, position: usize) -> Result<&mut CardInstance> {
    slot.field
        .get_mut(position)
        .ok_or_else(|| {
            GameError::InvalidCard(format!("no creature at field position {}", position))
        })
}
