//! Audit events emitted after every mutating step.
//!
//! The engine appends a `GameEvent` to an `EventSink` for each state change;
//! the sink is the external recorder used for audit, replay, and UI feeds.
//! `EventLog` is the in-memory implementation used by tests and by callers
//! that drain events into a store.

use crate::ids::CardId;
use crate::match_state::Side;

/// The kind of state change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    TurnStart,
    TurnEnd,
    PhaseChanged,
    CardDrawn,
    NormalSummon,
    TributeSummon,
    TributePaid,
    MonsterSet,
    SpellSet,
    TrapSet,
    FlipSummon,
    PositionChanged,
    SpellActivated,
    TrapActivated,
    AttackDeclared,
    BattleResolved,
    DirectAttack,
    CardDestroyed,
    CardToGraveyard,
    CardToHand,
    CardToDeck,
    CardBanished,
    SpecialSummon,
    LifeChanged,
    HandLimitEnforced,
    EffectActivated,
    EffectNegated,
    MatchEnded,
}

/// One structured audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct GameEvent {
    /// Turn number the event occurred on.
    pub turn: u32,
    /// The side the event is attributed to.
    pub side: Side,
    pub kind: EventKind,
    /// Human-readable description for logs and spectator feeds.
    pub description: String,
    /// The card most directly involved, when there is one.
    pub card: Option<CardId>,
}

impl GameEvent {
    pub fn new(turn: u32, side: Side, kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            turn,
            side,
            kind,
            description: description.into(),
            card: None,
        }
    }

    pub fn with_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }
}

/// Append-only recorder the engine reports every mutation to.
pub trait EventSink {
    fn record(&mut self, event: GameEvent);
}

/// In-memory event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Kinds in emission order, for asserting event sequences in tests.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }

    /// Removes and returns all recorded events, e.g. to hand to a store.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Sink that discards everything. For callers that replay known-good actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: GameEvent) {}
}
