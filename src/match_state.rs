//! The authoritative match aggregate.
//!
//! One `MatchState` owns everything about a single game: both sides' zones,
//! life points, the turn state, and the two centralized per-turn collections
//! (once-per-turn usage and expiring stat modifiers) that the turn-boundary
//! routine clears in one place.
//!
//! Every engine operation takes the aggregate by exclusive reference and
//! either completes atomically or leaves it untouched. Different matches
//! share no state.

use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use rand::rng;
use rand::seq::SliceRandom;

use crate::board::Board;
use crate::card::CardRegistry;
use crate::ids::{CardId, PlayerId};
use crate::zone::Zone;

/// Life points each player starts with.
pub const STARTING_LIFE: u32 = 8000;
/// Maximum hand size enforced at end of turn.
pub const HAND_LIMIT: usize = 6;
/// Cards drawn by each player at match start.
pub const OPENING_HAND: usize = 5;

/// Which seat a player occupies. All board-side selection is typed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Host,
    Challenger,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Host, Side::Challenger];

    pub fn opponent(self) -> Side {
        match self {
            Side::Host => Side::Challenger,
            Side::Challenger => Side::Host,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Host => 0,
            Side::Challenger => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Host => write!(f, "host"),
            Side::Challenger => write!(f, "challenger"),
        }
    }
}

/// A pair of values indexed by `Side`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct SideMap<T>([T; 2]);

impl<T> SideMap<T> {
    pub fn new(host: T, challenger: T) -> Self {
        Self([host, challenger])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.iter().map(move |&side| (side, &self[side]))
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        &self.0[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        &mut self.0[side.index()]
    }
}

/// The phase cycle within one turn. Transitions live in `turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Draw,
    Standby,
    Main1,
    Battle,
    Main2,
    End,
}

impl Phase {
    /// Returns true in either of the acting player's main phases.
    pub fn is_main(&self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Draw => write!(f, "draw"),
            Phase::Standby => write!(f, "standby"),
            Phase::Main1 => write!(f, "main1"),
            Phase::Battle => write!(f, "battle"),
            Phase::Main2 => write!(f, "main2"),
            Phase::End => write!(f, "end"),
        }
    }
}

/// Turn tracking: whose turn, which phase, how many turns so far.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Monotonically increasing, starting at 1.
    pub number: u32,
    pub active: Side,
    pub phase: Phase,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum WinReason {
    /// The loser's life points reached zero.
    LifeDepleted,
    /// The loser could not draw a required card.
    DeckOut,
    Forfeit,
}

/// Terminal result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOutcome {
    pub winner: Side,
    pub reason: WinReason,
}

/// An ATK/DEF modifier applied to a board card. Non-persistent entries are
/// cleared by the turn-boundary routine; all entries for a card are dropped
/// when it leaves the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub card: CardId,
    pub attack: i32,
    pub defense: i32,
    pub persistent: bool,
}

/// One player's zones and per-turn flags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub player: PlayerId,
    /// Ordered; index 0 is the top (next draw).
    pub deck: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub board: Board,
    pub graveyard: Vec<CardId>,
    pub banished: Vec<CardId>,
    pub life: u32,
    pub normal_summon_used: bool,
}

impl PlayerState {
    pub fn new(player: PlayerId, deck: Vec<CardId>) -> Self {
        Self {
            player,
            deck,
            hand: Vec::new(),
            board: Board::new(),
            graveyard: Vec::new(),
            banished: Vec::new(),
            life: STARTING_LIFE,
            normal_summon_used: false,
        }
    }
}

/// The authoritative aggregate for one match.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub sides: SideMap<PlayerState>,
    pub turn: TurnState,
    /// Source cards whose once-per-turn effect has been used this turn.
    pub once_per_turn_used: HashSet<CardId>,
    /// Centralized modifier list; see `StatModifier`.
    pub modifiers: Vec<StatModifier>,
    /// In-flight attack declaration (Some between declare and resolve).
    pub pending_attack: Option<crate::combat::PendingAttack>,
    /// Set exactly once when a terminal condition is reached.
    pub outcome: Option<MatchOutcome>,
}

impl MatchState {
    /// Creates a match with decks in the given order and empty hands.
    /// Tests use this directly; production callers go through `start`.
    pub fn new(
        host: PlayerId,
        host_deck: Vec<CardId>,
        challenger: PlayerId,
        challenger_deck: Vec<CardId>,
    ) -> Self {
        Self {
            sides: SideMap::new(
                PlayerState::new(host, host_deck),
                PlayerState::new(challenger, challenger_deck),
            ),
            turn: TurnState {
                number: 1,
                active: Side::Host,
                phase: Phase::Draw,
            },
            once_per_turn_used: HashSet::new(),
            modifiers: Vec::new(),
            pending_attack: None,
            outcome: None,
        }
    }

    /// Creates a match with shuffled decks and opening hands drawn.
    /// The host takes the first turn and skips its first draw-phase draw.
    pub fn start(
        host: PlayerId,
        host_deck: Vec<CardId>,
        challenger: PlayerId,
        challenger_deck: Vec<CardId>,
    ) -> Self {
        let mut state = Self::new(host, host_deck, challenger, challenger_deck);
        for side in Side::BOTH {
            state.sides[side].deck.shuffle(&mut rng());
            for _ in 0..OPENING_HAND {
                state.draw_card(side);
            }
        }
        state
    }

    pub fn side(&self, side: Side) -> &PlayerState {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut PlayerState {
        &mut self.sides[side]
    }

    /// Maps an external player identity to its seat.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.sides[side].player == player)
    }

    pub fn is_active(&self, side: Side) -> bool {
        self.turn.active == side
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Records the terminal outcome. The first terminal condition wins;
    /// later calls are ignored.
    pub fn set_outcome(&mut self, winner: Side, reason: WinReason) {
        if self.outcome.is_none() {
            self.outcome = Some(MatchOutcome { winner, reason });
        }
    }

    /// Finds which side and zone currently hold a card instance.
    /// Zone uniqueness means the first hit is the only hit.
    pub fn locate(&self, card: CardId) -> Option<(Side, Zone)> {
        for side in Side::BOTH {
            let state = &self.sides[side];
            if state.hand.contains(&card) {
                return Some((side, Zone::Hand));
            }
            if let Some(zone) = state.board.zone_of(card) {
                return Some((side, zone));
            }
            if state.deck.contains(&card) {
                return Some((side, Zone::Deck));
            }
            if state.graveyard.contains(&card) {
                return Some((side, Zone::Graveyard));
            }
            if state.banished.contains(&card) {
                return Some((side, Zone::Banished));
            }
        }
        None
    }

    /// The side whose board holds this monster, if any.
    pub fn monster_side(&self, card: CardId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.sides[side].board.monster(card).is_some())
    }

    // ------------------------------------------------------------------
    // Life points
    // ------------------------------------------------------------------

    /// Subtracts life, clamping at zero. Returns (before, after).
    /// Termination detection is the caller's responsibility.
    pub fn deal_damage(&mut self, side: Side, amount: u32) -> (u32, u32) {
        let before = self.sides[side].life;
        let after = before.saturating_sub(amount);
        self.sides[side].life = after;
        (before, after)
    }

    /// Adds life. Returns (before, after).
    pub fn gain_life(&mut self, side: Side, amount: u32) -> (u32, u32) {
        let before = self.sides[side].life;
        let after = before + amount;
        self.sides[side].life = after;
        (before, after)
    }

    // ------------------------------------------------------------------
    // Deck
    // ------------------------------------------------------------------

    /// Moves the top card of the deck to the hand. None means the deck is
    /// empty (deck-out is handled by the caller as a terminal condition).
    pub fn draw_card(&mut self, side: Side) -> Option<CardId> {
        let state = &mut self.sides[side];
        if state.deck.is_empty() {
            return None;
        }
        let card = state.deck.remove(0);
        state.hand.push(card);
        Some(card)
    }

    // ------------------------------------------------------------------
    // Once-per-turn tracking and stat modifiers
    // ------------------------------------------------------------------

    pub fn opt_used(&self, card: CardId) -> bool {
        self.once_per_turn_used.contains(&card)
    }

    pub fn mark_opt_used(&mut self, card: CardId) {
        self.once_per_turn_used.insert(card);
    }

    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers.push(modifier);
    }

    /// Sum of (ATK, DEF) modifiers currently applied to a card.
    pub fn modifier_total(&self, card: CardId) -> (i32, i32) {
        self.modifiers
            .iter()
            .filter(|m| m.card == card)
            .fold((0, 0), |acc, m| (acc.0 + m.attack, acc.1 + m.defense))
    }

    /// Drops every modifier attached to a card (called when it leaves the board).
    pub fn clear_modifiers_for(&mut self, card: CardId) {
        self.modifiers.retain(|m| m.card != card);
    }

    /// Effective ATK of a monster on either board: base plus modifiers plus
    /// the card's own continuous bonus. None if the card is not a board monster.
    pub fn effective_attack(&self, registry: &CardRegistry, card: CardId) -> Option<i32> {
        let side = self.monster_side(card)?;
        let definition = registry.get(card)?;
        let _ = self.sides[side].board.monster(card)?;
        let bonus = definition
            .ability
            .as_ref()
            .map(|a| a.continuous_stat_bonus().0)
            .unwrap_or(0);
        Some(definition.attack + self.modifier_total(card).0 + bonus)
    }

    /// Effective DEF of a monster on either board.
    pub fn effective_defense(&self, registry: &CardRegistry, card: CardId) -> Option<i32> {
        let side = self.monster_side(card)?;
        let definition = registry.get(card)?;
        let _ = self.sides[side].board.monster(card)?;
        let bonus = definition
            .ability
            .as_ref()
            .map(|a| a.continuous_stat_bonus().1)
            .unwrap_or(0);
        Some(definition.defense + self.modifier_total(card).1 + bonus)
    }

    // ------------------------------------------------------------------
    // Turn boundary
    // ------------------------------------------------------------------

    /// The single turn-boundary cleanup routine: clears the once-per-turn
    /// set, expires non-persistent modifiers, and resets every per-turn flag
    /// on both sides.
    pub fn clear_turn_flags(&mut self) {
        self.once_per_turn_used.clear();
        self.modifiers.retain(|m| m.persistent);
        self.pending_attack = None;
        for side in Side::BOTH {
            let state = &mut self.sides[side];
            state.normal_summon_used = false;
            for monster in state.board.monsters_mut() {
                monster.has_attacked = false;
                monster.changed_position_this_turn = false;
                monster.summoned_this_turn = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardCard;
    use crate::effect::ProtectionFlags;
    use crate::zone::Position;

    fn sample_match() -> MatchState {
        MatchState::new(
            PlayerId::from_raw(1),
            (1..=10).map(CardId::from_raw).collect(),
            PlayerId::from_raw(2),
            (11..=20).map(CardId::from_raw).collect(),
        )
    }

    #[test]
    fn test_side_of_maps_players() {
        let state = sample_match();
        assert_eq!(state.side_of(PlayerId::from_raw(1)), Some(Side::Host));
        assert_eq!(state.side_of(PlayerId::from_raw(2)), Some(Side::Challenger));
        assert_eq!(state.side_of(PlayerId::from_raw(3)), None);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut state = sample_match();
        let (before, after) = state.deal_damage(Side::Host, STARTING_LIFE + 500);
        assert_eq!(before, STARTING_LIFE);
        assert_eq!(after, 0);
        assert_eq!(state.side(Side::Host).life, 0);
    }

    #[test]
    fn test_outcome_set_once() {
        let mut state = sample_match();
        state.set_outcome(Side::Host, WinReason::LifeDepleted);
        state.set_outcome(Side::Challenger, WinReason::Forfeit);
        let outcome = state.outcome.unwrap();
        assert_eq!(outcome.winner, Side::Host);
        assert_eq!(outcome.reason, WinReason::LifeDepleted);
    }

    #[test]
    fn test_draw_from_deck_front() {
        let mut state = sample_match();
        let drawn = state.draw_card(Side::Host).unwrap();
        assert_eq!(drawn, CardId::from_raw(1));
        assert_eq!(state.side(Side::Host).hand, vec![CardId::from_raw(1)]);
        assert_eq!(state.side(Side::Host).deck.len(), 9);
    }

    #[test]
    fn test_draw_empty_deck_returns_none() {
        let mut state = sample_match();
        state.side_mut(Side::Host).deck.clear();
        assert_eq!(state.draw_card(Side::Host), None);
    }

    #[test]
    fn test_locate_respects_zone_uniqueness() {
        let mut state = sample_match();
        let card = state.draw_card(Side::Host).unwrap();
        assert_eq!(state.locate(card), Some((Side::Host, Zone::Hand)));

        state.side_mut(Side::Host).hand.clear();
        state
            .side_mut(Side::Host)
            .board
            .place_monster(BoardCard::summoned(
                card,
                Position::Attack,
                ProtectionFlags::none(),
            ))
            .unwrap();
        assert_eq!(state.locate(card), Some((Side::Host, Zone::Frontline)));
    }

    #[test]
    fn test_clear_turn_flags_resets_everything() {
        let mut state = sample_match();
        let card = CardId::from_raw(1);
        state.side_mut(Side::Host).deck.remove(0);
        state
            .side_mut(Side::Host)
            .board
            .place_monster(BoardCard::summoned(
                card,
                Position::Attack,
                ProtectionFlags::none(),
            ))
            .unwrap();
        state.side_mut(Side::Host).board.monster_mut(card).unwrap().has_attacked = true;
        state.side_mut(Side::Host).normal_summon_used = true;
        state.mark_opt_used(card);
        state.add_modifier(StatModifier {
            card,
            attack: 500,
            defense: 0,
            persistent: false,
        });
        state.add_modifier(StatModifier {
            card,
            attack: 100,
            defense: 100,
            persistent: true,
        });

        state.clear_turn_flags();

        assert!(!state.opt_used(card));
        assert!(!state.side(Side::Host).normal_summon_used);
        let monster = state.side(Side::Host).board.monster(card).unwrap();
        assert!(!monster.has_attacked);
        assert!(!monster.summoned_this_turn);
        // Persistent modifiers survive the boundary.
        assert_eq!(state.modifier_total(card), (100, 100));
    }

    #[test]
    fn test_start_draws_opening_hands() {
        let state = MatchState::start(
            PlayerId::from_raw(1),
            (1..=40).map(CardId::from_raw).collect(),
            PlayerId::from_raw(2),
            (41..=80).map(CardId::from_raw).collect(),
        );
        assert_eq!(state.side(Side::Host).hand.len(), OPENING_HAND);
        assert_eq!(state.side(Side::Challenger).hand.len(), OPENING_HAND);
        assert_eq!(state.side(Side::Host).deck.len(), 40 - OPENING_HAND);
        assert_eq!(state.turn.number, 1);
        assert_eq!(state.turn.active, Side::Host);
    }
}
