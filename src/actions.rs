//! The player-facing action surface.
//!
//! Every function here is one thing a player can do. Each takes the
//! match, the card registry, an event sink, and the acting player's
//! external id, resolves the player to a seat, validates through
//! [`crate::validators`], and only then mutates. A failed action
//! returns an [`ActionError`] and leaves the match untouched, except
//! where an operation is explicitly two-step (attack declaration and
//! target selection).
//!
//! Once a match has an outcome, every action but none at all is
//! refused; there is no way to mutate a finished match.

use crate::board::{BackrowCard, BoardCard};
use crate::card::{CardRegistry, CardType};
use crate::combat::{self, BattleReport, CombatError, PendingAttack};
use crate::effect::{ProtectionFlags, Trigger};
use crate::effects::{self, AbilityReport, EffectError, EffectOutcome};
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::{CardId, PlayerId};
use crate::match_state::{MatchState, Phase, Side, WinReason};
use crate::turn::{self, TurnError};
use crate::validators::{self, Deny};
use crate::zone::{Position, Zone};

// --- Errors ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The player id belongs to neither seat.
    UnknownPlayer(PlayerId),
    /// The match already has an outcome.
    MatchOver,
    /// A validator refused the action.
    Denied(Deny),
    Turn(TurnError),
    Combat(CombatError),
    Effect(EffectError),
    /// The card is not on the acting player's board.
    NotOnBoard(CardId),
    /// The card has no ability to activate.
    NoAbility(CardId),
    /// The requested effect clause does not exist on the card.
    EffectIndexOutOfRange { index: usize, len: usize },
    /// A face-down card cannot activate its effect.
    FaceDownSource(CardId),
    /// The card's continuous effect has been negated.
    Negated(CardId),
    /// The card is not a spell (or field spell / equipment).
    NotASpell(CardId),
    /// The spell is neither in the hand nor set on the board.
    SpellNotAvailable(CardId),
    /// The card is not a trap, or is a trap that was never set.
    NotASetTrap(CardId),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::UnknownPlayer(id) => write!(f, "player {id} is not in this match"),
            ActionError::MatchOver => write!(f, "the match is already over"),
            ActionError::Denied(deny) => deny.fmt(f),
            ActionError::Turn(err) => err.fmt(f),
            ActionError::Combat(err) => err.fmt(f),
            ActionError::Effect(err) => err.fmt(f),
            ActionError::NotOnBoard(id) => write!(f, "card {id} is not on your board"),
            ActionError::NoAbility(id) => write!(f, "card {id} has no ability"),
            ActionError::EffectIndexOutOfRange { index, len } => {
                write!(f, "effect index {index} out of range for an ability with {len} clause(s)")
            }
            ActionError::FaceDownSource(id) => {
                write!(f, "card {id} is face-down and cannot activate its effect")
            }
            ActionError::Negated(id) => write!(f, "card {id}'s effect has been negated"),
            ActionError::NotASpell(id) => write!(f, "card {id} is not a spell"),
            ActionError::SpellNotAvailable(id) => {
                write!(f, "card {id} is neither in your hand nor set on your board")
            }
            ActionError::NotASetTrap(id) => write!(f, "card {id} is not a set trap"),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<Deny> for ActionError {
    fn from(deny: Deny) -> Self {
        ActionError::Denied(deny)
    }
}

impl From<TurnError> for ActionError {
    fn from(err: TurnError) -> Self {
        ActionError::Turn(err)
    }
}

impl From<CombatError> for ActionError {
    fn from(err: CombatError) -> Self {
        ActionError::Combat(err)
    }
}

impl From<EffectError> for ActionError {
    fn from(err: EffectError) -> Self {
        ActionError::Effect(err)
    }
}

/// What a summon action produced: where the monster landed and what its
/// on-summon (or on-flip) clauses reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummonReport {
    pub zone: Zone,
    pub triggers: Option<AbilityReport>,
}

// --- Seat resolution ---

fn seat(state: &MatchState, player: PlayerId) -> Result<Side, ActionError> {
    state
        .side_of(player)
        .ok_or(ActionError::UnknownPlayer(player))
}

fn seat_in_live_match(state: &MatchState, player: PlayerId) -> Result<Side, ActionError> {
    let side = seat(state, player)?;
    if state.is_terminal() {
        return Err(ActionError::MatchOver);
    }
    Ok(side)
}

// --- Summons and sets ---

/// Normal (or tribute) summons a monster from the hand, face-up, in the
/// chosen position. Tributes go to the graveyard first; the monster's
/// on-summon clauses run after it is on the board.
pub fn normal_summon(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
    tributes: &[CardId],
    position: Position,
) -> Result<SummonReport, ActionError> {
    let side = seat_in_live_match(state, player)?;
    validators::validate_normal_summon(state, registry, side, card, tributes)?;

    pay_tributes(state, registry, sink, side, tributes);
    remove_from_hand(state, side, card);
    let definition = registry.get(card).ok_or(ActionError::Denied(Deny::UnknownCard(card)))?;
    let protection = definition
        .ability
        .as_ref()
        .map(|a| a.protection())
        .unwrap_or_else(ProtectionFlags::none);
    let zone = state
        .side_mut(side)
        .board
        .place_monster(BoardCard::summoned(card, position, protection))
        .map_err(|_| ActionError::Denied(Deny::MonsterZonesFull))?;
    state.side_mut(side).normal_summon_used = true;

    let kind = if tributes.is_empty() {
        EventKind::NormalSummon
    } else {
        EventKind::TributeSummon
    };
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            kind,
            format!("{side} summoned {} in {position} position", definition.name),
        )
        .with_card(card),
    );

    let triggers = definition.ability.as_ref().map(|ability| {
        effects::run_ability(state, registry, sink, side, card, ability, Trigger::OnSummon, &[])
    });
    Ok(SummonReport { zone, triggers })
}

/// Sets a monster from the hand face-down in defense position. Spends
/// the same allowance as a normal summon; no triggers fire while the
/// card is hidden.
pub fn set_monster(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
    tributes: &[CardId],
) -> Result<Zone, ActionError> {
    let side = seat_in_live_match(state, player)?;
    validators::validate_set_monster(state, registry, side, card, tributes)?;

    pay_tributes(state, registry, sink, side, tributes);
    remove_from_hand(state, side, card);
    let zone = state
        .side_mut(side)
        .board
        .place_monster(BoardCard::set_face_down(card))
        .map_err(|_| ActionError::Denied(Deny::MonsterZonesFull))?;
    state.side_mut(side).normal_summon_used = true;

    // The set card stays hidden; the event names no card.
    sink.record(GameEvent::new(
        state.turn.number,
        side,
        EventKind::MonsterSet,
        format!("{side} set a monster"),
    ));
    Ok(zone)
}

/// Sets a spell or trap face-down in the backrow. A field spell goes to
/// the dedicated field slot, replacing (and burying) any previous one.
pub fn set_spell_trap(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
) -> Result<Zone, ActionError> {
    let side = seat_in_live_match(state, player)?;
    validators::validate_set_spell_trap(state, registry, side, card)?;
    let definition = registry.get(card).ok_or(ActionError::Denied(Deny::UnknownCard(card)))?;

    remove_from_hand(state, side, card);
    let zone = if definition.card_type == CardType::FieldSpell {
        if let Some(previous) = state.side_mut(side).board.field_spell.take() {
            state.side_mut(side).graveyard.push(previous.card);
            sink.record(
                GameEvent::new(
                    state.turn.number,
                    side,
                    EventKind::CardToGraveyard,
                    format!("{side}'s previous field spell was sent to the graveyard"),
                )
                .with_card(previous.card),
            );
        }
        state.side_mut(side).board.field_spell = Some(BackrowCard::set_face_down(card));
        Zone::FieldSpell
    } else {
        state
            .side_mut(side)
            .board
            .place_backrow(BackrowCard::set_face_down(card))
            .map_err(|_| ActionError::Denied(Deny::BackrowFull))?;
        Zone::Backrow
    };

    let kind = if definition.card_type == CardType::Trap {
        EventKind::TrapSet
    } else {
        EventKind::SpellSet
    };
    sink.record(GameEvent::new(
        state.turn.number,
        side,
        kind,
        format!("{side} set a card in the backrow"),
    ));
    Ok(zone)
}

/// Flips a set monster face-up into attack position. The monster's
/// on-flip clauses run once it is revealed.
pub fn flip_summon(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
) -> Result<SummonReport, ActionError> {
    let side = seat_in_live_match(state, player)?;
    validators::validate_flip_summon(state, side, card)?;
    let definition = registry.get(card).ok_or(ActionError::Denied(Deny::UnknownCard(card)))?;
    let protection = definition
        .ability
        .as_ref()
        .map(|a| a.protection())
        .unwrap_or_else(ProtectionFlags::none);

    let zone = state
        .side(side)
        .board
        .monster_zone(card)
        .ok_or(ActionError::NotOnBoard(card))?;
    if let Some(monster) = state.side_mut(side).board.monster_mut(card) {
        monster.face_down = false;
        monster.position = Position::Attack;
        monster.changed_position_this_turn = true;
        monster.protection = protection;
    }
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::FlipSummon,
            format!("{side} flip summoned {}", definition.name),
        )
        .with_card(card),
    );

    let triggers = definition.ability.as_ref().map(|ability| {
        effects::run_ability(state, registry, sink, side, card, ability, Trigger::OnFlip, &[])
    });
    Ok(SummonReport { zone, triggers })
}

/// Toggles a face-up monster between attack and defense position.
pub fn change_position(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
) -> Result<Position, ActionError> {
    let side = seat_in_live_match(state, player)?;
    validators::validate_position_change(state, side, card)?;

    let mut new_position = Position::Attack;
    if let Some(monster) = state.side_mut(side).board.monster_mut(card) {
        new_position = monster.position.toggled();
        monster.position = new_position;
        monster.changed_position_this_turn = true;
    }
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::PositionChanged,
            format!("{} switched to {new_position} position", registry.name(card)),
        )
        .with_card(card),
    );
    Ok(new_position)
}

// --- Activations ---

/// Activates a spell from the hand or a set spell in the backrow. The
/// spell's manual clauses run with the given targets; non-continuous
/// spells are buried after resolution, continuous spells and field
/// spells stay face-up.
pub fn activate_spell(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
    targets: &[CardId],
) -> Result<AbilityReport, ActionError> {
    let side = seat_in_live_match(state, player)?;
    if !state.is_active(side) {
        return Err(ActionError::Denied(Deny::NotYourTurn));
    }
    if !state.turn.phase.is_main() {
        return Err(ActionError::Denied(Deny::NotMainPhase(state.turn.phase)));
    }
    let definition = registry.get(card).ok_or(ActionError::Denied(Deny::UnknownCard(card)))?;
    if !matches!(
        definition.card_type,
        CardType::Spell | CardType::FieldSpell | CardType::Equipment
    ) {
        return Err(ActionError::NotASpell(card));
    }
    let ability = definition.ability.as_ref().ok_or(ActionError::NoAbility(card))?;

    // From the hand, or already set in the backrow / field slot.
    let from_hand = state.side(side).hand.contains(&card);
    if !from_hand {
        let set_card = state
            .side(side)
            .board
            .backrow_card(card)
            .ok_or(ActionError::SpellNotAvailable(card))?;
        if set_card.negated {
            return Err(ActionError::Negated(card));
        }
    }

    let stays_on_board = definition.card_type == CardType::FieldSpell
        || ability.effects.iter().any(|e| e.continuous);
    if from_hand {
        remove_from_hand(state, side, card);
        if stays_on_board {
            if definition.card_type == CardType::FieldSpell {
                if let Some(previous) = state.side_mut(side).board.field_spell.take() {
                    state.side_mut(side).graveyard.push(previous.card);
                }
                let mut placed = BackrowCard::set_face_down(card);
                placed.face_down = false;
                placed.activated = true;
                state.side_mut(side).board.field_spell = Some(placed);
            } else {
                let mut placed = BackrowCard::set_face_down(card);
                placed.face_down = false;
                placed.activated = true;
                state
                    .side_mut(side)
                    .board
                    .place_backrow(placed)
                    .map_err(|_| ActionError::Denied(Deny::BackrowFull))?;
            }
        }
    } else if let Some(set_card) = state.side_mut(side).board.backrow_card_mut(card) {
        set_card.face_down = false;
        set_card.activated = true;
    }

    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::SpellActivated,
            format!("{side} activated {}", definition.name),
        )
        .with_card(card),
    );
    let report =
        effects::run_ability(state, registry, sink, side, card, ability, Trigger::Manual, targets);

    if !stays_on_board {
        if !from_hand {
            state.side_mut(side).board.remove_backrow(card);
        }
        state.side_mut(side).graveyard.push(card);
    }
    Ok(report)
}

/// Flips and resolves a set trap. Non-continuous traps are buried after
/// resolution.
pub fn activate_trap(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
    targets: &[CardId],
) -> Result<AbilityReport, ActionError> {
    let side = seat_in_live_match(state, player)?;
    let definition = registry.get(card).ok_or(ActionError::Denied(Deny::UnknownCard(card)))?;
    if definition.card_type != CardType::Trap {
        return Err(ActionError::NotASetTrap(card));
    }
    let ability = definition.ability.as_ref().ok_or(ActionError::NoAbility(card))?;
    let set_card = state
        .side(side)
        .board
        .backrow_card(card)
        .ok_or(ActionError::NotASetTrap(card))?;
    if set_card.negated {
        return Err(ActionError::Negated(card));
    }

    if let Some(set_card) = state.side_mut(side).board.backrow_card_mut(card) {
        set_card.face_down = false;
        set_card.activated = true;
    }
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::TrapActivated,
            format!("{side} activated {}", definition.name),
        )
        .with_card(card),
    );
    let report =
        effects::run_ability(state, registry, sink, side, card, ability, Trigger::Manual, targets);

    let continuous = ability.effects.iter().any(|e| e.continuous);
    if !continuous {
        state.side_mut(side).board.remove_backrow(card);
        state.side_mut(side).graveyard.push(card);
    }
    Ok(report)
}

/// Activates one manual effect clause of a face-up monster on the
/// acting player's board.
pub fn activate_effect(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    card: CardId,
    effect_index: usize,
    targets: &[CardId],
) -> Result<EffectOutcome, ActionError> {
    let side = seat_in_live_match(state, player)?;
    if !state.is_active(side) {
        return Err(ActionError::Denied(Deny::NotYourTurn));
    }
    if !state.turn.phase.is_main() {
        return Err(ActionError::Denied(Deny::NotMainPhase(state.turn.phase)));
    }
    let monster = state
        .side(side)
        .board
        .monster(card)
        .ok_or(ActionError::NotOnBoard(card))?;
    if monster.face_down {
        return Err(ActionError::FaceDownSource(card));
    }
    let definition = registry.get(card).ok_or(ActionError::Denied(Deny::UnknownCard(card)))?;
    let ability = definition.ability.as_ref().ok_or(ActionError::NoAbility(card))?;
    let effect = ability.effects.get(effect_index).ok_or(ActionError::EffectIndexOutOfRange {
        index: effect_index,
        len: ability.effects.len(),
    })?;

    let outcome = effects::execute_effect(state, registry, sink, side, card, effect, targets)?;
    Ok(outcome)
}

// --- Combat, phases, termination ---

/// Declares an attack; see [`combat::declare_attack`].
pub fn declare_attack(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    player: PlayerId,
    attacker: CardId,
) -> Result<PendingAttack, ActionError> {
    let side = seat(state, player)?;
    Ok(combat::declare_attack(state, sink, side, attacker)?)
}

/// Resolves the pending attack; see [`combat::select_attack_target`].
pub fn select_attack_target(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    player: PlayerId,
    target: Option<CardId>,
) -> Result<BattleReport, ActionError> {
    let side = seat(state, player)?;
    Ok(combat::select_attack_target(state, registry, sink, side, target)?)
}

/// Moves the turn to its next phase.
pub fn advance_phase(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    player: PlayerId,
) -> Result<Phase, ActionError> {
    let side = seat(state, player)?;
    Ok(turn::advance_phase(state, sink, side)?)
}

/// Ends the turn from the end phase; see [`turn::end_turn`].
pub fn end_turn(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    player: PlayerId,
) -> Result<Side, ActionError> {
    let side = seat(state, player)?;
    Ok(turn::end_turn(state, sink, side)?)
}

/// Concedes the match. Legal for either player at any point of a live
/// match, including off-turn.
pub fn forfeit(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    player: PlayerId,
) -> Result<(), ActionError> {
    let side = seat_in_live_match(state, player)?;
    let winner = side.opponent();
    state.set_outcome(winner, WinReason::Forfeit);
    sink.record(GameEvent::new(
        state.turn.number,
        winner,
        EventKind::MatchEnded,
        format!("{side} forfeited; {winner} wins"),
    ));
    Ok(())
}

// --- Shared helpers ---

fn pay_tributes(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    tributes: &[CardId],
) {
    for &tribute in tributes {
        state.side_mut(side).board.remove_monster(tribute);
        state.side_mut(side).graveyard.push(tribute);
        state.clear_modifiers_for(tribute);
        sink.record(
            GameEvent::new(
                state.turn.number,
                side,
                EventKind::TributePaid,
                format!("{side} tributed {}", registry.name(tribute)),
            )
            .with_card(tribute),
        );
    }
}

fn remove_from_hand(state: &mut MatchState, side: Side, card: CardId) {
    let hand = &mut state.side_mut(side).hand;
    if let Some(index) = hand.iter().position(|&c| c == card) {
        hand.remove(index);
    }
}
