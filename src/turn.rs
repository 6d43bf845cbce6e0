//! Turn and phase progression.
//!
//! A turn walks a fixed track: draw, standby, main 1, battle, main 2,
//! end. [`advance_phase`] moves forward one step; there is no way back.
//! [`end_turn`] closes the end phase: it enforces the hand limit, runs
//! the single turn-boundary cleanup on [`MatchState`], hands the turn to
//! the opponent, and performs their draw. A draw from an empty deck ends
//! the match by deck-out.

use crate::events::{EventKind, EventSink, GameEvent};
use crate::match_state::{HAND_LIMIT, MatchState, Phase, Side, WinReason};

// --- Errors ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// The match already has an outcome.
    MatchOver,
    /// The acting side is not the turn player.
    NotYourTurn,
    /// The end phase has no next phase; call `end_turn` instead.
    NoNextPhase,
    /// `end_turn` was called outside the end phase.
    NotEndPhase(Phase),
}

impl std::fmt::Display for TurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnError::MatchOver => write!(f, "the match is already over"),
            TurnError::NotYourTurn => write!(f, "it is not your turn"),
            TurnError::NoNextPhase => {
                write!(f, "already in the end phase; end the turn instead")
            }
            TurnError::NotEndPhase(phase) => {
                write!(f, "cannot end the turn from the {phase} phase")
            }
        }
    }
}

impl std::error::Error for TurnError {}

// --- Phase track ---

/// The phase after `phase`, or `None` from the end phase.
pub fn next_phase(phase: Phase) -> Option<Phase> {
    match phase {
        Phase::Draw => Some(Phase::Standby),
        Phase::Standby => Some(Phase::Main1),
        Phase::Main1 => Some(Phase::Battle),
        Phase::Battle => Some(Phase::Main2),
        Phase::Main2 => Some(Phase::End),
        Phase::End => None,
    }
}

/// Moves the turn forward one phase. Leaving the battle phase discards
/// any attack still waiting for a target.
pub fn advance_phase(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
) -> Result<Phase, TurnError> {
    if state.is_terminal() {
        return Err(TurnError::MatchOver);
    }
    if !state.is_active(side) {
        return Err(TurnError::NotYourTurn);
    }
    let next = next_phase(state.turn.phase).ok_or(TurnError::NoNextPhase)?;
    if state.turn.phase == Phase::Battle {
        state.pending_attack = None;
    }
    state.turn.phase = next;
    sink.record(GameEvent::new(
        state.turn.number,
        side,
        EventKind::PhaseChanged,
        format!("{side} entered the {next} phase"),
    ));
    Ok(next)
}

/// Closes the current turn and opens the opponent's.
///
/// Sequence: discard down to the hand limit (oldest cards first), clear
/// all per-turn bookkeeping, pass the turn, then draw for the new turn
/// player. If their deck is empty the outgoing player wins by deck-out.
pub fn end_turn(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
) -> Result<Side, TurnError> {
    if state.is_terminal() {
        return Err(TurnError::MatchOver);
    }
    if !state.is_active(side) {
        return Err(TurnError::NotYourTurn);
    }
    if state.turn.phase != Phase::End {
        return Err(TurnError::NotEndPhase(state.turn.phase));
    }

    enforce_hand_limit(state, sink, side);
    sink.record(GameEvent::new(
        state.turn.number,
        side,
        EventKind::TurnEnd,
        format!("{side} ended turn {}", state.turn.number),
    ));

    state.clear_turn_flags();
    let next = side.opponent();
    state.turn.number += 1;
    state.turn.active = next;
    state.turn.phase = Phase::Draw;
    sink.record(GameEvent::new(
        state.turn.number,
        next,
        EventKind::TurnStart,
        format!("{next} started turn {}", state.turn.number),
    ));

    match state.draw_card(next) {
        Some(card) => {
            sink.record(
                GameEvent::new(state.turn.number, next, EventKind::CardDrawn, format!("{next} drew a card"))
                    .with_card(card),
            );
        }
        None => {
            state.set_outcome(side, WinReason::DeckOut);
            sink.record(GameEvent::new(
                state.turn.number,
                next,
                EventKind::MatchEnded,
                format!("{next} could not draw; {side} wins by deck-out"),
            ));
        }
    }
    Ok(next)
}

/// Discards the oldest cards above the hand limit to the graveyard.
fn enforce_hand_limit(state: &mut MatchState, sink: &mut dyn EventSink, side: Side) {
    let mut discarded = Vec::new();
    while state.side(side).hand.len() > HAND_LIMIT {
        let card = state.side_mut(side).hand.remove(0);
        state.side_mut(side).graveyard.push(card);
        discarded.push(card);
    }
    if discarded.is_empty() {
        return;
    }
    sink.record(GameEvent::new(
        state.turn.number,
        side,
        EventKind::HandLimitEnforced,
        format!("{side} discarded {} card(s) over the hand limit", discarded.len()),
    ));
    for card in discarded {
        sink.record(
            GameEvent::new(
                state.turn.number,
                side,
                EventKind::CardToGraveyard,
                format!("{side} discarded a card to the graveyard"),
            )
            .with_card(card),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::ids::CardId;

    fn blank() -> MatchState {
        MatchState::new(
            crate::ids::PlayerId::new(),
            Vec::new(),
            crate::ids::PlayerId::new(),
            Vec::new(),
        )
    }

    fn at_end_phase() -> MatchState {
        let mut state = blank();
        state.turn.phase = Phase::End;
        state.side_mut(Side::Challenger).deck.push(CardId::new());
        state
    }

    #[test]
    fn test_phase_track_is_linear() {
        assert_eq!(next_phase(Phase::Draw), Some(Phase::Standby));
        assert_eq!(next_phase(Phase::Main1), Some(Phase::Battle));
        assert_eq!(next_phase(Phase::Main2), Some(Phase::End));
        assert_eq!(next_phase(Phase::End), None);
    }

    #[test]
    fn test_advance_phase_records_event() {
        let mut state = blank();
        let mut log = EventLog::new();
        let phase = advance_phase(&mut state, &mut log, Side::Host).unwrap();
        assert_eq!(phase, Phase::Standby);
        assert_eq!(state.turn.phase, Phase::Standby);
        assert_eq!(log.kinds(), vec![EventKind::PhaseChanged]);
    }

    #[test]
    fn test_advance_phase_only_for_turn_player() {
        let mut state = blank();
        let mut log = EventLog::new();
        let err = advance_phase(&mut state, &mut log, Side::Challenger);
        assert_eq!(err, Err(TurnError::NotYourTurn));
    }

    #[test]
    fn test_end_turn_requires_end_phase() {
        let mut state = blank();
        let mut log = EventLog::new();
        let err = end_turn(&mut state, &mut log, Side::Host);
        assert_eq!(err, Err(TurnError::NotEndPhase(Phase::Draw)));
    }

    #[test]
    fn test_end_turn_passes_and_draws() {
        let mut state = at_end_phase();
        let mut log = EventLog::new();
        let next = end_turn(&mut state, &mut log, Side::Host).unwrap();
        assert_eq!(next, Side::Challenger);
        assert_eq!(state.turn.number, 2);
        assert_eq!(state.turn.active, Side::Challenger);
        assert_eq!(state.turn.phase, Phase::Draw);
        assert_eq!(state.side(Side::Challenger).hand.len(), 1);
        assert!(state.side(Side::Challenger).deck.is_empty());
    }

    #[test]
    fn test_hand_limit_discards_oldest_excess() {
        let mut state = at_end_phase();
        let cards: Vec<CardId> = (0..7).map(|_| CardId::new()).collect();
        state.side_mut(Side::Host).hand = cards.clone();
        let mut log = EventLog::new();
        end_turn(&mut state, &mut log, Side::Host).unwrap();

        assert_eq!(state.side(Side::Host).hand.len(), HAND_LIMIT);
        assert_eq!(state.side(Side::Host).graveyard, vec![cards[0]]);
        assert_eq!(state.side(Side::Host).hand, cards[1..].to_vec());
        assert!(log.kinds().contains(&EventKind::HandLimitEnforced));
    }

    #[test]
    fn test_deck_out_ends_match() {
        let mut state = blank();
        state.turn.phase = Phase::End;
        let mut log = EventLog::new();
        end_turn(&mut state, &mut log, Side::Host).unwrap();

        let outcome = state.outcome.expect("match should be over");
        assert_eq!(outcome.winner, Side::Host);
        assert_eq!(outcome.reason, WinReason::DeckOut);
        assert!(log.kinds().contains(&EventKind::MatchEnded));
    }

    #[test]
    fn test_turn_flags_reset_at_boundary() {
        let mut state = at_end_phase();
        state.side_mut(Side::Host).normal_summon_used = true;
        state.mark_opt_used(CardId::new());
        let mut log = EventLog::new();
        end_turn(&mut state, &mut log, Side::Host).unwrap();

        assert!(!state.side(Side::Host).normal_summon_used);
        assert!(state.once_per_turn_used.is_empty());
    }

    #[test]
    fn test_no_action_after_match_end() {
        let mut state = at_end_phase();
        state.set_outcome(Side::Challenger, WinReason::Forfeit);
        let mut log = EventLog::new();
        assert_eq!(end_turn(&mut state, &mut log, Side::Host), Err(TurnError::MatchOver));
        assert_eq!(
            advance_phase(&mut state, &mut log, Side::Host),
            Err(TurnError::MatchOver)
        );
    }
}
