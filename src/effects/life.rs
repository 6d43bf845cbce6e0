//! Life-point executors: effect damage and life gain.
//!
//! Effect damage can end the match; the terminal check runs here so a
//! burn effect resolving to exactly zero is handled the same way battle
//! damage is.

use crate::events::{EventKind, EventSink, GameEvent};
use crate::match_state::{MatchState, Side, WinReason};

use super::EffectOutcome;

/// Inflicts `amount` effect damage on the opponent of `side`.
pub(super) fn damage(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
    amount: u32,
) -> EffectOutcome {
    let target = side.opponent();
    let (_, after) = state.deal_damage(target, amount);
    sink.record(GameEvent::new(
        state.turn.number,
        target,
        EventKind::LifeChanged,
        format!("{target} took {amount} effect damage ({after} life left)"),
    ));
    if after == 0 {
        state.set_outcome(side, WinReason::LifeDepleted);
        sink.record(GameEvent::new(
            state.turn.number,
            side,
            EventKind::MatchEnded,
            format!("{target} ran out of life; {side} wins"),
        ));
    }
    EffectOutcome::done(format!("dealt {amount} damage"))
}

/// Adds `amount` life points to `side`.
pub(super) fn gain(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
    amount: u32,
) -> EffectOutcome {
    let (_, after) = state.gain_life(side, amount);
    sink.record(GameEvent::new(
        state.turn.number,
        side,
        EventKind::LifeChanged,
        format!("{side} gained {amount} life points ({after} total)"),
    ));
    EffectOutcome::done(format!("gained {amount} life points"))
}
