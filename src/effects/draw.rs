//! Draw executor.

use crate::events::{EventKind, EventSink, GameEvent};
use crate::match_state::{MatchState, Side};

use super::EffectOutcome;

/// Draws `count` cards for `side`. All-or-nothing: a deck with too few
/// cards fizzles the clause without drawing. Effect draws never cause a
/// deck-out; only the mandatory draw-phase draw does.
pub(super) fn execute(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
    count: u32,
) -> EffectOutcome {
    let count = count as usize;
    if state.side(side).deck.len() < count {
        return EffectOutcome::fizzle(format!(
            "not enough cards in the deck to draw {count}"
        ));
    }
    for _ in 0..count {
        if let Some(card) = state.draw_card(side) {
            sink.record(
                GameEvent::new(
                    state.turn.number,
                    side,
                    EventKind::CardDrawn,
                    format!("{side} drew a card"),
                )
                .with_card(card),
            );
        }
    }
    EffectOutcome::done(format!("drew {count} card(s)"))
}
