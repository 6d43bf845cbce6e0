//! Destroy-by-effect executor.
//!
//! Targets may be monsters or backrow cards on either board. Monsters
//! with `cannot_be_destroyed_by_effect` survive; the clause still
//! succeeds if any other target was destroyed.

use crate::card::CardRegistry;
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side};

use super::EffectOutcome;

pub(super) fn execute(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    targets: &[CardId],
    target_count: u32,
) -> EffectOutcome {
    if targets.is_empty() {
        return EffectOutcome::fizzle("no target selected");
    }
    let mut destroyed = Vec::new();
    let mut saved = Vec::new();
    for &target in targets.iter().take(target_count as usize) {
        match destroy_one(state, sink, target) {
            Some(true) => destroyed.push(registry.name(target).to_string()),
            Some(false) => saved.push(registry.name(target).to_string()),
            None => {}
        }
    }
    if destroyed.is_empty() {
        return EffectOutcome::fizzle(if saved.is_empty() {
            "no target was on a board".to_string()
        } else {
            format!("{} cannot be destroyed by card effects", saved.join(", "))
        });
    }
    EffectOutcome::done(format!("destroyed {}", destroyed.join(", ")))
}

/// Destroys one board card. `None` means the card is on neither board,
/// `Some(false)` that effect protection saved it.
fn destroy_one(state: &mut MatchState, sink: &mut dyn EventSink, card: CardId) -> Option<bool> {
    for side in Side::BOTH {
        if let Some(monster) = state.side(side).board.monster(card) {
            if monster.protection.cannot_be_destroyed_by_effect {
                return Some(false);
            }
            state.side_mut(side).board.remove_monster(card);
            state.side_mut(side).graveyard.push(card);
            state.clear_modifiers_for(card);
            record_destroyed(state, sink, side, card);
            return Some(true);
        }
        if state.side(side).board.backrow_card(card).is_some() {
            state.side_mut(side).board.remove_backrow(card);
            state.side_mut(side).graveyard.push(card);
            record_destroyed(state, sink, side, card);
            return Some(true);
        }
    }
    None
}

fn record_destroyed(state: &MatchState, sink: &mut dyn EventSink, side: Side, card: CardId) {
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::CardDestroyed,
            format!("{side}'s card was destroyed by an effect"),
        )
        .with_card(card),
    );
}
