//! Stat-modifier executor.
//!
//! Applies an ATK/DEF delta to a target board monster by appending to
//! the match's central modifier list. Non-persistent entries expire at
//! the turn boundary; persistent ones last until the monster leaves the
//! board.

use crate::card::CardRegistry;
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side, StatModifier};

use super::EffectOutcome;

#[allow(clippy::too_many_arguments)]
pub(super) fn execute(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    targets: &[CardId],
    attack: i32,
    defense: i32,
    persistent: bool,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    if state.monster_side(target).is_none() {
        return EffectOutcome::fizzle(format!(
            "{} is not a monster on the board",
            registry.name(target)
        ));
    }
    state.add_modifier(StatModifier {
        card: target,
        attack,
        defense,
        persistent,
    });
    let duration = if persistent { "" } else { " until the end of the turn" };
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::EffectActivated,
            format!(
                "{} gets {attack:+} ATK / {defense:+} DEF{duration}",
                registry.name(target)
            ),
        )
        .with_card(target),
    );
    EffectOutcome::done(format!(
        "{} gets {attack:+} ATK / {defense:+} DEF",
        registry.name(target)
    ))
}
