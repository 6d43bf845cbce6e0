//! Negation executor.
//!
//! Negation resolves immediately; there is no chain or response window.
//! An activation negate sends the target backrow card to the graveyard;
//! a continuous negate leaves the card on the board with its effect
//! switched off.

use crate::card::CardRegistry;
use crate::effect::NegateScope;
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side};

use super::EffectOutcome;

pub(super) fn execute(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    targets: &[CardId],
    scope: NegateScope,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    let Some(owner) = Side::BOTH
        .into_iter()
        .find(|&s| state.side(s).board.backrow_card(target).is_some())
    else {
        return EffectOutcome::fizzle(format!(
            "{} is not a spell or trap on the board",
            registry.name(target)
        ));
    };

    match scope {
        NegateScope::Activation => {
            state.side_mut(owner).board.remove_backrow(target);
            state.side_mut(owner).graveyard.push(target);
            sink.record(
                GameEvent::new(
                    state.turn.number,
                    owner,
                    EventKind::EffectNegated,
                    format!("{}'s activation was negated", registry.name(target)),
                )
                .with_card(target),
            );
            EffectOutcome::done(format!(
                "negated {} and sent it to the graveyard",
                registry.name(target)
            ))
        }
        NegateScope::Continuous => {
            if let Some(card) = state.side_mut(owner).board.backrow_card_mut(target) {
                if card.negated {
                    return EffectOutcome::fizzle(format!(
                        "{} is already negated",
                        registry.name(target)
                    ));
                }
                card.negated = true;
            }
            sink.record(
                GameEvent::new(
                    state.turn.number,
                    owner,
                    EventKind::EffectNegated,
                    format!("{}'s continuous effect was negated", registry.name(target)),
                )
                .with_card(target),
            );
            EffectOutcome::done(format!("negated {}", registry.name(target)))
        }
    }
}
