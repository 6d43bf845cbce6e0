//! Special-summon executor.
//!
//! Pulls the target monster out of the acting player's hand, graveyard,
//! or deck and places it face-up in attack position. Special summons do
//! not touch the normal summon allowance, but the monster still counts
//! as having arrived this turn for position-change purposes.

use crate::board::BoardCard;
use crate::card::CardRegistry;
use crate::effect::{EffectOrigin, ProtectionFlags};
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side};
use crate::zone::Position;

use super::EffectOutcome;

pub(super) fn execute(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    targets: &[CardId],
    from: EffectOrigin,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    let Some(definition) = registry.get(target) else {
        return EffectOutcome::fizzle(format!("no card definition for {target}"));
    };
    if !definition.is_monster() {
        return EffectOutcome::fizzle(format!("{} is not a monster", definition.name));
    }
    if !state.side(side).board.has_empty_monster_slot() {
        return EffectOutcome::fizzle("no open monster zone");
    }
    let removed = match from {
        EffectOrigin::Hand => remove_from(&mut state.side_mut(side).hand, target),
        EffectOrigin::Graveyard => remove_from(&mut state.side_mut(side).graveyard, target),
        EffectOrigin::Deck => remove_from(&mut state.side_mut(side).deck, target),
        EffectOrigin::Board => false,
    };
    if !removed {
        return EffectOutcome::fizzle(format!(
            "{} is not in the {from}",
            definition.name
        ));
    }

    let protection = definition
        .ability
        .as_ref()
        .map(|a| a.protection())
        .unwrap_or_else(ProtectionFlags::none);
    let board_card = BoardCard::summoned(target, Position::Attack, protection);
    // Capacity was checked above.
    let _ = state.side_mut(side).board.place_monster(board_card);
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::SpecialSummon,
            format!("{side} special summoned {} from the {from}", definition.name),
        )
        .with_card(target),
    );
    EffectOutcome::done(format!("special summoned {} from the {from}", definition.name))
}

fn remove_from(zone: &mut Vec<CardId>, card: CardId) -> bool {
    if let Some(index) = zone.iter().position(|&c| c == card) {
        zone.remove(index);
        true
    } else {
        false
    }
}
