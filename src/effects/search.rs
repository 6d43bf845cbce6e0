//! Deck-search executor.
//!
//! Without a selected card, the clause reports which deck cards match
//! the criteria; the caller surfaces those as choices. With a selection,
//! the card moves to the hand and the deck is shuffled.

use rand::rng;
use rand::seq::SliceRandom;

use crate::card::{Archetype, CardRegistry, CardType};
use crate::effect::TargetKind;
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side};

use super::EffectOutcome;

fn matches_criteria(
    registry: &CardRegistry,
    card: CardId,
    target_type: Option<TargetKind>,
    archetype: Option<Archetype>,
) -> bool {
    let Some(definition) = registry.get(card) else {
        return false;
    };
    let type_ok = match target_type {
        None | Some(TargetKind::Any) => true,
        Some(TargetKind::Monster) => definition.card_type == CardType::Monster,
        Some(TargetKind::Spell) => {
            matches!(definition.card_type, CardType::Spell | CardType::FieldSpell)
        }
        Some(TargetKind::Trap) => definition.card_type == CardType::Trap,
    };
    type_ok && archetype.is_none_or(|a| definition.archetype == a)
}

pub(super) fn execute(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    selected: Option<CardId>,
    target_type: Option<TargetKind>,
    archetype: Option<Archetype>,
) -> EffectOutcome {
    match selected {
        None => {
            let names: Vec<&str> = state
                .side(side)
                .deck
                .iter()
                .filter(|&&c| matches_criteria(registry, c, target_type, archetype))
                .map(|&c| registry.name(c))
                .collect();
            if names.is_empty() {
                return EffectOutcome::fizzle("no card in the deck matches the search");
            }
            EffectOutcome::done(format!("search candidates: {}", names.join(", ")))
        }
        Some(card) => {
            let in_deck = state.side(side).deck.contains(&card);
            if !in_deck || !matches_criteria(registry, card, target_type, archetype) {
                return EffectOutcome::fizzle(format!(
                    "{} is not a matching card in the deck",
                    registry.name(card)
                ));
            }
            let deck = &mut state.side_mut(side).deck;
            if let Some(index) = deck.iter().position(|&c| c == card) {
                deck.remove(index);
            }
            state.side_mut(side).hand.push(card);
            state.side_mut(side).deck.shuffle(&mut rng());
            sink.record(
                GameEvent::new(
                    state.turn.number,
                    side,
                    EventKind::CardToHand,
                    format!("{side} searched {} from the deck", registry.name(card)),
                )
                .with_card(card),
            );
            EffectOutcome::done(format!("added {} to the hand", registry.name(card)))
        }
    }
}
