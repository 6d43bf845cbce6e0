//! Zone-movement executors: bounce to hand, send to graveyard, banish,
//! return to deck, mill, and discard.
//!
//! Targets keep their owner: a card always moves to a zone of the side
//! whose zone it currently sits in, regardless of who activated the
//! effect. The shared removal helper checks the card really is in the
//! zone the effect names before anything moves.

use rand::rng;
use rand::seq::SliceRandom;

use crate::card::CardRegistry;
use crate::effect::{DeckPlacement, EffectOrigin};
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side};
use crate::zone::Zone;

use super::EffectOutcome;

/// Removes a card from the origin zone it is expected to be in and
/// returns its owner. `None` means the card is not where the effect
/// says it should be, which fizzles the clause.
fn take_from_origin(state: &mut MatchState, card: CardId, from: EffectOrigin) -> Option<Side> {
    let (side, zone) = state.locate(card)?;
    let matches_origin = match from {
        EffectOrigin::Board => zone.is_monster_zone() || matches!(zone, Zone::Backrow | Zone::FieldSpell),
        EffectOrigin::Hand => zone == Zone::Hand,
        EffectOrigin::Graveyard => zone == Zone::Graveyard,
        EffectOrigin::Deck => zone == Zone::Deck,
    };
    if !matches_origin {
        return None;
    }
    let player = state.side_mut(side);
    match zone {
        Zone::Hand => remove_by_id(&mut player.hand, card),
        Zone::Graveyard => remove_by_id(&mut player.graveyard, card),
        Zone::Deck => remove_by_id(&mut player.deck, card),
        Zone::Banished => remove_by_id(&mut player.banished, card),
        Zone::Frontline | Zone::Support => {
            player.board.remove_monster(card);
            state.clear_modifiers_for(card);
        }
        Zone::Backrow | Zone::FieldSpell => {
            player.board.remove_backrow(card);
        }
    }
    Some(side)
}

fn remove_by_id(zone: &mut Vec<CardId>, card: CardId) {
    if let Some(index) = zone.iter().position(|&c| c == card) {
        zone.remove(index);
    }
}

/// Returns the target card to its owner's hand.
pub(super) fn to_hand(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    targets: &[CardId],
    from: EffectOrigin,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    let Some(owner) = take_from_origin(state, target, from) else {
        return EffectOutcome::fizzle(format!("{} is not in the {from}", registry.name(target)));
    };
    state.side_mut(owner).hand.push(target);
    sink.record(
        GameEvent::new(
            state.turn.number,
            owner,
            EventKind::CardToHand,
            format!("{} returned to {owner}'s hand", registry.name(target)),
        )
        .with_card(target),
    );
    EffectOutcome::done(format!("returned {} to the hand", registry.name(target)))
}

/// Sends the target card to its owner's graveyard.
pub(super) fn to_graveyard(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    targets: &[CardId],
    from: EffectOrigin,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    let Some(owner) = take_from_origin(state, target, from) else {
        return EffectOutcome::fizzle(format!("{} is not in the {from}", registry.name(target)));
    };
    state.side_mut(owner).graveyard.push(target);
    sink.record(
        GameEvent::new(
            state.turn.number,
            owner,
            EventKind::CardToGraveyard,
            format!("{} was sent to {owner}'s graveyard", registry.name(target)),
        )
        .with_card(target),
    );
    EffectOutcome::done(format!("sent {} to the graveyard", registry.name(target)))
}

/// Banishes the target card.
pub(super) fn banish(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    targets: &[CardId],
    from: EffectOrigin,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    let Some(owner) = take_from_origin(state, target, from) else {
        return EffectOutcome::fizzle(format!("{} is not in the {from}", registry.name(target)));
    };
    state.side_mut(owner).banished.push(target);
    sink.record(
        GameEvent::new(
            state.turn.number,
            owner,
            EventKind::CardBanished,
            format!("{} was banished", registry.name(target)),
        )
        .with_card(target),
    );
    EffectOutcome::done(format!("banished {}", registry.name(target)))
}

/// Returns the target card to its owner's deck at the given placement.
pub(super) fn to_deck(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    targets: &[CardId],
    from: EffectOrigin,
    placement: DeckPlacement,
) -> EffectOutcome {
    let Some(&target) = targets.first() else {
        return EffectOutcome::fizzle("no target selected");
    };
    let Some(owner) = take_from_origin(state, target, from) else {
        return EffectOutcome::fizzle(format!("{} is not in the {from}", registry.name(target)));
    };
    let deck = &mut state.side_mut(owner).deck;
    let placed = match placement {
        DeckPlacement::Top => {
            deck.insert(0, target);
            "on top of"
        }
        DeckPlacement::Bottom => {
            deck.push(target);
            "on the bottom of"
        }
        DeckPlacement::Shuffle => {
            deck.push(target);
            deck.shuffle(&mut rng());
            "shuffled into"
        }
    };
    sink.record(
        GameEvent::new(
            state.turn.number,
            owner,
            EventKind::CardToDeck,
            format!("{} was returned {placed} {owner}'s deck", registry.name(target)),
        )
        .with_card(target),
    );
    EffectOutcome::done(format!("returned {} {placed} the deck", registry.name(target)))
}

/// Sends `count` cards from the top of `side`'s deck to the graveyard.
/// Milling fewer than `count` because the deck ran dry still succeeds.
pub(super) fn mill(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    count: u32,
) -> EffectOutcome {
    if state.side(side).deck.is_empty() {
        return EffectOutcome::fizzle("the deck is empty");
    }
    let mut milled = 0;
    for _ in 0..count {
        if state.side(side).deck.is_empty() {
            break;
        }
        let card = state.side_mut(side).deck.remove(0);
        state.side_mut(side).graveyard.push(card);
        milled += 1;
        sink.record(
            GameEvent::new(
                state.turn.number,
                side,
                EventKind::CardToGraveyard,
                format!("{side} milled {}", registry.name(card)),
            )
            .with_card(card),
        );
    }
    EffectOutcome::done(format!("milled {milled} card(s)"))
}

/// Discards `count` cards from `side`'s hand: the chosen targets first,
/// then oldest cards for any remainder.
pub(super) fn discard(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    targets: &[CardId],
    count: u32,
) -> EffectOutcome {
    let count = count as usize;
    if state.side(side).hand.len() < count {
        return EffectOutcome::fizzle(format!("fewer than {count} card(s) in hand"));
    }
    let mut chosen: Vec<CardId> = targets
        .iter()
        .copied()
        .filter(|c| state.side(side).hand.contains(c))
        .take(count)
        .collect();
    let mut index = 0;
    while chosen.len() < count {
        let card = state.side(side).hand[index];
        if !chosen.contains(&card) {
            chosen.push(card);
        }
        index += 1;
    }
    for card in &chosen {
        remove_by_id(&mut state.side_mut(side).hand, *card);
        state.side_mut(side).graveyard.push(*card);
        sink.record(
            GameEvent::new(
                state.turn.number,
                side,
                EventKind::CardToGraveyard,
                format!("{side} discarded {}", registry.name(*card)),
            )
            .with_card(*card),
        );
    }
    EffectOutcome::done(format!("discarded {count} card(s)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardCard;
    use crate::card::CardDefinition;
    use crate::effect::ProtectionFlags;
    use crate::events::EventLog;
    use crate::ids::PlayerId;
    use crate::zone::Position;

    fn setup() -> (MatchState, CardRegistry, EventLog) {
        let state = MatchState::new(PlayerId::new(), Vec::new(), PlayerId::new(), Vec::new());
        (state, CardRegistry::new(), EventLog::new())
    }

    fn named(registry: &mut CardRegistry, name: &str) -> CardId {
        registry.register(CardDefinition::monster(name, 4, 1000, 1000))
    }

    #[test]
    fn test_bounce_returns_to_the_owners_hand() {
        let (mut state, mut registry, mut log) = setup();
        let target = named(&mut registry, "Bounced");
        state
            .side_mut(Side::Challenger)
            .board
            .place_monster(BoardCard::summoned(target, Position::Attack, ProtectionFlags::none()))
            .unwrap();

        let outcome = to_hand(&mut state, &registry, &mut log, &[target], EffectOrigin::Board);
        assert!(outcome.success);
        // Owner keeps the card even though the opponent bounced it.
        assert_eq!(state.side(Side::Challenger).hand, vec![target]);
        assert!(state.side(Side::Challenger).board.monster(target).is_none());
    }

    #[test]
    fn test_bounce_drops_modifiers() {
        let (mut state, mut registry, mut log) = setup();
        let target = named(&mut registry, "Buffed");
        state
            .side_mut(Side::Host)
            .board
            .place_monster(BoardCard::summoned(target, Position::Attack, ProtectionFlags::none()))
            .unwrap();
        state.add_modifier(crate::match_state::StatModifier {
            card: target,
            attack: 700,
            defense: 0,
            persistent: true,
        });

        to_hand(&mut state, &registry, &mut log, &[target], EffectOrigin::Board);
        assert!(state.modifiers.is_empty());
    }

    #[test]
    fn test_origin_mismatch_fizzles() {
        let (mut state, mut registry, mut log) = setup();
        let target = named(&mut registry, "Misplaced");
        state.side_mut(Side::Host).graveyard.push(target);

        let outcome = to_hand(&mut state, &registry, &mut log, &[target], EffectOrigin::Board);
        assert!(!outcome.success);
        assert_eq!(state.side(Side::Host).graveyard, vec![target]);
    }

    #[test]
    fn test_deck_top_placement_draws_next() {
        let (mut state, mut registry, mut log) = setup();
        let target = named(&mut registry, "Returned");
        state.side_mut(Side::Host).deck = vec![CardId::from_raw(900)];
        state.side_mut(Side::Host).hand.push(target);

        to_deck(
            &mut state,
            &registry,
            &mut log,
            &[target],
            EffectOrigin::Hand,
            DeckPlacement::Top,
        );
        assert_eq!(state.side(Side::Host).deck[0], target);
        assert_eq!(state.draw_card(Side::Host), Some(target));
    }

    #[test]
    fn test_deck_bottom_placement_draws_last() {
        let (mut state, mut registry, mut log) = setup();
        let target = named(&mut registry, "Returned");
        state.side_mut(Side::Host).deck = vec![CardId::from_raw(900)];
        state.side_mut(Side::Host).hand.push(target);

        to_deck(
            &mut state,
            &registry,
            &mut log,
            &[target],
            EffectOrigin::Hand,
            DeckPlacement::Bottom,
        );
        assert_eq!(*state.side(Side::Host).deck.last().unwrap(), target);
    }

    #[test]
    fn test_shuffle_placement_keeps_the_card_in_the_deck() {
        let (mut state, mut registry, mut log) = setup();
        let target = named(&mut registry, "Shuffled");
        state.side_mut(Side::Host).deck = (1..=10).map(CardId::from_raw).collect();
        state.side_mut(Side::Host).hand.push(target);

        to_deck(
            &mut state,
            &registry,
            &mut log,
            &[target],
            EffectOrigin::Hand,
            DeckPlacement::Shuffle,
        );
        assert_eq!(state.side(Side::Host).deck.len(), 11);
        assert!(state.side(Side::Host).deck.contains(&target));
        assert!(state.side(Side::Host).hand.is_empty());
    }

    #[test]
    fn test_mill_moves_top_cards_in_order() {
        let (mut state, registry, mut log) = setup();
        state.side_mut(Side::Host).deck = (1..=5).map(CardId::from_raw).collect();

        let outcome = mill(&mut state, &registry, &mut log, Side::Host, 3);
        assert!(outcome.success);
        assert_eq!(
            state.side(Side::Host).graveyard,
            vec![CardId::from_raw(1), CardId::from_raw(2), CardId::from_raw(3)]
        );
        assert_eq!(state.side(Side::Host).deck.len(), 2);
    }

    #[test]
    fn test_mill_stops_at_an_empty_deck() {
        let (mut state, registry, mut log) = setup();
        state.side_mut(Side::Host).deck = vec![CardId::from_raw(1)];

        let outcome = mill(&mut state, &registry, &mut log, Side::Host, 3);
        assert!(outcome.success);
        assert_eq!(state.side(Side::Host).graveyard.len(), 1);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_discard_prefers_chosen_targets() {
        let (mut state, mut registry, mut log) = setup();
        let keep = named(&mut registry, "Keep");
        let toss = named(&mut registry, "Toss");
        state.side_mut(Side::Host).hand = vec![keep, toss];

        let outcome = discard(&mut state, &registry, &mut log, Side::Host, &[toss], 1);
        assert!(outcome.success);
        assert_eq!(state.side(Side::Host).hand, vec![keep]);
        assert_eq!(state.side(Side::Host).graveyard, vec![toss]);
    }

    #[test]
    fn test_discard_falls_back_to_oldest() {
        let (mut state, mut registry, mut log) = setup();
        let first = named(&mut registry, "First");
        let second = named(&mut registry, "Second");
        state.side_mut(Side::Host).hand = vec![first, second];

        discard(&mut state, &registry, &mut log, Side::Host, &[], 1);
        assert_eq!(state.side(Side::Host).hand, vec![second]);
        assert_eq!(state.side(Side::Host).graveyard, vec![first]);
    }
}
