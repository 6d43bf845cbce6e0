//! Smoke tests through the crate's public surface only: a match is
//! started the production way, played for a few turns, and ended.

use duelcore::{
    ActionError, CardDefinition, CardRegistry, HAND_LIMIT, MatchState, OPENING_HAND, Phase,
    PlayerId, STARTING_LIFE, Side, WinReason,
};
use duelcore::events::EventLog;

fn stocked_registry(registry: &mut CardRegistry, copies: usize) -> Vec<duelcore::CardId> {
    (0..copies)
        .map(|i| {
            registry.register(CardDefinition::monster(
                &format!("Squire {i}"),
                3,
                1200,
                900,
            ))
        })
        .collect()
}

#[test]
fn test_match_start_deals_opening_hands() {
    let mut registry = CardRegistry::new();
    let host = PlayerId::new();
    let challenger = PlayerId::new();
    let host_deck = stocked_registry(&mut registry, 15);
    let challenger_deck = stocked_registry(&mut registry, 15);

    let state = MatchState::start(host, host_deck, challenger, challenger_deck);

    for side in [Side::Host, Side::Challenger] {
        assert_eq!(state.side(side).hand.len(), OPENING_HAND);
        assert_eq!(state.side(side).deck.len(), 15 - OPENING_HAND);
        assert_eq!(state.side(side).life, STARTING_LIFE);
    }
    assert!(OPENING_HAND < HAND_LIMIT);
    assert_eq!(state.turn.number, 1);
    assert_eq!(state.turn.active, Side::Host);
    assert_eq!(state.turn.phase, Phase::Draw);
    assert!(!state.is_terminal());
}

#[test]
fn test_turns_alternate_and_draw_for_the_incoming_player() {
    let mut registry = CardRegistry::new();
    let host = PlayerId::new();
    let challenger = PlayerId::new();
    let host_deck = stocked_registry(&mut registry, 15);
    let challenger_deck = stocked_registry(&mut registry, 15);
    let mut state = MatchState::start(host, host_deck, challenger, challenger_deck);
    let mut log = EventLog::new();

    // Host plays out turn 1 without summoning.
    while state.turn.phase != Phase::End {
        duelcore::advance_phase(&mut state, &mut log, host).unwrap();
    }
    duelcore::end_turn(&mut state, &mut log, host).unwrap();

    assert_eq!(state.turn.number, 2);
    assert_eq!(state.turn.active, Side::Challenger);
    // The incoming player drew for the turn.
    assert_eq!(state.side(Side::Challenger).hand.len(), OPENING_HAND + 1);
    assert_eq!(state.side(Side::Host).hand.len(), OPENING_HAND);

    // The off-turn player cannot move the turn along.
    let err = duelcore::advance_phase(&mut state, &mut log, host);
    assert!(matches!(err, Err(ActionError::Turn(_))));
}

#[test]
fn test_summon_from_a_dealt_hand_and_concede() {
    let mut registry = CardRegistry::new();
    let host = PlayerId::new();
    let challenger = PlayerId::new();
    let host_deck = stocked_registry(&mut registry, 15);
    let challenger_deck = stocked_registry(&mut registry, 15);
    let mut state = MatchState::start(host, host_deck, challenger, challenger_deck);
    let mut log = EventLog::new();

    duelcore::advance_phase(&mut state, &mut log, host).unwrap();
    duelcore::advance_phase(&mut state, &mut log, host).unwrap();
    assert_eq!(state.turn.phase, Phase::Main1);

    // Every deck card is level 3, so any card in hand summons freely.
    let card = state.side(Side::Host).hand[0];
    duelcore::normal_summon(
        &mut state,
        &registry,
        &mut log,
        host,
        card,
        &[],
        duelcore::Position::Attack,
    )
    .unwrap();
    assert!(state.side(Side::Host).board.monster(card).is_some());

    duelcore::forfeit(&mut state, &mut log, challenger).unwrap();
    let outcome = state.outcome.unwrap();
    assert_eq!(outcome.winner, Side::Host);
    assert_eq!(outcome.reason, WinReason::Forfeit);
}
