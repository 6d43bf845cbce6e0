//! End-to-end duels driven through the public action surface.
//!
//! These tests script both players' moves the way a client would issue
//! them, phase by phase, and assert on the resulting match state and
//! event stream rather than on module internals.


use crate::actions;
use crate::card::CardDefinition;
use crate::events::EventLog;
use crate::ids::{CardId, PlayerId};
use crate::match_state::{MatchState, Phase, Side};
use crate::{CardRegistry, Position};

/// A two-player match plus everything needed to act on it.
pub(crate) struct Duel {
    pub state: MatchState,
    pub registry: CardRegistry,
    pub log: EventLog,
    pub host: PlayerId,
    pub challenger: PlayerId,
}

impl Duel {
    /// An empty match, host to act, already in its first main phase.
    pub fn new() -> Self {
        let host = PlayerId::new();
        let challenger = PlayerId::new();
        let mut state = MatchState::new(host, Vec::new(), challenger, Vec::new());
        state.turn.phase = Phase::Main1;
        Self {
            state,
            registry: CardRegistry::new(),
            log: EventLog::new(),
            host,
            challenger,
        }
    }

    pub fn player(&self, side: Side) -> PlayerId {
        match side {
            Side::Host => self.host,
            Side::Challenger => self.challenger,
        }
    }

    fn active_player(&self) -> PlayerId {
        self.player(self.state.turn.active)
    }

    /// Registers a vanilla monster and puts it in `side`'s hand.
    pub fn monster_in_hand(
        &mut self,
        side: Side,
        name: &str,
        level: u32,
        attack: i32,
        defense: i32,
    ) -> CardId {
        let card = self
            .registry
            .register(CardDefinition::monster(name, level, attack, defense));
        self.state.side_mut(side).hand.push(card);
        card
    }

    /// Pads `side`'s deck with filler cards so draws cannot deck out.
    pub fn stock_deck(&mut self, side: Side, count: usize) {
        for i in 0..count {
            let card = self
                .registry
                .register(CardDefinition::monster(&format!("Filler {i}"), 1, 100, 100));
            self.state.side_mut(side).deck.push(card);
        }
    }

    /// Summons a monster in attack position from the active player's hand.
    pub fn summon(&mut self, card: CardId) {
        let player = self.active_player();
        actions::normal_summon(
            &mut self.state,
            &self.registry,
            &mut self.log,
            player,
            card,
            &[],
            Position::Attack,
        )
        .unwrap();
    }

    /// Advances the active player's turn to the given phase.
    pub fn advance_to(&mut self, phase: Phase) {
        while self.state.turn.phase != phase {
            let player = self.active_player();
            actions::advance_phase(&mut self.state, &mut self.log, player).unwrap();
        }
    }

    /// Runs out the remaining phases and passes the turn.
    pub fn pass_turn(&mut self) {
        self.advance_to(Phase::End);
        let player = self.active_player();
        actions::end_turn(&mut self.state, &mut self.log, player).unwrap();
    }

    /// Declares and resolves an attack in one step.
    pub fn attack(&mut self, attacker: CardId, target: Option<CardId>) {
        let player = self.active_player();
        actions::declare_attack(&mut self.state, &mut self.log, player, attacker).unwrap();
        actions::select_attack_target(
            &mut self.state,
            &self.registry,
            &mut self.log,
            player,
            target,
        )
        .unwrap();
    }
}
