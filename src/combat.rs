//! Attack declaration and battle resolution.
//!
//! Combat is a two-step exchange. [`declare_attack`] checks that the
//! attacker may swing this battle phase and parks a [`PendingAttack`] on
//! the match, listing the legal targets. [`select_attack_target`]
//! validates the chosen target, then commits the whole battle in one
//! pass: face-down defenders flip, effective stats are compared, the
//! loser is destroyed, battle damage lands, and any life-point
//! depletion terminates the match.
//!
//! Validation is strictly ordered before mutation, so a rejected target
//! selection leaves the pending attack (and everything else) intact.

use crate::card::CardRegistry;
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Phase, Side, WinReason};
use crate::zone::Position;

// --- Errors ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    /// The match already has an outcome.
    MatchOver,
    /// The acting side is not the turn player.
    NotYourTurn,
    /// Attacks only happen in the battle phase.
    NotBattlePhase(Phase),
    /// The attacker is not a monster on the attacking side's board.
    AttackerNotOnBoard(CardId),
    /// Face-down monsters cannot attack.
    AttackerFaceDown(CardId),
    /// Each monster attacks at most once per turn.
    AlreadyAttacked(CardId),
    /// A declared attack is still waiting for a target.
    AttackAlreadyPending,
    /// Target selection without a declared attack.
    NoPendingAttack,
    /// The chosen card is not among the declared legal targets.
    TargetNotLegal(CardId),
    /// The chosen target cannot be targeted by attacks.
    TargetProtected(CardId),
    /// Direct attacks are only legal when the defender's board is empty.
    DirectAttackNotAllowed,
    /// No definition registered for a card involved in the battle.
    UnknownCard(CardId),
}

impl std::fmt::Display for CombatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatError::MatchOver => write!(f, "the match is already over"),
            CombatError::NotYourTurn => write!(f, "it is not your turn"),
            CombatError::NotBattlePhase(phase) => {
                write!(f, "attacks require the battle phase, but the turn is in the {phase} phase")
            }
            CombatError::AttackerNotOnBoard(id) => {
                write!(f, "attacker {id} is not a monster on your board")
            }
            CombatError::AttackerFaceDown(id) => {
                write!(f, "attacker {id} is face-down")
            }
            CombatError::AlreadyAttacked(id) => {
                write!(f, "monster {id} has already attacked this turn")
            }
            CombatError::AttackAlreadyPending => {
                write!(f, "an attack is already waiting for a target")
            }
            CombatError::NoPendingAttack => write!(f, "no attack has been declared"),
            CombatError::TargetNotLegal(id) => {
                write!(f, "card {id} is not a legal attack target")
            }
            CombatError::TargetProtected(id) => {
                write!(f, "card {id} cannot be targeted by attacks")
            }
            CombatError::DirectAttackNotAllowed => {
                write!(f, "direct attacks are only allowed against an empty board")
            }
            CombatError::UnknownCard(id) => write!(f, "no card definition for {id}"),
        }
    }
}

impl std::error::Error for CombatError {}

// --- Attack state ---

/// A declared attack waiting for its target. Stored on the match so the
/// declaration survives a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAttack {
    pub attacker: CardId,
    /// Every opposing board monster at declaration time.
    pub legal_targets: Vec<CardId>,
    /// True exactly when `legal_targets` is empty.
    pub direct_allowed: bool,
}

/// What a resolved attack hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackTarget {
    Monster(CardId),
    Direct,
}

/// Summary of one resolved battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    pub attacker: CardId,
    pub target: AttackTarget,
    /// Monsters sent to the graveyard by this battle.
    pub destroyed: Vec<CardId>,
    /// Battle damage dealt, with the side that took it.
    pub damage: Option<(Side, u32)>,
    /// Set when a face-down defender was flipped by the attack.
    pub flipped: Option<CardId>,
}

// --- Declaration ---

/// Declares an attack and computes the legal targets: every monster the
/// defender controls, or a direct attack when they control none.
pub fn declare_attack(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
    attacker: CardId,
) -> Result<PendingAttack, CombatError> {
    if state.is_terminal() {
        return Err(CombatError::MatchOver);
    }
    if !state.is_active(side) {
        return Err(CombatError::NotYourTurn);
    }
    if state.turn.phase != Phase::Battle {
        return Err(CombatError::NotBattlePhase(state.turn.phase));
    }
    if state.pending_attack.is_some() {
        return Err(CombatError::AttackAlreadyPending);
    }
    let monster = state
        .side(side)
        .board
        .monster(attacker)
        .ok_or(CombatError::AttackerNotOnBoard(attacker))?;
    if monster.face_down {
        return Err(CombatError::AttackerFaceDown(attacker));
    }
    if monster.has_attacked {
        return Err(CombatError::AlreadyAttacked(attacker));
    }

    let legal_targets: Vec<CardId> = state
        .side(side.opponent())
        .board
        .monsters()
        .map(|m| m.card)
        .collect();
    let pending = PendingAttack {
        attacker,
        direct_allowed: legal_targets.is_empty(),
        legal_targets,
    };
    state.pending_attack = Some(pending.clone());
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::AttackDeclared,
            format!("{side} declared an attack"),
        )
        .with_card(attacker),
    );
    Ok(pending)
}

// --- Resolution ---

/// Resolves the pending attack against the chosen target, or directly
/// against the defender when `target` is `None`.
pub fn select_attack_target(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    target: Option<CardId>,
) -> Result<BattleReport, CombatError> {
    if state.is_terminal() {
        return Err(CombatError::MatchOver);
    }
    if !state.is_active(side) {
        return Err(CombatError::NotYourTurn);
    }
    if state.turn.phase != Phase::Battle {
        return Err(CombatError::NotBattlePhase(state.turn.phase));
    }
    let pending = state
        .pending_attack
        .as_ref()
        .ok_or(CombatError::NoPendingAttack)?;
    let attacker = pending.attacker;
    let defender_side = side.opponent();

    // The attacker may have left the board since declaration.
    if state.side(side).board.monster(attacker).is_none() {
        state.pending_attack = None;
        return Err(CombatError::AttackerNotOnBoard(attacker));
    }

    match target {
        None => {
            if !state.pending_attack.as_ref().is_some_and(|p| p.direct_allowed) {
                return Err(CombatError::DirectAttackNotAllowed);
            }
            state.pending_attack = None;
            resolve_direct_attack(state, registry, sink, side, attacker)
        }
        Some(defender) => {
            let pending = state.pending_attack.as_ref().ok_or(CombatError::NoPendingAttack)?;
            if !pending.legal_targets.contains(&defender) {
                return Err(CombatError::TargetNotLegal(defender));
            }
            let defending = state
                .side(defender_side)
                .board
                .monster(defender)
                .ok_or(CombatError::TargetNotLegal(defender))?;
            if defending.protection.cannot_be_targeted {
                return Err(CombatError::TargetProtected(defender));
            }
            state.pending_attack = None;
            resolve_battle(state, registry, sink, side, attacker, defender)
        }
    }
}

fn resolve_direct_attack(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    attacker: CardId,
) -> Result<BattleReport, CombatError> {
    let attack = state
        .effective_attack(registry, attacker)
        .ok_or(CombatError::UnknownCard(attacker))?
        .max(0) as u32;
    let defender_side = side.opponent();

    if let Some(monster) = state.side_mut(side).board.monster_mut(attacker) {
        monster.has_attacked = true;
    }
    let (_, after) = state.deal_damage(defender_side, attack);
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::DirectAttack,
            format!("{side} attacked directly for {attack} damage"),
        )
        .with_card(attacker),
    );
    sink.record(GameEvent::new(
        state.turn.number,
        defender_side,
        EventKind::LifeChanged,
        format!("{defender_side} dropped to {after} life"),
    ));
    check_life_depletion(state, sink, defender_side);

    Ok(BattleReport {
        attacker,
        target: AttackTarget::Direct,
        destroyed: Vec::new(),
        damage: Some((defender_side, attack)),
        flipped: None,
    })
}

fn resolve_battle(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    attacker: CardId,
    defender: CardId,
) -> Result<BattleReport, CombatError> {
    let defender_side = side.opponent();

    // A set monster is flipped by the attack before stats are compared.
    let mut flipped = None;
    {
        let defending = state
            .side_mut(defender_side)
            .board
            .monster_mut(defender)
            .ok_or(CombatError::TargetNotLegal(defender))?;
        if defending.face_down {
            defending.face_down = false;
            flipped = Some(defender);
        }
    }

    let attacker_def = registry.get(attacker).ok_or(CombatError::UnknownCard(attacker))?;
    let attack_value = state
        .effective_attack(registry, attacker)
        .ok_or(CombatError::UnknownCard(attacker))?;
    let defender_position = state
        .side(defender_side)
        .board
        .monster(defender)
        .map(|m| m.position)
        .ok_or(CombatError::TargetNotLegal(defender))?;
    let defense_value = match defender_position {
        Position::Attack => state.effective_attack(registry, defender),
        Position::Defense => state.effective_defense(registry, defender),
    }
    .ok_or(CombatError::UnknownCard(defender))?;
    let piercing = attacker_def.piercing;

    if let Some(monster) = state.side_mut(side).board.monster_mut(attacker) {
        monster.has_attacked = true;
    }

    let mut destroyed = Vec::new();
    let mut damage = None;
    let diff = (attack_value - defense_value).unsigned_abs();

    if attack_value > defense_value {
        if destroy_by_battle(state, sink, defender_side, defender) {
            destroyed.push(defender);
        }
        // Against defense position, only piercing attackers deal the
        // difference; against attack position the defender always takes it.
        let deals_damage = defender_position == Position::Attack || piercing;
        if deals_damage && diff > 0 {
            damage = Some((defender_side, diff));
        }
    } else if attack_value < defense_value {
        if destroy_by_battle(state, sink, side, attacker) {
            destroyed.push(attacker);
        }
        // The attacker ran into a bigger monster; attacking into defense
        // bounces back no damage.
        if defender_position == Position::Attack && diff > 0 {
            damage = Some((side, diff));
        }
    } else {
        // A tie crashes both monsters regardless of the defender's
        // position; nobody takes damage.
        if destroy_by_battle(state, sink, side, attacker) {
            destroyed.push(attacker);
        }
        if destroy_by_battle(state, sink, defender_side, defender) {
            destroyed.push(defender);
        }
    }

    if let Some((damaged_side, amount)) = damage {
        let (_, after) = state.deal_damage(damaged_side, amount);
        sink.record(GameEvent::new(
            state.turn.number,
            damaged_side,
            EventKind::LifeChanged,
            format!("{damaged_side} took {amount} battle damage ({after} life left)"),
        ));
    }
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::BattleResolved,
            format!(
                "battle resolved: {attack_value} ATK against {defense_value} {defender_position}",
            ),
        )
        .with_card(attacker),
    );
    if let Some((damaged_side, _)) = damage {
        check_life_depletion(state, sink, damaged_side);
    }

    Ok(BattleReport {
        attacker,
        target: AttackTarget::Monster(defender),
        destroyed,
        damage,
        flipped,
    })
}

/// Sends a monster destroyed by battle to its controller's graveyard.
/// Returns false when battle protection saves it.
fn destroy_by_battle(
    state: &mut MatchState,
    sink: &mut dyn EventSink,
    side: Side,
    card: CardId,
) -> bool {
    let Some(monster) = state.side(side).board.monster(card) else {
        return false;
    };
    if monster.protection.cannot_be_destroyed_by_battle {
        return false;
    }
    state.side_mut(side).board.remove_monster(card);
    state.side_mut(side).graveyard.push(card);
    state.clear_modifiers_for(card);
    sink.record(
        GameEvent::new(
            state.turn.number,
            side,
            EventKind::CardDestroyed,
            format!("{side}'s monster was destroyed by battle"),
        )
        .with_card(card),
    );
    true
}

fn check_life_depletion(state: &mut MatchState, sink: &mut dyn EventSink, side: Side) {
    if state.side(side).life > 0 || state.is_terminal() {
        return;
    }
    let winner = side.opponent();
    state.set_outcome(winner, WinReason::LifeDepleted);
    sink.record(GameEvent::new(
        state.turn.number,
        winner,
        EventKind::MatchEnded,
        format!("{side} ran out of life; {winner} wins"),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardCard;
    use crate::card::CardDefinition;
    use crate::effect::ProtectionFlags;
    use crate::events::EventLog;
    use crate::ids::PlayerId;

    fn battle_ready() -> (MatchState, CardRegistry) {
        let mut state = MatchState::new(PlayerId::new(), Vec::new(), PlayerId::new(), Vec::new());
        state.turn.phase = Phase::Battle;
        (state, CardRegistry::new())
    }

    fn field_monster(
        state: &mut MatchState,
        registry: &mut CardRegistry,
        side: Side,
        attack: i32,
        defense: i32,
        position: Position,
    ) -> CardId {
        let def = CardDefinition::monster("Battler", 4, attack, defense);
        let id = def.id;
        registry.register(def);
        let mut card = BoardCard::summoned(id, position, ProtectionFlags::none());
        card.summoned_this_turn = false;
        state.side_mut(side).board.place_monster(card).unwrap();
        id
    }

    #[test]
    fn test_attack_requires_battle_phase() {
        let (mut state, mut registry) = battle_ready();
        state.turn.phase = Phase::Main1;
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        let mut log = EventLog::new();
        let err = declare_attack(&mut state, &mut log, Side::Host, attacker);
        assert_eq!(err, Err(CombatError::NotBattlePhase(Phase::Main1)));
    }

    #[test]
    fn test_declaration_lists_all_defenders() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        let d1 = field_monster(&mut state, &mut registry, Side::Challenger, 1200, 800, Position::Attack);
        let d2 = field_monster(&mut state, &mut registry, Side::Challenger, 900, 1400, Position::Defense);
        let mut log = EventLog::new();

        let pending = declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        assert_eq!(pending.legal_targets, vec![d1, d2]);
        assert!(!pending.direct_allowed);
        assert!(state.pending_attack.is_some());
    }

    #[test]
    fn test_attacker_swings_once_per_turn() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        state
            .side_mut(Side::Host)
            .board
            .monster_mut(attacker)
            .unwrap()
            .has_attacked = true;
        let mut log = EventLog::new();

        let err = declare_attack(&mut state, &mut log, Side::Host, attacker);
        assert_eq!(err, Err(CombatError::AlreadyAttacked(attacker)));
    }

    #[test]
    fn test_attack_beats_smaller_attack_with_damage() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 1200, 800, Position::Attack);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.destroyed, vec![defender]);
        assert_eq!(report.damage, Some((Side::Challenger, 600)));
        assert_eq!(state.side(Side::Challenger).life, 7400);
        assert_eq!(state.side(Side::Challenger).graveyard, vec![defender]);
        assert!(state.pending_attack.is_none());
    }

    #[test]
    fn test_defense_position_absorbs_damage_without_piercing() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 500, 1400, Position::Defense);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.destroyed, vec![defender]);
        assert_eq!(report.damage, None);
        assert_eq!(state.side(Side::Challenger).life, 8000);
    }

    #[test]
    fn test_piercing_deals_the_difference() {
        let (mut state, mut registry) = battle_ready();
        let def = CardDefinition::monster("Piercer", 4, 1800, 1000).piercing();
        let attacker = def.id;
        registry.register(def);
        let mut card = BoardCard::summoned(attacker, Position::Attack, ProtectionFlags::none());
        card.summoned_this_turn = false;
        state.side_mut(Side::Host).board.place_monster(card).unwrap();
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 500, 1400, Position::Defense);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.damage, Some((Side::Challenger, 400)));
        assert_eq!(state.side(Side::Challenger).life, 7600);
    }

    #[test]
    fn test_attacking_into_bigger_defense_destroys_attacker() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1000, 500, Position::Attack);
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 300, 2000, Position::Defense);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.destroyed, vec![attacker]);
        assert_eq!(report.damage, None);
        assert_eq!(state.side(Side::Host).graveyard, vec![attacker]);
        assert_eq!(state.side(Side::Host).life, 8000);
    }

    #[test]
    fn test_equal_attacks_crash_both() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1500, 500, Position::Attack);
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 1500, 900, Position::Attack);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.destroyed, vec![attacker, defender]);
        assert_eq!(report.damage, None);
    }

    #[test]
    fn test_tie_against_defense_position_crashes_both() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1400, 500, Position::Attack);
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 200, 1400, Position::Defense);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.destroyed, vec![attacker, defender]);
        assert_eq!(report.damage, None);
        assert_eq!(state.side(Side::Host).graveyard, vec![attacker]);
        assert_eq!(state.side(Side::Challenger).graveyard, vec![defender]);
        assert_eq!(state.side(Side::Host).life, 8000);
        assert_eq!(state.side(Side::Challenger).life, 8000);
    }

    #[test]
    fn test_face_down_defender_flips_during_battle() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1000, 500, Position::Attack);
        let def = CardDefinition::monster("Wall", 4, 200, 1800);
        let defender = def.id;
        registry.register(def);
        let mut set = BoardCard::set_face_down(defender);
        set.summoned_this_turn = false;
        state.side_mut(Side::Challenger).board.place_monster(set).unwrap();
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.flipped, Some(defender));
        assert_eq!(report.destroyed, vec![attacker]);
        let flipped = state.side(Side::Challenger).board.monster(defender).unwrap();
        assert!(!flipped.face_down);
    }

    #[test]
    fn test_direct_attack_needs_empty_board() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        field_monster(&mut state, &mut registry, Side::Challenger, 100, 100, Position::Attack);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let err = select_attack_target(&mut state, &registry, &mut log, Side::Host, None);
        assert_eq!(err, Err(CombatError::DirectAttackNotAllowed));
        // The pending attack survives a rejected selection.
        assert!(state.pending_attack.is_some());
    }

    #[test]
    fn test_direct_attack_hits_life_directly() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 2000, 1000, Position::Attack);
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, None).unwrap();

        assert_eq!(report.target, AttackTarget::Direct);
        assert_eq!(report.damage, Some((Side::Challenger, 2000)));
        assert_eq!(state.side(Side::Challenger).life, 6000);
        assert!(state.side(Side::Host).board.monster(attacker).unwrap().has_attacked);
    }

    #[test]
    fn test_lethal_damage_ends_the_match() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 2000, 1000, Position::Attack);
        state.side_mut(Side::Challenger).life = 1500;
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        select_attack_target(&mut state, &registry, &mut log, Side::Host, None).unwrap();

        assert_eq!(state.side(Side::Challenger).life, 0);
        let outcome = state.outcome.expect("match should be over");
        assert_eq!(outcome.winner, Side::Host);
        assert_eq!(outcome.reason, WinReason::LifeDepleted);
        assert!(log.kinds().contains(&EventKind::MatchEnded));
    }

    #[test]
    fn test_untargetable_monster_blocks_selection() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        let def = CardDefinition::monster("Ghost", 4, 1000, 1000);
        let defender = def.id;
        registry.register(def);
        let protection = ProtectionFlags {
            cannot_be_targeted: true,
            ..ProtectionFlags::none()
        };
        let mut card = BoardCard::summoned(defender, Position::Attack, protection);
        card.summoned_this_turn = false;
        state.side_mut(Side::Challenger).board.place_monster(card).unwrap();
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let err = select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender));
        assert_eq!(err, Err(CombatError::TargetProtected(defender)));
    }

    #[test]
    fn test_battle_protection_saves_the_loser() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1800, 1000, Position::Attack);
        let def = CardDefinition::monster("Anchor", 4, 1200, 800);
        let defender = def.id;
        registry.register(def);
        let protection = ProtectionFlags {
            cannot_be_destroyed_by_battle: true,
            ..ProtectionFlags::none()
        };
        let mut card = BoardCard::summoned(defender, Position::Attack, protection);
        card.summoned_this_turn = false;
        state.side_mut(Side::Challenger).board.place_monster(card).unwrap();
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert!(report.destroyed.is_empty());
        // Battle damage still lands even though the monster survives.
        assert_eq!(report.damage, Some((Side::Challenger, 600)));
        assert!(state.side(Side::Challenger).board.monster(defender).is_some());
    }

    #[test]
    fn test_stat_modifiers_change_the_outcome() {
        let (mut state, mut registry) = battle_ready();
        let attacker =
            field_monster(&mut state, &mut registry, Side::Host, 1200, 1000, Position::Attack);
        let defender =
            field_monster(&mut state, &mut registry, Side::Challenger, 1400, 800, Position::Attack);
        state.add_modifier(crate::match_state::StatModifier {
            card: attacker,
            attack: 500,
            defense: 0,
            persistent: false,
        });
        let mut log = EventLog::new();

        declare_attack(&mut state, &mut log, Side::Host, attacker).unwrap();
        let report =
            select_attack_target(&mut state, &registry, &mut log, Side::Host, Some(defender))
                .unwrap();

        assert_eq!(report.destroyed, vec![defender]);
        assert_eq!(report.damage, Some((Side::Challenger, 300)));
    }
}
