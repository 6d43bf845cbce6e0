//! Card-effect execution.
//!
//! [`execute_effect`] is the single entry point for running one effect
//! clause. It owns the cross-cutting rules every executor shares:
//! - the once-per-turn check on the source card (before anything runs,
//!   after which a successful resolution marks the card used),
//! - targeting protection (a clause aimed at an untargetable monster is
//!   refused up front, naming the offending card),
//! - activation-cost payment,
//! and then dispatches on [`EffectKind`] to the executor modules.
//!
//! [`run_ability`] drives multi-clause abilities: it executes every
//! clause matching a trigger, skipping passive clauses, and reports per
//! clause. One failing clause does not stop the rest; the run succeeds
//! if at least one clause resolved.

mod destroy;
mod draw;
mod life;
mod modify_stat;
mod movement;
mod negate;
mod search;
mod summon;

use crate::card::CardRegistry;
use crate::effect::{ActivationCost, EffectKind, ParsedAbility, ParsedEffect, Trigger};
use crate::events::{EventKind, EventSink, GameEvent};
use crate::ids::CardId;
use crate::match_state::{MatchState, Side};

// --- Results and errors ---

/// Result of one executed effect clause. `success: false` means the
/// clause fizzled (no legal target, empty deck, unpayable cost) without
/// being an illegal activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectOutcome {
    pub success: bool,
    pub message: String,
}

impl EffectOutcome {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fizzle(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// An activation that is illegal outright, as opposed to one that
/// resolves without effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// The source card's once-per-turn effect was already used.
    OncePerTurnUsed { name: String },
    /// A chosen target cannot be targeted by card effects.
    TargetProtected { name: String },
}

impl std::fmt::Display for EffectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectError::OncePerTurnUsed { name } => {
                write!(f, "{name}'s effect can only be used once per turn")
            }
            EffectError::TargetProtected { name } => {
                write!(f, "{name} cannot be targeted by card effects")
            }
        }
    }
}

impl std::error::Error for EffectError {}

/// Per-clause record of a multi-clause ability run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityReport {
    /// True if at least one clause resolved.
    pub success: bool,
    /// Number of clauses that resolved.
    pub executed: usize,
    /// One message per attempted clause, in text order.
    pub messages: Vec<String>,
}

// --- Dispatch ---

/// Executes one effect clause for `side`, with `source` as the card the
/// effect is printed on and `targets` the cards the player chose.
pub fn execute_effect(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    source: CardId,
    effect: &ParsedEffect,
    targets: &[CardId],
) -> Result<EffectOutcome, EffectError> {
    if effect.once_per_turn && state.opt_used(source) {
        return Err(EffectError::OncePerTurnUsed {
            name: registry.name(source).to_string(),
        });
    }
    if effect.is_passive() {
        return Ok(EffectOutcome::fizzle("passive effect; nothing to execute"));
    }
    for &target in targets {
        let protected = state
            .monster_side(target)
            .and_then(|s| state.side(s).board.monster(target))
            .is_some_and(|m| m.protection.cannot_be_targeted);
        if protected {
            return Err(EffectError::TargetProtected {
                name: registry.name(target).to_string(),
            });
        }
    }
    if let Some(cost) = &effect.cost {
        if let Err(outcome) = pay_cost(state, registry, sink, side, cost) {
            return Ok(outcome);
        }
    }

    let outcome = match &effect.kind {
        EffectKind::Draw { count } => draw::execute(state, sink, side, *count),
        EffectKind::Destroy { target_count } => {
            destroy::execute(state, registry, sink, targets, *target_count)
        }
        EffectKind::Damage { amount } => life::damage(state, sink, side, *amount),
        EffectKind::GainLife { amount } => life::gain(state, sink, side, *amount),
        EffectKind::ModifyStat {
            attack,
            defense,
            persistent,
        } => modify_stat::execute(state, registry, sink, side, targets, *attack, *defense, *persistent),
        EffectKind::SpecialSummon { from } => {
            summon::execute(state, registry, sink, side, targets, *from)
        }
        EffectKind::ToHand { from } => movement::to_hand(state, registry, sink, targets, *from),
        EffectKind::ToGraveyard { from } => {
            movement::to_graveyard(state, registry, sink, targets, *from)
        }
        EffectKind::ToDeck { from, placement } => {
            movement::to_deck(state, registry, sink, targets, *from, *placement)
        }
        EffectKind::Banish { from } => movement::banish(state, registry, sink, targets, *from),
        EffectKind::Mill { count } => movement::mill(state, registry, sink, side, *count),
        EffectKind::Discard { count } => {
            movement::discard(state, registry, sink, side, targets, *count)
        }
        EffectKind::Search {
            target_type,
            archetype,
        } => search::execute(state, registry, sink, side, targets.first().copied(), *target_type, *archetype),
        EffectKind::Negate { scope } => negate::execute(state, registry, sink, targets, *scope),
        // is_passive() caught Protection above; the match stays exhaustive.
        EffectKind::Protection(_) => EffectOutcome::fizzle("passive effect; nothing to execute"),
    };

    if outcome.success {
        if effect.once_per_turn {
            state.mark_opt_used(source);
        }
        sink.record(
            GameEvent::new(
                state.turn.number,
                side,
                EventKind::EffectActivated,
                format!("{}: {}", registry.name(source), outcome.message),
            )
            .with_card(source),
        );
    }
    Ok(outcome)
}

/// Runs every clause of `ability` that fires on `trigger`, in text order.
/// Illegal activations are folded into the report as failed clauses.
pub fn run_ability(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    source: CardId,
    ability: &ParsedAbility,
    trigger: Trigger,
    targets: &[CardId],
) -> AbilityReport {
    let mut executed = 0;
    let mut messages = Vec::new();
    for effect in ability.triggered_by(trigger) {
        match execute_effect(state, registry, sink, side, source, effect, targets) {
            Ok(outcome) => {
                if outcome.success {
                    executed += 1;
                }
                messages.push(outcome.message);
            }
            Err(err) => messages.push(err.to_string()),
        }
    }
    AbilityReport {
        success: executed > 0,
        executed,
        messages,
    }
}

// --- Activation costs ---

/// Pays an activation cost up front. An unpayable cost fizzles the
/// clause before any of its executor runs.
fn pay_cost(
    state: &mut MatchState,
    registry: &CardRegistry,
    sink: &mut dyn EventSink,
    side: Side,
    cost: &ActivationCost,
) -> Result<(), EffectOutcome> {
    match *cost {
        ActivationCost::Discard { count } => {
            let count = count as usize;
            if state.side(side).hand.len() < count {
                return Err(EffectOutcome::fizzle(format!(
                    "cannot pay the cost: fewer than {count} card(s) in hand"
                )));
            }
            for _ in 0..count {
                let card = state.side_mut(side).hand.remove(0);
                state.side_mut(side).graveyard.push(card);
                sink.record(
                    GameEvent::new(
                        state.turn.number,
                        side,
                        EventKind::CardToGraveyard,
                        format!("{side} discarded {} as a cost", registry.name(card)),
                    )
                    .with_card(card),
                );
            }
        }
        ActivationCost::PayLife { amount } => {
            if state.side(side).life <= amount {
                return Err(EffectOutcome::fizzle(format!(
                    "cannot pay {amount} life points"
                )));
            }
            let (_, after) = state.deal_damage(side, amount);
            sink.record(GameEvent::new(
                state.turn.number,
                side,
                EventKind::LifeChanged,
                format!("{side} paid {amount} life points ({after} left)"),
            ));
        }
        ActivationCost::Tribute { count } => {
            let count = count as usize;
            let monsters: Vec<CardId> = state
                .side(side)
                .board
                .monsters()
                .map(|m| m.card)
                .take(count)
                .collect();
            if monsters.len() < count {
                return Err(EffectOutcome::fizzle(format!(
                    "cannot tribute {count} monster(s)"
                )));
            }
            for card in monsters {
                state.side_mut(side).board.remove_monster(card);
                state.side_mut(side).graveyard.push(card);
                state.clear_modifiers_for(card);
                sink.record(
                    GameEvent::new(
                        state.turn.number,
                        side,
                        EventKind::TributePaid,
                        format!("{side} tributed {} as a cost", registry.name(card)),
                    )
                    .with_card(card),
                );
            }
        }
        ActivationCost::Banish { count } => {
            let count = count as usize;
            if state.side(side).graveyard.len() < count {
                return Err(EffectOutcome::fizzle(format!(
                    "cannot banish {count} card(s) from the graveyard"
                )));
            }
            for _ in 0..count {
                let Some(card) = state.side_mut(side).graveyard.pop() else {
                    break;
                };
                state.side_mut(side).banished.push(card);
                sink.record(
                    GameEvent::new(
                        state.turn.number,
                        side,
                        EventKind::CardBanished,
                        format!("{side} banished {} as a cost", registry.name(card)),
                    )
                    .with_card(card),
                );
            }
        }
    }
    Ok(())
}
