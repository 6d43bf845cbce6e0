pub mod actions;
pub mod board;
pub mod card;
pub mod combat;
pub mod effect;
pub mod effects;
pub mod events;
pub mod ids;
pub mod match_state;
#[cfg(feature = "serialization")]
pub mod snapshot;
pub mod turn;
pub mod validators;
pub mod zone;

#[cfg(test)]
mod tests;

pub use actions::{
    ActionError, SummonReport, activate_effect, activate_spell, activate_trap, advance_phase,
    change_position, declare_attack, end_turn, flip_summon, forfeit, normal_summon,
    select_attack_target, set_monster, set_spell_trap,
};
pub use board::{BACKROW_SLOTS, BackrowCard, Board, BoardCard, BoardError, SUPPORT_SLOTS};
pub use card::{Archetype, CardDefinition, CardRegistry, CardType, Rarity};
pub use combat::{AttackTarget, BattleReport, CombatError, PendingAttack};
pub use effect::{
    ActivationCost, DeckPlacement, EffectKind, EffectOrigin, NegateScope, ParsedAbility,
    ParsedEffect, ProtectionFlags, TargetKind, Trigger,
};
pub use effects::{AbilityReport, EffectError, EffectOutcome, execute_effect, run_ability};
pub use events::{EventKind, EventLog, EventSink, GameEvent, NullSink};
pub use ids::{CardId, PlayerId};
pub use match_state::{
    HAND_LIMIT, MatchOutcome, MatchState, OPENING_HAND, Phase, PlayerState, STARTING_LIFE, Side,
    SideMap, StatModifier, TurnState, WinReason,
};
#[cfg(feature = "serialization")]
pub use snapshot::{MatchSnapshot, SNAPSHOT_VERSION, SnapshotError};
pub use turn::{TurnError, next_phase};
pub use validators::Deny;
pub use zone::{Position, Zone};
