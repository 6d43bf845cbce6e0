//! Legality checks for player actions.
//!
//! Every check here is a pure read over [`MatchState`] and the card
//! registry. Validators never mutate state; the action layer in
//! [`crate::actions`] calls them before committing anything, so a denied
//! action leaves the match untouched.
//!
//! Checks performed:
//! - turn ownership and phase gating,
//! - the once-per-turn normal summon allowance,
//! - tribute counts derived from monster level,
//! - zone capacity on the summoning side,
//! - position-change restrictions (once per turn, not during battle,
//!   not on the turn the monster arrived).

use crate::card::{CardRegistry, CardType};
use crate::ids::CardId;
use crate::match_state::{MatchState, Phase, Side};

// --- Denial reasons ---

/// Why an action was refused. Carries enough detail for a caller to
/// explain the refusal without re-deriving game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deny {
    /// The match already has an outcome.
    MatchOver,
    /// The acting side is not the turn player.
    NotYourTurn,
    /// The action needs a main phase but the turn is elsewhere.
    NotMainPhase(Phase),
    /// Position changes are locked while the battle phase is open.
    PositionChangeDuringBattle,
    /// The turn player's one normal summon or set is spent.
    NormalSummonAlreadyUsed,
    /// Tribute count does not match what the monster's level demands.
    TributeMismatch { required: usize, provided: usize },
    /// A named tribute is not a monster on the summoner's board.
    TributeNotOnBoard(CardId),
    /// No frontline or support slot is open.
    MonsterZonesFull,
    /// All five backrow slots are occupied.
    BackrowFull,
    /// The card is not in the acting player's hand.
    CardNotInHand(CardId),
    /// The card is not a monster on the acting player's board.
    MonsterNotOnBoard(CardId),
    /// No definition registered under this id.
    UnknownCard(CardId),
    /// The card type does not fit the action (e.g. summoning a spell).
    NotAMonster(CardId),
    /// The card cannot be placed in the backrow.
    NotASpellOrTrap(CardId),
    /// The monster is face-down; it must be flip summoned first.
    MonsterFaceDown(CardId),
    /// The monster is already face-up and cannot be flip summoned.
    MonsterFaceUp(CardId),
    /// The monster already changed position (or flipped) this turn.
    AlreadyChangedPosition(CardId),
    /// The monster arrived this turn and cannot change position yet.
    SummonedThisTurn(CardId),
}

impl std::fmt::Display for Deny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deny::MatchOver => write!(f, "the match is already over"),
            Deny::NotYourTurn => write!(f, "it is not your turn"),
            Deny::NotMainPhase(phase) => {
                write!(f, "requires a main phase, but the turn is in the {phase} phase")
            }
            Deny::PositionChangeDuringBattle => {
                write!(f, "positions cannot change during the battle phase")
            }
            Deny::NormalSummonAlreadyUsed => {
                write!(f, "normal summon already used this turn")
            }
            Deny::TributeMismatch { required, provided } => write!(
                f,
                "summon requires {required} tribute(s), but {provided} provided"
            ),
            Deny::TributeNotOnBoard(id) => {
                write!(f, "tribute {id} is not a monster on your board")
            }
            Deny::MonsterZonesFull => write!(f, "no open monster zone"),
            Deny::BackrowFull => write!(f, "backrow is full"),
            Deny::CardNotInHand(id) => write!(f, "card {id} is not in your hand"),
            Deny::MonsterNotOnBoard(id) => {
                write!(f, "monster {id} is not on your board")
            }
            Deny::UnknownCard(id) => write!(f, "no card definition for {id}"),
            Deny::NotAMonster(id) => write!(f, "card {id} is not a monster"),
            Deny::NotASpellOrTrap(id) => {
                write!(f, "card {id} cannot be placed in the backrow")
            }
            Deny::MonsterFaceDown(id) => {
                write!(f, "monster {id} is face-down; flip summon it instead")
            }
            Deny::MonsterFaceUp(id) => {
                write!(f, "monster {id} is already face-up")
            }
            Deny::AlreadyChangedPosition(id) => {
                write!(f, "monster {id} already changed position this turn")
            }
            Deny::SummonedThisTurn(id) => {
                write!(f, "monster {id} was summoned or set this turn")
            }
        }
    }
}

impl std::error::Error for Deny {}

// --- Shared preconditions ---

fn require_turn(state: &MatchState, side: Side) -> Result<(), Deny> {
    if state.is_terminal() {
        return Err(Deny::MatchOver);
    }
    if !state.is_active(side) {
        return Err(Deny::NotYourTurn);
    }
    Ok(())
}

fn require_main_phase(state: &MatchState) -> Result<(), Deny> {
    if !state.turn.phase.is_main() {
        return Err(Deny::NotMainPhase(state.turn.phase));
    }
    Ok(())
}

fn require_in_hand(state: &MatchState, side: Side, card: CardId) -> Result<(), Deny> {
    if state.side(side).hand.contains(&card) {
        Ok(())
    } else {
        Err(Deny::CardNotInHand(card))
    }
}

/// Checks the tribute list against the monster's level requirement and
/// the summoner's board. Tributes must be distinct face-up-or-down
/// monsters the summoner controls.
fn require_tributes(
    state: &MatchState,
    registry: &CardRegistry,
    side: Side,
    card: CardId,
    tributes: &[CardId],
) -> Result<(), Deny> {
    let def = registry.get(card).ok_or(Deny::UnknownCard(card))?;
    if def.card_type != CardType::Monster {
        return Err(Deny::NotAMonster(card));
    }
    let required = def.tribute_requirement();
    if tributes.len() != required {
        return Err(Deny::TributeMismatch {
            required,
            provided: tributes.len(),
        });
    }
    let board = &state.side(side).board;
    for (i, tribute) in tributes.iter().enumerate() {
        if board.monster(*tribute).is_none() || tributes[..i].contains(tribute) {
            return Err(Deny::TributeNotOnBoard(*tribute));
        }
    }
    // Tributes vacate their slots before the new monster is placed, so
    // capacity only matters for tribute-free summons.
    if tributes.is_empty() && !board.has_empty_monster_slot() {
        return Err(Deny::MonsterZonesFull);
    }
    Ok(())
}

// --- Action validators ---

/// Legality of a face-up normal or tribute summon from the hand.
pub fn validate_normal_summon(
    state: &MatchState,
    registry: &CardRegistry,
    side: Side,
    card: CardId,
    tributes: &[CardId],
) -> Result<(), Deny> {
    require_turn(state, side)?;
    require_main_phase(state)?;
    require_in_hand(state, side, card)?;
    if state.side(side).normal_summon_used {
        return Err(Deny::NormalSummonAlreadyUsed);
    }
    require_tributes(state, registry, side, card, tributes)
}

/// Legality of setting a monster face-down in defense position. Shares
/// the normal summon allowance and tribute rules.
pub fn validate_set_monster(
    state: &MatchState,
    registry: &CardRegistry,
    side: Side,
    card: CardId,
    tributes: &[CardId],
) -> Result<(), Deny> {
    validate_normal_summon(state, registry, side, card, tributes)
}

/// Legality of setting a spell, trap, or equipment face-down in the
/// backrow. Field spells bypass the backrow capacity check because they
/// occupy the dedicated field slot.
pub fn validate_set_spell_trap(
    state: &MatchState,
    registry: &CardRegistry,
    side: Side,
    card: CardId,
) -> Result<(), Deny> {
    require_turn(state, side)?;
    require_main_phase(state)?;
    require_in_hand(state, side, card)?;
    let def = registry.get(card).ok_or(Deny::UnknownCard(card))?;
    if !def.card_type.is_backrow() {
        return Err(Deny::NotASpellOrTrap(card));
    }
    if def.card_type != CardType::FieldSpell && state.side(side).board.backrow_full() {
        return Err(Deny::BackrowFull);
    }
    Ok(())
}

/// Legality of toggling a face-up monster between attack and defense.
pub fn validate_position_change(
    state: &MatchState,
    side: Side,
    card: CardId,
) -> Result<(), Deny> {
    require_turn(state, side)?;
    if state.turn.phase == Phase::Battle {
        return Err(Deny::PositionChangeDuringBattle);
    }
    let monster = state
        .side(side)
        .board
        .monster(card)
        .ok_or(Deny::MonsterNotOnBoard(card))?;
    if monster.face_down {
        return Err(Deny::MonsterFaceDown(card));
    }
    if monster.summoned_this_turn {
        return Err(Deny::SummonedThisTurn(card));
    }
    if monster.changed_position_this_turn {
        return Err(Deny::AlreadyChangedPosition(card));
    }
    Ok(())
}

/// Legality of flipping a set monster face-up during a main phase.
pub fn validate_flip_summon(
    state: &MatchState,
    side: Side,
    card: CardId,
) -> Result<(), Deny> {
    require_turn(state, side)?;
    require_main_phase(state)?;
    let monster = state
        .side(side)
        .board
        .monster(card)
        .ok_or(Deny::MonsterNotOnBoard(card))?;
    if !monster.face_down {
        return Err(Deny::MonsterFaceUp(card));
    }
    if monster.summoned_this_turn {
        return Err(Deny::SummonedThisTurn(card));
    }
    if monster.changed_position_this_turn {
        return Err(Deny::AlreadyChangedPosition(card));
    }
    Ok(())
}
