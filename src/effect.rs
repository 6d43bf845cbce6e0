//! Structured card-effect descriptions.
//!
//! `ParsedEffect` and `ParsedAbility` are produced by an external authoring /
//! text-parsing process and are read-only inputs to the engine. One
//! `ParsedAbility` groups every effect clause of a single card's text.
//!
//! `EffectKind` is a closed enum with one variant per effect kind, each
//! carrying only the fields that kind needs; the dispatcher in
//! `effects::execute_effect` matches it exhaustively so adding a kind is a
//! compile-time-checked change.

use crate::card::Archetype;

/// What a single effect clause does when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Draw `count` cards.
    Draw { count: u32 },
    /// Destroy up to `target_count` targeted board cards.
    Destroy { target_count: u32 },
    /// Inflict `amount` damage to the opponent's life points.
    Damage { amount: u32 },
    /// The acting player gains `amount` life points.
    GainLife { amount: u32 },
    /// Modify a target monster's ATK/DEF by signed deltas.
    /// Non-persistent modifiers expire at the turn boundary.
    ModifyStat {
        attack: i32,
        defense: i32,
        persistent: bool,
    },
    /// Special-summon the target monster from `from` to the board.
    SpecialSummon { from: EffectOrigin },
    /// Move the target card from `from` to its owner's hand.
    ToHand { from: EffectOrigin },
    /// Send the target card from `from` to its owner's graveyard.
    ToGraveyard { from: EffectOrigin },
    /// Return the target card from `from` to its owner's deck.
    ToDeck {
        from: EffectOrigin,
        placement: DeckPlacement,
    },
    /// Banish the target card from `from`.
    Banish { from: EffectOrigin },
    /// Send `count` cards from the top of the acting player's deck to the graveyard.
    Mill { count: u32 },
    /// Discard `count` cards from the acting player's hand (targeted, else oldest first).
    Discard { count: u32 },
    /// Search the deck for cards matching the criteria. Without a selected
    /// target this returns candidates; with one it moves the card to hand.
    Search {
        target_type: Option<TargetKind>,
        archetype: Option<Archetype>,
    },
    /// Negate a face-up backrow card's activation or continuous effect.
    Negate { scope: NegateScope },
    /// Passive protection flags. Never executed; read when the card hits the
    /// board and consulted by combat and the destroy executor.
    Protection(ProtectionFlags),
}

/// When a triggered effect fires. `Manual` marks spell/trap-style activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    OnSummon,
    OnDestroy,
    OnFlip,
    OnBattleDamage,
    OnBattleDestroy,
    OnAttacked,
    OnBattlePhaseStart,
    OnDraw,
    OnEndPhase,
    Manual,
}

/// Card-type constraint on an effect's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    Monster,
    Spell,
    Trap,
    Any,
}

/// Which zone an effect pulls its target from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectOrigin {
    Board,
    Hand,
    Graveyard,
    Deck,
}

impl std::fmt::Display for EffectOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectOrigin::Board => write!(f, "board"),
            EffectOrigin::Hand => write!(f, "hand"),
            EffectOrigin::Graveyard => write!(f, "graveyard"),
            EffectOrigin::Deck => write!(f, "deck"),
        }
    }
}

/// Insertion position for deck returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum DeckPlacement {
    Top,
    Bottom,
    Shuffle,
}

/// What a negate effect suppresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum NegateScope {
    /// Negate the card's activation; the card is sent to the graveyard.
    Activation,
    /// Switch off a continuous effect; the card stays on the board, inert.
    Continuous,
}

/// Cost that must be paid before an effect resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivationCost {
    /// Discard `count` cards from hand.
    Discard { count: u32 },
    /// Pay `amount` life points.
    PayLife { amount: u32 },
    /// Tribute `count` controlled monsters.
    Tribute { count: u32 },
    /// Banish `count` cards from the graveyard.
    Banish { count: u32 },
}

/// Per-card protection flags consulted before an action may affect the card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtectionFlags {
    pub cannot_be_targeted: bool,
    pub cannot_be_destroyed_by_battle: bool,
    pub cannot_be_destroyed_by_effect: bool,
}

impl ProtectionFlags {
    pub fn none() -> Self {
        Self::default()
    }

    /// Merge another set of flags into this one (logical or).
    pub fn merge(&mut self, other: ProtectionFlags) {
        self.cannot_be_targeted |= other.cannot_be_targeted;
        self.cannot_be_destroyed_by_battle |= other.cannot_be_destroyed_by_battle;
        self.cannot_be_destroyed_by_effect |= other.cannot_be_destroyed_by_effect;
    }
}

/// One immutable effect clause of a card's text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedEffect {
    pub kind: EffectKind,
    pub trigger: Trigger,
    /// Cost paid before resolution, if any.
    pub cost: Option<ActivationCost>,
    /// Continuous effects are read when computing effective state, never executed.
    pub continuous: bool,
    /// Once-per-turn restriction on the source card.
    pub once_per_turn: bool,
}

impl ParsedEffect {
    /// A manually activated effect with no cost or restriction.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            trigger: Trigger::Manual,
            cost: None,
            continuous: false,
            once_per_turn: false,
        }
    }

    pub fn triggered(kind: EffectKind, trigger: Trigger) -> Self {
        Self {
            trigger,
            ..Self::new(kind)
        }
    }

    pub fn once_per_turn(mut self) -> Self {
        self.once_per_turn = true;
        self
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    pub fn with_cost(mut self, cost: ActivationCost) -> Self {
        self.cost = Some(cost);
        self
    }

    /// True if this clause is never executed by the dispatcher: protection
    /// flags and continuous stat bonuses are read elsewhere.
    pub fn is_passive(&self) -> bool {
        match &self.kind {
            EffectKind::Protection(_) => true,
            EffectKind::ModifyStat { .. } => self.continuous,
            _ => false,
        }
    }
}

/// Every effect clause belonging to one card's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedAbility {
    pub effects: Vec<ParsedEffect>,
}

impl ParsedAbility {
    pub fn new(effects: Vec<ParsedEffect>) -> Self {
        Self { effects }
    }

    /// A single-clause ability.
    pub fn single(effect: ParsedEffect) -> Self {
        Self {
            effects: vec![effect],
        }
    }

    pub fn is_multi_part(&self) -> bool {
        self.effects.len() > 1
    }

    /// Union of all passive protection flags in this ability.
    pub fn protection(&self) -> ProtectionFlags {
        let mut flags = ProtectionFlags::none();
        for effect in &self.effects {
            if let EffectKind::Protection(p) = &effect.kind {
                flags.merge(*p);
            }
        }
        flags
    }

    /// Sum of continuous ATK/DEF bonuses granted by this ability to its own
    /// card. Read by combat when computing effective stats.
    pub fn continuous_stat_bonus(&self) -> (i32, i32) {
        let mut bonus = (0, 0);
        for effect in &self.effects {
            if let EffectKind::ModifyStat {
                attack, defense, ..
            } = effect.kind
                && effect.continuous
            {
                bonus.0 += attack;
                bonus.1 += defense;
            }
        }
        bonus
    }

    /// Effects that fire on the given trigger, in text order.
    pub fn triggered_by(&self, trigger: Trigger) -> impl Iterator<Item = &ParsedEffect> {
        self.effects
            .iter()
            .filter(move |e| e.trigger == trigger && !e.is_passive())
    }
}
