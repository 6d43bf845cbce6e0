//! Static card definitions and the registry that resolves `CardId`s.
//!
//! Card attributes are authored externally; the engine only reads them. The
//! parsed ability attached to a definition is the structured output of the
//! (out-of-scope) card-text parser.

use std::collections::HashMap;

use crate::effect::ParsedAbility;
use crate::ids::CardId;

/// The broad card categories the rules distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum CardType {
    Monster,
    Spell,
    Trap,
    Equipment,
    /// A spell that occupies the dedicated field slot instead of the backrow.
    FieldSpell,
}

impl CardType {
    /// Returns true if this card is set face-down like a spell or trap.
    pub fn is_backrow(&self) -> bool {
        !matches!(self, CardType::Monster)
    }
}

/// Deck archetype a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    Fire,
    Water,
    Earth,
    Wind,
    Neutral,
}

/// Collection rarity. Irrelevant to rules resolution but carried on the
/// definition so snapshots round-trip the full card attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Static, immutable card definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,
    pub archetype: Archetype,
    pub rarity: Rarity,
    /// Monster level; drives the tribute requirement. Zero for spells/traps.
    pub level: u32,
    pub attack: i32,
    pub defense: i32,
    /// Excess battle damage carries through against defense-position targets.
    pub piercing: bool,
    pub ability: Option<ParsedAbility>,
}

impl CardDefinition {
    /// A vanilla monster with no ability.
    pub fn monster(name: impl Into<String>, level: u32, attack: i32, defense: i32) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            card_type: CardType::Monster,
            archetype: Archetype::Neutral,
            rarity: Rarity::Common,
            level,
            attack,
            defense,
            piercing: false,
            ability: None,
        }
    }

    /// A spell card whose text is the given ability.
    pub fn spell(name: impl Into<String>, ability: ParsedAbility) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            card_type: CardType::Spell,
            archetype: Archetype::Neutral,
            rarity: Rarity::Common,
            level: 0,
            attack: 0,
            defense: 0,
            piercing: false,
            ability: Some(ability),
        }
    }

    /// A trap card whose text is the given ability.
    pub fn trap(name: impl Into<String>, ability: ParsedAbility) -> Self {
        Self {
            card_type: CardType::Trap,
            ..Self::spell(name, ability)
        }
    }

    /// A field spell; goes to the field slot rather than the backrow.
    pub fn field_spell(name: impl Into<String>, ability: ParsedAbility) -> Self {
        Self {
            card_type: CardType::FieldSpell,
            ..Self::spell(name, ability)
        }
    }

    pub fn with_ability(mut self, ability: ParsedAbility) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = archetype;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn piercing(mut self) -> Self {
        self.piercing = true;
        self
    }

    pub fn is_monster(&self) -> bool {
        self.card_type == CardType::Monster
    }

    /// Number of tributes a normal summon of this monster requires:
    /// 0 for level ≤ 4, 1 for level 5-6, 2 for level ≥ 7.
    pub fn tribute_requirement(&self) -> usize {
        match self.level {
            0..=4 => 0,
            5..=6 => 1,
            _ => 2,
        }
    }
}

/// Lookup table from `CardId` to static card data.
///
/// Stands in for the external card-definition store; tests and callers
/// register definitions up front and the engine only ever reads.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: HashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition and returns its id.
    pub fn register(&mut self, definition: CardDefinition) -> CardId {
        let id = definition.id;
        self.cards.insert(id, definition);
        id
    }

    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Display name for a card, tolerating unknown ids in messages.
    pub fn name(&self, id: CardId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("Unknown")
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
