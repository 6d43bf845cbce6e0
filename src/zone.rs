/// The zones a card instance can occupy during a match.
///
/// `Frontline`, `Support`, `Backrow` and `FieldSpell` are board zones; the
/// rest are piles or the hand. A card instance occupies exactly one zone on
/// exactly one side at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Zone {
    Hand,
    Frontline,
    Support,
    Backrow,
    FieldSpell,
    Deck,
    Graveyard,
    Banished,
}

impl Zone {
    /// Returns true if cards in this zone are visible to both players.
    /// Face-down board cards hide their identity but their presence is public.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Zone::Frontline
                | Zone::Support
                | Zone::Backrow
                | Zone::FieldSpell
                | Zone::Graveyard
                | Zone::Banished
        )
    }

    /// Returns true if cards in this zone are hidden (private to owner).
    pub fn is_hidden(&self) -> bool {
        matches!(self, Zone::Hand | Zone::Deck)
    }

    /// Returns true if card order matters in this zone.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Zone::Deck | Zone::Graveyard)
    }

    /// Returns true if this zone holds monsters on the board.
    pub fn is_monster_zone(&self) -> bool {
        matches!(self, Zone::Frontline | Zone::Support)
    }
}

/// Battle position of a monster on the board. Meaningless for spells/traps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Attack,
    Defense,
}

impl Position {
    /// The other position.
    pub fn toggled(self) -> Self {
        match self {
            Position::Attack => Position::Defense,
            Position::Defense => Position::Attack,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Attack => write!(f, "attack"),
            Position::Defense => write!(f, "defense"),
        }
    }
}
