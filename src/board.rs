//! Per-side board state: monster slots, backrow, and the runtime flags each
//! placed card carries.

use crate::effect::ProtectionFlags;
use crate::ids::CardId;
use crate::zone::{Position, Zone};

/// Auxiliary monster slots behind the frontline.
pub const SUPPORT_SLOTS: usize = 4;
/// Spell/trap slots in the backrow.
pub const BACKROW_SLOTS: usize = 5;

/// Errors raised by board placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// No empty frontline or support slot.
    MonsterZonesFull,
    /// No empty backrow slot.
    BackrowFull,
    /// The card is already on this board.
    AlreadyPlaced(CardId),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::MonsterZonesFull => write!(f, "Monster zones are full"),
            BoardError::BackrowFull => {
                write!(f, "Spell/Trap zone is full (max {} cards)", BACKROW_SLOTS)
            }
            BoardError::AlreadyPlaced(id) => write!(f, "Card {:?} is already on the board", id),
        }
    }
}

impl std::error::Error for BoardError {}

/// A monster instance occupying a frontline or support slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardCard {
    pub card: CardId,
    pub position: Position,
    pub face_down: bool,
    pub has_attacked: bool,
    /// Position changes are limited to one per monster per turn.
    pub changed_position_this_turn: bool,
    /// Set on summon/set; a monster cannot change or flip position the turn
    /// it arrived. Cleared at the turn boundary.
    pub summoned_this_turn: bool,
    pub protection: ProtectionFlags,
}

impl BoardCard {
    /// A face-up monster arriving via normal or special summon.
    pub fn summoned(card: CardId, position: Position, protection: ProtectionFlags) -> Self {
        Self {
            card,
            position,
            face_down: false,
            has_attacked: false,
            changed_position_this_turn: false,
            summoned_this_turn: true,
            protection,
        }
    }

    /// A monster set face-down in defense position.
    pub fn set_face_down(card: CardId) -> Self {
        Self {
            card,
            position: Position::Defense,
            face_down: true,
            has_attacked: false,
            changed_position_this_turn: false,
            summoned_this_turn: true,
            protection: ProtectionFlags::none(),
        }
    }
}

/// A spell/trap instance occupying a backrow or field-spell slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct BackrowCard {
    pub card: CardId,
    pub face_down: bool,
    /// True once a continuous card has been activated face-up.
    pub activated: bool,
    /// Set by a continuous-scope negate; the card stays on the board, inert.
    pub negated: bool,
}

impl BackrowCard {
    pub fn set_face_down(card: CardId) -> Self {
        Self {
            card,
            face_down: true,
            activated: false,
            negated: false,
        }
    }
}

/// One player's half of the shared board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    /// The single high-visibility monster slot. Filled first.
    pub frontline: Option<BoardCard>,
    /// Auxiliary monster slots, at most `SUPPORT_SLOTS`.
    pub support: Vec<BoardCard>,
    /// Spell/trap slots, at most `BACKROW_SLOTS`.
    pub backrow: Vec<BackrowCard>,
    /// The dedicated field-spell slot.
    pub field_spell: Option<BackrowCard>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// All monsters on this board, frontline first.
    pub fn monsters(&self) -> impl Iterator<Item = &BoardCard> {
        self.frontline.iter().chain(self.support.iter())
    }

    pub fn monsters_mut(&mut self) -> impl Iterator<Item = &mut BoardCard> {
        self.frontline.iter_mut().chain(self.support.iter_mut())
    }

    pub fn monster_count(&self) -> usize {
        self.frontline.is_some() as usize + self.support.len()
    }

    pub fn has_empty_monster_slot(&self) -> bool {
        self.frontline.is_none() || self.support.len() < SUPPORT_SLOTS
    }

    pub fn monster(&self, card: CardId) -> Option<&BoardCard> {
        self.monsters().find(|bc| bc.card == card)
    }

    pub fn monster_mut(&mut self, card: CardId) -> Option<&mut BoardCard> {
        self.monsters_mut().find(|bc| bc.card == card)
    }

    /// The zone a monster occupies, if it is on this board.
    pub fn monster_zone(&self, card: CardId) -> Option<Zone> {
        if self.frontline.as_ref().is_some_and(|bc| bc.card == card) {
            Some(Zone::Frontline)
        } else if self.support.iter().any(|bc| bc.card == card) {
            Some(Zone::Support)
        } else {
            None
        }
    }

    /// Places a monster in the first empty slot (frontline, then support)
    /// and returns the zone it landed in.
    pub fn place_monster(&mut self, board_card: BoardCard) -> Result<Zone, BoardError> {
        if self.monster(board_card.card).is_some() {
            return Err(BoardError::AlreadyPlaced(board_card.card));
        }
        if self.frontline.is_none() {
            self.frontline = Some(board_card);
            Ok(Zone::Frontline)
        } else if self.support.len() < SUPPORT_SLOTS {
            self.support.push(board_card);
            Ok(Zone::Support)
        } else {
            Err(BoardError::MonsterZonesFull)
        }
    }

    /// Removes a monster, vacating its slot.
    pub fn remove_monster(&mut self, card: CardId) -> Option<BoardCard> {
        if self.frontline.as_ref().is_some_and(|bc| bc.card == card) {
            return self.frontline.take();
        }
        let index = self.support.iter().position(|bc| bc.card == card)?;
        Some(self.support.remove(index))
    }

    pub fn backrow_card(&self, card: CardId) -> Option<&BackrowCard> {
        self.backrow
            .iter()
            .chain(self.field_spell.iter())
            .find(|bc| bc.card == card)
    }

    pub fn backrow_card_mut(&mut self, card: CardId) -> Option<&mut BackrowCard> {
        self.backrow
            .iter_mut()
            .chain(self.field_spell.iter_mut())
            .find(|bc| bc.card == card)
    }

    pub fn backrow_full(&self) -> bool {
        self.backrow.len() >= BACKROW_SLOTS
    }

    pub fn place_backrow(&mut self, backrow_card: BackrowCard) -> Result<(), BoardError> {
        if self.backrow_full() {
            return Err(BoardError::BackrowFull);
        }
        self.backrow.push(backrow_card);
        Ok(())
    }

    pub fn remove_backrow(&mut self, card: CardId) -> Option<BackrowCard> {
        if self.field_spell.as_ref().is_some_and(|bc| bc.card == card) {
            return self.field_spell.take();
        }
        let index = self.backrow.iter().position(|bc| bc.card == card)?;
        Some(self.backrow.remove(index))
    }

    /// True if the card occupies any slot on this board.
    pub fn contains(&self, card: CardId) -> bool {
        self.monster(card).is_some() || self.backrow_card(card).is_some()
    }

    /// The zone the card occupies on this board, if any.
    pub fn zone_of(&self, card: CardId) -> Option<Zone> {
        if let Some(zone) = self.monster_zone(card) {
            Some(zone)
        } else if self.field_spell.as_ref().is_some_and(|bc| bc.card == card) {
            Some(Zone::FieldSpell)
        } else if self.backrow.iter().any(|bc| bc.card == card) {
            Some(Zone::Backrow)
        } else {
            None
        }
    }
}
