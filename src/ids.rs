use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Global counter for auto-incrementing card definition IDs (starts at 1, 0 is reserved).
static CARD_ID_COUNTER: AtomicU32 = AtomicU32::new(1);
/// Global counter for auto-incrementing player IDs (starts at 1, 0 is reserved).
static PLAYER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Card definition identifier, references static card data in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CardId(pub u32);

/// Player identifier assigned by the external account layer.
/// The engine treats it as opaque; board-side selection uses `Side` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl CardId {
    /// Create a new card ID with auto-incrementing counter.
    pub fn new() -> Self {
        Self(CARD_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Create a card ID from a specific value (for when you need explicit control).
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl PlayerId {
    /// Create a new player ID with auto-incrementing counter.
    pub fn new() -> Self {
        Self(PLAYER_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Create a player ID from a specific value (for when you need explicit control).
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
