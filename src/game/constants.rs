//! Tuning constants for match setup.

/// Minimum number of players in a match.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a match. Target filtering and the combat
/// queue are linear scans, so this stays small on purpose.
pub const MAX_PLAYERS: usize = 4;

/// Number of cards a player's hand is refilled to each round.
pub const DEFAULT_HAND_SIZE: usize = 6;

/// Number of battle dice rolled per player each round.
pub const DEFAULT_DICE_PER_PLAYER: usize = 4;

/// Whether matches use the shared contested center slot by default.
pub const DEFAULT_USE_CENTER_CARD: bool = true;
