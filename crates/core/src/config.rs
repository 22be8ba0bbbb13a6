/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Basic attacks a unit chains per turn beyond the first, when its kit
    /// does not override the count.
    pub default_follow_up_attacks: u8,
    /// Turns a summoned minion survives when the summoner does not specify.
    pub default_minion_ttl: u8,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Rows on the board (shared by both sides).
    pub const BOARD_ROWS: u8 = 3;
    /// Columns per side. The full board is 3 x (2 * BOARD_COLS).
    pub const BOARD_COLS: u8 = 3;
    /// Formation slots per side (BOARD_ROWS * BOARD_COLS).
    pub const SLOTS_PER_SIDE: u8 = 9;
    /// Maximum concurrent status effects per unit.
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FOLLOW_UP_ATTACKS: u8 = 0;
    pub const DEFAULT_MINION_TTL: u8 = 2;

    pub fn new() -> Self {
        Self {
            default_follow_up_attacks: Self::DEFAULT_FOLLOW_UP_ATTACKS,
            default_minion_ttl: Self::DEFAULT_MINION_TTL,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
