//! Battlefield unit tokens and their stat blocks.

use crate::state::grid::{Cell, Side};
use crate::state::status::StatusList;

/// Metadata key identifying a unit archetype in the directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

/// Unique per-battle instance id, allocated monotonically and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u32);

/// Vital stat block for one unit.
///
/// `arm` and `res` are fractional mitigation values in `0.0..1.0`; the rest
/// are flat integers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub hp_max: i32,
    pub atk: i32,
    pub wil: i32,
    pub arm: f64,
    pub res: f64,
    pub spd: i32,
    pub hp_regen: i32,
    pub fury_max: i32,
    pub fury_regen: i32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            hp_max: 100,
            atk: 10,
            wil: 10,
            arm: 0.0,
            res: 0.0,
            spd: 10,
            hp_regen: 0,
            fury_max: 100,
            fury_regen: 0,
        }
    }
}

/// A unit instance on the board.
///
/// Created by spawn resolution, mutated by the damage/heal/status pipeline,
/// and dropped from the live set once `alive` is cleared (lethal damage or
/// minion TTL expiry).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitToken {
    pub unit: UnitId,
    pub iid: InstanceId,
    pub side: Side,
    pub cell: Cell,
    pub hp: i32,
    pub fury: i32,
    pub stats: UnitStats,
    pub alive: bool,
    pub statuses: StatusList,
    pub is_leader: bool,
    /// Set on spawn; cleared by the fury economy once the opening window
    /// has passed.
    pub fresh_summon: bool,
    pub is_minion: bool,
    pub owner: Option<InstanceId>,
    pub ttl_turns: Option<u8>,
}

impl UnitToken {
    pub fn new(unit: UnitId, iid: InstanceId, side: Side, cell: Cell, stats: UnitStats) -> Self {
        Self {
            unit,
            iid,
            side,
            cell,
            hp: stats.hp_max,
            fury: 0,
            stats,
            alive: true,
            statuses: StatusList::new(),
            is_leader: false,
            fresh_summon: true,
            is_minion: false,
            owner: None,
            ttl_turns: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive && self.hp > 0
    }

    /// Heals up to `amount`, clamped to `hp_max`. Returns the HP actually
    /// restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.stats.hp_max);
        self.hp - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::grid::{slot_to_cell, Slot};

    #[test]
    fn heal_clamps_to_max() {
        let cell = slot_to_cell(Side::Ally, Slot(0));
        let mut tok = UnitToken::new(UnitId(1), InstanceId(1), Side::Ally, cell, UnitStats::default());
        tok.hp = 90;
        assert_eq!(tok.heal(25), 10);
        assert_eq!(tok.hp, tok.stats.hp_max);
        assert_eq!(tok.heal(-5), 0);
    }
}
