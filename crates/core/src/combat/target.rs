//! Target selection.
//!
//! The positional algorithm prefers row-aligned candidates ordered from the
//! midline outward and falls back to nearest by Manhattan distance. Status
//! effects rewrite the result: a taunt-bearer in the pool forces selection,
//! and allure removes its bearer from the basic-attack pool before the
//! positional scan runs.

use crate::state::grid::{cell_to_slot, Cell, Side};
use crate::state::unit::{InstanceId, UnitToken};
use crate::state::BattleState;

/// File distance from the midline, used to order row-aligned candidates.
/// Cells that are somehow off the slot grid sort last.
fn midline_rank(token: &UnitToken) -> u8 {
    cell_to_slot(token.cell)
        .map(|(_, slot)| slot.file())
        .unwrap_or(u8::MAX)
}

/// Positional selection over an explicit candidate pool.
fn pick_positional(pool: &[&UnitToken], from: Cell) -> Option<InstanceId> {
    let row_aligned = pool
        .iter()
        .filter(|u| u.cell.cy == from.cy)
        .min_by_key(|u| midline_rank(u));
    if let Some(hit) = row_aligned {
        return Some(hit.iid);
    }
    pool.iter()
        .min_by_key(|u| u.cell.manhattan(from))
        .map(|u| u.iid)
}

/// Pure positional selection against every living opponent, ignoring
/// status overrides.
pub fn pick_target(state: &BattleState, attacker_side: Side, from: Cell) -> Option<InstanceId> {
    let pool: Vec<&UnitToken> = state.living(attacker_side.opponent()).collect();
    pick_positional(&pool, from)
}

/// Full target resolution for one hit.
///
/// `basic` marks a basic attack, which is the only hit kind allure can
/// evade. Taunt wins over position: any taunter in the pool is chosen, ties
/// broken by minimum Manhattan distance (first found).
pub fn resolve_target(
    state: &BattleState,
    attacker_side: Side,
    from: Cell,
    basic: bool,
) -> Option<InstanceId> {
    let pool: Vec<&UnitToken> = state
        .living(attacker_side.opponent())
        .filter(|u| !basic || !u.statuses.evades_basic())
        .collect();

    if pool.iter().any(|u| u.statuses.is_taunting()) {
        return pool
            .iter()
            .filter(|u| u.statuses.is_taunting())
            .min_by_key(|u| u.cell.manhattan(from))
            .map(|u| u.iid);
    }

    pick_positional(&pool, from)
}
