//! The action chain: mid-turn immediate summons.
//!
//! Chain entries spawn *and act* within the scheduler step that produced
//! them. This is the opposite policy from queued scheduler spawns, which
//! defer acting to the unit's own future turn; ability-triggered summons
//! resolve as part of the triggering action.

use tracing::debug;

use crate::config::BattleConfig;
use crate::engine::action::do_action_or_skip;
use crate::engine::spawn::{materialize, SpawnSpec};
use crate::env::directory::UnitDirectory;
use crate::env::BattleEnv;
use crate::state::grid::{slot_to_cell, Cell, Side};
use crate::state::queue::{ActionChainEntry, SpawnOrigin};
use crate::state::unit::InstanceId;
use crate::state::BattleState;

/// Immediate-summon validation failures, surfaced to the enqueuing caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("unit {0:?} has no summoner capability")]
    NotSummoner(InstanceId),
    #[error("destination cell {0:?} is reserved")]
    CellReserved(Cell),
}

/// Validates and appends an immediate-summon request to its side's chain.
pub fn enqueue_immediate(
    state: &mut BattleState,
    directory: &dyn UnitDirectory,
    entry: ActionChainEntry,
) -> Result<(), ChainError> {
    if let Some(owner) = entry.owner {
        let summoner = state
            .unit(owner)
            .and_then(|u| directory.template(u.unit))
            .is_some_and(|t| t.kit.summoner.is_some());
        if !summoner {
            return Err(ChainError::NotSummoner(owner));
        }
    }
    let cell = slot_to_cell(entry.side, entry.slot);
    if state.is_cell_reserved(cell) {
        return Err(ChainError::CellReserved(cell));
    }
    state.chain.get_mut(entry.side).push(entry);
    Ok(())
}

/// Drains one side's pending chain in ascending slot order.
///
/// Each entry whose cell is still free spawns and immediately acts. An
/// entry's action may enqueue further entries; the drain loops until the
/// chain is empty.
pub fn process_action_chain(
    state: &mut BattleState,
    config: &BattleConfig,
    env: &mut BattleEnv<'_>,
    side: Side,
) {
    loop {
        let mut pending = std::mem::take(state.chain.get_mut(side));
        if pending.is_empty() {
            break;
        }
        pending.sort_by_key(|e| e.slot);

        for entry in pending {
            let cell = slot_to_cell(entry.side, entry.slot);
            if state.unit_at_cell(cell).is_some() {
                debug!(?cell, "chain destination no longer free, dropping entry");
                continue;
            }
            let Some(iid) = materialize(
                state,
                config,
                env,
                SpawnSpec {
                    unit: entry.unit,
                    side: entry.side,
                    slot: entry.slot,
                    origin: SpawnOrigin::Ability { fury: None },
                    owner: entry.owner,
                },
            ) else {
                continue;
            };
            let _ = do_action_or_skip(state, config, env, iid);
        }
    }
}
