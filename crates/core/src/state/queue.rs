//! Pending spawn bookkeeping: queued deck summons and the per-side
//! action chain.

use crate::state::grid::{Cell, Side, Slot};
use crate::state::unit::{InstanceId, UnitId};

/// Where a spawn request came from; decides its starting resource pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnOrigin {
    /// Played from the deck: enters at full fury and may open with its
    /// ultimate.
    Deck,
    /// Summoned by another unit's ability; minion rules apply.
    Ability { fury: Option<i32> },
    /// Brought back by a revive effect.
    Revive { fury: Option<i32> },
}

/// A spawn scheduled to materialize when the cursor reaches its slot.
///
/// At most one queued request may exist per destination cell, alongside at
/// most one live token (see `BattleState::is_cell_reserved`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedSummonRequest {
    pub unit: UnitId,
    pub side: Side,
    pub slot: Slot,
    pub cell: Cell,
    /// Earliest cycle at which the request may materialize.
    pub spawn_cycle: u32,
    pub origin: SpawnOrigin,
}

/// A mid-turn immediate spawn request.
///
/// Unlike [`QueuedSummonRequest`], chain entries spawn *and act* within the
/// scheduler step that produced them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionChainEntry {
    pub side: Side,
    pub slot: Slot,
    pub unit: UnitId,
    /// The unit whose action triggered this summon, when there is one.
    pub owner: Option<InstanceId>,
}
