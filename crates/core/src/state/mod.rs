//! Authoritative battle state.
//!
//! [`BattleState`] is the single mutable object threaded through every
//! subsystem call: the live token set, both sides' queued-spawn maps and
//! pending action chains, and the scheduler cursor. Nothing in the core
//! reads it through a global; callers own it and lend it to the engine one
//! synchronous call at a time.

pub mod grid;
pub mod queue;
pub mod status;
pub mod turn;
pub mod unit;

use std::collections::BTreeMap;

pub use grid::{cell_to_slot, slot_to_cell, Cell, PerSide, Side, Slot};
pub use queue::{ActionChainEntry, QueuedSummonRequest, SpawnOrigin};
pub use status::{
    DamageMods, DamageSchool, StatusEffect, StatusId, StatusKind, StatusList, StatusTag,
    TurnEndTick,
};
pub use turn::{SchedulerState, TurnSlot};
pub use unit::{InstanceId, UnitId, UnitStats, UnitToken};

/// Canonical battle state for one running battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// Live token set. Dead tokens are compacted away at the end of each
    /// scheduler step.
    pub units: Vec<UnitToken>,
    /// Per-side queued spawns, keyed by destination slot. `BTreeMap` keeps
    /// drains slot-ordered and deterministic.
    pub queued: PerSide<BTreeMap<Slot, QueuedSummonRequest>>,
    /// Per-side pending immediate-summon chains.
    pub chain: PerSide<Vec<ActionChainEntry>>,
    /// Scheduler cursor state.
    pub scheduler: SchedulerState,
    next_iid: u32,
}

impl BattleState {
    pub fn new(scheduler: SchedulerState) -> Self {
        Self {
            units: Vec::new(),
            queued: PerSide::default(),
            chain: PerSide::default(),
            scheduler,
            next_iid: 1,
        }
    }

    /// Allocates a fresh instance id. Ids are monotonic and never reused.
    pub fn allocate_iid(&mut self) -> InstanceId {
        let id = InstanceId(self.next_iid);
        self.next_iid += 1;
        id
    }

    pub fn unit(&self, iid: InstanceId) -> Option<&UnitToken> {
        self.units.iter().find(|u| u.iid == iid)
    }

    pub fn unit_mut(&mut self, iid: InstanceId) -> Option<&mut UnitToken> {
        self.units.iter_mut().find(|u| u.iid == iid)
    }

    /// The living unit occupying `(side, slot)`, if any.
    pub fn unit_at_slot(&self, side: Side, slot: Slot) -> Option<&UnitToken> {
        let cell = slot_to_cell(side, slot);
        self.units
            .iter()
            .find(|u| u.is_alive() && u.cell == cell)
    }

    /// The living unit standing on `cell`, if any.
    pub fn unit_at_cell(&self, cell: Cell) -> Option<&UnitToken> {
        self.units.iter().find(|u| u.is_alive() && u.cell == cell)
    }

    /// Living units of one side, in token order.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &UnitToken> {
        self.units
            .iter()
            .filter(move |u| u.side == side && u.is_alive())
    }

    /// Reservation predicate: a cell is reserved if a living token stands
    /// on it, a queued spawn targets it, or a pending chain entry will
    /// spawn into it. Unions every source so no two occupants can ever be
    /// promised the same cell.
    pub fn is_cell_reserved(&self, cell: Cell) -> bool {
        if self.unit_at_cell(cell).is_some() {
            return true;
        }
        for side in Side::BOTH {
            if self.queued.get(side).values().any(|r| r.cell == cell) {
                return true;
            }
            if self
                .chain
                .get(side)
                .iter()
                .any(|e| slot_to_cell(e.side, e.slot) == cell)
            {
                return true;
            }
        }
        false
    }

    /// Drops dead tokens from the live set.
    pub fn compact_dead(&mut self) {
        self.units.retain(|u| u.is_alive());
    }

    /// The winning side once the other has no living units and nothing
    /// queued to spawn. `None` while the battle is still contested.
    pub fn battle_over(&self) -> Option<Side> {
        for side in Side::BOTH {
            let has_presence =
                self.living(side).next().is_some() || !self.queued.get(side).is_empty();
            if !has_presence {
                return Some(side.opponent());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(state: &mut BattleState, side: Side, slot: Slot) -> InstanceId {
        let iid = state.allocate_iid();
        let cell = slot_to_cell(side, slot);
        state
            .units
            .push(UnitToken::new(UnitId(7), iid, side, cell, UnitStats::default()));
        iid
    }

    #[test]
    fn instance_ids_are_never_reused() {
        let mut state = BattleState::new(SchedulerState::sequential_default());
        let a = state.allocate_iid();
        let b = state.allocate_iid();
        assert_ne!(a, b);
    }

    #[test]
    fn reservation_unions_tokens_queues_and_chains() {
        let mut state = BattleState::new(SchedulerState::sequential_default());
        token(&mut state, Side::Ally, Slot(0));
        assert!(state.is_cell_reserved(slot_to_cell(Side::Ally, Slot(0))));

        let cell = slot_to_cell(Side::Enemy, Slot(4));
        state.queued.get_mut(Side::Enemy).insert(
            Slot(4),
            QueuedSummonRequest {
                unit: UnitId(1),
                side: Side::Enemy,
                slot: Slot(4),
                cell,
                spawn_cycle: 0,
                origin: SpawnOrigin::Deck,
            },
        );
        assert!(state.is_cell_reserved(cell));

        state.chain.get_mut(Side::Ally).push(ActionChainEntry {
            side: Side::Ally,
            slot: Slot(8),
            unit: UnitId(2),
            owner: None,
        });
        assert!(state.is_cell_reserved(slot_to_cell(Side::Ally, Slot(8))));
        assert!(!state.is_cell_reserved(slot_to_cell(Side::Ally, Slot(5))));
    }

    #[test]
    fn battle_over_requires_no_presence() {
        let mut state = BattleState::new(SchedulerState::sequential_default());
        token(&mut state, Side::Ally, Slot(0));
        assert_eq!(state.battle_over(), Some(Side::Ally));

        let cell = slot_to_cell(Side::Enemy, Slot(0));
        state.queued.get_mut(Side::Enemy).insert(
            Slot(0),
            QueuedSummonRequest {
                unit: UnitId(3),
                side: Side::Enemy,
                slot: Slot(0),
                cell,
                spawn_cycle: 1,
                origin: SpawnOrigin::Deck,
            },
        );
        assert_eq!(state.battle_over(), None);
    }
}
