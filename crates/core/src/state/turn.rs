//! Turn-order bookkeeping.
//!
//! One scheduling interface, two concrete strategies:
//!
//! - **Sequential**: an explicit `(side, slot)` order walked by a cursor;
//!   `cycle` increments exactly once per full pass.
//! - **Interleaved**: a position-alternating cursor that visits
//!   ally slot 0, enemy slot 0, ally slot 1, ... without storing an order
//!   vector; `cycle` increments when the alternation wraps.

use crate::config::BattleConfig;
use crate::state::grid::{Side, Slot};

/// One entry of the turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSlot {
    pub side: Side,
    pub slot: Slot,
}

/// Scheduler cursor state.
///
/// Invariants: the sequential cursor always indexes into `order`; `cycle`
/// is monotonically non-decreasing in both modes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerState {
    Sequential {
        order: Vec<TurnSlot>,
        cursor: usize,
        cycle: u32,
    },
    Interleaved {
        pos: usize,
        cycle: u32,
    },
}

impl SchedulerState {
    /// Sequential strategy over an explicit order. The order must be
    /// non-empty.
    pub fn sequential(order: Vec<TurnSlot>) -> Self {
        debug_assert!(!order.is_empty());
        Self::Sequential {
            order,
            cursor: 0,
            cycle: 0,
        }
    }

    /// The conventional sequential order: each side's slots ascending,
    /// allies first.
    pub fn sequential_default() -> Self {
        let mut order = Vec::with_capacity(BattleConfig::SLOTS_PER_SIDE as usize * 2);
        for side in Side::BOTH {
            for slot in Slot::all() {
                order.push(TurnSlot { side, slot });
            }
        }
        Self::sequential(order)
    }

    /// Interleaved strategy: sides alternate per step, slots ascend.
    pub fn interleaved() -> Self {
        Self::Interleaved { pos: 0, cycle: 0 }
    }

    /// The `(side, slot)` the next step will consider.
    pub fn peek(&self) -> TurnSlot {
        match self {
            Self::Sequential { order, cursor, .. } => order[*cursor],
            Self::Interleaved { pos, .. } => {
                let side = if pos % 2 == 0 { Side::Ally } else { Side::Enemy };
                TurnSlot {
                    side,
                    slot: Slot((pos / 2) as u8),
                }
            }
        }
    }

    /// Advances the cursor one entry, incrementing `cycle` on wrap.
    pub fn advance(&mut self) {
        match self {
            Self::Sequential { order, cursor, cycle } => {
                *cursor += 1;
                if *cursor >= order.len() {
                    *cursor = 0;
                    *cycle += 1;
                }
            }
            Self::Interleaved { pos, cycle } => {
                *pos += 1;
                if *pos >= BattleConfig::SLOTS_PER_SIDE as usize * 2 {
                    *pos = 0;
                    *cycle += 1;
                }
            }
        }
    }

    /// Completed full passes of the order.
    pub fn cycle(&self) -> u32 {
        match self {
            Self::Sequential { cycle, .. } | Self::Interleaved { cycle, .. } => *cycle,
        }
    }

    /// Steps remaining until the cursor reaches `target` within the
    /// current or next pass. Used by the AI readiness feature.
    pub fn steps_until(&self, target: TurnSlot) -> usize {
        let len = match self {
            Self::Sequential { order, .. } => order.len(),
            Self::Interleaved { .. } => BattleConfig::SLOTS_PER_SIDE as usize * 2,
        };
        let index_of = |ts: TurnSlot| -> Option<usize> {
            match self {
                Self::Sequential { order, .. } => order.iter().position(|t| *t == ts),
                Self::Interleaved { .. } => {
                    let parity = match ts.side {
                        Side::Ally => 0,
                        Side::Enemy => 1,
                    };
                    Some(ts.slot.0 as usize * 2 + parity)
                }
            }
        };
        let current = match self {
            Self::Sequential { cursor, .. } => *cursor,
            Self::Interleaved { pos, .. } => *pos,
        };
        match index_of(target) {
            Some(idx) => (idx + len - current) % len,
            None => len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_wrap_increments_cycle_once() {
        let mut sched = SchedulerState::sequential_default();
        let len = 2 * BattleConfig::SLOTS_PER_SIDE as usize;
        let start = sched.peek();
        for _ in 0..len {
            sched.advance();
        }
        assert_eq!(sched.cycle(), 1);
        assert_eq!(sched.peek(), start);
    }

    #[test]
    fn interleaved_alternates_sides() {
        let mut sched = SchedulerState::interleaved();
        assert_eq!(
            sched.peek(),
            TurnSlot { side: Side::Ally, slot: Slot(0) }
        );
        sched.advance();
        assert_eq!(
            sched.peek(),
            TurnSlot { side: Side::Enemy, slot: Slot(0) }
        );
        sched.advance();
        assert_eq!(
            sched.peek(),
            TurnSlot { side: Side::Ally, slot: Slot(1) }
        );
    }

    #[test]
    fn steps_until_counts_forward_from_cursor() {
        let mut sched = SchedulerState::sequential_default();
        sched.advance();
        sched.advance();
        let target = TurnSlot { side: Side::Ally, slot: Slot(2) };
        assert_eq!(sched.steps_until(target), 0);
        let behind = TurnSlot { side: Side::Ally, slot: Slot(0) };
        assert_eq!(sched.steps_until(behind), 16);
    }
}
