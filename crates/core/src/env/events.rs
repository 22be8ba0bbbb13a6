//! Battle event stream.
//!
//! Every externally observable transition is published as a [`BattleEvent`]
//! through an [`EventSink`]. The stream is part of the deterministic
//! surface: two runs from the same state and inputs publish identical
//! sequences.

use crate::state::grid::{Cell, Side};
use crate::state::turn::TurnSlot;
use crate::state::unit::InstanceId;

/// Why a unit left the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathCause {
    /// HP reached zero through damage.
    Combat,
    /// A minion's turn allowance ran out.
    TtlExpired,
}

/// One externally observable battle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    /// A scheduler step began for `turn`.
    TurnStarted { turn: TurnSlot, cycle: u32 },
    /// The step finished; `consumed` is false for virtual passes.
    TurnEnded { turn: TurnSlot, consumed: bool },
    ActionStarted { unit: InstanceId },
    ActionEnded { unit: InstanceId },
    RegenTicked { unit: InstanceId, amount: i32 },
    UnitSpawned { unit: InstanceId, side: Side, cell: Cell },
    UnitDied { unit: InstanceId, cause: DeathCause },
    BattleEnded { winner: Side },
}

/// Receiver for the battle event stream.
pub trait EventSink {
    fn publish(&mut self, event: BattleEvent);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: BattleEvent) {}
}

/// Sink that records the full stream; used by tests and replay tooling.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<BattleEvent>,
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: BattleEvent) {
        self.events.push(event);
    }
}

impl RecordingSink {
    /// Events matching `pred`, in publication order.
    pub fn filtered(&self, pred: impl Fn(&BattleEvent) -> bool) -> Vec<BattleEvent> {
        self.events.iter().copied().filter(|e| pred(e)).collect()
    }
}
