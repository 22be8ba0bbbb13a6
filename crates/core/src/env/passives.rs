//! Passive-effect dispatcher contract.
//!
//! The passive catalog lives outside the core. At well-known points the
//! engine emits an event with a mutable context; the dispatcher may scale
//! the context's damage fields or mutate unit stats in place. The engine
//! treats the call as fire-and-forget apart from reading the context back.

use crate::state::unit::InstanceId;

/// Points at which the engine notifies the passive dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassiveEvent {
    /// A unit's turn is beginning.
    TurnStart,
    /// A basic attack is about to resolve against `target`.
    BasicHit { target: InstanceId },
    /// An ultimate was successfully cast.
    UltCast,
    /// The unit's action has finished resolving.
    ActionEnd,
    /// A token just entered the board.
    Spawned,
}

/// Mutable context handed to the dispatcher alongside each event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassiveCtx {
    /// Multiplier folded into the hit's outgoing damage.
    pub damage_mul: f64,
    /// Flat bonus folded into the hit's base damage.
    pub flat_bonus: i32,
}

impl Default for PassiveCtx {
    fn default() -> Self {
        Self {
            damage_mul: 1.0,
            flat_bonus: 0,
        }
    }
}

/// External passive-effect dispatcher.
pub trait PassiveDispatcher {
    fn emit(&mut self, unit: InstanceId, event: PassiveEvent, ctx: &mut PassiveCtx);
}

/// Dispatcher that does nothing; the default for hosts without passives.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPassives;

impl PassiveDispatcher for NullPassives {
    fn emit(&mut self, _unit: InstanceId, _event: PassiveEvent, _ctx: &mut PassiveCtx) {}
}
