//! Presentation hooks.
//!
//! The engine narrates resolution through this trait so a host can drive
//! animation or commentary. Every method has a no-op default; the engine
//! never reads anything back.

use crate::state::grid::Cell;
use crate::state::status::StatusId;
use crate::state::unit::InstanceId;

/// Host-side presentation layer.
pub trait Presentation {
    fn attack(&mut self, _attacker: InstanceId, _target: InstanceId) {}

    fn damage(&mut self, _target: InstanceId, _amount: i32) {}

    fn heal(&mut self, _target: InstanceId, _amount: i32) {}

    fn status_applied(&mut self, _target: InstanceId, _status: StatusId) {}

    fn status_expired(&mut self, _target: InstanceId, _status: StatusId) {}

    fn ultimate(&mut self, _caster: InstanceId) {}

    fn spawn(&mut self, _unit: InstanceId, _cell: Cell) {}

    fn death(&mut self, _unit: InstanceId) {}
}

/// Presentation layer that swallows everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {}
