//! Fury economy contract.
//!
//! The resource economy is a host subsystem; the engine only calls through
//! this trait and compares pool values it reads back off the token. A
//! [`StandardFury`] reference implementation ships so the engine is
//! exercisable without a host.

use crate::env::directory::{UltimateSpec, UnitTemplate};
use crate::state::unit::UnitToken;

/// Structured descriptor for a fury-gain trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuryEvent {
    pub kind: FuryEventKind,
    /// Damage dealt by the unit gaining fury, when applicable.
    pub dealt: i32,
    /// Damage received by the unit gaining fury, when applicable.
    pub received: i32,
    pub kill: bool,
    pub crit: bool,
    pub aoe: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuryEventKind {
    DamageDealt,
    DamageReceived,
}

impl FuryEvent {
    pub fn dealt(dealt: i32, kill: bool, aoe: bool) -> Self {
        Self {
            kind: FuryEventKind::DamageDealt,
            dealt,
            received: 0,
            kill,
            crit: false,
            aoe,
        }
    }

    pub fn received(received: i32) -> Self {
        Self {
            kind: FuryEventKind::DamageReceived,
            dealt: 0,
            received,
            kill: false,
            crit: false,
            aoe: false,
        }
    }
}

/// The resource economy the engine charges ultimates against.
pub trait FuryEconomy {
    /// Seeds a freshly constructed token's pool from its template.
    fn initialize(&mut self, token: &mut UnitToken, template: &UnitTemplate);

    /// Turn-start bookkeeping for the acting unit.
    fn start_turn(&mut self, token: &mut UnitToken);

    /// Awards fury for a combat event.
    fn gain(&mut self, token: &mut UnitToken, event: FuryEvent);

    /// Deducts the cost of a confirmed successful cast.
    fn spend(&mut self, token: &mut UnitToken, cost: i32);

    /// The threshold the engine compares the pool against before a cast.
    fn resolve_ult_cost(&self, token: &UnitToken, spec: &UltimateSpec) -> i32;

    /// Forces the pool to an exact value (e.g. zeroed after a failed cast).
    fn set(&mut self, token: &mut UnitToken, value: i32);

    /// Ends the token's fresh-summon opening window.
    fn clear_fresh_summon(&mut self, token: &mut UnitToken);

    /// Called when an ultimate begins resolving.
    fn start_skill(&mut self, token: &mut UnitToken);

    /// Called after each resolved hit of a skill.
    fn finish_hit(&mut self, token: &mut UnitToken);
}

/// Flat reference economy: gains proportional to damage, kills worth a
/// fixed bonus, no crit/AoE scaling.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardFury;

impl StandardFury {
    const KILL_BONUS: i32 = 10;

    fn clamp(token: &mut UnitToken) {
        token.fury = token.fury.clamp(0, token.stats.fury_max);
    }
}

impl FuryEconomy for StandardFury {
    fn initialize(&mut self, token: &mut UnitToken, template: &UnitTemplate) {
        token.fury = 0;
        token.stats.fury_max = template.stats.fury_max;
    }

    fn start_turn(&mut self, token: &mut UnitToken) {
        token.fury += token.stats.fury_regen;
        Self::clamp(token);
    }

    fn gain(&mut self, token: &mut UnitToken, event: FuryEvent) {
        let base = match event.kind {
            FuryEventKind::DamageDealt => event.dealt / 4,
            FuryEventKind::DamageReceived => event.received / 2,
        };
        token.fury += base.max(0);
        if event.kill {
            token.fury += Self::KILL_BONUS;
        }
        Self::clamp(token);
    }

    fn spend(&mut self, token: &mut UnitToken, cost: i32) {
        token.fury -= cost;
        Self::clamp(token);
    }

    fn resolve_ult_cost(&self, _token: &UnitToken, spec: &UltimateSpec) -> i32 {
        spec.cost
    }

    fn set(&mut self, token: &mut UnitToken, value: i32) {
        token.fury = value;
        Self::clamp(token);
    }

    fn clear_fresh_summon(&mut self, token: &mut UnitToken) {
        token.fresh_summon = false;
    }

    fn start_skill(&mut self, _token: &mut UnitToken) {}

    fn finish_hit(&mut self, _token: &mut UnitToken) {}
}
