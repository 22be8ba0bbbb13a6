//! Spawn resolution.
//!
//! The scheduler consults `spawn_queued_if_due` before each step's action.
//! A materialized spawn consumes the step by itself; the new unit acts on
//! its own future turn. Deck-origin units enter at full fury and, if their
//! kit allows, attempt a one-time opening ultimate before control returns
//! to the scheduler.

use tracing::warn;

use crate::config::BattleConfig;
use crate::engine::action::cast_ultimate;
use crate::env::events::BattleEvent;
use crate::env::passives::{PassiveCtx, PassiveEvent};
use crate::env::BattleEnv;
use crate::state::grid::{slot_to_cell, Side, Slot};
use crate::state::queue::SpawnOrigin;
use crate::state::turn::TurnSlot;
use crate::state::unit::{InstanceId, UnitId, UnitToken};
use crate::state::BattleState;

/// A resolved request to place a unit on the board right now.
pub(crate) struct SpawnSpec {
    pub unit: UnitId,
    pub side: Side,
    pub slot: Slot,
    pub origin: SpawnOrigin,
    pub owner: Option<InstanceId>,
}

/// Constructs and registers a token for `spec`. Returns `None` (with a
/// diagnostic) when the template is unknown or the cell is occupied.
pub(crate) fn materialize(
    state: &mut BattleState,
    config: &BattleConfig,
    env: &mut BattleEnv<'_>,
    spec: SpawnSpec,
) -> Option<InstanceId> {
    let directory = env.directory;
    let cell = slot_to_cell(spec.side, spec.slot);

    let Some(template) = directory.template(spec.unit) else {
        warn!(unit = ?spec.unit, "spawn request for unknown unit, dropping");
        return None;
    };
    if state.unit_at_cell(cell).is_some() {
        warn!(?cell, "spawn destination occupied, dropping");
        return None;
    }

    let iid = state.allocate_iid();
    let mut token = UnitToken::new(spec.unit, iid, spec.side, cell, template.stats);
    token.is_leader = template.is_leader;
    env.fury.initialize(&mut token, template);
    match spec.origin {
        SpawnOrigin::Deck => {
            let full = token.stats.fury_max;
            env.fury.set(&mut token, full);
        }
        SpawnOrigin::Ability { fury } => {
            token.is_minion = true;
            token.owner = spec.owner;
            token.ttl_turns = Some(config.default_minion_ttl);
            if let Some(fury) = fury {
                env.fury.set(&mut token, fury);
            }
        }
        SpawnOrigin::Revive { fury } => {
            if let Some(fury) = fury {
                env.fury.set(&mut token, fury);
            }
        }
    }
    state.units.push(token);

    env.passives
        .emit(iid, PassiveEvent::Spawned, &mut PassiveCtx::default());
    env.fx.spawn(iid, cell);
    env.events.publish(BattleEvent::UnitSpawned {
        unit: iid,
        side: spec.side,
        cell,
    });
    Some(iid)
}

/// Materializes the queued spawn due at `turn`, if any. Returns whether a
/// spawn consumed the step.
pub(crate) fn spawn_queued_if_due(
    state: &mut BattleState,
    config: &BattleConfig,
    env: &mut BattleEnv<'_>,
    turn: TurnSlot,
    cycle: u32,
) -> bool {
    let due = state
        .queued
        .get(turn.side)
        .get(&turn.slot)
        .is_some_and(|r| r.spawn_cycle <= cycle);
    if !due {
        return false;
    }
    let Some(request) = state.queued.get_mut(turn.side).remove(&turn.slot) else {
        return false;
    };

    let origin = request.origin;
    let Some(iid) = materialize(
        state,
        config,
        env,
        SpawnSpec {
            unit: request.unit,
            side: request.side,
            slot: request.slot,
            origin,
            owner: None,
        },
    ) else {
        return false;
    };

    if matches!(origin, SpawnOrigin::Deck) {
        attempt_opening_cast(state, env, iid);
    }
    true
}

/// One-time opening ultimate for non-leader deck spawns whose kit opts in.
fn attempt_opening_cast(state: &mut BattleState, env: &mut BattleEnv<'_>, iid: InstanceId) {
    let directory = env.directory;
    let Some(tok) = state.unit(iid) else {
        return;
    };
    if tok.is_leader || tok.statuses.blocks_ult() {
        return;
    }
    let Some(template) = directory.template(tok.unit) else {
        return;
    };
    if !template.kit.opening_cast {
        return;
    }
    let Some(spec) = template.kit.ultimate.clone() else {
        return;
    };
    let cost = env.fury.resolve_ult_cost(tok, &spec);
    if tok.fury < cost {
        return;
    }

    match cast_ultimate(state, env, iid, &spec) {
        Ok(()) => {
            if let Some(tok) = state.unit_mut(iid) {
                env.fury.spend(tok, cost);
            }
            env.passives
                .emit(iid, PassiveEvent::UltCast, &mut PassiveCtx::default());
        }
        Err(err) => {
            warn!(unit = ?iid, %err, "opening ultimate failed, zeroing fury");
            if let Some(tok) = state.unit_mut(iid) {
                env.fury.set(tok, 0);
            }
        }
    }
    if let Some(tok) = state.unit_mut(iid) {
        env.fury.clear_fresh_summon(tok);
    }
}
