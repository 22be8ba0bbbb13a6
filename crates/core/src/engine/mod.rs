//! The battle engine: one atomic scheduler step at a time.
//!
//! [`BattleEngine`] borrows the state for a sequence of calls; `step_turn`
//! advances the battle by exactly one discrete step. All mutations caused
//! by a step complete before the call returns; nothing here suspends or
//! re-enters.

pub mod action;
pub mod chain;
pub mod spawn;

use tracing::debug;

pub use action::{do_action_or_skip, ActionOutcome, SkipReason, UltimateError};
pub use chain::{enqueue_immediate, process_action_chain, ChainError};

use crate::combat::damage::apply_lethal_override;
use crate::config::BattleConfig;
use crate::env::events::{BattleEvent, DeathCause};
use crate::env::BattleEnv;
use crate::state::grid::Side;
use crate::state::unit::InstanceId;
use crate::state::BattleState;

pub(crate) fn publish_death(env: &mut BattleEnv<'_>, unit: InstanceId, cause: DeathCause) {
    env.fx.death(unit);
    env.events.publish(BattleEvent::UnitDied { unit, cause });
}

/// Drives one battle over a borrowed [`BattleState`].
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    config: BattleConfig,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, config: BattleConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// The winner, once one side has no presence left. Hosts consult this
    /// after each step as their coarse cancellation check.
    pub fn battle_over(&self) -> Option<Side> {
        self.state.battle_over()
    }

    /// Advances the battle by exactly one atomic step.
    ///
    /// Per step: resolve a due queued spawn (which consumes the step by
    /// itself), or run the occupying unit's action and drain its side's
    /// action chain, or pass virtually over an empty slot. Minion TTL for
    /// the acting side ticks only when the step was consumed; turn-end
    /// status ticking for the acting unit happens regardless of gating.
    pub fn step_turn(&mut self, env: &mut BattleEnv<'_>) {
        let turn = self.state.scheduler.peek();
        let cycle = self.state.scheduler.cycle();
        let was_over = self.state.battle_over();
        env.events.publish(BattleEvent::TurnStarted { turn, cycle });

        let mut consumed = false;
        if spawn::spawn_queued_if_due(self.state, &self.config, env, turn, cycle) {
            consumed = true;
        } else if let Some(iid) = self.state.unit_at_slot(turn.side, turn.slot).map(|u| u.iid) {
            let outcome = do_action_or_skip(self.state, &self.config, env, iid);
            process_action_chain(self.state, &self.config, env, turn.side);
            tick_unit_turn_end(self.state, env, iid);
            consumed = outcome.consumed_turn;
        } else {
            debug!(?turn, "virtual pass over empty slot");
        }

        if consumed {
            tick_minion_ttl(self.state, env, turn.side);
        }

        self.state.compact_dead();
        if was_over.is_none() {
            if let Some(winner) = self.state.battle_over() {
                env.events.publish(BattleEvent::BattleEnded { winner });
            }
        }
        env.events.publish(BattleEvent::TurnEnded { turn, consumed });
        self.state.scheduler.advance();
    }
}

/// Turn-end status processing for the unit whose turn just ended: DoT
/// resolves first, then timed durations decrement and expire.
fn tick_unit_turn_end(state: &mut BattleState, env: &mut BattleEnv<'_>, iid: InstanceId) {
    let Some(tok) = state.unit_mut(iid) else {
        return;
    };
    if !tok.is_alive() {
        return;
    }
    let hp_max = tok.stats.hp_max;
    let tick = tok.statuses.tick_turn_end(hp_max);
    for id in &tick.expired {
        env.fx.status_expired(iid, *id);
    }
    if tick.dot_damage > 0 {
        tok.hp -= tick.dot_damage;
        env.fx.damage(iid, tick.dot_damage);
        if tok.hp <= 0 && !apply_lethal_override(tok) {
            publish_death(env, iid, DeathCause::Combat);
        }
    }
}

/// Decrements TTL on every living minion of the acting side, removing
/// those that hit zero.
fn tick_minion_ttl(state: &mut BattleState, env: &mut BattleEnv<'_>, side: Side) {
    let mut expired = Vec::new();
    for tok in state
        .units
        .iter_mut()
        .filter(|u| u.side == side && u.is_minion && u.is_alive())
    {
        if let Some(ttl) = tok.ttl_turns.as_mut() {
            *ttl = ttl.saturating_sub(1);
            if *ttl == 0 {
                tok.alive = false;
                expired.push(tok.iid);
            }
        }
    }
    for iid in expired {
        publish_death(env, iid, DeathCause::TtlExpired);
    }
}
