//! Per-unit action resolution.
//!
//! `do_action_or_skip` runs one unit's turn: turn-start hooks, fury
//! bookkeeping, regen, gating, then the ultimate-versus-basic decision.
//! Every failure is caught at the smallest boundary so one unit's faulty
//! behavior cannot abort the scheduler step.

use tracing::{error, warn};

use crate::combat::damage::{heal, resolve_damage, CombatError};
use crate::combat::target::resolve_target;
use crate::config::BattleConfig;
use crate::engine::chain::{enqueue_immediate, ChainError};
use crate::env::directory::{UltimateEffect, UltimateSpec};
use crate::env::events::BattleEvent;
use crate::env::passives::{PassiveCtx, PassiveEvent};
use crate::env::BattleEnv;
use crate::state::grid::{slot_to_cell, Slot};
use crate::state::queue::ActionChainEntry;
use crate::state::status::DamageSchool;
use crate::state::unit::{InstanceId, UnitId};
use crate::state::BattleState;

/// Why a unit's scheduled action did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The slot held no living unit by the time the action ran.
    MissingUnit,
    /// A control status (stun/sleep) gated the action.
    Status,
    /// The ultimate attempt failed; fury was zeroed, turn still consumed.
    UltimateFailed,
    /// The basic-attack path failed unexpectedly; turn not consumed and
    /// the acting side's minion TTL tick is suppressed.
    SystemError,
}

/// What one unit's turn amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub consumed_turn: bool,
    pub acted: bool,
    pub skipped: bool,
    pub reason: Option<SkipReason>,
}

impl ActionOutcome {
    fn acted() -> Self {
        Self {
            consumed_turn: true,
            acted: true,
            skipped: false,
            reason: None,
        }
    }

    /// A consumed turn in which nothing happened (e.g. no target left).
    fn passed() -> Self {
        Self {
            consumed_turn: true,
            acted: false,
            skipped: false,
            reason: None,
        }
    }

    fn skipped(reason: SkipReason, consumed_turn: bool) -> Self {
        Self {
            consumed_turn,
            acted: false,
            skipped: true,
            reason: Some(reason),
        }
    }
}

/// Failures surfaced by ultimate execution. The caller zeroes the caster's
/// fury and consumes the turn; nothing here escapes the scheduler step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UltimateError {
    #[error("no template for unit {0:?}")]
    MissingTemplate(UnitId),
    #[error("no free slot for the summoned unit")]
    NoRoom,
    #[error(transparent)]
    Combat(#[from] CombatError),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Resolves one unit's turn and reports what happened.
pub fn do_action_or_skip(
    state: &mut BattleState,
    config: &BattleConfig,
    env: &mut BattleEnv<'_>,
    iid: InstanceId,
) -> ActionOutcome {
    let directory = env.directory;
    let Some(unit) = state.unit(iid) else {
        return ActionOutcome::skipped(SkipReason::MissingUnit, false);
    };
    let unit_id = unit.unit;

    env.events.publish(BattleEvent::ActionStarted { unit: iid });
    let mut turn_ctx = PassiveCtx::default();
    env.passives.emit(iid, PassiveEvent::TurnStart, &mut turn_ctx);

    if let Some(tok) = state.unit_mut(iid) {
        env.fury.start_turn(tok);
        if tok.fresh_summon {
            env.fury.clear_fresh_summon(tok);
        }
        let restored = tok.heal(tok.stats.hp_regen.max(0));
        if restored > 0 {
            env.events.publish(BattleEvent::RegenTicked {
                unit: iid,
                amount: restored,
            });
        }
    }

    let Some(unit) = state.unit(iid) else {
        return ActionOutcome::skipped(SkipReason::MissingUnit, false);
    };
    if !unit.statuses.can_act() {
        return ActionOutcome::skipped(SkipReason::Status, false);
    }

    let ultimate = directory
        .template(unit_id)
        .and_then(|t| t.kit.ultimate.clone());
    if let Some(spec) = ultimate {
        let cost = env.fury.resolve_ult_cost(unit, &spec);
        if !unit.statuses.blocks_ult() && unit.fury >= cost {
            match cast_ultimate(state, env, iid, &spec) {
                Ok(()) => {
                    if let Some(tok) = state.unit_mut(iid) {
                        env.fury.spend(tok, cost);
                    }
                    env.passives
                        .emit(iid, PassiveEvent::UltCast, &mut PassiveCtx::default());
                    env.passives
                        .emit(iid, PassiveEvent::ActionEnd, &mut PassiveCtx::default());
                    env.events.publish(BattleEvent::ActionEnded { unit: iid });
                    return ActionOutcome::acted();
                }
                Err(err) => {
                    warn!(unit = ?iid, %err, "ultimate failed, zeroing fury");
                    if let Some(tok) = state.unit_mut(iid) {
                        env.fury.set(tok, 0);
                    }
                    env.events.publish(BattleEvent::ActionEnded { unit: iid });
                    return ActionOutcome::skipped(SkipReason::UltimateFailed, true);
                }
            }
        }
    }

    match run_basic_attacks(state, config, env, iid) {
        Ok(acted) => {
            env.passives
                .emit(iid, PassiveEvent::ActionEnd, &mut PassiveCtx::default());
            env.events.publish(BattleEvent::ActionEnded { unit: iid });
            if acted {
                ActionOutcome::acted()
            } else {
                ActionOutcome::passed()
            }
        }
        Err(err) => {
            error!(unit = ?iid, %err, "basic attack path failed");
            ActionOutcome::skipped(SkipReason::SystemError, false)
        }
    }
}

/// One basic attack plus follow-ups (kit override, else the configured
/// default, plus any haste bonus). Targets are re-resolved per hit so a
/// kill mid-chain redirects the remainder.
fn run_basic_attacks(
    state: &mut BattleState,
    config: &BattleConfig,
    env: &mut BattleEnv<'_>,
    iid: InstanceId,
) -> Result<bool, CombatError> {
    let directory = env.directory;
    let Some(unit) = state.unit(iid) else {
        return Ok(false);
    };
    let side = unit.side;
    let follow_ups = directory
        .template(unit.unit)
        .and_then(|t| t.kit.follow_up_attacks)
        .unwrap_or(config.default_follow_up_attacks)
        + unit.statuses.haste_bonus_attacks();

    let mut acted = false;
    for _ in 0..=follow_ups {
        let Some(attacker) = state.unit(iid).filter(|u| u.is_alive()) else {
            break;
        };
        let from = attacker.cell;
        let Some(target) = resolve_target(state, side, from, true) else {
            break;
        };

        let mut ctx = PassiveCtx::default();
        env.passives
            .emit(iid, PassiveEvent::BasicHit { target }, &mut ctx);
        env.fx.attack(iid, target);
        resolve_damage(
            state,
            env,
            iid,
            target,
            DamageSchool::Physical,
            None,
            ctx,
            false,
        )?;
        acted = true;
    }
    Ok(acted)
}

/// Executes an ultimate's effect. Fury spending happens in the caller,
/// only after success.
pub(crate) fn cast_ultimate(
    state: &mut BattleState,
    env: &mut BattleEnv<'_>,
    caster: InstanceId,
    spec: &UltimateSpec,
) -> Result<(), UltimateError> {
    let directory = env.directory;
    let tok = state
        .unit(caster)
        .ok_or(CombatError::MissingAttacker(caster))?;
    let side = tok.side;
    let from = tok.cell;
    let wil = tok.stats.wil;

    env.fx.ultimate(caster);
    if let Some(tok) = state.unit_mut(caster) {
        env.fury.start_skill(tok);
    }

    let ability_base = |mult: f64| ((f64::from(wil) * mult).floor() as i32).max(1);

    match &spec.effect {
        UltimateEffect::Strike { mult, hits } => {
            let base = ability_base(*mult);
            for _ in 0..*hits {
                let Some(target) = resolve_target(state, side, from, false) else {
                    break;
                };
                resolve_damage(
                    state,
                    env,
                    caster,
                    target,
                    DamageSchool::Mystic,
                    Some(base),
                    PassiveCtx::default(),
                    false,
                )?;
                if let Some(tok) = state.unit_mut(caster) {
                    env.fury.finish_hit(tok);
                }
            }
        }
        UltimateEffect::Blast { mult } => {
            let base = ability_base(*mult);
            let targets: Vec<InstanceId> =
                state.living(side.opponent()).map(|u| u.iid).collect();
            for target in targets {
                resolve_damage(
                    state,
                    env,
                    caster,
                    target,
                    DamageSchool::Mystic,
                    Some(base),
                    PassiveCtx::default(),
                    true,
                )?;
                if let Some(tok) = state.unit_mut(caster) {
                    env.fury.finish_hit(tok);
                }
            }
        }
        UltimateEffect::Inflict { status, all } => {
            let targets: Vec<InstanceId> = if *all {
                state.living(side.opponent()).map(|u| u.iid).collect()
            } else {
                resolve_target(state, side, from, false).into_iter().collect()
            };
            for target in targets {
                if let Some(tok) = state.unit_mut(target) {
                    tok.statuses.upsert(*status);
                    env.fx.status_applied(target, status.id);
                }
            }
        }
        UltimateEffect::Rally { status, all } => {
            let targets: Vec<InstanceId> = if *all {
                state.living(side).map(|u| u.iid).collect()
            } else {
                vec![caster]
            };
            for target in targets {
                if let Some(tok) = state.unit_mut(target) {
                    tok.statuses.upsert(*status);
                    env.fx.status_applied(target, status.id);
                }
            }
        }
        UltimateEffect::Heal { mult } => {
            let amount = ability_base(*mult);
            let target = state
                .living(side)
                .min_by_key(|u| std::cmp::Reverse(u.stats.hp_max - u.hp))
                .map(|u| u.iid);
            if let Some(target) = target {
                heal(state, env, target, amount)?;
            }
        }
        UltimateEffect::SummonImmediate { unit } => {
            let slot = Slot::all()
                .find(|s| !state.is_cell_reserved(slot_to_cell(side, *s)))
                .ok_or(UltimateError::NoRoom)?;
            enqueue_immediate(
                state,
                directory,
                ActionChainEntry {
                    side,
                    slot,
                    unit: *unit,
                    owner: Some(caster),
                },
            )?;
        }
    }
    Ok(())
}
