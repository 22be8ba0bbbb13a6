//! The damage pipeline.
//!
//! One entry point, [`resolve_damage`], applied identically to basic
//! attacks and ability damage. Stages, in order: base, pre-damage status
//! aggregation, output multiplier, mitigation, incoming multiplier, shield
//! absorption, HP application with the lethal override, post hooks
//! (reflect, venom, execute), and fury-gain events for both parties.
//! Every multiplicative stage floors.

use crate::combat::result::DamageReport;
use crate::env::fury::FuryEvent;
use crate::env::passives::PassiveCtx;
use crate::env::BattleEnv;
use crate::state::status::{DamageSchool, StatusId, StatusList};
use crate::state::unit::{InstanceId, UnitToken};
use crate::state::BattleState;

/// Combat resolution failures. Both indicate the caller handed the
/// pipeline a unit that is no longer on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("attacker {0:?} is not on the board")]
    MissingAttacker(InstanceId),
    #[error("target {0:?} is not on the board")]
    MissingTarget(InstanceId),
}

fn floor_mul(value: i32, mul: f64) -> i32 {
    (f64::from(value) * mul).floor() as i32
}

/// Lethal-damage override: a cheat-death charge pins the bearer at 1 HP
/// and is consumed. Returns true when the charge fired.
pub(crate) fn apply_lethal_override(token: &mut UnitToken) -> bool {
    if token.hp <= 0 && token.statuses.has(StatusId::CheatDeath) {
        token.statuses.remove(StatusId::CheatDeath);
        token.hp = 1;
        return true;
    }
    false
}

/// Resolves one hit from `attacker` against `target`.
///
/// `base_override` substitutes for the attacker's school stat (ability
/// damage passes a precomputed figure). `ctx` carries the passive
/// dispatcher's contributions for this hit.
pub fn resolve_damage(
    state: &mut BattleState,
    env: &mut BattleEnv<'_>,
    attacker: InstanceId,
    target: InstanceId,
    school: DamageSchool,
    base_override: Option<i32>,
    ctx: PassiveCtx,
    aoe: bool,
) -> Result<DamageReport, CombatError> {
    let atk_tok = state
        .unit(attacker)
        .ok_or(CombatError::MissingAttacker(attacker))?;
    let atk_stats = atk_tok.stats;
    let atk_statuses = atk_tok.statuses.clone();

    let tgt_tok = state
        .unit(target)
        .ok_or(CombatError::MissingTarget(target))?;
    let tgt_stats = tgt_tok.stats;
    let tgt_statuses = tgt_tok.statuses.clone();

    let raw = base_override.unwrap_or(match school {
        DamageSchool::Physical => atk_stats.atk,
        DamageSchool::Mystic => atk_stats.wil,
    });
    let base = raw.saturating_add(ctx.flat_bonus).max(1);

    let mods = StatusList::pre_damage_mods(&atk_statuses, &tgt_statuses, school);

    let mut dmg = floor_mul(base, mods.out_mul * ctx.damage_mul);
    if mods.ignore_all {
        dmg = 0;
    }

    let defense = match school {
        DamageSchool::Physical => tgt_stats.arm,
        DamageSchool::Mystic => tgt_stats.res,
    };
    let effective_defense = defense * (1.0 - mods.def_pen);
    dmg = floor_mul(dmg, 1.0 - effective_defense);
    dmg = floor_mul(dmg, mods.in_mul);
    let dealt = dmg.max(0);

    let mut report = DamageReport {
        base,
        dealt,
        ..DamageReport::default()
    };

    {
        let tgt = state
            .unit_mut(target)
            .ok_or(CombatError::MissingTarget(target))?;

        let (absorbed, remain) = tgt.statuses.absorb_shield(dealt);
        report.absorbed = absorbed;
        report.applied = remain;

        tgt.hp -= remain;
        env.fx.damage(target, remain);
        if tgt.hp <= 0 {
            report.cheated_death = apply_lethal_override(tgt);
        }

        report.reflected = tgt
            .statuses
            .get(StatusId::Reflect)
            .map(|r| floor_mul(dealt, r.power).max(0))
            .unwrap_or(0);

        report.venom = atk_statuses
            .get(StatusId::Venom)
            .map(|v| floor_mul(dealt, v.power).max(0))
            .unwrap_or(0);
        if report.venom > 0 && tgt.is_alive() {
            tgt.hp -= report.venom;
            env.fx.damage(target, report.venom);
            if tgt.hp <= 0 {
                report.cheated_death |= apply_lethal_override(tgt);
            }
        }

        if let Some(exec) = atk_statuses.get(StatusId::Execute) {
            let threshold = floor_mul(tgt_stats.hp_max, exec.power);
            if tgt.hp > 0 && tgt.hp <= threshold {
                tgt.hp = 0;
                report.executed = true;
            }
        }

        report.kill = !tgt.is_alive();
    }
    if report.kill {
        crate::engine::publish_death(env, target, crate::env::events::DeathCause::Combat);
    }

    if report.reflected > 0 {
        let atk = state
            .unit_mut(attacker)
            .ok_or(CombatError::MissingAttacker(attacker))?;
        atk.hp -= report.reflected;
        env.fx.damage(attacker, report.reflected);
        if atk.hp <= 0 {
            apply_lethal_override(atk);
        }
        let attacker_down = !atk.is_alive();
        if attacker_down {
            crate::engine::publish_death(env, attacker, crate::env::events::DeathCause::Combat);
        }
    }

    // Fury events fire regardless of pipeline outcome.
    if let Some(atk) = state.unit_mut(attacker) {
        env.fury.gain(atk, FuryEvent::dealt(dealt, report.kill, aoe));
    }
    if let Some(tgt) = state.unit_mut(target) {
        env.fury.gain(tgt, FuryEvent::received(dealt));
    }

    Ok(report)
}

/// Restores HP to `target`, clamped to its maximum. Returns the HP
/// actually restored.
pub fn heal(
    state: &mut BattleState,
    env: &mut BattleEnv<'_>,
    target: InstanceId,
    amount: i32,
) -> Result<i32, CombatError> {
    let tgt = state
        .unit_mut(target)
        .ok_or(CombatError::MissingTarget(target))?;
    let restored = tgt.heal(amount);
    env.fx.heal(target, restored);
    Ok(restored)
}
