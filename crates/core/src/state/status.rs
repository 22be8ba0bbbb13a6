//! Status effect pipeline.
//!
//! Each unit carries an ordered list of buff/debuff records. The records are
//! pure data (`kind`, `tag`, `dur`, `stacks`, `power`, `amount`); every
//! behavior (action gating, targeting overrides, damage-math rewrites,
//! turn-end ticking) lives in the query functions on [`StatusList`].
//!
//! # Duration model
//!
//! `dur: Some(n)` counts down at the bearer's turn end and the effect is
//! removed at zero. `dur: None` means "until consumed": the effect persists
//! until the pipeline removes it explicitly (an exhausted shield, a spent
//! cheat-death).

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Buff or debuff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    Buff,
    Debuff,
}

/// Semantic category used by the pipeline to route an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusTag {
    /// Prevents or restricts actions (stun, sleep, silence, fear).
    Control,
    /// Scales incoming damage (damage cut, stealth immunity).
    Mitigation,
    /// Scales outgoing damage (exalt, frenzy, weaken, fatigue).
    Output,
    /// Flat damage absorption charge.
    Shield,
    /// Defense penetration (armor/resist pierce).
    Pierce,
    /// Damage over time (bleed).
    Dot,
    /// Lethal/threshold overrides (cheat death, execute, venom, reflect).
    Fate,
    /// Rewrites target selection (taunt, allure).
    Targeting,
}

/// Canonical status archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusId {
    Stun,
    Sleep,
    Taunt,
    Reflect,
    Bleed,
    DamageCut,
    Fatigue,
    Silence,
    Shield,
    Exalt,
    ArmorPierce,
    ResistPierce,
    AtkDown,
    WilDown,
    Frenzy,
    Weaken,
    Fear,
    Stealth,
    Venom,
    Execute,
    CheatDeath,
    Allure,
    Haste,
}

/// One buff/debuff record attached to a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: StatusId,
    pub kind: StatusKind,
    pub tag: StatusTag,
    /// Turns remaining; `None` persists until consumed.
    pub dur: Option<u8>,
    pub stacks: u8,
    pub max_stacks: Option<u8>,
    /// Magnitude as a fraction (multiplier delta, HP fraction, ...).
    pub power: f64,
    /// Flat charge, e.g. remaining shield absorption.
    pub amount: i32,
}

impl StatusEffect {
    fn record(id: StatusId, kind: StatusKind, tag: StatusTag, dur: Option<u8>, power: f64) -> Self {
        Self {
            id,
            kind,
            tag,
            dur,
            stacks: 1,
            max_stacks: None,
            power,
            amount: 0,
        }
    }

    // ===== factory catalog =====
    // Archetypes are plain records; nothing here carries behavior.

    pub fn stun(dur: u8) -> Self {
        Self::record(StatusId::Stun, StatusKind::Debuff, StatusTag::Control, Some(dur), 0.0)
    }

    pub fn sleep(dur: u8) -> Self {
        Self::record(StatusId::Sleep, StatusKind::Debuff, StatusTag::Control, Some(dur), 0.0)
    }

    pub fn taunt(dur: u8) -> Self {
        Self::record(StatusId::Taunt, StatusKind::Buff, StatusTag::Targeting, Some(dur), 0.0)
    }

    /// Attacker takes `power * dealt` back on every hit.
    pub fn reflect(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Reflect, StatusKind::Buff, StatusTag::Fate, Some(dur), power)
    }

    /// Loses `round(hp_max * power)` at the bearer's turn end.
    pub fn bleed(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Bleed, StatusKind::Debuff, StatusTag::Dot, Some(dur), power)
    }

    /// Incoming damage scaled by `1 - power`.
    pub fn damage_cut(dur: u8, power: f64) -> Self {
        Self::record(StatusId::DamageCut, StatusKind::Buff, StatusTag::Mitigation, Some(dur), power)
    }

    /// Outgoing damage scaled by `1 - power`.
    pub fn fatigue(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Fatigue, StatusKind::Debuff, StatusTag::Output, Some(dur), power)
    }

    pub fn silence(dur: u8) -> Self {
        Self::record(StatusId::Silence, StatusKind::Debuff, StatusTag::Control, Some(dur), 0.0)
    }

    /// Flat absorption charge; persists until exhausted.
    pub fn shield(amount: i32) -> Self {
        let mut s = Self::record(StatusId::Shield, StatusKind::Buff, StatusTag::Shield, None, 0.0);
        s.amount = amount;
        s
    }

    /// Outgoing damage scaled by `1 + power`.
    pub fn exalt(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Exalt, StatusKind::Buff, StatusTag::Output, Some(dur), power)
    }

    /// Physical defense penetration on the bearer's attacks.
    pub fn armor_pierce(dur: u8, power: f64) -> Self {
        Self::record(StatusId::ArmorPierce, StatusKind::Buff, StatusTag::Pierce, Some(dur), power)
    }

    /// Mystic defense penetration on the bearer's attacks.
    pub fn resist_pierce(dur: u8, power: f64) -> Self {
        Self::record(StatusId::ResistPierce, StatusKind::Buff, StatusTag::Pierce, Some(dur), power)
    }

    /// Physical output reduced by `power`.
    pub fn atk_down(dur: u8, power: f64) -> Self {
        Self::record(StatusId::AtkDown, StatusKind::Debuff, StatusTag::Output, Some(dur), power)
    }

    /// Mystic output reduced by `power`.
    pub fn wil_down(dur: u8, power: f64) -> Self {
        Self::record(StatusId::WilDown, StatusKind::Debuff, StatusTag::Output, Some(dur), power)
    }

    /// Outgoing damage scaled by `1 + power`.
    pub fn frenzy(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Frenzy, StatusKind::Buff, StatusTag::Output, Some(dur), power)
    }

    /// Stacking output reduction, `power` per stack, capped at 5 stacks.
    pub fn weaken(dur: u8, power: f64) -> Self {
        let mut s = Self::record(StatusId::Weaken, StatusKind::Debuff, StatusTag::Output, Some(dur), power);
        s.max_stacks = Some(5);
        s
    }

    /// Outgoing damage scaled by `1 - power`.
    pub fn fear(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Fear, StatusKind::Debuff, StatusTag::Control, Some(dur), power)
    }

    /// Full damage immunity while active.
    pub fn stealth(dur: u8) -> Self {
        Self::record(StatusId::Stealth, StatusKind::Buff, StatusTag::Mitigation, Some(dur), 0.0)
    }

    /// Bearer's hits deal an extra `power * dealt` to the target.
    pub fn venom(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Venom, StatusKind::Buff, StatusTag::Fate, Some(dur), power)
    }

    /// Bearer's hits finish targets left at or below `power * hp_max`.
    pub fn execute(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Execute, StatusKind::Buff, StatusTag::Fate, Some(dur), power)
    }

    /// One-shot lethal override: HP is forced back to 1 and the effect is
    /// consumed.
    pub fn cheat_death() -> Self {
        Self::record(StatusId::CheatDeath, StatusKind::Buff, StatusTag::Fate, None, 0.0)
    }

    /// Bearer is removed from the basic-attack candidate pool.
    pub fn allure(dur: u8) -> Self {
        Self::record(StatusId::Allure, StatusKind::Buff, StatusTag::Targeting, Some(dur), 0.0)
    }

    /// Grants `floor(power)` extra follow-up basic attacks per turn.
    pub fn haste(dur: u8, power: f64) -> Self {
        Self::record(StatusId::Haste, StatusKind::Buff, StatusTag::Output, Some(dur), power)
    }
}

/// Which defense stat a hit is resolved against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSchool {
    /// Basic attacks: `atk` against `arm`.
    Physical,
    /// Ability damage: `wil` against `res`.
    Mystic,
}

/// Aggregated damage-math rewrites from both parties' statuses.
///
/// Produced once per hit by [`StatusList::pre_damage_mods`] and consumed by
/// the damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageMods {
    /// Multiplier on the attacker's output.
    pub out_mul: f64,
    /// Multiplier on the target's incoming damage.
    pub in_mul: f64,
    /// Fraction of the target's defense ignored, 0..=1.
    pub def_pen: f64,
    /// Target is fully immune; the hit resolves to zero.
    pub ignore_all: bool,
}

impl Default for DamageMods {
    fn default() -> Self {
        Self {
            out_mul: 1.0,
            in_mul: 1.0,
            def_pen: 0.0,
            ignore_all: false,
        }
    }
}

/// Result of one turn-end tick over a status list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnEndTick {
    /// Damage-over-time total to apply to the bearer's HP.
    pub dot_damage: i32,
    /// Effects whose duration reached zero this tick.
    pub expired: Vec<StatusId>,
}

/// Per-unit ordered status list with upsert semantics.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusList {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn has(&self, id: StatusId) -> bool {
        self.effects.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: StatusId) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Adds or refreshes a status.
    ///
    /// An existing record with the same id refreshes its duration, replaces
    /// its power, adds the incoming shield charge, and gains a stack up to
    /// `max_stacks`. A new record is appended if the list has room;
    /// otherwise it is dropped silently.
    pub fn upsert(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.id == effect.id) {
            existing.dur = effect.dur;
            existing.power = effect.power;
            existing.amount = existing.amount.saturating_add(effect.amount);
            let next = existing.stacks.saturating_add(1);
            existing.stacks = match existing.max_stacks {
                Some(cap) => next.min(cap),
                None => next,
            };
            return;
        }
        if !self.effects.is_full() {
            self.effects.push(effect);
        }
    }

    /// Removes a status outright.
    pub fn remove(&mut self, id: StatusId) {
        self.effects.retain(|e| e.id != id);
    }

    // ===== action gating =====

    /// False under stun or sleep.
    pub fn can_act(&self) -> bool {
        !self.has(StatusId::Stun) && !self.has(StatusId::Sleep)
    }

    /// True under silence: the bearer cannot cast its ultimate.
    pub fn blocks_ult(&self) -> bool {
        self.has(StatusId::Silence)
    }

    // ===== targeting overrides =====

    pub fn is_taunting(&self) -> bool {
        self.has(StatusId::Taunt)
    }

    /// Bearer is excluded from the basic-attack candidate pool.
    pub fn evades_basic(&self) -> bool {
        self.has(StatusId::Allure)
    }

    /// Extra follow-up basic attacks granted by haste.
    pub fn haste_bonus_attacks(&self) -> u8 {
        self.get(StatusId::Haste)
            .map(|e| e.power.max(0.0).floor() as u8)
            .unwrap_or(0)
    }

    // ===== damage-math rewrites =====

    /// Aggregates the pre-damage contributions of an attacker/target pair.
    pub fn pre_damage_mods(attacker: &Self, target: &Self, school: DamageSchool) -> DamageMods {
        let mut mods = DamageMods::default();

        for e in attacker.iter() {
            match e.id {
                StatusId::Exalt | StatusId::Frenzy => mods.out_mul *= 1.0 + e.power,
                StatusId::Fatigue | StatusId::Fear => mods.out_mul *= (1.0 - e.power).max(0.0),
                StatusId::Weaken => {
                    mods.out_mul *= (1.0 - e.power * f64::from(e.stacks)).max(0.0)
                }
                StatusId::AtkDown if school == DamageSchool::Physical => {
                    mods.out_mul *= (1.0 - e.power).max(0.0)
                }
                StatusId::WilDown if school == DamageSchool::Mystic => {
                    mods.out_mul *= (1.0 - e.power).max(0.0)
                }
                StatusId::ArmorPierce if school == DamageSchool::Physical => {
                    mods.def_pen = (mods.def_pen + e.power).min(1.0)
                }
                StatusId::ResistPierce if school == DamageSchool::Mystic => {
                    mods.def_pen = (mods.def_pen + e.power).min(1.0)
                }
                _ => {}
            }
        }

        for e in target.iter() {
            match e.id {
                StatusId::DamageCut => mods.in_mul *= (1.0 - e.power).max(0.0),
                StatusId::Stealth => mods.ignore_all = true,
                _ => {}
            }
        }

        mods
    }

    /// Consumes shield charge against an incoming hit.
    ///
    /// Returns `(absorbed, remain)`; `absorbed + remain == dmg` always
    /// holds. The shield record is removed exactly when its charge is
    /// exhausted.
    pub fn absorb_shield(&mut self, dmg: i32) -> (i32, i32) {
        let Some(shield) = self.effects.iter_mut().find(|e| e.id == StatusId::Shield) else {
            return (0, dmg);
        };
        let absorbed = dmg.min(shield.amount).max(0);
        shield.amount -= absorbed;
        if shield.amount <= 0 {
            self.remove(StatusId::Shield);
        }
        (absorbed, dmg - absorbed)
    }

    // ===== turn-end processing =====

    /// Resolves the bearer's turn-end tick.
    ///
    /// Damage-over-time entries resolve first (a fixed fraction of
    /// `hp_max`, rounded), then every timed entry decrements `dur` and is
    /// removed at zero. Untimed entries are untouched.
    pub fn tick_turn_end(&mut self, hp_max: i32) -> TurnEndTick {
        let mut tick = TurnEndTick::default();

        for e in self.effects.iter() {
            if e.tag == StatusTag::Dot {
                tick.dot_damage += (f64::from(hp_max) * e.power).round() as i32;
            }
        }

        for e in self.effects.iter_mut() {
            if let Some(dur) = e.dur.as_mut() {
                *dur = dur.saturating_sub(1);
                if *dur == 0 {
                    tick.expired.push(e.id);
                }
            }
        }
        self.effects.retain(|e| e.dur != Some(0));

        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_caps_stacks_at_max() {
        let mut list = StatusList::new();
        for _ in 0..6 {
            list.upsert(StatusEffect::weaken(2, 0.05));
        }
        assert_eq!(list.get(StatusId::Weaken).unwrap().stacks, 5);
    }

    #[test]
    fn upsert_refreshes_duration_and_adds_shield_charge() {
        let mut list = StatusList::new();
        list.upsert(StatusEffect::shield(30));
        list.upsert(StatusEffect::shield(20));
        assert_eq!(list.get(StatusId::Shield).unwrap().amount, 50);

        let mut bleed = StatusEffect::bleed(1, 0.05);
        list.upsert(bleed);
        bleed.dur = Some(3);
        list.upsert(bleed);
        assert_eq!(list.get(StatusId::Bleed).unwrap().dur, Some(3));
    }

    #[test]
    fn shield_absorption_conserves_damage() {
        let mut list = StatusList::new();
        list.upsert(StatusEffect::shield(25));

        let (absorbed, remain) = list.absorb_shield(10);
        assert_eq!((absorbed, remain), (10, 0));
        assert_eq!(list.get(StatusId::Shield).unwrap().amount, 15);

        let (absorbed, remain) = list.absorb_shield(40);
        assert_eq!((absorbed, remain), (15, 25));
        assert_eq!(absorbed + remain, 40);
        assert!(!list.has(StatusId::Shield), "exhausted shield is removed");
    }

    #[test]
    fn gating_under_control_statuses() {
        let mut list = StatusList::new();
        assert!(list.can_act());
        list.upsert(StatusEffect::stun(1));
        assert!(!list.can_act());

        let mut silenced = StatusList::new();
        silenced.upsert(StatusEffect::silence(2));
        assert!(silenced.can_act());
        assert!(silenced.blocks_ult());
    }

    #[test]
    fn turn_end_resolves_dot_then_decrements() {
        let mut list = StatusList::new();
        list.upsert(StatusEffect::bleed(2, 0.05));
        list.upsert(StatusEffect::cheat_death());

        let tick = list.tick_turn_end(100);
        assert_eq!(tick.dot_damage, 5);
        assert_eq!(list.get(StatusId::Bleed).unwrap().dur, Some(1));
        // Untimed entries never expire from ticking.
        assert!(list.has(StatusId::CheatDeath));

        let tick = list.tick_turn_end(100);
        assert_eq!(tick.dot_damage, 5);
        assert!(tick.expired.contains(&StatusId::Bleed));
        assert!(!list.has(StatusId::Bleed));
    }

    #[test]
    fn dot_damage_follows_the_record_power() {
        let mut weak = StatusList::new();
        weak.upsert(StatusEffect::bleed(2, 0.05));
        assert_eq!(weak.tick_turn_end(100).dot_damage, 5);

        let mut strong = StatusList::new();
        strong.upsert(StatusEffect::bleed(2, 0.10));
        assert_eq!(strong.tick_turn_end(100).dot_damage, 10);
    }

    #[test]
    fn stealth_forces_full_immunity() {
        let mut target = StatusList::new();
        target.upsert(StatusEffect::stealth(1));
        let mods = StatusList::pre_damage_mods(&StatusList::new(), &target, DamageSchool::Physical);
        assert!(mods.ignore_all);
    }

    #[test]
    fn pierce_applies_per_school() {
        let mut attacker = StatusList::new();
        attacker.upsert(StatusEffect::armor_pierce(2, 0.5));

        let phys =
            StatusList::pre_damage_mods(&attacker, &StatusList::new(), DamageSchool::Physical);
        assert_eq!(phys.def_pen, 0.5);

        let mystic =
            StatusList::pre_damage_mods(&attacker, &StatusList::new(), DamageSchool::Mystic);
        assert_eq!(mystic.def_pen, 0.0);
    }
}
