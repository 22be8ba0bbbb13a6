//! Unit metadata directory: templates, classes, and kits.
//!
//! The directory is the core's only window into externally-authored unit
//! content. Kits are validated once when the directory is built; the engine
//! never probes capability fields ad hoc after that.

use std::collections::HashMap;

use crate::state::grid::Slot;
use crate::state::status::StatusEffect;
use crate::state::unit::{UnitId, UnitStats};

/// Broad combat role, used for positional bias in move evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitClass {
    /// Front-line holder; prefers the midline file.
    Vanguard,
    /// Damage dealer with no positional preference.
    Striker,
    /// Ability damage; prefers the back file.
    Caster,
    /// Healing and buffs; prefers the back file.
    Support,
}

/// How an ultimate resolves once cast.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UltimateEffect {
    /// `hits` mystic strikes of `floor(wil * mult)` against resolved
    /// targets.
    Strike { mult: f64, hits: u8 },
    /// One mystic hit of `floor(wil * mult)` against every living enemy.
    Blast { mult: f64 },
    /// Applies a status to the resolved target, or to every living enemy.
    Inflict { status: StatusEffect, all: bool },
    /// Applies a status to the caster's side.
    Rally { status: StatusEffect, all: bool },
    /// Restores `floor(wil * mult)` HP to the most wounded living ally.
    Heal { mult: f64 },
    /// Enqueues an immediate summon that acts within the same step.
    SummonImmediate { unit: UnitId },
}

/// An ultimate: its fury threshold and effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UltimateSpec {
    pub cost: i32,
    pub effect: UltimateEffect,
}

/// Formation footprint a summoner wants free around its own side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonPattern {
    /// Slots (on the summoner's side) the pattern wants available.
    pub slots: Vec<Slot>,
    /// Minimum free slots for a placement to qualify.
    pub min_free: u8,
}

/// Optional-capability block of a unit kit.
///
/// All fields are plain data; [`UnitKit::validate`] runs once at directory
/// construction so downstream code can trust any `Some` it finds.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitKit {
    pub ultimate: Option<UltimateSpec>,
    /// Overrides the configured follow-up basic-attack count.
    pub follow_up_attacks: Option<u8>,
    pub summoner: Option<SummonPattern>,
    pub revive: bool,
    pub defensive: bool,
    /// Deck spawns of this unit attempt their ultimate immediately.
    pub opening_cast: bool,
}

/// Kit validation failures, surfaced at directory build time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum KitError {
    #[error("unit {0:?}: ultimate cost must be positive")]
    NonPositiveUltCost(UnitId),
    #[error("unit {0:?}: ultimate strike needs at least one hit")]
    ZeroHitStrike(UnitId),
    #[error("unit {0:?}: summon pattern min_free exceeds pattern size")]
    OversizedMinFree(UnitId),
    #[error("unit {0:?}: opening cast requires an ultimate")]
    OpeningCastWithoutUltimate(UnitId),
    #[error("duplicate template for unit {0:?}")]
    DuplicateTemplate(UnitId),
}

impl UnitKit {
    /// Checks the kit's internal consistency.
    pub fn validate(&self, unit: UnitId) -> Result<(), KitError> {
        if let Some(spec) = &self.ultimate {
            if spec.cost <= 0 {
                return Err(KitError::NonPositiveUltCost(unit));
            }
            if let UltimateEffect::Strike { hits: 0, .. } = spec.effect {
                return Err(KitError::ZeroHitStrike(unit));
            }
        }
        if let Some(pattern) = &self.summoner {
            if usize::from(pattern.min_free) > pattern.slots.len() {
                return Err(KitError::OversizedMinFree(unit));
            }
        }
        if self.opening_cast && self.ultimate.is_none() {
            return Err(KitError::OpeningCastWithoutUltimate(unit));
        }
        Ok(())
    }
}

/// Static description of a unit archetype.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub id: UnitId,
    pub name: String,
    pub class: UnitClass,
    pub rank: u8,
    pub is_leader: bool,
    pub stats: UnitStats,
    pub kit: UnitKit,
}

/// Read-only unit metadata lookup.
pub trait UnitDirectory {
    fn template(&self, unit: UnitId) -> Option<&UnitTemplate>;
}

/// In-memory directory backed by a hash map, validated on construction.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    templates: HashMap<UnitId, UnitTemplate>,
}

impl StaticDirectory {
    pub fn from_templates(
        templates: impl IntoIterator<Item = UnitTemplate>,
    ) -> Result<Self, KitError> {
        let mut map = HashMap::new();
        for template in templates {
            template.kit.validate(template.id)?;
            let id = template.id;
            if map.insert(id, template).is_some() {
                return Err(KitError::DuplicateTemplate(id));
            }
        }
        Ok(Self { templates: map })
    }
}

impl UnitDirectory for StaticDirectory {
    fn template(&self, unit: UnitId) -> Option<&UnitTemplate> {
        self.templates.get(&unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: u32, kit: UnitKit) -> UnitTemplate {
        UnitTemplate {
            id: UnitId(id),
            name: format!("unit-{id}"),
            class: UnitClass::Striker,
            rank: 1,
            is_leader: false,
            stats: UnitStats::default(),
            kit,
        }
    }

    #[test]
    fn directory_rejects_invalid_kits() {
        let bad = UnitKit {
            ultimate: Some(UltimateSpec {
                cost: 0,
                effect: UltimateEffect::Blast { mult: 1.0 },
            }),
            ..UnitKit::default()
        };
        assert_eq!(
            StaticDirectory::from_templates([template(1, bad)]).unwrap_err(),
            KitError::NonPositiveUltCost(UnitId(1))
        );

        let orphan_opener = UnitKit {
            opening_cast: true,
            ..UnitKit::default()
        };
        assert!(matches!(
            StaticDirectory::from_templates([template(2, orphan_opener)]),
            Err(KitError::OpeningCastWithoutUltimate(_))
        ));
    }

    #[test]
    fn directory_accepts_and_serves_valid_templates() {
        let dir = StaticDirectory::from_templates([template(5, UnitKit::default())]).unwrap();
        assert!(dir.template(UnitId(5)).is_some());
        assert!(dir.template(UnitId(6)).is_none());
    }
}
