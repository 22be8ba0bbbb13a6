//! Feature axes and their weights.
//!
//! Every candidate is scored on the same feature axes; each axis is
//! multiplied by an independently configurable weight and summed. The
//! defaults are hard-coded; hosts override individual axes.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// One axis of candidate scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumCount, EnumIter)]
pub enum Feature {
    /// Proximity of the candidate cell to the opposing front.
    Pressure,
    /// Inverse density of threats sharing the candidate's row.
    Safety,
    /// How soon the spawned unit would take its first turn.
    Readiness,
    /// Fraction of a summoner's pattern cells currently free.
    SummonRoom,
    /// Kit can open with its ultimate immediately.
    InstantUlt,
    /// Defensive kit placed on the front file.
    Defensive,
    /// Revive kit while the commander has casualties to bring back.
    Revive,
}

/// Per-feature weight table.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    weights: [f64; Feature::COUNT],
}

impl WeightTable {
    pub fn get(&self, feature: Feature) -> f64 {
        self.weights[feature as usize]
    }

    /// Overrides a single axis, returning the table for chaining.
    pub fn with(mut self, feature: Feature, weight: f64) -> Self {
        self.weights[feature as usize] = weight;
        self
    }

    /// Weighted sum over a per-feature score array indexed by `Feature`.
    pub fn combine(&self, scores: &[f64; Feature::COUNT]) -> f64 {
        Feature::iter()
            .map(|f| scores[f as usize] * self.get(f))
            .sum()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        let mut weights = [0.0; Feature::COUNT];
        weights[Feature::Pressure as usize] = 3.0;
        weights[Feature::Safety as usize] = 2.0;
        weights[Feature::Readiness as usize] = 2.5;
        weights[Feature::SummonRoom as usize] = 1.5;
        weights[Feature::InstantUlt as usize] = 2.0;
        weights[Feature::Defensive as usize] = 1.0;
        weights[Feature::Revive as usize] = 1.0;
        Self { weights }
    }
}
