//! The move evaluator.
//!
//! Builds the candidate space as (affordable card) x (empty own slot),
//! scores every pair on the weighted feature axes, and commits the best
//! candidate that survives the hard feasibility filter. Scoring is pure
//! and deterministic; only hand-refill draws consult the RNG.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::EnumCount;
use tracing::debug;

use lanefall_core::{
    slot_to_cell, BattleState, QueuedSummonRequest, Slot, SpawnOrigin, TurnSlot, UnitClass,
    UnitDirectory, UnitId,
};

use crate::context::CommanderState;
use crate::hand;
use crate::weights::{Feature, WeightTable};

/// Multiplier applied once per own unit already standing in the
/// candidate's row.
const ROW_CROWDING: f64 = 0.6;

/// Why the hard feasibility filter rejected a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockReason {
    /// Another spawn is already queued at the slot.
    SlotQueued,
    /// The destination cell is reserved.
    CellReserved,
    /// A summoner's pattern has fewer free cells than its minimum.
    PatternTooTight,
}

/// Why an invocation committed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipCause {
    /// Called again within the minimum interval.
    RateLimited,
    /// No card in hand is affordable.
    NoPlayableCard,
    /// The commander's side has no empty slot.
    NoEmptySlot,
    /// Every scored candidate failed the feasibility filter.
    AllBlocked,
}

/// Result of one `maybe_act` invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EvalOutcome {
    Committed { unit: UnitId, slot: Slot, score: f64 },
    Skipped(SkipCause),
}

/// One scored (card, slot) pair. Ephemeral; never persisted beyond the
/// evaluation call.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateEvaluation {
    pub unit: UnitId,
    pub cost: i32,
    pub slot: Slot,
    pub features: [f64; Feature::COUNT],
    pub score: f64,
}

/// The opposing-side move evaluator.
pub struct MoveEvaluator {
    weights: WeightTable,
    rng: StdRng,
    min_interval: Duration,
    last_eval: Option<Instant>,
}

impl MoveEvaluator {
    pub fn new(weights: WeightTable, seed: u64) -> Self {
        Self {
            weights,
            rng: StdRng::seed_from_u64(seed),
            min_interval: Duration::ZERO,
            last_eval: None,
        }
    }

    /// Minimum spacing between evaluations. Zero (the default) disables
    /// rate limiting, which is what tests want.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Considers one move and commits at most one queued spawn.
    pub fn maybe_act(
        &mut self,
        state: &mut BattleState,
        commander: &mut CommanderState,
        directory: &dyn UnitDirectory,
        trigger: &str,
    ) -> EvalOutcome {
        if self.min_interval > Duration::ZERO {
            if let Some(last) = self.last_eval {
                if last.elapsed() < self.min_interval {
                    return EvalOutcome::Skipped(SkipCause::RateLimited);
                }
            }
        }
        self.last_eval = Some(Instant::now());
        debug!(trigger, "evaluating commander move");

        if commander.affordable().next().is_none() {
            return EvalOutcome::Skipped(SkipCause::NoPlayableCard);
        }
        if empty_slots(state, commander).next().is_none() {
            return EvalOutcome::Skipped(SkipCause::NoEmptySlot);
        }

        let candidates = self.evaluate_candidates(state, commander, directory);
        for candidate in &candidates {
            match feasibility(state, commander, directory, candidate) {
                Some(reason) => {
                    debug!(unit = ?candidate.unit, slot = ?candidate.slot, ?reason, "candidate blocked");
                }
                None => {
                    commit(state, commander, directory, candidate, &mut self.rng);
                    debug!(
                        unit = ?candidate.unit,
                        slot = ?candidate.slot,
                        score = candidate.score,
                        "committed"
                    );
                    return EvalOutcome::Committed {
                        unit: candidate.unit,
                        slot: candidate.slot,
                        score: candidate.score,
                    };
                }
            }
        }
        EvalOutcome::Skipped(SkipCause::AllBlocked)
    }

    /// Scores every (affordable card, empty slot) pair and returns the
    /// ranked list, best first. Pure: repeated calls over identical state
    /// and weights produce identical rankings.
    pub fn evaluate_candidates(
        &self,
        state: &BattleState,
        commander: &CommanderState,
        directory: &dyn UnitDirectory,
    ) -> Vec<CandidateEvaluation> {
        let side = commander.side;
        let slots: Vec<Slot> = empty_slots(state, commander).collect();
        let has_casualty = has_casualty(state, commander);

        let mut out = Vec::new();
        for card in commander.affordable() {
            let Some(template) = directory.template(card.unit) else {
                debug!(unit = ?card.unit, "no template for held card, rejecting");
                continue;
            };
            for &slot in &slots {
                let cell = slot_to_cell(side, slot);

                let mut features = [0.0; Feature::COUNT];
                let enemy_distance = state
                    .living(side.opponent())
                    .map(|u| u.cell.manhattan(cell))
                    .min();
                features[Feature::Pressure as usize] = match enemy_distance {
                    Some(d) => 1.0 / (1.0 + f64::from(d)),
                    None => 0.5,
                };

                let row_threats = state
                    .living(side.opponent())
                    .filter(|u| u.cell.cy == cell.cy)
                    .count();
                features[Feature::Safety as usize] = 1.0 / (1.0 + row_threats as f64);

                let order_len = 2.0 * f64::from(lanefall_core::BattleConfig::SLOTS_PER_SIDE);
                let steps = state.scheduler.steps_until(TurnSlot { side, slot });
                features[Feature::Readiness as usize] = 1.0 - steps as f64 / order_len;

                if let Some(pattern) = &template.kit.summoner {
                    let free = pattern
                        .slots
                        .iter()
                        .filter(|s| !state.is_cell_reserved(slot_to_cell(side, **s)))
                        .count();
                    features[Feature::SummonRoom as usize] =
                        free as f64 / pattern.slots.len().max(1) as f64;
                }

                if template.kit.opening_cast && template.kit.ultimate.is_some() {
                    features[Feature::InstantUlt as usize] = 1.0;
                }
                if template.kit.defensive && slot.file() == 0 {
                    features[Feature::Defensive as usize] = 1.0;
                }
                if template.kit.revive && has_casualty {
                    features[Feature::Revive as usize] = 1.0;
                }

                let own_in_row = state
                    .living(side)
                    .filter(|u| u.cell.cy == cell.cy)
                    .count();
                let crowding = ROW_CROWDING.powi(own_in_row as i32);
                let bias = class_bias(template.class, slot);

                let score = self.weights.combine(&features) * crowding * bias;
                debug!(unit = ?card.unit, ?slot, score, "candidate scored");
                out.push(CandidateEvaluation {
                    unit: card.unit,
                    cost: card.cost,
                    slot,
                    features,
                    score,
                });
            }
        }

        out.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.slot.cmp(&b.slot))
                .then(a.unit.cmp(&b.unit))
        });
        out
    }
}

/// Front/back positional preference per class.
fn class_bias(class: UnitClass, slot: Slot) -> f64 {
    match class {
        UnitClass::Vanguard => {
            if slot.file() == 0 {
                1.2
            } else {
                0.9
            }
        }
        UnitClass::Caster | UnitClass::Support => {
            if slot.file() == 2 {
                1.2
            } else {
                0.9
            }
        }
        UnitClass::Striker => 1.0,
    }
}

fn empty_slots<'a>(
    state: &'a BattleState,
    commander: &CommanderState,
) -> impl Iterator<Item = Slot> + 'a {
    let side = commander.side;
    Slot::all().filter(move |s| state.unit_at_slot(side, *s).is_none())
}

/// A played unit with no living or queued presence left on the board.
fn has_casualty(state: &BattleState, commander: &CommanderState) -> bool {
    commander.played.iter().any(|unit| {
        let living = state.living(commander.side).any(|u| u.unit == *unit);
        let queued = state
            .queued
            .get(commander.side)
            .values()
            .any(|r| r.unit == *unit);
        !living && !queued
    })
}

/// Hard feasibility filter applied at commit time.
fn feasibility(
    state: &BattleState,
    commander: &CommanderState,
    directory: &dyn UnitDirectory,
    candidate: &CandidateEvaluation,
) -> Option<BlockReason> {
    let side = commander.side;
    if state.queued.get(side).contains_key(&candidate.slot) {
        return Some(BlockReason::SlotQueued);
    }
    let cell = slot_to_cell(side, candidate.slot);
    if state.is_cell_reserved(cell) {
        return Some(BlockReason::CellReserved);
    }
    if let Some(pattern) = directory
        .template(candidate.unit)
        .and_then(|t| t.kit.summoner.as_ref())
    {
        let free = pattern
            .slots
            .iter()
            .filter(|s| {
                **s != candidate.slot && !state.is_cell_reserved(slot_to_cell(side, **s))
            })
            .count();
        if free < usize::from(pattern.min_free) {
            return Some(BlockReason::PatternTooTight);
        }
    }
    None
}

/// The atomic commit: spend fury, reserve the cell via the queued map,
/// retire the card, refill the hand.
fn commit(
    state: &mut BattleState,
    commander: &mut CommanderState,
    directory: &dyn UnitDirectory,
    candidate: &CandidateEvaluation,
    rng: &mut StdRng,
) {
    let side = commander.side;
    commander.fury -= candidate.cost;
    state.queued.get_mut(side).insert(
        candidate.slot,
        QueuedSummonRequest {
            unit: candidate.unit,
            side,
            slot: candidate.slot,
            cell: slot_to_cell(side, candidate.slot),
            spawn_cycle: state.scheduler.cycle(),
            origin: SpawnOrigin::Deck,
        },
    );
    if let Some(idx) = commander.hand.iter().position(|c| c.unit == candidate.unit) {
        commander.hand.remove(idx);
    }
    commander.played.insert(candidate.unit);
    hand::refill(commander, directory, rng);
}
