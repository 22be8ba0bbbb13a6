//! State owned by the opposing-side commander.
//!
//! The evaluator reads battle state from `lanefall-core` but owns nothing
//! there; the commander's fury pool, hand, played set, and draw pool live
//! here. The deck/gacha surface that fills the pool is a host concern.

use std::collections::BTreeSet;

use lanefall_core::{Side, UnitId};

/// One playable card in the commander's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandCard {
    pub unit: UnitId,
    /// Fury cost to queue the unit.
    pub cost: i32,
}

/// The AI commander's private state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommanderState {
    pub side: Side,
    /// Fury pool the commander spends to queue units. Independent of any
    /// unit's pool.
    pub fury: i32,
    pub hand: Vec<HandCard>,
    /// Units already committed to the board this battle.
    pub played: BTreeSet<UnitId>,
    /// Units available to draw from. Ordering is the host's; draws index
    /// into the unused remainder.
    pub pool: Vec<UnitId>,
    pub hand_size: usize,
}

impl CommanderState {
    pub fn new(side: Side, pool: Vec<UnitId>, hand_size: usize) -> Self {
        Self {
            side,
            fury: 0,
            hand: Vec::new(),
            played: BTreeSet::new(),
            pool,
            hand_size,
        }
    }

    /// Cards the commander can currently pay for, in hand order.
    pub fn affordable(&self) -> impl Iterator<Item = &HandCard> {
        self.hand.iter().filter(move |c| c.cost <= self.fury)
    }

    /// Units neither played nor currently held.
    pub fn unused(&self) -> Vec<UnitId> {
        let held: BTreeSet<UnitId> = self.hand.iter().map(|c| c.unit).collect();
        self.pool
            .iter()
            .copied()
            .filter(|u| !self.played.contains(u) && !held.contains(u))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordable_filters_by_fury() {
        let mut cmd = CommanderState::new(Side::Enemy, vec![], 3);
        cmd.hand = vec![
            HandCard { unit: UnitId(1), cost: 10 },
            HandCard { unit: UnitId(2), cost: 40 },
        ];
        cmd.fury = 20;
        let ids: Vec<UnitId> = cmd.affordable().map(|c| c.unit).collect();
        assert_eq!(ids, vec![UnitId(1)]);
    }

    #[test]
    fn unused_excludes_played_and_held() {
        let mut cmd = CommanderState::new(
            Side::Enemy,
            vec![UnitId(1), UnitId(2), UnitId(3)],
            3,
        );
        cmd.hand = vec![HandCard { unit: UnitId(1), cost: 10 }];
        cmd.played.insert(UnitId(2));
        assert_eq!(cmd.unused(), vec![UnitId(3)]);
    }
}
