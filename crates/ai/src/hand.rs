//! Hand refill.
//!
//! The only randomized step in the evaluator: draws replace spent cards
//! with units from the pool that are neither played nor already held.

use lanefall_core::UnitDirectory;
use rand::rngs::StdRng;
use rand::Rng;

use crate::context::{CommanderState, HandCard};

/// Fury cost of a card, derived from the unit's rank.
pub fn card_cost(directory: &dyn UnitDirectory, unit: lanefall_core::UnitId) -> i32 {
    directory
        .template(unit)
        .map(|t| i32::from(t.rank) * 10)
        .unwrap_or(10)
}

/// Draws random unused units until the hand is full or the pool runs dry.
pub fn refill(
    commander: &mut CommanderState,
    directory: &dyn UnitDirectory,
    rng: &mut StdRng,
) {
    while commander.hand.len() < commander.hand_size {
        let unused = commander.unused();
        if unused.is_empty() {
            break;
        }
        let unit = unused[rng.gen_range(0..unused.len())];
        let cost = card_cost(directory, unit);
        commander.hand.push(HandCard { unit, cost });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanefall_core::{Side, StaticDirectory, UnitId};
    use rand::SeedableRng;

    #[test]
    fn refill_never_duplicates_held_or_played_units() {
        let directory = StaticDirectory::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut cmd = CommanderState::new(
            Side::Enemy,
            (1..=5).map(UnitId).collect(),
            3,
        );
        cmd.played.insert(UnitId(1));

        refill(&mut cmd, &directory, &mut rng);
        assert_eq!(cmd.hand.len(), 3);
        let mut seen = std::collections::BTreeSet::new();
        for card in &cmd.hand {
            assert_ne!(card.unit, UnitId(1));
            assert!(seen.insert(card.unit), "no duplicate draws");
        }
    }
}
