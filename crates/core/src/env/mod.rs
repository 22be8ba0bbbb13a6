//! Host-provided environment.
//!
//! The core stays pure by pushing every external concern behind a trait:
//! unit metadata, the fury economy, passives, presentation, and the event
//! stream. [`BattleEnv`] bundles one of each for the duration of a call
//! into the engine.

pub mod directory;
pub mod events;
pub mod fury;
pub mod fx;
pub mod passives;

pub use directory::{
    KitError, StaticDirectory, SummonPattern, UltimateEffect, UltimateSpec, UnitClass,
    UnitDirectory, UnitKit, UnitTemplate,
};
pub use events::{BattleEvent, DeathCause, EventSink, NullSink, RecordingSink};
pub use fury::{FuryEconomy, FuryEvent, FuryEventKind, StandardFury};
pub use fx::{NullPresentation, Presentation};
pub use passives::{NullPassives, PassiveCtx, PassiveDispatcher, PassiveEvent};

/// Borrowed bundle of every host-side dependency the engine needs.
pub struct BattleEnv<'a> {
    pub directory: &'a dyn UnitDirectory,
    pub fury: &'a mut dyn FuryEconomy,
    pub passives: &'a mut dyn PassiveDispatcher,
    pub fx: &'a mut dyn Presentation,
    pub events: &'a mut dyn EventSink,
}
