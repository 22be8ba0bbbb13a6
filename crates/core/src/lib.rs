//! Deterministic battle-resolution engine.
//!
//! `lanefall-core` implements turn-based tactical battles between two
//! rosters on a fixed 3x6 grid: the turn scheduler, per-unit action
//! resolution, the damage/status pipeline, and the mid-turn immediate
//! summon chain. All state mutation flows through [`engine::BattleEngine`];
//! everything host-specific (unit content, fury economy, passives,
//! presentation, events) arrives through the traits in [`env`].
//!
//! The crate is single-threaded and synchronous: exactly one unit's action
//! resolves per `step_turn` call, and every mutation it causes completes
//! before the call returns.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod state;

pub use combat::{heal, pick_target, resolve_damage, resolve_target, CombatError, DamageReport};
pub use config::BattleConfig;
pub use engine::{
    do_action_or_skip, enqueue_immediate, process_action_chain, ActionOutcome, BattleEngine,
    ChainError, SkipReason, UltimateError,
};
pub use env::{
    BattleEnv, BattleEvent, DeathCause, EventSink, FuryEconomy, FuryEvent, FuryEventKind,
    KitError, NullPassives, NullPresentation, NullSink, PassiveCtx, PassiveDispatcher,
    PassiveEvent, Presentation, RecordingSink, StandardFury, StaticDirectory, SummonPattern,
    UltimateEffect, UltimateSpec, UnitClass, UnitDirectory, UnitKit, UnitTemplate,
};
pub use state::{
    cell_to_slot, slot_to_cell, ActionChainEntry, BattleState, Cell, DamageMods, DamageSchool,
    InstanceId, PerSide, QueuedSummonRequest, SchedulerState, Side, Slot, SpawnOrigin,
    StatusEffect, StatusId, StatusKind, StatusList, StatusTag, TurnEndTick, TurnSlot, UnitId,
    UnitStats, UnitToken,
};
