//! Opposing-side move evaluation for lanefall battles.
//!
//! `lanefall-ai` is a standalone consumer of `lanefall-core` state: it
//! reads the board, scores (card, slot) candidates on weighted feature
//! axes, and commits at most one queued spawn per invocation. The engine
//! never depends on it.
pub mod context;
pub mod evaluator;
pub mod hand;
pub mod weights;

pub use context::{CommanderState, HandCard};
pub use evaluator::{BlockReason, CandidateEvaluation, EvalOutcome, MoveEvaluator, SkipCause};
pub use weights::{Feature, WeightTable};
