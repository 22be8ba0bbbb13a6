//! Damage and combat resolution: target selection plus the hit pipeline.

pub mod damage;
pub mod result;
pub mod target;

pub use damage::{heal, resolve_damage, CombatError};
pub use result::DamageReport;
pub use target::{pick_target, resolve_target};
