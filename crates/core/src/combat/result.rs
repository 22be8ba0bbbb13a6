//! Per-hit resolution reports.

/// What one resolved hit did, stage by stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    /// Base damage before multipliers, minimum 1.
    pub base: i32,
    /// Damage after output, mitigation, and incoming multipliers; the
    /// figure reflect/venom percentages are taken from.
    pub dealt: i32,
    /// Portion soaked by the target's shield charge.
    pub absorbed: i32,
    /// HP actually removed from the target (`absorbed + applied == dealt`).
    pub applied: i32,
    /// Damage bounced back onto the attacker.
    pub reflected: i32,
    /// Extra on-hit damage from the attacker's venom.
    pub venom: i32,
    /// The execute threshold zeroed the target's remaining HP.
    pub executed: bool,
    /// A cheat-death charge fired and pinned the target at 1 HP.
    pub cheated_death: bool,
    /// The target did not survive the hit.
    pub kill: bool,
}
