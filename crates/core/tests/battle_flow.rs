use lanefall_core::{
    slot_to_cell, BattleConfig, BattleEngine, BattleEnv, BattleEvent, BattleState, DeathCause,
    NullPassives, NullPresentation, RecordingSink, SchedulerState, Side, Slot, StandardFury,
    StaticDirectory, StatusEffect, StatusId, SummonPattern, UltimateEffect, UltimateSpec,
    UnitClass, UnitDirectory, UnitId, UnitKit, UnitStats, UnitTemplate, UnitToken,
};

const STRIKER: UnitId = UnitId(1);
const CONJURER: UnitId = UnitId(3);
const SPRITE: UnitId = UnitId(4);

struct Host {
    directory: StaticDirectory,
    fury: StandardFury,
    passives: NullPassives,
    fx: NullPresentation,
    events: RecordingSink,
}

impl Host {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self {
            directory: StaticDirectory::from_templates(templates()).unwrap(),
            fury: StandardFury,
            passives: NullPassives,
            fx: NullPresentation,
            events: RecordingSink::default(),
        }
    }

    fn env(&mut self) -> BattleEnv<'_> {
        BattleEnv {
            directory: &self.directory,
            fury: &mut self.fury,
            passives: &mut self.passives,
            fx: &mut self.fx,
            events: &mut self.events,
        }
    }
}

fn templates() -> Vec<UnitTemplate> {
    let striker = UnitTemplate {
        id: STRIKER,
        name: "striker".into(),
        class: UnitClass::Striker,
        rank: 1,
        is_leader: false,
        stats: UnitStats::default(),
        kit: UnitKit::default(),
    };
    let sprite = UnitTemplate {
        id: SPRITE,
        name: "sprite".into(),
        class: UnitClass::Striker,
        rank: 1,
        is_leader: false,
        stats: UnitStats::default(),
        kit: UnitKit::default(),
    };
    let conjurer = UnitTemplate {
        id: CONJURER,
        name: "conjurer".into(),
        class: UnitClass::Caster,
        rank: 2,
        is_leader: false,
        stats: UnitStats::default(),
        kit: UnitKit {
            ultimate: Some(UltimateSpec {
                cost: 50,
                effect: UltimateEffect::SummonImmediate { unit: SPRITE },
            }),
            summoner: Some(SummonPattern {
                slots: vec![Slot(1), Slot(2)],
                min_free: 1,
            }),
            ..UnitKit::default()
        },
    };
    vec![striker, sprite, conjurer]
}

fn place(state: &mut BattleState, host: &Host, unit: UnitId, side: Side, slot: Slot) -> lanefall_core::InstanceId {
    let stats = host.directory.template(unit).unwrap().stats;
    let iid = state.allocate_iid();
    let mut tok = UnitToken::new(unit, iid, side, slot_to_cell(side, slot), stats);
    tok.fresh_summon = false;
    state.units.push(tok);
    iid
}

#[test]
fn immediate_summon_spawns_and_acts_within_the_same_step() {
    let mut host = Host::new();
    let mut state = BattleState::new(SchedulerState::sequential_default());
    let caster = place(&mut state, &host, CONJURER, Side::Ally, Slot(0));
    let victim = place(&mut state, &host, STRIKER, Side::Enemy, Slot(0));
    state.unit_mut(caster).unwrap().fury = 100;

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());

    // The sprite took its action inside the caster's step: spawn event first,
    // then its own action, and the victim was hit once by it.
    let spawn_idx = host
        .events
        .events
        .iter()
        .position(|e| matches!(e, BattleEvent::UnitSpawned { .. }))
        .expect("sprite spawned");
    let sprite_iid = match host.events.events[spawn_idx] {
        BattleEvent::UnitSpawned { unit, .. } => unit,
        _ => unreachable!(),
    };
    assert!(host.events.events[spawn_idx..]
        .iter()
        .any(|e| matches!(e, BattleEvent::ActionStarted { unit } if *unit == sprite_iid)));

    assert_eq!(engine.state().unit(victim).unwrap().hp, 90);
    assert_eq!(engine.state().unit(caster).unwrap().fury, 50, "cost spent");

    let sprite = engine.state().unit(sprite_iid).unwrap();
    assert!(sprite.is_minion);
    assert_eq!(sprite.owner, Some(caster));
    // The acting side's TTL tick already ran once this step.
    assert_eq!(sprite.ttl_turns, Some(1));
}

#[test]
fn minion_ttl_expiry_publishes_a_death() {
    let mut host = Host::new();
    let mut state = BattleState::new(SchedulerState::sequential_default());
    let caster = place(&mut state, &host, CONJURER, Side::Ally, Slot(0));
    let victim = place(&mut state, &host, STRIKER, Side::Enemy, Slot(0));
    state.unit_mut(caster).unwrap().fury = 100;

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());
    // Sprite occupies ally slot 1; its own turn is next, after which its
    // TTL reaches zero.
    engine.step_turn(&mut host.env());

    assert_eq!(engine.state().living(Side::Ally).count(), 1);
    assert!(host
        .events
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::UnitDied { cause: DeathCause::TtlExpired, .. })));
    // Two sprite hits landed: one from the chain step, one from its own turn.
    assert_eq!(engine.state().unit(victim).unwrap().hp, 80);
}

#[test]
fn stunned_unit_skips_without_consuming_and_ttl_tick_is_withheld() {
    let mut host = Host::new();
    let mut state = BattleState::new(SchedulerState::sequential_default());
    let actor = place(&mut state, &host, STRIKER, Side::Ally, Slot(0));
    let minion = place(&mut state, &host, STRIKER, Side::Ally, Slot(3));
    let victim = place(&mut state, &host, STRIKER, Side::Enemy, Slot(0));
    state.unit_mut(actor).unwrap().statuses.upsert(StatusEffect::stun(2));
    {
        let tok = state.unit_mut(minion).unwrap();
        tok.is_minion = true;
        tok.ttl_turns = Some(1);
    }

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());

    assert_eq!(engine.state().unit(victim).unwrap().hp, 100, "no attack ran");
    assert!(host
        .events
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::TurnEnded { consumed: false, .. })));
    let minion_tok = engine.state().unit(minion).unwrap();
    assert!(minion_tok.is_alive(), "TTL tick suppressed for the side");
    assert_eq!(minion_tok.ttl_turns, Some(1));
    // The stun still ticked down at the bearer's turn end.
    assert_eq!(
        engine.state().unit(actor).unwrap().statuses.get(StatusId::Stun).unwrap().dur,
        Some(1)
    );
}

#[test]
fn failed_ultimate_zeroes_fury_and_still_consumes_the_turn() {
    let mut host = Host::new();
    let mut state = BattleState::new(SchedulerState::sequential_default());
    let caster = place(&mut state, &host, CONJURER, Side::Ally, Slot(0));
    for slot in 1..9 {
        place(&mut state, &host, STRIKER, Side::Ally, Slot(slot));
    }
    place(&mut state, &host, STRIKER, Side::Enemy, Slot(0));
    state.unit_mut(caster).unwrap().fury = 100;

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());

    // No free slot for the summon: the cast fails, fury is forced to zero
    // so the unit cannot retry immediately, and the step is consumed.
    assert_eq!(engine.state().unit(caster).unwrap().fury, 0);
    assert!(host
        .events
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::TurnEnded { consumed: true, .. })));
    assert_eq!(engine.state().living(Side::Ally).count(), 9, "no summon");
}

#[test]
fn bleed_resolves_at_the_bearers_own_turn_end() {
    let mut host = Host::new();
    let mut state = BattleState::new(SchedulerState::sequential_default());
    let bleeder = place(&mut state, &host, STRIKER, Side::Ally, Slot(0));
    let victim = place(&mut state, &host, STRIKER, Side::Enemy, Slot(0));
    state.unit_mut(bleeder).unwrap().statuses.upsert(StatusEffect::bleed(2, 0.05));

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());

    let tok = engine.state().unit(bleeder).unwrap();
    assert_eq!(tok.hp, 95, "round(100 * 0.05) lost at own turn end");
    assert_eq!(tok.statuses.get(StatusId::Bleed).unwrap().dur, Some(1));
    assert_eq!(engine.state().unit(victim).unwrap().hp, 90, "still acted");
}

#[test]
fn battle_end_is_published_when_one_side_loses_presence() {
    let mut host = Host::new();
    let mut state = BattleState::new(SchedulerState::sequential_default());
    place(&mut state, &host, STRIKER, Side::Ally, Slot(0));
    let victim = place(&mut state, &host, STRIKER, Side::Enemy, Slot(0));
    state.unit_mut(victim).unwrap().hp = 5;

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());

    assert_eq!(engine.battle_over(), Some(Side::Ally));
    assert!(host
        .events
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::BattleEnded { winner: Side::Ally })));
    assert!(host
        .events
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::UnitDied { cause: DeathCause::Combat, .. })));
}
