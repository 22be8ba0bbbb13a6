use lanefall_core::{
    slot_to_cell, BattleConfig, BattleEngine, BattleEnv, BattleEvent, BattleState, NullPassives,
    NullPresentation, QueuedSummonRequest, RecordingSink, SchedulerState, Side, Slot, SpawnOrigin,
    StandardFury, StaticDirectory, UnitDirectory, UnitId, UnitKit, UnitStats, UnitTemplate,
    UnitToken,
};

struct Host {
    directory: StaticDirectory,
    fury: StandardFury,
    passives: NullPassives,
    fx: NullPresentation,
    events: RecordingSink,
}

impl Host {
    fn new(templates: Vec<UnitTemplate>) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self {
            directory: StaticDirectory::from_templates(templates).unwrap(),
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

fn striker(id: u32) -> UnitTemplate {
    UnitTemplate {
        id: UnitId(id),
        name: format!("striker-{id}"),
        class: lanefall_core::UnitClass::Striker,
        rank: 1,
        is_leader: false,
        stats: UnitStats::default(),
        kit: UnitKit::default(),
    }
}

fn place(state: &mut BattleState, host: &Host, unit: UnitId, side: Side, slot: Slot) {
    let stats = host.directory.template(unit).unwrap().stats;
    let iid = state.allocate_iid();
    let mut tok = UnitToken::new(unit, iid, side, slot_to_cell(side, slot), stats);
    tok.fresh_summon = false;
    state.units.push(tok);
}

#[test]
fn full_pass_restores_cursor_and_bumps_cycle_once() {
    let mut host = Host::new(vec![striker(1)]);
    let mut state = BattleState::new(SchedulerState::sequential_default());
    for side in Side::BOTH {
        for slot in Slot::all() {
            place(&mut state, &host, UnitId(1), side, slot);
        }
    }

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    let start = engine.state().scheduler.peek();
    for _ in 0..18 {
        engine.step_turn(&mut host.env());
    }
    assert_eq!(engine.state().scheduler.cycle(), 1);
    assert_eq!(engine.state().scheduler.peek(), start);
}

#[test]
fn queued_spawn_waits_for_its_cycle_and_never_acts_on_the_spawn_step() {
    let mut host = Host::new(vec![striker(1)]);
    let mut state = BattleState::new(SchedulerState::sequential_default());
    place(&mut state, &host, UnitId(1), Side::Ally, Slot(0));

    let slot = Slot(4);
    let cell = slot_to_cell(Side::Enemy, slot);
    state.queued.get_mut(Side::Enemy).insert(
        slot,
        QueuedSummonRequest {
            unit: UnitId(1),
            side: Side::Enemy,
            slot,
            cell,
            spawn_cycle: 1,
            origin: SpawnOrigin::Deck,
        },
    );

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());

    // Entire cycle 0, plus cycle 1 up to (but not through) enemy slot 4.
    for _ in 0..18 + 13 {
        engine.step_turn(&mut host.env());
    }
    assert!(engine.state().queued.get(Side::Enemy).contains_key(&slot));
    assert_eq!(engine.state().living(Side::Enemy).count(), 0);

    let before = host.events.events.len();
    engine.step_turn(&mut host.env());

    let spawned = engine.state().living(Side::Enemy).next().unwrap();
    assert_eq!(spawned.cell, cell);
    assert_eq!(spawned.fury, spawned.stats.fury_max, "deck spawn enters full");
    assert!(engine.state().queued.get(Side::Enemy).is_empty());

    let step_events = &host.events.events[before..];
    assert!(step_events
        .iter()
        .any(|e| matches!(e, BattleEvent::UnitSpawned { .. })));
    assert!(
        !step_events
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionStarted { .. })),
        "spawn consumes the step by itself"
    );
    assert!(step_events
        .iter()
        .any(|e| matches!(e, BattleEvent::TurnEnded { consumed: true, .. })));
}

#[test]
fn empty_slot_is_a_virtual_pass_with_no_action_events() {
    let mut host = Host::new(vec![striker(1)]);
    let mut state = BattleState::new(SchedulerState::sequential_default());
    place(&mut state, &host, UnitId(1), Side::Ally, Slot(0));
    place(&mut state, &host, UnitId(1), Side::Enemy, Slot(0));

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    engine.step_turn(&mut host.env());

    // Ally slot 1 is empty.
    let before = host.events.events.len();
    engine.step_turn(&mut host.env());
    let step_events = &host.events.events[before..];
    assert!(!step_events
        .iter()
        .any(|e| matches!(e, BattleEvent::ActionStarted { .. })));
    assert!(step_events
        .iter()
        .any(|e| matches!(e, BattleEvent::TurnEnded { consumed: false, .. })));
}

#[test]
fn interleaved_strategy_alternates_sides_per_step() {
    let mut host = Host::new(vec![striker(1)]);
    let mut state = BattleState::new(SchedulerState::interleaved());
    place(&mut state, &host, UnitId(1), Side::Ally, Slot(0));
    place(&mut state, &host, UnitId(1), Side::Enemy, Slot(0));

    let mut engine = BattleEngine::new(&mut state, BattleConfig::default());
    assert_eq!(engine.state().scheduler.peek().side, Side::Ally);
    engine.step_turn(&mut host.env());
    assert_eq!(engine.state().scheduler.peek().side, Side::Enemy);
    engine.step_turn(&mut host.env());
    assert_eq!(engine.state().scheduler.peek().side, Side::Ally);
    assert_eq!(engine.state().scheduler.peek().slot, Slot(1));
}
