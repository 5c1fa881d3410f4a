use proptest::prelude::*;
use space_captcha::Tuning;
use space_captcha::sim::*;

#[derive(Debug, Clone)]
struct Frame {
    input: TickInput,
    dt: f32,
}

fn movement() -> impl Strategy<Value = MovementIntent> {
    prop_oneof![
        Just(MovementIntent::Idle),
        (-1.5f32..1.5).prop_map(|axis| MovementIntent::Axis { axis }),
        (-100.0f32..700.0).prop_map(|x| MovementIntent::Target { x }),
        (-100.0f32..700.0).prop_map(|x| MovementIntent::Seek { x }),
    ]
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        movement(),
        any::<bool>(),
        prop::bool::weighted(0.05),
        prop::bool::weighted(0.01),
        prop_oneof![Just(1.0f32 / 60.0), Just(1.0 / 30.0), 0.0f32..0.3],
    )
        .prop_map(|(movement, fire, start, quit, dt)| Frame {
            input: TickInput {
                movement,
                fire,
                start,
                quit,
            },
            dt,
        })
}

/// Busier than the defaults so collisions and life loss actually happen
fn busy_tuning() -> Tuning {
    Tuning {
        enemy_spawn_rate: 3.0,
        enemy_fire_rate: 2.0,
        aim_enemy_bullets: true,
        ..Tuning::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn invariants_hold_for_any_input(
        seed in any::<u64>(),
        frames in prop::collection::vec(frame(), 1..400),
    ) {
        let mut core = GameCore::new(busy_tuning(), seed);
        prop_assert!(core.validate_invariants().is_ok());

        for f in &frames {
            let before = core.snapshot();
            tick(&mut core, &f.input, f.dt);
            let events = core.drain_events();
            let after = core.snapshot();

            prop_assert!(after.lives <= 3);
            if let Err(e) = core.validate_invariants() {
                prop_assert!(false, "invariant violated: {}", e);
            }

            let restarted = events.iter().any(|e| *e == GameEvent::info("Game started"));
            if restarted {
                continue;
            }

            // Counters only move forward within a round
            prop_assert!(after.score >= before.score);
            prop_assert!(after.enemies_killed >= before.enemies_killed);
            prop_assert!(after.enemies_missed >= before.enemies_missed);
            prop_assert!(after.lives <= before.lives);

            // Score law: each kill event is exactly +10 and +1
            let kills = events.iter().filter(|e| e.kind() == EventKind::EnemyKilled).count() as u64;
            prop_assert_eq!(after.score - before.score, 10 * kills);
            prop_assert_eq!(u64::from(after.enemies_killed - before.enemies_killed), kills);

            let misses = events.iter().filter(|e| e.kind() == EventKind::EnemyMissed).count() as u32;
            prop_assert_eq!(after.enemies_missed - before.enemies_missed, misses);

            let lost = events.iter().filter(|e| e.kind() == EventKind::LifeLost).count() as u8;
            prop_assert_eq!(before.lives - after.lives, lost);
        }
    }

    #[test]
    fn game_end_reported_at_most_once_per_round(
        seed in any::<u64>(),
        frames in prop::collection::vec(frame(), 1..400),
    ) {
        let mut core = GameCore::new(busy_tuning(), seed);
        let mut ends_this_round = 0;

        for f in &frames {
            tick(&mut core, &f.input, f.dt);
            for event in core.drain_events() {
                if event == GameEvent::info("Game started") {
                    ends_this_round = 0;
                }
                if event.kind() == EventKind::GameEnd {
                    ends_this_round += 1;
                    prop_assert!(ends_this_round <= 1);
                }
            }
        }
    }

    #[test]
    fn player_stays_in_bounds(
        seed in any::<u64>(),
        frames in prop::collection::vec(frame(), 1..200),
    ) {
        let mut core = GameCore::new(Tuning::scripted(), seed);
        core.start();
        for f in &frames {
            tick(&mut core, &f.input, f.dt);
            if let Some(pos) = core.player_position() {
                prop_assert!((25.0..=525.0).contains(&pos.x), "player at {}", pos);
            }
        }
    }
}
