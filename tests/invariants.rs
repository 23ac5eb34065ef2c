//! Arena invariants under random play

use glam::Vec2;
use proptest::prelude::*;

use crab_arena::consts::PLAYERS_LAYER;
use crab_arena::sim::{ArenaState, tick};
use crab_arena::{DamagePolicy, Settings};

const EPS: f32 = 1e-3;

fn drive() -> impl Strategy<Value = (Vec2, bool)> {
    (-1i8..=1, -1i8..=1, any::<bool>()).prop_map(|(x, y, brake)| (Vec2::new(x as f32, y as f32), brake))
}

fn body_start() -> impl Strategy<Value = (Vec2, Vec2)> {
    (0.0f32..800.0, 0.0f32..600.0, -300.0f32..300.0, -300.0f32..300.0)
        .prop_map(|(x, y, vx, vy)| (Vec2::new(x, y), Vec2::new(vx, vy)))
}

fn arena(starts: &[(Vec2, Vec2)], settings: Settings) -> ArenaState {
    let mut state = ArenaState::new(settings);
    for &(pos, vel) in starts {
        let id = state.spawn_body(pos, 25.0, [PLAYERS_LAYER]).unwrap();
        state.body_mut(id).unwrap().vel = vel;
    }
    state
}

fn check(state: &ArenaState) -> Result<(), TestCaseError> {
    let s = &state.settings;
    for body in &state.bodies {
        prop_assert!(body.vel.length() <= s.max_speed + EPS, "speed {}", body.vel.length());
        prop_assert!(body.pos.x >= body.radius && body.pos.x <= s.width - body.radius);
        prop_assert!(body.pos.y >= body.radius && body.pos.y <= s.height - body.radius);
        let h = body.health.value();
        prop_assert!((0.0..=1.0).contains(&h));

        for other in &body.overlaps {
            let other = state.body(*other).expect("overlap names a live body");
            prop_assert!(other.overlaps.contains(&body.id));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_speed_bounds_and_symmetry_hold(
        starts in prop::collection::vec(body_start(), 1..=4),
        inputs in prop::collection::vec(prop::collection::vec(drive(), 4), 1..60),
        elastic in any::<bool>(),
        dt in prop_oneof![Just(1.0f32 / 30.0), Just(1.0f32 / 60.0)],
    ) {
        let settings = Settings {
            elastic_walls: elastic,
            elastic_collisions: elastic,
            damage: DamagePolicy::None,
            ..Settings::default()
        };
        let mut state = arena(&starts, settings);

        for round in &inputs {
            let ids: Vec<_> = state.bodies.iter().map(|b| b.id).collect();
            for (id, &(accel, brake)) in ids.iter().zip(round) {
                state.set_acceleration_input(*id, accel).unwrap();
                state.set_braking(*id, brake).unwrap();
            }
            tick(&mut state, dt);
            check(&state)?;
        }
    }

    #[test]
    fn test_health_never_increases(
        starts in prop::collection::vec(body_start(), 2..=4),
        ticks in 1usize..120,
        amount in 0.0f32..0.5,
    ) {
        let settings = Settings {
            damage: DamagePolicy::PerCollision { amount },
            ..Settings::default()
        };
        let mut state = arena(&starts, settings);
        let mut last: Vec<(u32, f32)> = state.bodies.iter().map(|b| (b.id.0, b.health.value())).collect();

        for _ in 0..ticks {
            tick(&mut state, 1.0 / 60.0);
            check(&state)?;
            for body in &state.bodies {
                if let Some(&(_, before)) = last.iter().find(|(id, _)| *id == body.id.0) {
                    prop_assert!(body.health.value() <= before);
                }
            }
            last = state.bodies.iter().map(|b| (b.id.0, b.health.value())).collect();
        }
    }

    #[test]
    fn test_repeated_input_is_idempotent(x in -3.0f32..3.0, y in -3.0f32..3.0) {
        let mut once = ArenaState::with_players(Settings::default(), 1).unwrap();
        let mut twice = once.clone();
        let id = once.bodies[0].id;

        once.set_acceleration_input(id, Vec2::new(x, y)).unwrap();
        twice.set_acceleration_input(id, Vec2::new(x, y)).unwrap();
        twice.set_acceleration_input(id, Vec2::new(x, y)).unwrap();
        prop_assert_eq!(once.body(id).unwrap().accel_input, twice.body(id).unwrap().accel_input);

        tick(&mut once, 1.0 / 60.0);
        tick(&mut twice, 1.0 / 60.0);
        prop_assert_eq!(once.body(id).unwrap().vel, twice.body(id).unwrap().vel);
    }
}

#[test]
fn test_elastic_wall_keeps_speed() {
    let settings = Settings {
        damage: DamagePolicy::None,
        ..Settings::default()
    };
    let mut state = ArenaState::new(settings);
    let id = state.spawn_body(Vec2::new(770.0, 300.0), 25.0, [PLAYERS_LAYER]).unwrap();
    state.body_mut(id).unwrap().vel = Vec2::new(120.0, 0.0);

    for _ in 0..10 {
        tick(&mut state, 1.0 / 60.0);
    }
    let vel = state.body(id).unwrap().vel;
    assert!((vel.x + 120.0).abs() < 1e-3);
    assert_eq!(vel.y, 0.0);
}

#[test]
fn test_head_on_bodies_swap_velocities() {
    let settings = Settings {
        damage: DamagePolicy::None,
        ..Settings::default()
    };
    let mut state = ArenaState::new(settings);
    let a = state.spawn_body(Vec2::new(300.0, 300.0), 25.0, [PLAYERS_LAYER]).unwrap();
    let b = state.spawn_body(Vec2::new(400.0, 300.0), 25.0, [PLAYERS_LAYER]).unwrap();
    state.body_mut(a).unwrap().vel = Vec2::new(100.0, 0.0);
    state.body_mut(b).unwrap().vel = Vec2::new(-100.0, 0.0);

    // Closing at 200 px/s over a 50 px gap: contact after ~15 ticks
    let mut collided = false;
    for _ in 0..30 {
        tick(&mut state, 1.0 / 60.0);
        collided |= !state.drain_events().is_empty();
    }

    assert!(collided);
    assert!((state.body(a).unwrap().vel - Vec2::new(-100.0, 0.0)).length() < 1e-2);
    assert!((state.body(b).unwrap().vel - Vec2::new(100.0, 0.0)).length() < 1e-2);
}
