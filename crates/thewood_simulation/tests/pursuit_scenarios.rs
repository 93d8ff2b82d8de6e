//! Integration tests: pursuit FSM в headless App
//!
//! Каждый `app.update()` = один fixed tick (ManualDuration 1/60 s).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use thewood_simulation::ai::approach_point;
use thewood_simulation::combat::AttackTick;
use thewood_simulation::{
    create_simulation_app, AttackTimer, CreatureKind, DamageDealt, HostileSpawn, MovementCommand, OpenGround,
    PathStatus, PickupItem, PlayerBundle, Pursuit, PursuitState, SimulationSet, StructureBundle, TimerQueue,
};

/// Урон, записанный в FixedUpdate после всех фаз (время = Time<Fixed>::elapsed)
#[derive(Resource, Default)]
struct DamageLog {
    hits: Vec<(Duration, DamageDealt)>,
}

fn record_damage(mut log: ResMut<DamageLog>, mut dealt: EventReader<DamageDealt>, time: Res<Time<Fixed>>) {
    for event in dealt.read() {
        log.hits.push((time.elapsed(), *event));
    }
}

fn with_damage_log(mut app: App) -> App {
    app.init_resource::<DamageLog>()
        .add_systems(FixedUpdate, record_damage.after(SimulationSet::Aftermath));
    app
}

fn spawn_wolf(app: &mut App, position: Vec3) -> Entity {
    let bundle = HostileSpawn::from_profile(CreatureKind::Wolf.profile())
        .at(position)
        .build()
        .expect("wolf profile is valid");
    app.world_mut().spawn(bundle).id()
}

fn pursuit(app: &App, wolf: Entity) -> Pursuit {
    app.world().get::<Pursuit>(wolf).expect("wolf has Pursuit").clone()
}

fn movement(app: &App, wolf: Entity) -> MovementCommand {
    *app.world().get::<MovementCommand>(wolf).expect("wolf has MovementCommand")
}

fn position(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).expect("entity has Transform").translation
}

fn timer_active(app: &App, wolf: Entity) -> bool {
    app.world().get::<AttackTimer>(wolf).expect("wolf has AttackTimer").is_active()
}

fn fixed_now(app: &App) -> Duration {
    app.world().resource::<Time<Fixed>>().elapsed()
}

/// Planner, перекрываемый флагом (стена на пути)
fn gated_planner(blocked: Arc<AtomicBool>) -> impl Fn(Vec3, Vec3) -> PathStatus + Send + Sync + 'static {
    move |_from: Vec3, _to: Vec3| {
        if blocked.load(Ordering::Relaxed) {
            PathStatus::Partial
        } else {
            PathStatus::Complete
        }
    }
}

#[test]
fn test_target_beyond_radius_stays_idle() {
    let mut app = create_simulation_app(1, OpenGround);
    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    app.world_mut().spawn(PlayerBundle::new(Vec3::new(30.0, 0.0, 0.0)));

    for _ in 0..60 {
        app.update();

        let state = pursuit(&app, wolf);
        assert_eq!(state.state, PursuitState::Idle);
        assert!(state.primary_target.is_none());
        assert_eq!(movement(&app, wolf), MovementCommand::Idle);
        assert!(!timer_active(&app, wolf));
    }

    assert_eq!(position(&app, wolf), Vec3::ZERO);
    assert!(app.world().resource::<TimerQueue<AttackTick>>().is_empty());
}

#[test]
fn test_clear_path_chases_and_attacks() {
    let mut app = with_damage_log(create_simulation_app(2, OpenGround));
    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    let player = app.world_mut().spawn(PlayerBundle::new(Vec3::new(8.0, 0.0, 0.0))).id();
    let player_position = position(&app, player);

    let mut in_range_at = None;
    for _ in 0..400 {
        let before = position(&app, wolf);
        app.update();

        let state = pursuit(&app, wolf);
        if let MovementCommand::MoveToPosition { target } = movement(&app, wolf) {
            assert_eq!(state.state, PursuitState::Chasing);
            assert_eq!(state.primary_target, Some(player));
            // Nav target всегда на 90% вектора до цели
            let expected = approach_point(before, player_position);
            assert!((target - expected).length() < 1e-4, "target {:?} != {:?}", target, expected);
        }

        // Timer активен ровно в ATTACKING sub-state
        assert_eq!(timer_active(&app, wolf), state.attacking);

        if state.attacking && in_range_at.is_none() {
            in_range_at = Some(fixed_now(&app));
        }
    }

    let in_range_at = in_range_at.expect("wolf reached the player");
    let log = app.world().resource::<DamageLog>();
    let (first_hit_at, first_hit) = log.hits.first().copied().expect("wolf attacked");

    assert_eq!(first_hit.attacker, Some(wolf));
    assert_eq!(first_hit.target, player);
    assert_eq!(first_hit.damage, 12);

    let delay = first_hit_at - in_range_at;
    assert!(
        delay >= Duration::from_millis(100) && delay <= Duration::from_millis(1600),
        "first attack after {:?}",
        delay
    );

    // Повторные удары каждые 1.5s
    assert!(log.hits.len() >= 2);
    let interval = log.hits[1].0 - log.hits[0].0;
    assert!((interval.as_secs_f32() - 1.5).abs() < 0.02, "interval {:?}", interval);
}

#[test]
fn test_blocked_path_targets_obstacle_then_resumes_chase() {
    let blocked = Arc::new(AtomicBool::new(true));
    let mut app = create_simulation_app(3, gated_planner(blocked.clone()));

    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    let player = app.world_mut().spawn(PlayerBundle::new(Vec3::new(10.0, 0.0, 0.0))).id();
    let wall = app
        .world_mut()
        .spawn(StructureBundle::new("Wall", Vec3::new(5.0, 0.0, 0.0), 1.0, 1000))
        .id();
    let wall_position = position(&app, wall);

    for _ in 0..30 {
        let before = position(&app, wolf);
        app.update();

        let state = pursuit(&app, wolf);
        if state.is_idle() {
            continue; // первый update без fixed tick
        }

        assert_eq!(state.state, PursuitState::Blocked);
        assert_eq!(state.primary_target, Some(player));
        assert_eq!(state.obstacle, Some(wall));
        assert_eq!(state.current_target, Some(wall));

        let MovementCommand::MoveToPosition { target } = movement(&app, wolf) else {
            panic!("blocked wolf must move towards the obstacle");
        };
        assert!((target - approach_point(before, wall_position)).length() < 1e-4);
    }

    // Путь открылся — в следующем tick снова Chasing на игрока
    blocked.store(false, Ordering::Relaxed);
    app.world_mut().despawn(wall);
    app.update();

    let state = pursuit(&app, wolf);
    assert_eq!(state.state, PursuitState::Chasing);
    assert_eq!(state.obstacle, None);
    assert_eq!(state.current_target, Some(player));
}

#[test]
fn test_path_reopened_mid_attack_resumes_chase() {
    let blocked = Arc::new(AtomicBool::new(true));
    let mut app = create_simulation_app(4, gated_planner(blocked.clone()));

    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    let player = app.world_mut().spawn(PlayerBundle::new(Vec3::new(12.0, 0.0, 0.0))).id();
    app.world_mut()
        .spawn(StructureBundle::new("Wall", Vec3::new(3.0, 0.0, 0.0), 1.0, 1000));

    // Ждём, пока волк начнёт бить стену
    for _ in 0..300 {
        app.update();
        if pursuit(&app, wolf).attacking {
            break;
        }
    }
    let state = pursuit(&app, wolf);
    assert_eq!(state.state, PursuitState::Blocked);
    assert!(state.attacking);

    blocked.store(false, Ordering::Relaxed);
    app.update();

    let state = pursuit(&app, wolf);
    assert_eq!(state.state, PursuitState::Chasing);
    assert_eq!(state.obstacle, None);
    assert_eq!(state.current_target, Some(player));
    // Игрок далеко: атаки прекращены
    assert!(!state.attacking);
    assert!(!timer_active(&app, wolf));
}

#[test]
fn test_demolished_obstacle_drops_salvage_and_chase_continues() {
    // Planner так и не откроет путь: после стены linecast пуст → Chasing
    let blocked = Arc::new(AtomicBool::new(true));
    let mut app = with_damage_log(create_simulation_app(5, gated_planner(blocked)));

    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    let player = app.world_mut().spawn(PlayerBundle::new(Vec3::new(10.0, 0.0, 0.0))).id();
    let fence = app
        .world_mut()
        .spawn(StructureBundle::new("Fence", Vec3::new(4.0, 0.0, 0.0), 1.0, 30).with_salvage(["log".into()]))
        .id();

    for _ in 0..600 {
        app.update();
        if app.world().get_entity(fence).is_err() {
            break;
        }
    }
    assert!(app.world().get_entity(fence).is_err(), "fence was demolished");

    // 30 hp / 12 dmg = 3 удара по забору
    let fence_hits = app
        .world()
        .resource::<DamageLog>()
        .hits
        .iter()
        .filter(|(_, hit)| hit.target == fence)
        .count();
    assert_eq!(fence_hits, 3);

    app.update();
    let state = pursuit(&app, wolf);
    assert_eq!(state.state, PursuitState::Chasing);
    assert_eq!(state.current_target, Some(player));

    let world = app.world_mut();
    let pickups: Vec<String> = world
        .query::<&PickupItem>()
        .iter(world)
        .map(|pickup| pickup.item.to_string())
        .collect();
    assert_eq!(pickups, vec!["log".to_string()]);
}

#[test]
fn test_target_leaving_radius_cancels_attacks() {
    let mut app = with_damage_log(create_simulation_app(6, OpenGround));
    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    let player = app.world_mut().spawn(PlayerBundle::new(Vec3::new(6.0, 0.0, 0.0))).id();

    for _ in 0..300 {
        app.update();
        if pursuit(&app, wolf).attacking {
            break;
        }
    }
    assert!(timer_active(&app, wolf));

    // Игрок убегает за радиус обнаружения
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = Vec3::new(100.0, 0.0, 0.0);
    }
    app.update();

    let state = pursuit(&app, wolf);
    assert_eq!(state.state, PursuitState::Idle);
    assert!(state.primary_target.is_none());
    assert!(!timer_active(&app, wolf));
    assert!(app.world().resource::<TimerQueue<AttackTick>>().is_empty());
    assert_eq!(movement(&app, wolf), MovementCommand::Idle);

    // Никаких CheckAttack после потери цели
    let hits_before = app.world().resource::<DamageLog>().hits.len();
    for _ in 0..200 {
        app.update();
    }
    assert_eq!(app.world().resource::<DamageLog>().hits.len(), hits_before);
}

#[test]
fn test_keeps_primary_target_while_detected() {
    let mut app = create_simulation_app(7, OpenGround);
    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    let far = app.world_mut().spawn(PlayerBundle::new(Vec3::new(9.0, 0.0, 0.0))).id();

    app.update();
    app.update();
    assert_eq!(pursuit(&app, wolf).primary_target, Some(far));

    // Новый кандидат ближе, но текущая цель всё ещё видна
    app.world_mut().spawn(PlayerBundle::new(Vec3::new(0.0, 0.0, -4.0)));
    app.update();
    assert_eq!(pursuit(&app, wolf).primary_target, Some(far));
}

#[test]
fn test_picks_nearest_candidate() {
    let mut app = create_simulation_app(8, OpenGround);
    let wolf = spawn_wolf(&mut app, Vec3::ZERO);
    app.world_mut().spawn(PlayerBundle::new(Vec3::new(12.0, 0.0, 0.0)));
    let near = app.world_mut().spawn(PlayerBundle::new(Vec3::new(0.0, 0.0, 5.0))).id();

    app.update();
    app.update();
    assert_eq!(pursuit(&app, wolf).primary_target, Some(near));
}
