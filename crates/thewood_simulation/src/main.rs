//! Headless симуляция The Wood
//!
//! Волчий spawner, игрок и стена между ними. Полный путь до игрока закрыт,
//! пока стоит стена: волк её ломает, потом идёт на игрока.

use bevy::prelude::*;
use thewood_simulation::creatures::DEFAULT_RESPAWN_DELAY;
use thewood_simulation::{
    create_simulation_app, log_error, log_info, set_log_level, CreatureKind, EnemyDied, Health, LogLevel,
    PathStatus, PickupItem, PlayerBundle, Pursuit, Spawner, Structure, StructureBundle,
};

const WALL_X: f32 = 4.0;

fn main() {
    let seed = 42;
    set_log_level(LogLevel::Info);

    // Путь через x = WALL_X открыт, только если стены больше нет
    let wall_standing = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
    let planner_flag = wall_standing.clone();
    let planner = move |from: Vec3, to: Vec3| {
        let crosses_wall = (from.x - WALL_X).signum() != (to.x - WALL_X).signum();
        if crosses_wall && planner_flag.load(std::sync::atomic::Ordering::Relaxed) {
            PathStatus::Partial
        } else {
            PathStatus::Complete
        }
    };

    let mut app = create_simulation_app(seed, planner);
    log_info(&format!("Starting The Wood headless simulation (seed: {})", seed));

    let spawner = match Spawner::new(CreatureKind::Wolf.profile(), DEFAULT_RESPAWN_DELAY) {
        Ok(spawner) => spawner,
        Err(err) => {
            log_error(&format!("Invalid spawner: {}", err));
            return;
        }
    };

    let world = app.world_mut();
    world.spawn((spawner, Transform::from_xyz(0.0, 0.0, 0.0)));
    world.spawn(PlayerBundle::new(Vec3::new(10.0, 0.0, 0.0)));
    world.spawn(StructureBundle::new("Fence", Vec3::new(WALL_X, 0.0, 0.0), 1.0, 30).with_salvage(["log".into()]));

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        let world = app.world_mut();
        let fence_alive = world.query_filtered::<(), With<Structure>>().iter(world).next().is_some();
        wall_standing.store(fence_alive, std::sync::atomic::Ordering::Relaxed);

        if tick % 100 == 0 {
            let wolves: Vec<String> = world
                .query::<(Entity, &Pursuit, &Health)>()
                .iter(world)
                .map(|(entity, pursuit, health)| {
                    format!("{:?} {:?} hp {}/{}", entity, pursuit.state, health.current, health.max)
                })
                .collect();
            let pickups = world.query::<&PickupItem>().iter(world).count();
            log_info(&format!(
                "Tick {}: {} entities, wolves [{}], pickups {}",
                tick,
                world.entities().len(),
                wolves.join(", "),
                pickups
            ));
        }
    }

    let deaths = app.world().resource::<Events<EnemyDied>>().len();
    log_info(&format!("Simulation complete! ({} recent enemy deaths)", deaths));
}
