//! The Wood Simulation Core
//!
//! ECS-симуляция hostile AI на Bevy 0.16 (strategic layer)
//!
//! Движок (рендер, navmesh, анимации) — внешние коллабораторы:
//! - path planning приходит через `PathPlanner` (обязательный аргумент плагина)
//! - анимации получают `AnimationCommand` и возвращают `AttackImpact`
//! - headless stand-ins для тестов и CLI — в `headless`

use std::time::Duration;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// Публичные модули
pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod creatures;
pub mod headless;
pub mod item_system;
pub mod logger;
pub mod player;
pub mod schedules;

// Re-export базовых компонентов для удобства
pub use ai::{AIPlugin, HostileConfig, NavigationService, OpenGround, PathPlanner, PathStatus, Pursuit, PursuitState};
pub use animation::{AnimState, AnimationCommand, AttackImpact};
pub use combat::{
    AttackTimer, CharacterStats, CombatPlugin, DamageDealt, DamageRequest, EnemyDied, EntityDied, StatProvider,
};
pub use components::*;
pub use creatures::{
    CreatureKind, CreaturePlugin, CreatureProfile, Hostile, HostileSpawn, RespawnRequested, SpawnError, Spawner,
    SpawnerLink,
};
pub use headless::HeadlessPlugin;
pub use item_system::{DropTable, ItemCatalog, ItemId, LootDrop, LootDropRequested, PickupItem};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use player::{Player, PlayerBundle};
pub use schedules::{SimulationSet, TimerHandle, TimerQueue};

/// Simulation-wide settings
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed tick rate (Hz)
    pub tick_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    config: SimulationConfig,
    navigation: NavigationService,
}

impl SimulationPlugin {
    pub fn new(planner: impl PathPlanner) -> Self {
        Self {
            config: SimulationConfig::default(),
            navigation: NavigationService::new(planner),
        }
    }

    pub fn with_service(navigation: NavigationService) -> Self {
        Self {
            config: SimulationConfig::default(),
            navigation,
        }
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        SimulationSet::configure(app);

        app
            // Fixed timestep (по умолчанию 60Hz)
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            // Детерминистичный RNG (seed из конфига)
            .insert_resource(DeterministicRng::new(self.config.seed))
            .insert_resource(self.config)
            // Animation channel contract
            .add_event::<AnimationCommand>()
            .add_event::<AttackImpact>()
            // Loot
            .add_event::<LootDropRequested>()
            .init_resource::<ItemCatalog>()
            .add_systems(
                FixedUpdate,
                item_system::spawn_loot_pickups.in_set(SimulationSet::Aftermath),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((
                CombatPlugin,
                AIPlugin::with_service(self.navigation.clone()),
                CreaturePlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` продвигает ровно один fixed tick
/// (кроме самого первого update — у него delta 0).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let tick = SimulationConfig::default().tick();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(tick));

    app
}

/// Headless app с полной hostile симуляцией и headless коллабораторами
pub fn create_simulation_app(seed: u64, planner: impl PathPlanner) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins((
        SimulationPlugin::new(planner).with_config(SimulationConfig {
            seed,
            ..default()
        }),
        HeadlessPlugin,
    ));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
