//! Creature profiles + hostile spawn builder
//!
//! Вместо иерархии "damageable → hostile → wolf" — композиция: Health +
//! OnDeath::Hostile + Pursuit, а тип существа отличается только данными
//! (`CreatureProfile`: статы, xp, drop table).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::ai::{HostileConfig, Pursuit};
use crate::combat::CharacterStats;
use crate::components::{Health, NavigationAgent, OnDeath, SpatialBody, LAYER_HOSTILES};
use crate::item_system::{DropTable, LootDrop};

pub mod spawner;

pub use spawner::{RespawnRequested, RespawnTick, Spawner, SpawnerLink, DEFAULT_RESPAWN_DELAY};

/// Hostile identity: creature type id + награда за убийство.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Hostile {
    pub id: u32,
    pub experience_reward: u32,
}

fn default_detection_radius() -> f32 {
    crate::ai::components::DEFAULT_DETECTION_RADIUS
}

fn default_stopping_distance() -> f32 {
    NavigationAgent::default().stopping_distance
}

fn default_speed() -> f32 {
    NavigationAgent::default().speed
}

fn default_body_radius() -> f32 {
    0.5
}

/// Data description of a creature type (грузится из JSON или берётся из `CreatureKind`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub id: u32,
    pub name: String,
    pub max_health: u32,
    /// Stat block. Обязателен: без него агенту нечем бить.
    #[serde(default)]
    pub stats: Option<CharacterStats>,
    pub experience_reward: u32,
    #[serde(default)]
    pub drop_table: DropTable,
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_body_radius")]
    pub body_radius: f32,
}

/// Built-in creature types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Wolf,
}

impl CreatureKind {
    pub fn profile(&self) -> CreatureProfile {
        match self {
            CreatureKind::Wolf => CreatureProfile {
                id: 0,
                name: "Wolf".to_string(),
                max_health: 100,
                stats: Some(CharacterStats::new(12, 10)),
                experience_reward: 60,
                drop_table: DropTable::new(vec![
                    LootDrop::new("torch", 2),
                    LootDrop::new("potion_log", 90),
                ]),
                detection_radius: default_detection_radius(),
                stopping_distance: default_stopping_distance(),
                speed: default_speed(),
                body_radius: default_body_radius(),
            },
        }
    }
}

/// Ошибки сборки hostile агента (fail fast на конструировании)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpawnError {
    #[error("creature '{name}' has no stat block")]
    MissingStats { name: String },

    #[error("creature '{name}' has zero max health")]
    ZeroMaxHealth { name: String },

    #[error("creature '{name}' detection radius must be positive, got {radius}")]
    InvalidDetectionRadius { name: String, radius: f32 },

    #[error("creature '{name}' stopping distance must be non-negative, got {distance}")]
    InvalidStoppingDistance { name: String, distance: f32 },
}

/// Everything a hostile agent is made of.
#[derive(Bundle)]
pub struct HostileBundle {
    pub name: Name,
    pub hostile: Hostile,
    pub health: Health,
    pub on_death: OnDeath,
    pub stats: CharacterStats,
    pub drop_table: DropTable,
    pub config: HostileConfig,
    pub agent: NavigationAgent,
    pub body: SpatialBody,
    pub pursuit: Pursuit,
    pub transform: Transform,
}

/// Builder for one hostile agent.
///
/// ```ignore
/// let wolf = HostileSpawn::from_profile(CreatureKind::Wolf.profile())
///     .at(Vec3::new(5.0, 0.0, 0.0))
///     .spawn(&mut commands)?;
/// ```
#[derive(Debug, Clone)]
pub struct HostileSpawn {
    profile: CreatureProfile,
    position: Vec3,
    config: HostileConfig,
    spawner: Option<Entity>,
}

impl HostileSpawn {
    pub fn from_profile(profile: CreatureProfile) -> Self {
        let config = HostileConfig {
            detection_radius: profile.detection_radius,
            ..default()
        };

        Self {
            profile,
            position: Vec3::ZERO,
            config,
            spawner: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_config(mut self, config: HostileConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_detection_radius(mut self, radius: f32) -> Self {
        self.config.detection_radius = radius;
        self
    }

    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.profile.stopping_distance = distance;
        self
    }

    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.profile.max_health = max_health;
        self
    }

    pub fn with_stats(mut self, stats: CharacterStats) -> Self {
        self.profile.stats = Some(stats);
        self
    }

    pub fn with_drop_table(mut self, drop_table: DropTable) -> Self {
        self.profile.drop_table = drop_table;
        self
    }

    pub fn with_spawner(mut self, spawner: Entity) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Validate and assemble the components.
    pub fn build(self) -> Result<HostileBundle, SpawnError> {
        let profile = self.profile;

        let Some(stats) = profile.stats else {
            return Err(SpawnError::MissingStats { name: profile.name });
        };
        if profile.max_health == 0 {
            return Err(SpawnError::ZeroMaxHealth { name: profile.name });
        }
        if !(self.config.detection_radius > 0.0) {
            return Err(SpawnError::InvalidDetectionRadius {
                name: profile.name,
                radius: self.config.detection_radius,
            });
        }
        if !(profile.stopping_distance >= 0.0) {
            return Err(SpawnError::InvalidStoppingDistance {
                name: profile.name,
                distance: profile.stopping_distance,
            });
        }

        Ok(HostileBundle {
            name: Name::new(profile.name),
            hostile: Hostile {
                id: profile.id,
                experience_reward: profile.experience_reward,
            },
            health: Health::new(profile.max_health),
            on_death: OnDeath::Hostile,
            stats,
            drop_table: profile.drop_table,
            config: self.config,
            agent: NavigationAgent {
                speed: profile.speed,
                stopping_distance: profile.stopping_distance,
            },
            body: SpatialBody::new(LAYER_HOSTILES, profile.body_radius),
            pursuit: Pursuit::default(),
            transform: Transform::from_translation(self.position),
        })
    }

    /// Build and spawn. Spawner link добавляется, если задан.
    pub fn spawn(self, commands: &mut Commands) -> Result<Entity, SpawnError> {
        let spawner = self.spawner;
        let bundle = self.build()?;

        let mut entity = commands.spawn(bundle);
        if let Some(spawner) = spawner {
            entity.insert(SpawnerLink { spawner });
        }
        Ok(entity.id())
    }
}

/// Creature Plugin — spawners и respawn timers
pub struct CreaturePlugin;

impl Plugin for CreaturePlugin {
    fn build(&self, app: &mut App) {
        use crate::schedules::{SimulationSet, TimerQueue};

        app.add_event::<RespawnRequested>()
            .init_resource::<TimerQueue<RespawnTick>>();

        app.add_systems(
            FixedUpdate,
            (
                spawner::populate_spawners.in_set(SimulationSet::Perception).before(crate::ai::perception::rebuild_spatial_index),
                (spawner::schedule_respawns, spawner::fire_due_respawns)
                    .chain()
                    .in_set(SimulationSet::Aftermath),
            ),
        );
    }
}
