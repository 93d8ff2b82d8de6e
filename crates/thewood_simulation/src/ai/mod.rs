//! Hostile AI: perception, navigability, obstacle resolution, pursuit FSM
//!
//! Каждый fixed tick агент заново смотрит вокруг (SpatialIndex), проверяет
//! путь до primary target через `NavigationService`, при закрытом пути ищет
//! obstacle linecast'ом и решает, куда двигаться и атаковать ли.
//! Update (variable rate) только сглаживает разворот.

use bevy::prelude::*;
use crate::schedules::SimulationSet;

pub mod components;
pub mod navigation;
pub mod obstacles;
pub mod perception;
pub mod systems;

// Re-export основных типов
pub use components::{approach_point, look_rotation, HostileConfig, Pursuit, PursuitState, APPROACH_FRACTION};
pub use navigation::{NavigationService, OpenGround, PathPlanner, PathStatus};
pub use obstacles::find_obstacle;
pub use perception::{scan, PerceivedBody, SpatialIndex};

/// AI Plugin
///
/// Path planner — обязательный аргумент: без него агент не может жить.
///
/// FixedUpdate:
/// 1. rebuild_spatial_index (Perception)
/// 2. hunt (Decision)
///
/// Update:
/// - smooth_facing
pub struct AIPlugin {
    navigation: NavigationService,
}

impl AIPlugin {
    pub fn new(planner: impl PathPlanner) -> Self {
        Self {
            navigation: NavigationService::new(planner),
        }
    }

    pub fn with_service(navigation: NavigationService) -> Self {
        Self { navigation }
    }
}

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.navigation.clone())
            .init_resource::<SpatialIndex>();

        app.add_systems(
            FixedUpdate,
            (
                perception::rebuild_spatial_index.in_set(SimulationSet::Perception),
                systems::hunt.in_set(SimulationSet::Decision),
            ),
        );

        app.add_systems(Update, systems::smooth_facing);
    }
}
