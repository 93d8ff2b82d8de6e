//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: damageable capability (Health, OnDeath, Salvage)
//! - movement: навигация и перемещение (MovementCommand, NavigationAgent, FacingGoal)
//! - world: пространственное присутствие (SpatialBody, layers)

pub mod actor;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use world::*;
