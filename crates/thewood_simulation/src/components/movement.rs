//! Movement компоненты: команды перемещения, nav agent, разворот

use bevy::prelude::*;

/// Команда движения для актора (выполняется navigation agent'ом движка)
///
/// Архитектура:
/// - AI система пишет MovementCommand (high-level intent)
/// - Locomotion (движок или `headless::follow_movement_commands`) двигает Transform
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
}

impl MovementCommand {
    pub fn destination(&self) -> Option<Vec3> {
        match self {
            MovementCommand::Idle => None,
            MovementCommand::MoveToPosition { target } => Some(*target),
        }
    }
}

/// Nav agent parameters (скорость + stopping distance)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    /// Метры/сек
    pub speed: f32,
    /// Agent stops once this close to its destination
    pub stopping_distance: f32,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 2.0,
        }
    }
}

impl NavigationAgent {
    /// Path distance left to `destination`. Straight line: планировщик
    /// отвечает только на вопрос достижимости, путь не строим.
    pub fn remaining_distance(&self, position: Vec3, destination: Vec3) -> f32 {
        position.distance(destination)
    }
}

/// Look rotation the agent is turning towards.
///
/// Пишется в FixedUpdate (решение), применяется в Update через slerp (сглаживание).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FacingGoal {
    pub rotation: Option<Quat>,
}
