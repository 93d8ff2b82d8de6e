//! Pursuit FSM components (state, targets, per-agent config).

use bevy::prelude::*;
use crate::animation::AnimState;
use crate::combat::AttackTimer;
use crate::components::{FacingGoal, MovementCommand, MASK_HOSTILE_OBSTACLES, MASK_HOSTILE_PREY};

/// Nav destination = `self + (destination - self) * APPROACH_FRACTION`
/// (агент никогда не встаёт вплотную в цель)
pub const APPROACH_FRACTION: f32 = 0.9;

/// Default angular rate for facing slerp (× delta_secs)
pub const DEFAULT_TURN_RATE: f32 = 7.0;

/// Default perception radius (метры)
pub const DEFAULT_DETECTION_RADIUS: f32 = 15.0;

/// Pursuit FSM состояния
///
/// Нет terminal state: машина живёт пока жив агент.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum PursuitState {
    /// Никого не видим
    #[default]
    Idle,
    /// Преследуем primary target (путь есть)
    Chasing,
    /// Путь к primary target закрыт — ломаем obstacle
    Blocked,
}

/// Pursuit machine of a hostile agent.
///
/// Only one of {nothing, primary target, obstacle} drives movement at a time:
/// `current_target` is the one currently chased.
/// `attacking` — sub-flag of Chasing/Blocked while within stopping distance.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(AttackTimer, FacingGoal, MovementCommand, AnimState)]
pub struct Pursuit {
    pub state: PursuitState,
    pub primary_target: Option<Entity>,
    pub obstacle: Option<Entity>,
    pub current_target: Option<Entity>,
    pub attacking: bool,
}

impl Pursuit {
    /// Forget everything, back to Idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.state == PursuitState::Idle
    }
}

/// Параметры hostile AI
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HostileConfig {
    /// Радиус обнаружения целей (метры)
    pub detection_radius: f32,
    /// Какие слои считаются добычей
    pub detection_mask: u32,
    /// Какие слои могут перекрывать путь (obstacle linecast)
    pub obstacle_mask: u32,
    /// Скорость разворота к цели
    pub turn_rate: f32,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            detection_radius: DEFAULT_DETECTION_RADIUS,
            detection_mask: MASK_HOSTILE_PREY,
            obstacle_mask: MASK_HOSTILE_OBSTACLES,
            turn_rate: DEFAULT_TURN_RATE,
        }
    }
}

/// Point the nav agent is sent to: 90% of the way from `from` to `to`.
pub fn approach_point(from: Vec3, to: Vec3) -> Vec3 {
    from + (to - from) * APPROACH_FRACTION
}

/// Yaw-only look rotation from `from` towards `to` (forward = -Z).
///
/// `None` when the points coincide on the XZ plane.
pub fn look_rotation(from: Vec3, to: Vec3) -> Option<Quat> {
    let direction = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if direction.length_squared() < 1e-8 {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z)))
}
