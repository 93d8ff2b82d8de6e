//! Сглаживание разворота (Update, variable rate). Состояние FSM здесь не меняется.

use bevy::prelude::*;
use crate::ai::components::HostileConfig;
use crate::components::FacingGoal;

/// One smoothing step: slerp towards `goal` by `turn_rate * delta_secs` (clamped to 1).
pub fn turn_towards(current: Quat, goal: Quat, turn_rate: f32, delta_secs: f32) -> Quat {
    let t = (turn_rate * delta_secs).clamp(0.0, 1.0);
    current.slerp(goal, t)
}

/// Система: применить FacingGoal к Transform (только rotation)
pub fn smooth_facing(
    mut agents: Query<(&mut Transform, &FacingGoal, &HostileConfig)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut transform, facing, config) in agents.iter_mut() {
        let Some(goal) = facing.rotation else {
            continue;
        };
        transform.rotation = turn_towards(transform.rotation, goal, config.turn_rate, delta);
    }
}
