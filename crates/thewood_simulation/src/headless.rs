//! Headless stand-ins для engine collaborators
//!
//! В игре Transform двигает navmesh agent движка, а AttackImpact присылает
//! animation event в середине attack clip. Без движка (тесты, `main.rs`):
//! - `follow_movement_commands` — прямолинейное движение к nav target
//! - `impact_on_attack_trigger` — Trigger("Attack") даёт impact в том же tick

use bevy::prelude::*;
use crate::animation::{AnimationCommand, AttackImpact, ATTACK_TRIGGER};
use crate::combat::attack::check_attack;
use crate::components::{MovementCommand, NavigationAgent};
use crate::schedules::SimulationSet;

/// One locomotion step towards `destination`.
///
/// Агент стоит, если уже в пределах stopping distance; иначе проходит
/// `speed * delta` (не дальше самой точки).
pub fn locomotion_step(position: Vec3, destination: Vec3, agent: &NavigationAgent, delta_secs: f32) -> Vec3 {
    let offset = destination - position;
    let distance = offset.length();
    if distance <= agent.stopping_distance || distance <= f32::EPSILON {
        return position;
    }

    let travel = (agent.speed * delta_secs).min(distance);
    position + offset / distance * travel
}

/// Система: MovementCommand → Transform (вместо navmesh agent)
pub fn follow_movement_commands(
    mut movers: Query<(&mut Transform, &MovementCommand, &NavigationAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, command, agent) in movers.iter_mut() {
        let Some(destination) = command.destination() else {
            continue;
        };
        transform.translation = locomotion_step(transform.translation, destination, agent, delta);
    }
}

/// Система: animation collaborator — attack trigger сразу даёт impact
pub fn impact_on_attack_trigger(
    mut anim_commands: EventReader<AnimationCommand>,
    mut impacts: EventWriter<AttackImpact>,
) {
    for command in anim_commands.read() {
        if let AnimationCommand::Trigger { entity, name } = command {
            if *name == ATTACK_TRIGGER {
                impacts.write(AttackImpact { attacker: *entity });
            }
        }
    }
}

/// Headless Plugin — ставится вместо движка (тесты, CLI demo)
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                impact_on_attack_trigger
                    .in_set(SimulationSet::Animation)
                    .before(check_attack),
                follow_movement_commands.in_set(SimulationSet::Locomotion),
            ),
        );
    }
}
