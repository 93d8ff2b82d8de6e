//! Animation channel contract
//!
//! ECS не проигрывает анимации — только шлёт fire-and-forget команды
//! (`AnimationCommand`) движку. Движок в момент удара в attack-клипе
//! присылает обратно `AttackImpact` (animation event → CheckAttack).

use bevy::prelude::*;

/// Trigger name of the attack clip
pub const ATTACK_TRIGGER: &str = "Attack";

/// Locomotion/attack state of an animated actor
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum AnimState {
    #[default]
    Idle,
    Walking,
    Running,
    Attacking,
}

impl AnimState {
    pub fn trigger_name(&self) -> &'static str {
        match self {
            AnimState::Idle => "Idle",
            AnimState::Walking => "Walk",
            AnimState::Running => "Run",
            AnimState::Attacking => ATTACK_TRIGGER,
        }
    }
}

/// Outgoing command to the animation collaborator.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum AnimationCommand {
    /// Switch the looping state
    SetState { entity: Entity, state: AnimState },
    /// One-shot trigger (attack swing)
    Trigger { entity: Entity, name: &'static str },
}

/// Incoming callback: attack clip reached the impact frame (→ CheckAttack).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackImpact {
    pub attacker: Entity,
}

/// Change an actor's animation state.
///
/// - Attacking: всегда шлёт `Trigger("Attack")` (каждый замах — новый клип)
/// - Тот же state: no-op
/// - Иначе: state меняется, шлётся `SetState`
pub fn set_anim_state(
    entity: Entity,
    current: &mut AnimState,
    new_state: AnimState,
    commands: &mut EventWriter<AnimationCommand>,
) {
    if new_state == AnimState::Attacking {
        commands.write(AnimationCommand::Trigger {
            entity,
            name: ATTACK_TRIGGER,
        });
    }

    if *current == new_state {
        return;
    }
    *current = new_state;

    if new_state != AnimState::Attacking {
        commands.write(AnimationCommand::SetState {
            entity,
            state: new_state,
        });
    }
}
