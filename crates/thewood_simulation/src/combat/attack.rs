//! AttackScheduler — повторяющийся, отменяемый attack timer
//!
//! Пока агент в ATTACKING sub-state, в `TimerQueue<AttackTick>` живёт ровно
//! один repeating timer (0.1s до первого замаха, потом каждые 1.5s).
//! Каждое срабатывание:
//! 1. Trigger("Attack") в animation channel
//! 2. CheckNewPath: если агент Blocked, а путь к primary открылся — timer
//!    отменяется, FSM сразу возвращается в Chasing
//!
//! Сам урон наносится позже, когда animation collaborator присылает
//! `AttackImpact` (CheckAttack).

use std::time::Duration;
use bevy::prelude::*;
use crate::ai::navigation::NavigationService;
use crate::ai::perception::SpatialIndex;
use crate::ai::systems::Chaser;
use crate::ai::{Pursuit, PursuitState};
use crate::animation::{set_anim_state, AnimState, AnimationCommand, AttackImpact};
use crate::combat::damage::DamageRequest;
use crate::combat::stats::{CharacterStats, StatProvider};
use crate::components::{FacingGoal, Health, MovementCommand, NavigationAgent};
use crate::schedules::{TimerHandle, TimerQueue};

/// Задержка до первого замаха
pub const ATTACK_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Интервал между замахами
pub const ATTACK_REPEAT_INTERVAL: Duration = Duration::from_millis(1500);

/// Payload of the attack timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackTick {
    pub agent: Entity,
}

/// Handle of the agent's attack timer (None = не атакуем).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AttackTimer {
    pub handle: Option<TimerHandle>,
}

impl AttackTimer {
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Start the repeating timer. No-op (returns `false`) if already running.
    pub fn start(&mut self, queue: &mut TimerQueue<AttackTick>, now: Duration, agent: Entity) -> bool {
        if self.handle.is_some_and(|handle| queue.is_scheduled(handle)) {
            return false;
        }

        self.handle = Some(queue.schedule_repeating(
            now,
            ATTACK_INITIAL_DELAY,
            ATTACK_REPEAT_INTERVAL,
            AttackTick { agent },
        ));
        true
    }

    /// Cancel the timer. No-op (returns `false`) if not running.
    pub fn cancel(&mut self, queue: &mut TimerQueue<AttackTick>) -> bool {
        match self.handle.take() {
            Some(handle) => queue.cancel(handle),
            None => false,
        }
    }
}

/// Система: обработать срабатывания attack timer'ов (Trigger + CheckNewPath)
pub fn fire_due_attacks(
    mut agents: Query<(
        &Transform,
        &NavigationAgent,
        &Health,
        &mut Pursuit,
        &mut MovementCommand,
        &mut FacingGoal,
        &mut AttackTimer,
        &mut AnimState,
    )>,
    index: Res<SpatialIndex>,
    navigation: Res<NavigationService>,
    mut attack_queue: ResMut<TimerQueue<AttackTick>>,
    mut anim_events: EventWriter<AnimationCommand>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed();

    for (handle, tick) in attack_queue.drain_due(now) {
        let Ok((transform, agent, health, mut pursuit, mut movement, mut facing, mut timer, mut anim)) =
            agents.get_mut(tick.agent)
        else {
            // Агент исчез без отмены — timer сиротский
            attack_queue.cancel(handle);
            continue;
        };

        if timer.handle != Some(handle) || !health.is_alive() {
            attack_queue.cancel(handle);
            continue;
        }

        crate::log(&format!(
            "🗡️ Attack: {:?} swings at {:?}",
            tick.agent, pursuit.current_target
        ));
        set_anim_state(tick.agent, &mut anim, AnimState::Attacking, &mut anim_events);

        // CheckNewPath
        if pursuit.state != PursuitState::Blocked {
            continue;
        }
        let Some(primary) = pursuit.primary_target.and_then(|target| index.get(target).copied()) else {
            continue;
        };

        let position = transform.translation;
        if !navigation.can_reach(position, primary.position) {
            continue;
        }

        let mut chaser = Chaser {
            entity: tick.agent,
            position,
            agent,
            pursuit: &mut *pursuit,
            movement: &mut *movement,
            facing: &mut *facing,
            timer: &mut *timer,
            anim: &mut *anim,
        };

        chaser.timer.cancel(&mut attack_queue);
        chaser.pursuit.attacking = false;
        chaser.pursuit.obstacle = None;
        chaser.pursuit.current_target = Some(primary.entity);
        crate::log(&format!(
            "AI: {:?} path to {:?} opened mid-attack, resuming chase",
            tick.agent, primary.entity
        ));
        chaser.transition(PursuitState::Chasing);
        chaser.chase(primary.position, &mut attack_queue, now, &mut anim_events);
    }
}

/// Система: CheckAttack — impact frame атаки → DamageRequest по current target.
///
/// Урон безусловный (miss/block не считаются). Impact игнорируется, если
/// агент уже не в ATTACKING sub-state или цель пропала/мертва.
pub fn check_attack(
    mut impacts: EventReader<AttackImpact>,
    attackers: Query<(&Pursuit, &CharacterStats, &Health)>,
    targets: Query<&Health>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    for impact in impacts.read() {
        let Ok((pursuit, stats, health)) = attackers.get(impact.attacker) else {
            continue;
        };
        if !health.is_alive() || !pursuit.attacking {
            continue;
        }

        let Some(target) = pursuit.current_target else {
            continue;
        };
        let Ok(target_health) = targets.get(target) else {
            continue;
        };
        if !target_health.is_alive() {
            continue;
        }

        damage_requests.write(DamageRequest {
            attacker: Some(impact.attacker),
            target,
            amount: stats.attack_value(),
        });
    }
}
