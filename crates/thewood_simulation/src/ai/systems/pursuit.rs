//! Pursuit FSM system: perception → navigability → obstacle → movement/attack.

use std::time::Duration;
use bevy::prelude::*;
use crate::ai::components::{approach_point, look_rotation, HostileConfig, Pursuit, PursuitState};
use crate::ai::navigation::NavigationService;
use crate::ai::obstacles::find_obstacle;
use crate::ai::perception::{scan, SpatialIndex};
use crate::animation::{set_anim_state, AnimState, AnimationCommand};
use crate::combat::{AttackTick, AttackTimer};
use crate::components::{FacingGoal, Health, MovementCommand, NavigationAgent};
use crate::schedules::TimerQueue;

/// Mutable per-agent state touched while chasing a destination.
///
/// Общий для `hunt` и для CheckNewPath в `fire_due_attacks`.
pub(crate) struct Chaser<'a> {
    pub entity: Entity,
    pub position: Vec3,
    pub agent: &'a NavigationAgent,
    pub pursuit: &'a mut Pursuit,
    pub movement: &'a mut MovementCommand,
    pub facing: &'a mut FacingGoal,
    pub timer: &'a mut AttackTimer,
    pub anim: &'a mut AnimState,
}

impl Chaser<'_> {
    /// Switch FSM state, logging the transition.
    pub fn transition(&mut self, new_state: PursuitState) {
        if self.pursuit.state != new_state {
            crate::log(&format!(
                "AI: {:?} {:?} → {:?}",
                self.entity, self.pursuit.state, new_state
            ));
            self.pursuit.state = new_state;
        }
    }

    /// Move towards `destination` and keep the attack timer in sync with range.
    ///
    /// Nav target = 90% точка. В пределах stopping distance: разворот к цели +
    /// attack timer (idempotent start). Иначе timer отменяется.
    pub fn chase(
        &mut self,
        destination: Vec3,
        attack_queue: &mut TimerQueue<AttackTick>,
        now: Duration,
        anim_events: &mut EventWriter<AnimationCommand>,
    ) {
        let nav_target = approach_point(self.position, destination);
        *self.movement = MovementCommand::MoveToPosition { target: nav_target };

        let remaining = self.agent.remaining_distance(self.position, nav_target);
        if remaining <= self.agent.stopping_distance {
            if let Some(rotation) = look_rotation(self.position, destination) {
                self.facing.rotation = Some(rotation);
            }

            if !self.pursuit.attacking {
                crate::log(&format!(
                    "⚔️ AI: {:?} in range of {:?} (remaining {:.2}m)",
                    self.entity, self.pursuit.current_target, remaining
                ));
                self.pursuit.attacking = true;
            }
            if self.timer.start(attack_queue, now, self.entity) {
                crate::log(&format!("AI: {:?} attack timer started", self.entity));
            }
        } else {
            self.pursuit.attacking = false;
            self.facing.rotation = None;
            if self.timer.cancel(attack_queue) {
                crate::log(&format!(
                    "AI: {:?} out of range (remaining {:.2}m), attack timer cancelled",
                    self.entity, remaining
                ));
            }
            set_anim_state(self.entity, self.anim, AnimState::Running, anim_events);
        }
    }

    /// Lost every candidate: back to Idle, stop, cancel attacks.
    pub fn lose_targets(
        &mut self,
        attack_queue: &mut TimerQueue<AttackTick>,
        anim_events: &mut EventWriter<AnimationCommand>,
    ) {
        if !self.pursuit.is_idle() {
            crate::log(&format!(
                "👻 AI: {:?} lost target {:?}, {:?} → Idle",
                self.entity, self.pursuit.primary_target, self.pursuit.state
            ));
        }

        self.pursuit.reset();
        *self.movement = MovementCommand::Idle;
        self.facing.rotation = None;
        self.timer.cancel(attack_queue);
        set_anim_state(self.entity, self.anim, AnimState::Idle, anim_events);
    }
}

/// Система: per-tick pursuit decision для каждого hostile агента.
///
/// 1. Scan; пусто → Idle (targets cleared, timer cancelled)
/// 2. Primary target: текущий, если всё ещё виден, иначе ближайший
/// 3. Путь полный → Chasing (obstacle очищается)
/// 4. Иначе linecast → Blocked на obstacle (или Chasing, если linecast пуст)
/// 5-7. `Chaser::chase` к активной точке
pub fn hunt(
    mut agents: Query<(
        Entity,
        &Transform,
        &HostileConfig,
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

    for (entity, transform, config, agent, health, mut pursuit, mut movement, mut facing, mut timer, mut anim) in
        agents.iter_mut()
    {
        if !health.is_alive() {
            continue;
        }

        let position = transform.translation;
        let mut chaser = Chaser {
            entity,
            position,
            agent,
            pursuit: &mut *pursuit,
            movement: &mut *movement,
            facing: &mut *facing,
            timer: &mut *timer,
            anim: &mut *anim,
        };

        let candidates = scan(&index, position, config.detection_radius, config.detection_mask, entity);
        let Some(nearest) = candidates.first() else {
            chaser.lose_targets(&mut attack_queue, &mut anim_events);
            continue;
        };

        let primary = chaser
            .pursuit
            .primary_target
            .and_then(|current| candidates.iter().find(|c| c.entity == current))
            .unwrap_or(nearest);

        if chaser.pursuit.primary_target != Some(primary.entity) {
            crate::log(&format!(
                "🔍 AI: {:?} primary target {:?} ({} candidates)",
                entity,
                primary.entity,
                candidates.len()
            ));
            chaser.pursuit.primary_target = Some(primary.entity);
        }

        let destination = if navigation.can_reach(position, primary.position) {
            if chaser.pursuit.obstacle.take().is_some() {
                crate::log(&format!("AI: {:?} path to {:?} is clear again", entity, primary.entity));
            }
            chaser.transition(PursuitState::Chasing);
            chaser.pursuit.current_target = Some(primary.entity);
            primary.position
        } else {
            let ignore = [entity, primary.entity];
            match find_obstacle(&index, position, primary.position, config.obstacle_mask, &ignore) {
                Some(obstacle) => {
                    if chaser.pursuit.obstacle != Some(obstacle.entity) {
                        crate::log(&format!(
                            "🧱 AI: {:?} path to {:?} blocked by {:?}",
                            entity, primary.entity, obstacle.entity
                        ));
                        chaser.pursuit.obstacle = Some(obstacle.entity);
                    }
                    chaser.transition(PursuitState::Blocked);
                    chaser.pursuit.current_target = Some(obstacle.entity);
                    obstacle.position
                }
                None => {
                    // Linecast пуст: идём к primary как есть
                    chaser.pursuit.obstacle = None;
                    chaser.transition(PursuitState::Chasing);
                    chaser.pursuit.current_target = Some(primary.entity);
                    primary.position
                }
            }
        };

        chaser.chase(destination, &mut attack_queue, now, &mut anim_events);
    }
}
