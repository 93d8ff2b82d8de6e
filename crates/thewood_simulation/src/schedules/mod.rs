//! Tick-driven scheduling
//!
//! Отложенные эффекты (повторяющиеся атаки, респавн) живут в `TimerQueue`,
//! а не в blocking sleep / корутинах. Очередь продвигается системами в
//! FixedUpdate по `Time<Fixed>::elapsed()`.

pub mod timer_queue;

pub use timer_queue::{TimerHandle, TimerQueue};

use bevy::prelude::*;

/// Порядок фаз внутри одного fixed tick (FixedUpdate, `.chain()`).
///
/// 1. Perception: пересборка SpatialIndex (read-only до конца tick)
/// 2. Decision: pursuit FSM, movement commands, attack timer start/cancel
/// 3. Attack: срабатывания attack timer (Trigger + CheckNewPath)
/// 4. Animation: animation collaborator → AttackImpact → DamageRequest
/// 5. Resolve: единственная точка мутации Health
/// 6. Death: OnDeath политики (loot, EnemyDied, respawn request, despawn)
/// 7. Aftermath: loot pickups, respawn timers
/// 8. Locomotion: движение к nav target
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Perception,
    Decision,
    Attack,
    Animation,
    Resolve,
    Death,
    Aftermath,
    Locomotion,
}

impl SimulationSet {
    pub fn configure(app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Perception,
                SimulationSet::Decision,
                SimulationSet::Attack,
                SimulationSet::Animation,
                SimulationSet::Resolve,
                SimulationSet::Death,
                SimulationSet::Aftermath,
                SimulationSet::Locomotion,
            )
                .chain(),
        );
    }
}
