//! Combat system module
//!
//! ECS ответственность:
//! - Stat block (attack/defense + бонусы)
//! - Attack scheduling (repeating timer, CheckNewPath)
//! - Damage resolution (единственная точка мутации Health)
//! - Death policies (loot, EnemyDied, respawn request, despawn)
//!
//! Animation collaborator ответственность:
//! - Проиграть attack clip по Trigger("Attack")
//! - Прислать AttackImpact в момент удара → CheckAttack

use bevy::prelude::*;
use crate::schedules::{SimulationSet, TimerQueue};

pub mod attack;
pub mod damage;
pub mod death;
pub mod stats;

// Re-export основных типов
pub use attack::{AttackTick, AttackTimer, ATTACK_INITIAL_DELAY, ATTACK_REPEAT_INTERVAL};
pub use damage::{DamageDealt, DamageRequest, EntityDied};
pub use death::EnemyDied;
pub use stats::{BaseStat, CharacterStats, StatProvider, StatType};

/// Combat Plugin
///
/// FixedUpdate:
/// 1. fire_due_attacks (Attack)
/// 2. check_attack (Animation, после animation collaborator'а)
/// 3. apply_damage (Resolve)
/// 4. die_hostile / restore_on_death / demolish_on_death (Death)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<EnemyDied>()
            .init_resource::<TimerQueue<AttackTick>>();

        app.add_systems(
            FixedUpdate,
            (
                attack::fire_due_attacks.in_set(SimulationSet::Attack),
                attack::check_attack.in_set(SimulationSet::Animation),
                damage::apply_damage.in_set(SimulationSet::Resolve),
                (death::die_hostile, death::restore_on_death, death::demolish_on_death)
                    .chain()
                    .in_set(SimulationSet::Death),
            ),
        );
    }
}
