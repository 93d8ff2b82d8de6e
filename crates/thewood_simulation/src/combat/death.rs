//! DeathHandler — что происходит после `EntityDied`
//!
//! Политика выбирается компонентом `OnDeath`:
//! - Hostile: loot → EnemyDied → respawn request → cancel attacks → despawn
//! - Restore: health сбрасывается на max (игрок встаёт на месте)
//! - Demolish: постройка роняет Salvage и исчезает
//!
//! `EntityDied` приходит ровно один раз на жизнь (guard в `Health::take_damage`),
//! поэтому каждая политика выполняется один раз.

use bevy::prelude::*;
use crate::combat::attack::{AttackTick, AttackTimer};
use crate::combat::damage::EntityDied;
use crate::components::{Health, OnDeath, Salvage};
use crate::creatures::{Hostile, RespawnRequested, SpawnerLink};
use crate::item_system::{DropTable, LootDropRequested};
use crate::schedules::TimerQueue;
use crate::DeterministicRng;

/// Global broadcast: hostile умер (для progression/quest систем вне crate).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyDied {
    pub entity: Entity,
    /// Creature type id (`Hostile::id`)
    pub creature_id: u32,
    pub experience_reward: u32,
    pub position: Vec3,
}

/// Система: OnDeath::Hostile
pub fn die_hostile(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    mut hostiles: Query<(
        &OnDeath,
        &Hostile,
        &Transform,
        Option<&DropTable>,
        Option<&SpawnerLink>,
        Option<&mut AttackTimer>,
    )>,
    mut rng: ResMut<DeterministicRng>,
    mut attack_queue: ResMut<TimerQueue<AttackTick>>,
    mut loot_events: EventWriter<LootDropRequested>,
    mut enemy_died_events: EventWriter<EnemyDied>,
    mut respawn_events: EventWriter<RespawnRequested>,
) {
    for death in deaths.read() {
        let Ok((on_death, hostile, transform, drop_table, spawner_link, attack_timer)) =
            hostiles.get_mut(death.entity)
        else {
            continue;
        };
        if *on_death != OnDeath::Hostile {
            continue;
        }

        let position = transform.translation;

        // (a) loot
        if let Some(item) = drop_table.and_then(|table| table.get_drop(&mut rng.rng)) {
            loot_events.write(LootDropRequested { item, position });
        }

        // (b) global broadcast
        enemy_died_events.write(EnemyDied {
            entity: death.entity,
            creature_id: hostile.id,
            experience_reward: hostile.experience_reward,
            position,
        });

        // (c) respawn (fire-and-forget)
        if let Some(link) = spawner_link {
            respawn_events.write(RespawnRequested { spawner: link.spawner });
        }

        // (d) teardown: атак после смерти не бывает
        if let Some(mut timer) = attack_timer {
            timer.cancel(&mut attack_queue);
        }
        commands.entity(death.entity).despawn();

        crate::logger::log_info(&format!(
            "☠️ Hostile {:?} (creature {}) died at {:?}, +{} xp",
            death.entity, hostile.id, position, hostile.experience_reward
        ));
    }
}

/// Система: OnDeath::Restore — health на максимум, entity остаётся
pub fn restore_on_death(mut deaths: EventReader<EntityDied>, mut targets: Query<(&OnDeath, &mut Health)>) {
    for death in deaths.read() {
        let Ok((on_death, mut health)) = targets.get_mut(death.entity) else {
            continue;
        };
        if *on_death != OnDeath::Restore {
            continue;
        }

        health.restore();
        crate::logger::log_info(&format!("🔄 {:?} restored to {}/{}", death.entity, health.current, health.max));
    }
}

/// Система: OnDeath::Demolish — Salvage на землю, entity despawn
pub fn demolish_on_death(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    structures: Query<(&OnDeath, &Transform, Option<&Salvage>)>,
    mut loot_events: EventWriter<LootDropRequested>,
) {
    for death in deaths.read() {
        let Ok((on_death, transform, salvage)) = structures.get(death.entity) else {
            continue;
        };
        if *on_death != OnDeath::Demolish {
            continue;
        }

        let position = transform.translation;
        for item in salvage.into_iter().flat_map(|salvage| salvage.items.iter()) {
            loot_events.write(LootDropRequested {
                item: item.clone(),
                position,
            });
        }

        commands.entity(death.entity).despawn();
        crate::logger::log_info(&format!("🏚️ {:?} demolished at {:?}", death.entity, position));
    }
}
