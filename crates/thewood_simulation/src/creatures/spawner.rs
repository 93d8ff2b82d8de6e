//! Spawners: первое заселение + отложенный respawn через TimerQueue

use std::time::Duration;
use bevy::prelude::*;
use crate::creatures::{CreatureProfile, HostileSpawn, SpawnError};
use crate::schedules::TimerQueue;

/// Пауза между смертью и respawn'ом
pub const DEFAULT_RESPAWN_DELAY: Duration = Duration::from_secs(10);

/// Point that keeps one creature of `profile` alive.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Spawner {
    pub profile: CreatureProfile,
    pub respawn_delay: Duration,
}

impl Spawner {
    /// Profile is validated up front: broken spawner не доживает до runtime.
    pub fn new(profile: CreatureProfile, respawn_delay: Duration) -> Result<Self, SpawnError> {
        HostileSpawn::from_profile(profile.clone()).build()?;
        Ok(Self {
            profile,
            respawn_delay,
        })
    }
}

/// Back-reference from a spawned creature to its spawner.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct SpawnerLink {
    pub spawner: Entity,
}

/// Fire-and-forget: spawner должен вернуть существо (DeathHandler step c)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnRequested {
    pub spawner: Entity,
}

/// Payload of the respawn timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnTick {
    pub spawner: Entity,
}

fn spawn_creature(commands: &mut Commands, spawner_entity: Entity, spawner: &Spawner, position: Vec3) {
    match HostileSpawn::from_profile(spawner.profile.clone())
        .at(position)
        .with_spawner(spawner_entity)
        .spawn(commands)
    {
        Ok(creature) => crate::logger::log_info(&format!(
            "🐺 Spawner {:?}: spawned {} {:?} at {:?}",
            spawner_entity, spawner.profile.name, creature, position
        )),
        Err(err) => crate::logger::log_error(&format!("Spawner {:?}: {}", spawner_entity, err)),
    }
}

/// Система: новый Spawner сразу заселяет одно существо
pub fn populate_spawners(
    mut commands: Commands,
    spawners: Query<(Entity, &Spawner, &Transform), Added<Spawner>>,
) {
    for (entity, spawner, transform) in spawners.iter() {
        spawn_creature(&mut commands, entity, spawner, transform.translation);
    }
}

/// Система: RespawnRequested → one-shot timer на `respawn_delay`
pub fn schedule_respawns(
    mut requests: EventReader<RespawnRequested>,
    spawners: Query<&Spawner>,
    mut respawn_queue: ResMut<TimerQueue<RespawnTick>>,
    time: Res<Time<Fixed>>,
) {
    for request in requests.read() {
        let Ok(spawner) = spawners.get(request.spawner) else {
            crate::logger::log_warning(&format!("RespawnRequested: {:?} is not a spawner", request.spawner));
            continue;
        };

        respawn_queue.schedule(
            time.elapsed(),
            spawner.respawn_delay,
            RespawnTick {
                spawner: request.spawner,
            },
        );
        crate::log(&format!(
            "Spawner {:?}: respawn in {:.1}s",
            request.spawner,
            spawner.respawn_delay.as_secs_f32()
        ));
    }
}

/// Система: сработавшие respawn timers → новое существо
pub fn fire_due_respawns(
    mut commands: Commands,
    mut respawn_queue: ResMut<TimerQueue<RespawnTick>>,
    spawners: Query<(&Spawner, &Transform)>,
    time: Res<Time<Fixed>>,
) {
    for (_, tick) in respawn_queue.drain_due(time.elapsed()) {
        // Spawner мог быть удалён, пока шёл timer
        let Ok((spawner, transform)) = spawners.get(tick.spawner) else {
            continue;
        };
        spawn_creature(&mut commands, tick.spawner, spawner, transform.translation);
    }
}
