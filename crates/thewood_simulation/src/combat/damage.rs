//! CombatResolver — применение урона к Health
//!
//! Все атакующие только пишут `DamageRequest`; Health мутируется в одном месте
//! (`apply_damage`), запросы обрабатываются последовательно в порядке записи.
//! Смерть (health → 0) детектится ровно один раз через `Health::take_damage`.

use bevy::prelude::*;
use crate::components::Health;

/// Запрос: нанести урон (TakeDamage)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    /// `None` — урон из окружения / скрипта
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: u32,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: u32,
    /// Health после удара
    pub remaining: u32,
    pub target_died: bool,
}

/// Событие: entity умер (health дошёл до 0). Ровно одно на жизнь.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Система: apply damage от DamageRequest событий
///
/// 1. Читаем DamageRequest
/// 2. `Health::take_damage` (clamp в 0, `is_dead` один раз)
/// 3. Генерируем DamageDealt и, на убивающем ударе, EntityDied
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            crate::logger::log_warning(&format!(
                "DamageRequest: target {:?} has no Health component",
                request.target
            ));
            continue;
        };

        let was_dead = health.is_dead;
        let killed = health.take_damage(request.amount);

        if was_dead {
            // Уже мёртв: health держится на 0, повторной смерти нет
            continue;
        }

        crate::log(&format!(
            "💥 {:?} → {:?}: {} damage (health {}/{})",
            request.attacker, request.target, request.amount, health.current, health.max
        ));

        damage_dealt_events.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: request.amount,
            remaining: health.current,
            target_died: killed,
        });

        if killed {
            crate::logger::log_info(&format!("💀 {:?} died (killer {:?})", request.target, request.attacker));
            entity_died_events.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
            });
        }
    }
}
