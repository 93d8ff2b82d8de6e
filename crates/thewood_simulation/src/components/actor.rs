//! Damageable capability: Health, death policy, salvage

use bevy::prelude::*;
use crate::item_system::ItemId;

/// Здоровье любой damageable entity (hostile, player, постройка)
///
/// Инвариант: 0 ≤ current ≤ max. `is_dead` выставляется ровно один раз —
/// на том `take_damage`, который опустил health до нуля.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(OnDeath)]
pub struct Health {
    pub current: u32,
    pub max: u32,
    pub is_dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            is_dead: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead && self.current > 0
    }

    /// `health = max(0, health - amount)`.
    ///
    /// Returns `true` only for the call that kills (health reached 0 while not yet dead).
    /// Every later call returns `false`, so death handling runs once.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.current = self.current.saturating_sub(amount);

        if self.current == 0 && !self.is_dead {
            self.is_dead = true;
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: u32) {
        if self.is_dead {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Full health, alive again (player respawn in place).
    pub fn restore(&mut self) {
        self.current = self.max;
        self.is_dead = false;
    }
}

/// What happens when a damageable's health reaches 0.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum OnDeath {
    /// Hostile agent: loot, `EnemyDied`, respawn request, despawn
    Hostile,
    /// Player-like: health reset to max, остаётся в мире
    Restore,
    /// Structure: drops its `Salvage`, then despawns
    #[default]
    Demolish,
}

/// Items a demolished structure leaves behind (one pickup per entry).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Salvage {
    pub items: Vec<ItemId>,
}

impl Salvage {
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}
