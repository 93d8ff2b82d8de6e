//! Player-side damageable: marker + bundle
//!
//! Игрок — добыча для hostile агентов (layer Players). Input/camera живут
//! вне этого crate; здесь только то, что нужно AI и combat.

use bevy::prelude::*;
use crate::components::{Health, OnDeath, SpatialBody, LAYER_PLAYERS};

/// Marker component для player-controlled entity
///
/// Акторы С этим компонентом получают команды от player input (вне crate)
/// и при смерти восстанавливаются на месте (`OnDeath::Restore`).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Стартовое здоровье игрока
pub const PLAYER_MAX_HEALTH: u32 = 100;

#[derive(Bundle)]
pub struct PlayerBundle {
    pub name: Name,
    pub player: Player,
    pub health: Health,
    pub on_death: OnDeath,
    pub body: SpatialBody,
    pub transform: Transform,
}

impl PlayerBundle {
    pub fn new(position: Vec3) -> Self {
        Self {
            name: Name::new("Player"),
            player: Player,
            health: Health::new(PLAYER_MAX_HEALTH),
            on_death: OnDeath::Restore,
            body: SpatialBody::new(LAYER_PLAYERS, 0.5),
            transform: Transform::from_translation(position),
        }
    }

    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.health = Health::new(max_health);
        self
    }
}
