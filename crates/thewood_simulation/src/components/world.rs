//! Spatial presence: detection/obstacle layers + body radius
//!
//! ## Layers (битовая маска):
//! - Layer 2 (0b10 = 2): Players
//! - Layer 3 (0b100 = 4): Hostiles
//! - Layer 4 (0b1000 = 8): Structures (walls, fences, buildings)
//!
//! Perception фильтрует по `HostileConfig::detection_mask`,
//! obstacle linecast — по `HostileConfig::obstacle_mask`.

use bevy::prelude::*;
use crate::components::actor::{Health, OnDeath, Salvage};
use crate::item_system::ItemId;

/// Layer 2: Players
pub const LAYER_PLAYERS: u32 = 0b10; // 2

/// Layer 3: Hostile agents
pub const LAYER_HOSTILES: u32 = 0b100; // 4

/// Layer 4: Structures (damageable obstacles)
pub const LAYER_STRUCTURES: u32 = 0b1000; // 8

/// Default perception mask for hostiles: охотятся только на игроков
pub const MASK_HOSTILE_PREY: u32 = LAYER_PLAYERS;

/// Default obstacle mask for hostiles: ломают то, что стоит на пути
pub const MASK_HOSTILE_OBSTACLES: u32 = LAYER_STRUCTURES;

/// Sphere body used by perception overlap and obstacle linecasts.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpatialBody {
    /// Single layer bit
    pub layer: u32,
    /// Body radius (метры)
    pub radius: f32,
}

impl Default for SpatialBody {
    fn default() -> Self {
        Self {
            layer: LAYER_PLAYERS,
            radius: 0.5,
        }
    }
}

impl SpatialBody {
    pub fn new(layer: u32, radius: f32) -> Self {
        Self { layer, radius }
    }

    pub fn in_mask(&self, mask: u32) -> bool {
        self.layer & mask != 0
    }
}

/// Marker: постройка (стена, забор, костёр)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Structure;

/// Damageable obstacle: hostile ломает его, если он перекрыл путь.
#[derive(Bundle)]
pub struct StructureBundle {
    pub name: Name,
    pub structure: Structure,
    pub health: Health,
    pub on_death: OnDeath,
    pub salvage: Salvage,
    pub body: SpatialBody,
    pub transform: Transform,
}

impl StructureBundle {
    pub fn new(name: impl Into<String>, position: Vec3, radius: f32, max_health: u32) -> Self {
        Self {
            name: Name::new(name.into()),
            structure: Structure,
            health: Health::new(max_health),
            on_death: OnDeath::Demolish,
            salvage: Salvage::default(),
            body: SpatialBody::new(LAYER_STRUCTURES, radius),
            transform: Transform::from_translation(position),
        }
    }

    /// Items dropped when demolished
    pub fn with_salvage(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.salvage = Salvage::new(items);
        self
    }
}

/// Layer name for debug logs
pub fn layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        LAYER_PLAYERS => "Players",
        LAYER_HOSTILES => "Hostiles",
        LAYER_STRUCTURES => "Structures",
        _ => "Unknown",
    }
}
