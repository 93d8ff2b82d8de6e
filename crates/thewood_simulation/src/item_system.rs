//! Item System — каталог предметов, drop tables, loot pickups
//!
//! # Архитектура
//!
//! **ItemDefinition** — статический blueprint (id + name):
//! - Хранится в `ItemCatalog` resource (HashMap lookup)
//! - Создаются hardcoded в `ItemCatalog::default()`
//!
//! **DropTable** — weighted список `(ItemId, weight)` на hostile агенте.
//! DeathHandler только читает его (`get_drop`), никогда не мутирует.
//!
//! **Loot flow**:
//! ```text
//! Hostile dies → LootDropRequested { item, position }
//!   ↓
//! spawn_loot_pickups: item есть в каталоге → PickupItem entity в точке смерти
//! ```

use bevy::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// ItemId
// ============================================================================

/// Item identifier (slug)
///
/// # Examples
/// - "torch"
/// - "potion_log"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// ItemDefinition / ItemCatalog
// ============================================================================

/// Static item definition
#[derive(Clone, Debug, Reflect)]
pub struct ItemDefinition {
    pub id: ItemId,
    /// Отображаемое имя (для interaction prompt)
    pub name: String,
}

/// Registry всех известных предметов
#[derive(Resource, Debug, Clone)]
pub struct ItemCatalog {
    definitions: HashMap<ItemId, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.definitions.get(id)
    }

    pub fn add(&mut self, id: impl Into<ItemId>, name: impl Into<String>) {
        let id = id.into();
        self.definitions.insert(
            id.clone(),
            ItemDefinition {
                id,
                name: name.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        let mut catalog = Self::new();
        catalog.add("torch", "Torch");
        catalog.add("potion_log", "Potion Log");
        catalog.add("funshroom", "Funshroom");
        catalog.add("log", "Log");
        catalog
    }
}

// ============================================================================
// DropTable
// ============================================================================

/// One weighted entry of a drop table.
#[derive(Clone, Debug, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct LootDrop {
    pub item: ItemId,
    pub weight: u32,
}

impl LootDrop {
    pub fn new(item: impl Into<ItemId>, weight: u32) -> Self {
        Self {
            item: item.into(),
            weight,
        }
    }
}

/// Weighted loot table of a hostile.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct DropTable {
    pub loot: Vec<LootDrop>,
}

impl DropTable {
    pub fn new(loot: Vec<LootDrop>) -> Self {
        Self { loot }
    }

    /// Weighted random pick. `None` for an empty table or all-zero weights.
    pub fn get_drop(&self, rng: &mut impl Rng) -> Option<ItemId> {
        let weights = self.loot.iter().map(|drop| drop.weight);
        let index = WeightedIndex::new(weights).ok()?;
        Some(self.loot[index.sample(rng)].item.clone())
    }
}

// ============================================================================
// Pickups
// ============================================================================

/// Event: положить предмет в мир (DeathHandler, demolished structures)
#[derive(Event, Debug, Clone)]
pub struct LootDropRequested {
    pub item: ItemId,
    pub position: Vec3,
}

/// Предмет, лежащий в мире (подбирается interaction системой, вне этого crate)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PickupItem {
    pub item: ItemId,
    /// Interaction prompt ("Take Torch")
    pub prompt: String,
}

/// Система: LootDropRequested → PickupItem entities
pub fn spawn_loot_pickups(
    mut commands: Commands,
    mut requests: EventReader<LootDropRequested>,
    catalog: Res<ItemCatalog>,
) {
    for request in requests.read() {
        let Some(definition) = catalog.get(&request.item) else {
            crate::logger::log_warning(&format!(
                "Loot drop ignored: unknown item '{}'",
                request.item
            ));
            continue;
        };

        commands.spawn((
            Name::new(format!("Pickup({})", definition.id)),
            Transform::from_translation(request.position),
            PickupItem {
                item: definition.id.clone(),
                prompt: format!("Take {}", definition.name),
            },
        ));

        crate::logger::log(&format!(
            "🎁 Dropped '{}' at {:?}",
            definition.id, request.position
        ));
    }
}
