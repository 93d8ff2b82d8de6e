//! PerceptionSystem — overlap-sphere scan по снапшоту damageable тел.
//!
//! `SpatialIndex` пересобирается один раз в начале fixed tick и дальше только
//! читается всеми агентами (read-only, shared within a tick). Мёртвые тела в
//! индекс не попадают.

use bevy::prelude::*;
use crate::components::{Health, SpatialBody};

/// Snapshot of one damageable body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceivedBody {
    pub entity: Entity,
    pub position: Vec3,
    pub body: SpatialBody,
}

/// Per-tick snapshot of every living damageable body.
#[derive(Resource, Debug, Default)]
pub struct SpatialIndex {
    bodies: Vec<PerceivedBody>,
}

impl SpatialIndex {
    pub fn from_bodies(bodies: impl IntoIterator<Item = PerceivedBody>) -> Self {
        let mut bodies: Vec<_> = bodies.into_iter().collect();
        // Стабильный порядок независимо от порядка archetype iteration
        bodies.sort_by_key(|b| b.entity.index());
        Self { bodies }
    }

    pub fn get(&self, entity: Entity) -> Option<&PerceivedBody> {
        self.bodies.iter().find(|b| b.entity == entity)
    }

    pub fn bodies(&self) -> &[PerceivedBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// All bodies on `mask` layers overlapping the sphere `(origin, radius)`, except `observer`.
///
/// Nearest first (surface distance), ties by entity index.
pub fn scan(
    index: &SpatialIndex,
    origin: Vec3,
    radius: f32,
    mask: u32,
    observer: Entity,
) -> Vec<PerceivedBody> {
    let mut found: Vec<(f32, PerceivedBody)> = index
        .bodies
        .iter()
        .filter(|b| b.entity != observer && b.body.in_mask(mask))
        .filter_map(|b| {
            let surface_distance = origin.distance(b.position) - b.body.radius;
            (surface_distance <= radius).then_some((surface_distance, *b))
        })
        .collect();

    found.sort_by(|(da, a), (db, b)| {
        da.total_cmp(db)
            .then_with(|| a.entity.index().cmp(&b.entity.index()))
    });

    found.into_iter().map(|(_, body)| body).collect()
}

/// Система: пересобрать SpatialIndex (первая в fixed tick)
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    bodies: Query<(Entity, &Transform, &SpatialBody, &Health)>,
) {
    *index = SpatialIndex::from_bodies(
        bodies
            .iter()
            .filter(|(_, _, _, health)| health.is_alive())
            .map(|(entity, transform, body, _)| PerceivedBody {
                entity,
                position: transform.translation,
                body: *body,
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{LAYER_HOSTILES, LAYER_PLAYERS, LAYER_STRUCTURES};

    fn body(index: u32, position: Vec3, layer: u32) -> PerceivedBody {
        PerceivedBody {
            entity: Entity::from_raw(index),
            position,
            body: SpatialBody::new(layer, 0.5),
        }
    }

    #[test]
    fn test_scan_filters_radius_and_mask() {
        let index = SpatialIndex::from_bodies([
            body(1, Vec3::new(5.0, 0.0, 0.0), LAYER_PLAYERS),
            body(2, Vec3::new(30.0, 0.0, 0.0), LAYER_PLAYERS),
            body(3, Vec3::new(2.0, 0.0, 0.0), LAYER_STRUCTURES),
        ]);

        let found = scan(&index, Vec3::ZERO, 15.0, LAYER_PLAYERS, Entity::from_raw(99));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity, Entity::from_raw(1));
    }

    #[test]
    fn test_scan_counts_body_radius() {
        // Центр на 15.3, радиус тела 0.5 → поверхность внутри сферы 15
        let index = SpatialIndex::from_bodies([body(1, Vec3::new(15.3, 0.0, 0.0), LAYER_PLAYERS)]);
        assert_eq!(scan(&index, Vec3::ZERO, 15.0, LAYER_PLAYERS, Entity::from_raw(9)).len(), 1);
    }

    #[test]
    fn test_scan_is_nearest_first() {
        let index = SpatialIndex::from_bodies([
            body(1, Vec3::new(9.0, 0.0, 0.0), LAYER_PLAYERS),
            body(2, Vec3::new(3.0, 0.0, 0.0), LAYER_PLAYERS),
            body(3, Vec3::new(0.0, 0.0, 6.0), LAYER_PLAYERS),
        ]);

        let order: Vec<u32> = scan(&index, Vec3::ZERO, 15.0, LAYER_PLAYERS, Entity::from_raw(9))
            .iter()
            .map(|b| b.entity.index())
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_scan_excludes_observer() {
        let index = SpatialIndex::from_bodies([body(4, Vec3::ZERO, LAYER_HOSTILES)]);
        assert!(scan(&index, Vec3::ZERO, 15.0, LAYER_HOSTILES, Entity::from_raw(4)).is_empty());
    }
}
