//! ObstacleResolver — linecast self → target против damageable тел.
//!
//! Когда полного пути нет, агент ищет ближайшее тело на obstacle-слоях,
//! пересекающее отрезок, и ломает его. Nearest-hit: меньший параметр входа t.

use bevy::prelude::*;
use crate::ai::perception::{PerceivedBody, SpatialIndex};

/// Entry parameter `t ∈ [0, 1]` of segment `from → to` into a sphere, if it hits.
///
/// Start inside the sphere counts as a hit at `t = 0`.
pub fn segment_sphere_entry(from: Vec3, to: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = to - from;
    let f = from - center;
    let c = f.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = d.length_squared();
    if a <= 1e-12 {
        return None;
    }

    let b = 2.0 * f.dot(d);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t).then_some(t)
}

/// First body on `mask` layers intersected by the straight line `from → to`.
///
/// `ignore` — сам агент и его primary target (цель не может быть своим же препятствием).
pub fn find_obstacle(
    index: &SpatialIndex,
    from: Vec3,
    to: Vec3,
    mask: u32,
    ignore: &[Entity],
) -> Option<PerceivedBody> {
    index
        .bodies()
        .iter()
        .filter(|b| b.body.in_mask(mask) && !ignore.contains(&b.entity))
        .filter_map(|b| {
            segment_sphere_entry(from, to, b.position, b.body.radius).map(|t| (t, *b))
        })
        .min_by(|(ta, a), (tb, b)| {
            ta.total_cmp(tb)
                .then_with(|| a.entity.index().cmp(&b.entity.index()))
        })
        .map(|(_, body)| body)
}
