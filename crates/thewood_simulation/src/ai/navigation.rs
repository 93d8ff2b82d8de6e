//! NavigabilityValidator — "есть ли полный путь до точки?"
//!
//! Сам path planning (navmesh) — внешний коллаборатор. Здесь только контракт
//! `PathPlanner` и resource-обёртка, которая шарится всеми агентами в tick.

use std::sync::Arc;
use bevy::prelude::*;

/// Result of a path query (зеркалит navmesh path status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStatus {
    /// Путь доходит до точки
    Complete,
    /// Путь обрывается раньше (считается недостижимым)
    Partial,
    /// Пути нет
    Invalid,
}

/// Path-planning collaborator.
///
/// Read-only и reentrant: вызывается многими агентами в одном tick.
pub trait PathPlanner: Send + Sync + 'static {
    fn calculate_path(&self, from: Vec3, to: Vec3) -> PathStatus;
}

impl<F> PathPlanner for F
where
    F: Fn(Vec3, Vec3) -> PathStatus + Send + Sync + 'static,
{
    fn calculate_path(&self, from: Vec3, to: Vec3) -> PathStatus {
        self(from, to)
    }
}

/// Planner без препятствий: всё достижимо (headless default, demo).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl PathPlanner for OpenGround {
    fn calculate_path(&self, _from: Vec3, _to: Vec3) -> PathStatus {
        PathStatus::Complete
    }
}

/// Shared handle to the injected path planner.
#[derive(Resource, Clone)]
pub struct NavigationService {
    planner: Arc<dyn PathPlanner>,
}

impl NavigationService {
    pub fn new(planner: impl PathPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }

    pub fn from_arc(planner: Arc<dyn PathPlanner>) -> Self {
        Self { planner }
    }

    /// CanReach: true только для Complete (Partial = недостижимо).
    pub fn can_reach(&self, from: Vec3, to: Vec3) -> bool {
        self.planner.calculate_path(from, to) == PathStatus::Complete
    }
}

impl std::fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ground_reaches_everything() {
        let nav = NavigationService::new(OpenGround);
        assert!(nav.can_reach(Vec3::ZERO, Vec3::new(100.0, 0.0, -40.0)));
    }

    #[test]
    fn test_partial_path_is_unreachable() {
        let nav = NavigationService::new(|_from: Vec3, to: Vec3| {
            if to.x > 5.0 {
                PathStatus::Partial
            } else {
                PathStatus::Complete
            }
        });

        assert!(nav.can_reach(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)));
        assert!(!nav.can_reach(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0)));
    }

    #[test]
    fn test_invalid_path_is_unreachable() {
        let nav = NavigationService::new(|_: Vec3, _: Vec3| PathStatus::Invalid);
        assert!(!nav.can_reach(Vec3::ZERO, Vec3::X));
    }
}
