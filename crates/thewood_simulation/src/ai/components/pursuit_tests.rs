//! Tests for pursuit components.

#[cfg(test)]
mod tests {
    use super::super::pursuit::*;
    use bevy::prelude::*;
    use crate::components::{LAYER_PLAYERS, LAYER_STRUCTURES};

    #[test]
    fn test_pursuit_default_is_idle() {
        let pursuit = Pursuit::default();
        assert!(pursuit.is_idle());
        assert!(pursuit.primary_target.is_none());
        assert!(pursuit.obstacle.is_none());
        assert!(!pursuit.attacking);
    }

    #[test]
    fn test_reset_clears_targets() {
        let mut pursuit = Pursuit {
            state: PursuitState::Blocked,
            primary_target: Some(Entity::PLACEHOLDER),
            obstacle: Some(Entity::PLACEHOLDER),
            current_target: Some(Entity::PLACEHOLDER),
            attacking: true,
        };

        pursuit.reset();
        assert_eq!(pursuit, Pursuit::default());
    }

    #[test]
    fn test_hostile_config_default() {
        let config = HostileConfig::default();
        assert_eq!(config.detection_radius, 15.0);
        assert_eq!(config.turn_rate, 7.0);
        assert_eq!(config.detection_mask, LAYER_PLAYERS);
        assert_eq!(config.obstacle_mask, LAYER_STRUCTURES);
    }

    #[test]
    fn test_approach_point_is_ninety_percent() {
        let from = Vec3::new(1.0, 0.0, 1.0);
        let to = Vec3::new(11.0, 0.0, 1.0);

        let point = approach_point(from, to);
        assert!((point - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-5);
        assert!((from.distance(point) - 0.9 * from.distance(to)).abs() < 1e-5);
    }

    #[test]
    fn test_approach_point_never_reaches_target() {
        let from = Vec3::ZERO;
        let to = Vec3::new(0.0, 0.0, -0.01);
        assert_ne!(approach_point(from, to), to);
    }

    #[test]
    fn test_look_rotation_faces_target() {
        let rotation = look_rotation(Vec3::ZERO, Vec3::new(5.0, 3.0, 0.0)).unwrap();
        let forward = rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-5, "forward = {:?}", forward);

        // Вертикаль игнорируется
        assert!(look_rotation(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0)).is_none());
    }
}
