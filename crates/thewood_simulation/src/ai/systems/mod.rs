//! AI systems (pursuit decisions in FixedUpdate, facing smoothing in Update)

pub mod facing;
pub mod pursuit;

pub(crate) use pursuit::Chaser;

// Re-export all systems
pub use facing::*;
pub use pursuit::hunt;
