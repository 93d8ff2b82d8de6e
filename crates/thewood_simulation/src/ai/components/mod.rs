//! AI components

pub mod pursuit;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod pursuit_tests;

// Re-export all components
pub use pursuit::*;
