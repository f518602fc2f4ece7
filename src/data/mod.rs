//! Data layer - Static sets and constants
//!
//! This module contains all static data used for structural checking:
//! - Reference-bearing and environment command sets
//! - Equation environment delimiters
//! - Annotation class names

pub mod constants;

// Re-export commonly used items
pub use constants::{
    is_environment_marker, is_reference_command, CLASS_PREFIX, ENVIRONMENT_MARKERS,
    EXTENDED_REFERENCE_COMMANDS, MISSING_CLASS, REFERENCE_COMMANDS,
};
