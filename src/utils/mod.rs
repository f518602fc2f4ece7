//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics and error reporting
//! - Error types and result types

pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{
    check_document, check_translation, format_diagnostics, CheckResult, Diagnostic,
    DiagnosticLevel,
};
pub use error::{GuardError, GuardResult};
