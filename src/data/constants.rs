//! Constants and lookup tables for structural checking
//!
//! This module contains the fixed command sets the comparator keys its rules on,
//! the equation environment delimiters, and the class names used in annotated
//! output.

use phf::phf_set;

// ============================================================================
// Command Sets
// ============================================================================

/// Commands whose payload is a cross-document identifier.
///
/// Their content must survive translation byte for byte.
pub static REFERENCE_COMMANDS: phf::Set<&'static str> = phf_set! {
    "label",
    "ref",
    "cite",
    "citet",
};

/// Additional identifier-bearing commands enabled by
/// [`CompareOptions::strict_references`](crate::CompareOptions::strict_references).
pub static EXTENDED_REFERENCE_COMMANDS: phf::Set<&'static str> = phf_set! {
    "eqref",
    "pageref",
    "autoref",
    "cref",
    "Cref",
    "citep",
    "citeauthor",
    "citeyear",
    "nameref",
    "href",
    "url",
};

/// Environment markers: the environment name in braces is the structural anchor
pub static ENVIRONMENT_MARKERS: phf::Set<&'static str> = phf_set! {
    "begin",
    "end",
};

// ============================================================================
// Equation Environment
// ============================================================================

pub const EQUATION_BEGIN: &str = r"\begin{equation}";
pub const EQUATION_END: &str = r"\end{equation}";

// ============================================================================
// Annotation Markup
// ============================================================================

/// Prefix shared by every class emitted by the annotator
pub const CLASS_PREFIX: &str = "latex-";

/// Modifier class attached to elements flagged missing
pub const MISSING_CLASS: &str = "latex-missing";

pub const EMPHASIS_OPEN: &str = "<strong>";
pub const EMPHASIS_CLOSE: &str = "</strong>";

/// Check whether a command carries a cross-document identifier by default
pub fn is_reference_command(name: &str) -> bool {
    REFERENCE_COMMANDS.contains(name)
}

/// Check whether a command opens or closes an environment
pub fn is_environment_marker(name: &str) -> bool {
    ENVIRONMENT_MARKERS.contains(name)
}
