//! Core analysis modules
//!
//! This module contains the structural analysis engine:
//! - `command`: command name / skeleton / payload extraction
//! - `tokenizer`: markup element scanner
//! - `compare`: structural comparator
//! - `annotate`: category-tagged rendering

pub mod annotate;
pub mod command;
pub mod compare;
pub mod tokenizer;

// Re-export main types and functions
pub use annotate::{
    annotate, annotate_detailed, annotate_detailed_with_options, annotate_validated,
    annotate_validated_with_options, is_flagged_missing, missing_parts, MissingPart,
};
pub use command::{environment_name, extract_command_structure, CommandStructure};
pub use compare::{
    commands_match, compare_elements, compare_elements_with_options, elements_equivalent,
    CompareOptions, CompareResult,
};
pub use tokenizer::{tokenize, validate_elements, ElementKind, LatexElement};
