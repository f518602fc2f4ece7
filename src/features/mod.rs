//! Feature modules - Document-level checking built on the core engine
//!
//! This module contains:
//! - Paragraph segmentation
//! - Per-paragraph structural validation
//! - Translation progress statistics

pub mod document;

// Re-export commonly used types
pub use document::{
    split_paragraphs, DocumentReport, Paragraph, ParagraphReport, TranslationStats,
};
