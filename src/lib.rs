//! # texguard
//!
//! LaTeX structure checker for translated documents, written in Rust.
//!
//! A translator may rewrite the visible text of a LaTeX document but must keep
//! its markup skeleton: commands, environments, labels and math. texguard
//! finds that skeleton in both texts and reports what the translation lost.
//!
//! ## Features
//!
//! - **Tokenizer**: commands, inline/display math and equation environments,
//!   ordered and overlap-free
//! - **Structural Comparison**: per-category rules; section titles may be
//!   translated, labels and citations may not
//! - **Annotation**: category-tagged HTML spans with missing-element markers
//! - **Document Checks**: paragraph-by-paragraph reports with line/column
//!   diagnostics and translation progress
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Comparing Element Sequences
//!
//! ```rust
//! use texguard::{compare_elements, tokenize};
//!
//! let original = tokenize(r"\section{Introduction}\label{intro}");
//! let translated = tokenize(r"\section{Introducción}\label{introduccion}");
//!
//! let result = compare_elements(&original, &translated);
//! assert_eq!(result.missing.len(), 1);
//! assert_eq!(result.missing[0].content, r"\label{intro}");
//! ```
//!
//! ### Highlighting
//!
//! ```rust
//! use texguard::{annotate_validated, compare_texts, tokenize};
//!
//! let original = r"See \ref{fig} and $x$.";
//! let result = compare_texts(original, r"Ver \ref{figura} y $x$.");
//! let html = annotate_validated(original, &tokenize(original), &result.missing);
//! assert!(html.contains(r#"<span class="latex-command latex-missing">\ref{fig}</span>"#));
//! ```

/// Core analysis engine
pub mod core;

/// Data layer - static sets and constants
pub mod data;

/// Feature modules - document-level checking
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export the engine
pub use core::{
    annotate, annotate_detailed, annotate_detailed_with_options, annotate_validated,
    annotate_validated_with_options, commands_match, compare_elements,
    compare_elements_with_options, elements_equivalent, environment_name,
    extract_command_structure, is_flagged_missing, missing_parts, tokenize, validate_elements,
    CommandStructure, CompareOptions, CompareResult, ElementKind, LatexElement, MissingPart,
};

// Re-export data modules
pub use data::constants;

// Re-export feature modules
pub use features::document;
pub use features::{DocumentReport, Paragraph, ParagraphReport, TranslationStats};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{GuardError, GuardResult};

/// Tokenize two texts and compare their elements with the default options
pub fn compare_texts(original: &str, translated: &str) -> CompareResult {
    compare_texts_with_options(original, translated, &CompareOptions::default())
}

/// Tokenize two texts and compare their elements
pub fn compare_texts_with_options(
    original: &str,
    translated: &str,
    options: &CompareOptions,
) -> CompareResult {
    compare_elements_with_options(&tokenize(original), &tokenize(translated), options)
}

/// Annotate `original`, flagging what `translated` lost
///
/// With `detailed`, missing content is additionally emphasized.
pub fn highlight_translation(original: &str, translated: &str, detailed: bool) -> String {
    let elements = tokenize(original);
    let result = compare_elements(&elements, &tokenize(translated));

    if detailed {
        annotate_detailed(original, &elements, &result.missing, translated)
    } else {
        annotate_validated(original, &elements, &result.missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_texts_clean() {
        let result = compare_texts(r"\textbf{bold}", r"\textbf{negrita}");
        assert!(result.is_clean());
    }

    #[test]
    fn test_compare_texts_with_options() {
        let options = CompareOptions::new().with_reference_command("textbf");
        let result = compare_texts_with_options(r"\textbf{bold}", r"\textbf{negrita}", &options);
        assert_eq!(result.missing.len(), 1);
    }

    #[test]
    fn test_highlight_translation() {
        let html = highlight_translation(r"\item a", r"\item b", false);
        assert_eq!(html, r#"<span class="latex-command">\item</span> a"#);

        let html = highlight_translation(r"\cite{k1}", r"\cite{k2}", true);
        assert_eq!(
            html,
            r#"<span class="latex-command latex-missing"><strong>\cite{k1}</strong></span>"#
        );
    }

    #[test]
    fn test_highlight_plain_text() {
        let text = "no markup here";
        assert_eq!(highlight_translation(text, "nada", true), text);
    }
}
