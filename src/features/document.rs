//! Document-level validation
//!
//! A translated document is checked paragraph by paragraph. Paragraphs are the
//! chunks of text separated by blank lines; the n-th original paragraph is
//! paired with the n-th translated paragraph and each pair goes through the
//! tokenizer and the structural comparator.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::compare::{compare_elements_with_options, CompareOptions, CompareResult};
use crate::core::tokenizer::tokenize;

lazy_static! {
    // A blank line, possibly holding whitespace
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// Length of the preview kept for untranslated paragraphs, in characters
const PREVIEW_CHARS: usize = 50;

/// A trimmed, non-empty chunk of a document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paragraph {
    /// Position among the document's paragraphs
    pub index: usize,
    /// Trimmed paragraph text, equal to `source[start..end]`
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Paragraph {
    /// Preview of the first characters of the paragraph
    pub fn preview(&self) -> String {
        let mut preview: String = self.text.chars().take(PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    }
}

/// Split a document into paragraphs on blank lines.
///
/// Each chunk is trimmed and empty chunks are dropped.
///
/// ```rust
/// use texguard::document::split_paragraphs;
///
/// let paragraphs = split_paragraphs("First one.\n\n  \nSecond one.\n");
/// assert_eq!(paragraphs.len(), 2);
/// assert_eq!(paragraphs[1].text, "Second one.");
/// ```
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut chunk_start = 0;

    let boundaries = PARAGRAPH_BREAK
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((text.len(), text.len())));

    for (chunk_end, next_start) in boundaries {
        let chunk = &text[chunk_start..chunk_end];
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            let start = chunk_start + (chunk.len() - chunk.trim_start().len());
            paragraphs.push(Paragraph {
                index: paragraphs.len(),
                text: trimmed.to_string(),
                start,
                end: start + trimmed.len(),
            });
        }
        chunk_start = next_start;
    }

    paragraphs
}

/// Comparison outcome for one original paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParagraphReport {
    pub index: usize,
    pub original: Paragraph,
    /// `None` when the translation has fewer paragraphs than the original
    pub translated: Option<Paragraph>,
    /// Element offsets are relative to the paragraph texts
    pub result: CompareResult,
}

impl ParagraphReport {
    pub fn is_translated(&self) -> bool {
        self.translated.is_some()
    }
}

/// Translation progress of a document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranslationStats {
    pub total: usize,
    pub translated: usize,
    /// Rounded to the nearest integer, 0 for an empty document
    pub percentage: u32,
    /// Previews of the paragraphs without a translation
    pub untranslated: Vec<String>,
}

/// Paragraph-by-paragraph comparison of a document and its translation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DocumentReport {
    pub paragraphs: Vec<ParagraphReport>,
    /// Translated paragraphs with no original counterpart
    pub extra_paragraphs: Vec<Paragraph>,
}

impl DocumentReport {
    /// Build a report with the default comparison options
    pub fn new(original: &str, translated: &str) -> Self {
        Self::build(original, translated, &CompareOptions::default())
    }

    pub fn build(original: &str, translated: &str, options: &CompareOptions) -> Self {
        let original_paragraphs = split_paragraphs(original);
        let mut translated_paragraphs = split_paragraphs(translated).into_iter();

        let mut paragraphs = Vec::with_capacity(original_paragraphs.len());
        for paragraph in original_paragraphs {
            let counterpart = translated_paragraphs.next();
            let original_elements = tokenize(&paragraph.text);
            let translated_elements = counterpart
                .as_ref()
                .map(|p| tokenize(&p.text))
                .unwrap_or_default();

            let result =
                compare_elements_with_options(&original_elements, &translated_elements, options);

            paragraphs.push(ParagraphReport {
                index: paragraph.index,
                original: paragraph,
                translated: counterpart,
                result,
            });
        }

        let extra_paragraphs: Vec<Paragraph> = translated_paragraphs.collect();

        debug!(
            paragraphs = paragraphs.len(),
            extra = extra_paragraphs.len(),
            "built document report"
        );

        Self {
            paragraphs,
            extra_paragraphs,
        }
    }

    /// Every paragraph translated, nothing missing, nothing different
    pub fn is_clean(&self) -> bool {
        self.extra_paragraphs.is_empty()
            && self
                .paragraphs
                .iter()
                .all(|p| p.is_translated() && p.result.is_clean())
    }

    /// Missing elements across translated paragraphs
    pub fn missing_count(&self) -> usize {
        self.paragraphs
            .iter()
            .filter(|p| p.is_translated())
            .map(|p| p.result.missing.len())
            .sum()
    }

    pub fn different_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.result.different.len()).sum()
    }

    pub fn stats(&self) -> TranslationStats {
        let total = self.paragraphs.len();
        let translated = self.paragraphs.iter().filter(|p| p.is_translated()).count();
        let percentage = if total > 0 {
            ((translated as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        let untranslated = self
            .paragraphs
            .iter()
            .filter(|p| !p.is_translated())
            .map(|p| p.original.preview())
            .collect();

        TranslationStats {
            total,
            translated,
            percentage,
            untranslated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_paragraphs() {
        let text = "\\section{Intro}\nFirst line.\n\n   \n\nSecond $x$.\n\n";
        let paragraphs = split_paragraphs(text);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "\\section{Intro}\nFirst line.");
        assert_eq!(paragraphs[1].index, 1);
        for p in &paragraphs {
            assert_eq!(&text[p.start..p.end], p.text);
        }
    }

    #[test]
    fn test_split_trims_and_locates_duplicates() {
        let text = "  same\n\nsame  ";
        let paragraphs = split_paragraphs(text);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!((paragraphs[0].start, paragraphs[0].end), (2, 6));
        assert_eq!((paragraphs[1].start, paragraphs[1].end), (8, 12));
    }

    #[test]
    fn test_split_empty() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("\n\n \n").is_empty());
    }

    #[test]
    fn test_report_pairs_paragraphs() {
        let original = "\\section{Introduction}\\label{intro}\n\nSee \\ref{intro} and $x$.";
        let translated = "\\section{Introducción}\\label{intro}\n\nVer \\ref{intro} y $x$.";
        let report = DocumentReport::new(original, translated);
        assert_eq!(report.paragraphs.len(), 2);
        assert!(report.is_clean());
        assert_eq!(report.stats().percentage, 100);
    }

    #[test]
    fn test_report_detects_broken_reference() {
        let original = "Intro.\n\nSee \\ref{intro}.";
        let translated = "Intro.\n\nVer \\ref{introduccion}.";
        let report = DocumentReport::new(original, translated);
        assert!(!report.is_clean());
        assert_eq!(report.missing_count(), 1);
        assert_eq!(report.different_count(), 1);
        assert_eq!(report.paragraphs[1].result.missing[0].content, r"\ref{intro}");
    }

    #[test]
    fn test_untranslated_paragraphs() {
        let original = "One \\emph{a}.\n\nTwo.\n\nThree.";
        let translated = "Uno \\emph{a}.";
        let report = DocumentReport::new(original, translated);
        let stats = report.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.translated, 1);
        assert_eq!(stats.percentage, 33);
        assert_eq!(stats.untranslated, vec!["Two....", "Three...."]);
        assert!(!report.is_clean());
        assert_eq!(report.missing_count(), 0);
    }

    #[test]
    fn test_extra_translated_paragraphs() {
        let report = DocumentReport::new("One.", "Uno.\n\nDos \\item.");
        assert_eq!(report.extra_paragraphs.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_empty_document_stats() {
        let stats = DocumentReport::new("", "").stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        let paragraph = Paragraph {
            index: 0,
            text: "é".repeat(60),
            start: 0,
            end: 120,
        };
        assert_eq!(paragraph.preview().chars().count(), PREVIEW_CHARS + 3);
    }
}
