//! Translation diagnostics
//!
//! This module turns a [`DocumentReport`] into located, human-readable
//! diagnostics:
//!
//! - Elements of the original that the translation lost (errors)
//! - Elements the translation added or changed (warnings)
//! - Paragraphs that have not been translated yet (notes)
//!
//! ## Example
//!
//! ```rust
//! use texguard::diagnostics::check_translation;
//! use texguard::CompareOptions;
//!
//! let options = CompareOptions::default();
//! let result = check_translation(r"\label{intro}", r"\label{introduccion}", &options);
//! assert!(result.has_errors());
//! ```

use std::fmt;

use crate::core::command::environment_name;
use crate::core::compare::CompareOptions;
use crate::core::tokenizer::{ElementKind, LatexElement};
use crate::data::constants::is_environment_marker;
use crate::features::document::{DocumentReport, Paragraph};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - the translation changed or added structure
    Warning,
    /// Error - the translation lost structure
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// Span of text in the source (start, end)
    pub span: Option<(usize, usize)>,
    /// Relevant source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            span: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add location information
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Add span information
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> line:column
        //         |
        //         | source text
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check a translated document against its original
pub fn check_translation(
    original: &str,
    translated: &str,
    options: &CompareOptions,
) -> CheckResult {
    let report = DocumentReport::build(original, translated, options);
    check_document(&report, original, translated, options)
}

/// Turn a document report into diagnostics located in the original and
/// translated texts the report was built from
pub fn check_document(
    report: &DocumentReport,
    original: &str,
    translated: &str,
    options: &CompareOptions,
) -> CheckResult {
    let mut result = CheckResult::new();
    let original_lines = compute_line_offsets(original);
    let translated_lines = compute_line_offsets(translated);

    for paragraph in &report.paragraphs {
        let Some(ref counterpart) = paragraph.translated else {
            let (line, col) = offset_to_location(paragraph.original.start, &original_lines);
            result.add(
                Diagnostic::new(
                    DiagnosticLevel::Info,
                    format!("paragraph {} has no translation", paragraph.index + 1),
                )
                .with_location(line, col)
                .with_span(paragraph.original.start, paragraph.original.end)
                .with_source(paragraph.original.preview()),
            );
            continue;
        };

        for element in &paragraph.result.missing {
            let (start, end) = absolute_span(&paragraph.original, element);
            let (line, col) = offset_to_location(start, &original_lines);
            let mut diag = Diagnostic::new(
                DiagnosticLevel::Error,
                format!("{} missing from translation", describe(element)),
            )
            .with_location(line, col)
            .with_span(start, end)
            .with_source(&element.content);
            if let Some(suggestion) = missing_suggestion(element, options) {
                diag = diag.with_suggestion(suggestion);
            }
            result.add(diag);
        }

        for element in &paragraph.result.different {
            // Commands in `different` come from the translation; math entries
            // are original elements whose counterpart changed category.
            let diag = if element.kind == ElementKind::Command {
                let (start, end) = absolute_span(counterpart, element);
                let (line, col) = offset_to_location(start, &translated_lines);
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!("{} has no counterpart in the original", describe(element)),
                )
                .with_location(line, col)
                .with_span(start, end)
            } else {
                let (start, end) = absolute_span(&paragraph.original, element);
                let (line, col) = offset_to_location(start, &original_lines);
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!("{} changed between inline and display", describe(element)),
                )
                .with_location(line, col)
                .with_span(start, end)
            };
            result.add(diag.with_source(&element.content));
        }
    }

    for paragraph in &report.extra_paragraphs {
        let (line, col) = offset_to_location(paragraph.start, &translated_lines);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!(
                    "translated paragraph {} has no original counterpart",
                    paragraph.index + 1
                ),
            )
            .with_location(line, col)
            .with_span(paragraph.start, paragraph.end)
            .with_source(paragraph.preview()),
        );
    }

    result
}

fn absolute_span(paragraph: &Paragraph, element: &LatexElement) -> (usize, usize) {
    (paragraph.start + element.start, paragraph.start + element.end)
}

fn describe(element: &LatexElement) -> String {
    match element.kind {
        ElementKind::Command => match element.command_name.as_deref() {
            Some(name) => format!("command '\\{}'", name),
            None => "command".to_string(),
        },
        ElementKind::MathInline => "inline math".to_string(),
        ElementKind::MathDisplay => "display math".to_string(),
        ElementKind::Equation => "equation".to_string(),
    }
}

fn missing_suggestion(element: &LatexElement, options: &CompareOptions) -> Option<String> {
    match element.kind {
        ElementKind::Command => {
            let name = element.command_name.as_deref()?;
            if is_environment_marker(name) {
                let env = environment_name(&element.content)?;
                Some(format!("keep the environment name '{}' unchanged", env))
            } else if options.is_reference_command(name) {
                Some(format!(
                    "copy '{}' verbatim, identifiers are not translated",
                    element.content
                ))
            } else {
                element
                    .command_structure
                    .as_ref()
                    .map(|s| format!("keep the command shape '{}'", s))
            }
        }
        ElementKind::MathInline | ElementKind::MathDisplay | ElementKind::Equation => {
            Some("math is not translated, copy it verbatim".to_string())
        }
    }
}

/// Compute byte offsets for each line start
fn compute_line_offsets(input: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in input.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert byte offset to line and column
fn offset_to_location(offset: usize, line_offsets: &[usize]) -> (usize, usize) {
    let line = line_offsets
        .iter()
        .position(|&o| o > offset)
        .unwrap_or(line_offsets.len())
        - 1;

    let column = offset - line_offsets.get(line).unwrap_or(&0) + 1;
    (line + 1, column) // 1-indexed
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(original: &str, translated: &str) -> CheckResult {
        check_translation(original, translated, &CompareOptions::default())
    }

    #[test]
    fn test_clean_translation() {
        let result = check(
            "\\section{Intro}\n\nSee $x$.",
            "\\section{Introducción}\n\nVer $x$.",
        );
        assert!(result.is_empty());
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_broken_label_location() {
        let original = "Intro.\n\nText\n\\label{intro}";
        let translated = "Intro.\n\nTexto\n\\label{introduccion}";
        let result = check(original, translated);

        assert_eq!(result.errors, 1);
        assert_eq!(result.warnings, 1);

        let error = &result.diagnostics[0];
        assert_eq!(error.level, DiagnosticLevel::Error);
        assert_eq!((error.line, error.column), (Some(4), Some(1)));
        assert_eq!(error.source_text.as_deref(), Some(r"\label{intro}"));
        assert!(error.suggestion.as_deref().unwrap_or("").contains("verbatim"));

        let warning = &result.diagnostics[1];
        assert_eq!(warning.level, DiagnosticLevel::Warning);
        assert_eq!((warning.line, warning.column), (Some(4), Some(1)));
        assert_eq!(warning.span, Some((14, 33)));
    }

    #[test]
    fn test_environment_suggestion() {
        let result = check(r"\begin{enumerate}", r"\begin{enumeracion}");
        let error = &result.diagnostics[0];
        assert!(error
            .suggestion
            .as_deref()
            .unwrap_or("")
            .contains("'enumerate'"));
    }

    #[test]
    fn test_untranslated_paragraph_is_info() {
        let result = check("One.\n\nTwo \\ref{a}.", "Uno.");
        assert!(!result.has_errors());
        assert_eq!(result.infos, 1);
        assert_eq!(result.diagnostics[0].line, Some(3));
    }

    #[test]
    fn test_extra_paragraph_is_warning() {
        let result = check("One.", "Uno.\n\nDos.");
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].line, Some(3));
    }

    #[test]
    fn test_offset_to_location() {
        let offsets = compute_line_offsets("ab\ncd\n\nef");
        assert_eq!(offset_to_location(0, &offsets), (1, 1));
        assert_eq!(offset_to_location(4, &offsets), (2, 2));
        assert_eq!(offset_to_location(7, &offsets), (4, 1));
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("2 warnings"));
    }

    #[test]
    fn test_format_without_color() {
        let result = check(r"\label{a}", r"\label{b}");
        let output = format_diagnostics(&result, false);
        assert!(output.contains("error: command '\\label' missing from translation"));
        assert!(output.ends_with("Summary: 1 error, 1 warning"));
        assert!(!output.contains("\x1b["));
    }
}
