//! Lexical scanner for LaTeX markup
//!
//! The tokenizer finds every markup element in a text buffer and returns them
//! ordered by start offset with no two elements overlapping.
//!
//! Scanning runs in two phases:
//!
//! 1. **Candidate generation** - display math, inline math, equation
//!    environments and commands are collected independently.
//! 2. **Overlap resolution** - candidates are sorted by start offset and an
//!    overlapping pair keeps the higher category
//!    (equation > display math > inline math > command). On a tie the element
//!    accepted first wins.
//!
//! Malformed markup never fails: an unterminated command group runs to the end
//! of the buffer, and a `\begin{equation}` without a matching end degrades to
//! an ordinary command.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::ops::Range;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::command::{extract_command_structure, scan_command_end};
use crate::data::constants::{EQUATION_BEGIN, EQUATION_END};
use crate::utils::error::{GuardError, GuardResult};

lazy_static! {
    // $$...$$ or \[...\], may span lines
    static ref DISPLAY_MATH: Regex = Regex::new(
        r"(?s)\$\$.*?\$\$|\\\[.*?\\\]"
    ).unwrap();

    // $...$ or \(...\), confined to one line
    static ref INLINE_MATH: Regex = Regex::new(
        r"\$[^$\n]*?\$|\\\([^\n]*?\\\)"
    ).unwrap();

    static ref COMMAND_NAME: Regex = Regex::new(r"\\[a-zA-Z0-9]+").unwrap();
}

// =============================================================================
// Element Model
// =============================================================================

/// Category of a lexical element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ElementKind {
    /// `\name[...]{...}`
    Command,
    /// `$...$` or `\(...\)`
    #[cfg_attr(feature = "serde", serde(rename = "math"))]
    MathInline,
    /// `$$...$$` or `\[...\]`
    MathDisplay,
    /// `\begin{equation}...\end{equation}`
    Equation,
}

impl ElementKind {
    /// Overlap resolution priority, higher wins
    pub fn priority(self) -> u8 {
        match self {
            ElementKind::Equation => 4,
            ElementKind::MathDisplay => 3,
            ElementKind::MathInline => 2,
            ElementKind::Command => 1,
        }
    }

    /// Stable category name, used in annotated output
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Command => "command",
            ElementKind::MathInline => "math",
            ElementKind::MathDisplay => "math-display",
            ElementKind::Equation => "equation",
        }
    }

    /// Class attached to annotated spans of this category
    pub fn css_class(self) -> &'static str {
        match self {
            ElementKind::Command => "latex-command",
            ElementKind::MathInline => "latex-math",
            ElementKind::MathDisplay => "latex-math-display",
            ElementKind::Equation => "latex-equation",
        }
    }

    pub fn is_math(self) -> bool {
        matches!(self, ElementKind::MathInline | ElementKind::MathDisplay)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One recognized markup span
///
/// Offsets are byte offsets into the scanned text, half-open, and `content`
/// is always the exact slice `text[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LatexElement {
    pub content: String,
    #[cfg_attr(feature = "serde", serde(rename = "startIndex"))]
    pub start: usize,
    #[cfg_attr(feature = "serde", serde(rename = "endIndex"))]
    pub end: usize,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ElementKind,
    /// Present only for commands
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub command_name: Option<String>,
    /// Present only for commands
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub command_structure: Option<String>,
}

impl LatexElement {
    /// Create a non-command element spanning `text[start..end]`
    pub fn new(text: &str, start: usize, end: usize, kind: ElementKind) -> Self {
        Self {
            content: text[start..end].to_string(),
            start,
            end,
            kind,
            command_name: None,
            command_structure: None,
        }
    }

    /// Create a command element, filling in its name and structure skeleton
    pub fn command(text: &str, start: usize, end: usize) -> Self {
        let mut element = Self::new(text, start, end, ElementKind::Command);
        if let Some(structure) = extract_command_structure(&element.content) {
            element.command_name = Some(structure.command_name);
            element.command_structure = Some(structure.structure);
        }
        element
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_command(&self) -> bool {
        self.kind == ElementKind::Command
    }

    /// Index-range overlap of two half-open spans
    pub fn overlaps(&self, other: &LatexElement) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Same span and same content
    pub fn same_position(&self, other: &LatexElement) -> bool {
        self.start == other.start && self.end == other.end && self.content == other.content
    }
}

// =============================================================================
// Scanning
// =============================================================================

/// Scan `text` and return its markup elements.
///
/// ```rust
/// use texguard::{tokenize, ElementKind};
///
/// let elements = tokenize(r"\section{Intro} where $x$ is");
/// assert_eq!(elements.len(), 2);
/// assert_eq!(elements[0].kind, ElementKind::Command);
/// assert_eq!(elements[1].content, "$x$");
/// ```
pub fn tokenize(text: &str) -> Vec<LatexElement> {
    let mut candidates = Vec::new();

    for m in DISPLAY_MATH.find_iter(text) {
        candidates.push(LatexElement::new(
            text,
            m.start(),
            m.end(),
            ElementKind::MathDisplay,
        ));
    }

    for m in INLINE_MATH.find_iter(text) {
        candidates.push(LatexElement::new(
            text,
            m.start(),
            m.end(),
            ElementKind::MathInline,
        ));
    }

    let equations = collect_equations(text, &mut candidates);

    for m in COMMAND_NAME.find_iter(text) {
        let enclosed = equations.iter().any(|eq| eq.contains(&m.start()));
        if enclosed {
            continue;
        }
        let end = scan_command_end(text, m.end());
        candidates.push(LatexElement::command(text, m.start(), end));
    }

    let candidate_count = candidates.len();
    let elements = resolve_overlaps(candidates);
    debug!(
        candidates = candidate_count,
        elements = elements.len(),
        "tokenized text"
    );
    elements
}

/// Push equation environments (or degraded begin markers) and return the
/// spans of the complete environments.
fn collect_equations(text: &str, candidates: &mut Vec<LatexElement>) -> Vec<Range<usize>> {
    let mut spans = Vec::new();

    for (start, _) in text.match_indices(EQUATION_BEGIN) {
        match find_equation_end(text, start + EQUATION_BEGIN.len()) {
            Some(end) => {
                candidates.push(LatexElement::new(text, start, end, ElementKind::Equation));
                spans.push(start..end);
            }
            None => {
                trace!(start, "unterminated equation environment");
                candidates.push(LatexElement::command(
                    text,
                    start,
                    start + EQUATION_BEGIN.len(),
                ));
            }
        }
    }

    spans
}

/// Offset just past the `\end{equation}` closing the body at brace depth zero
fn find_equation_end(text: &str, body_start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth: i64 = 0;

    for pos in body_start..bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b'\\' if depth == 0 && text[pos..].starts_with(EQUATION_END) => {
                return Some(pos + EQUATION_END.len());
            }
            _ => {}
        }
    }

    None
}

/// Sort candidates and drop every candidate that overlaps an accepted element
/// of equal or higher priority. A candidate of strictly higher priority evicts
/// the accepted elements it overlaps.
fn resolve_overlaps(mut candidates: Vec<LatexElement>) -> Vec<LatexElement> {
    candidates.sort_by_key(|e| e.start);

    let mut accepted: Vec<LatexElement> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let blocked = accepted.iter().any(|kept| {
            kept.overlaps(&candidate) && kept.kind.priority() >= candidate.kind.priority()
        });
        if blocked {
            continue;
        }

        accepted.retain(|kept| {
            let evict = kept.overlaps(&candidate);
            if evict {
                trace!(
                    evicted = %kept.kind,
                    by = %candidate.kind,
                    start = kept.start,
                    "overlap resolved"
                );
            }
            !evict
        });
        accepted.push(candidate);
    }

    accepted
}

/// Check that caller-supplied elements honor the offset contract for `text`:
/// non-empty in-range spans on char boundaries, content equal to the spanned
/// slice, ascending and non-overlapping.
pub fn validate_elements(text: &str, elements: &[LatexElement]) -> GuardResult<()> {
    let mut previous_end = 0;

    for (i, element) in elements.iter().enumerate() {
        if element.start >= element.end || element.end > text.len() {
            return Err(GuardError::invalid(format!(
                "element {} has span {}..{} outside 0..{}",
                i,
                element.start,
                element.end,
                text.len()
            )));
        }
        let Some(slice) = text.get(element.start..element.end) else {
            return Err(GuardError::invalid(format!(
                "element {} span {}..{} is not on a character boundary",
                i, element.start, element.end
            )));
        };
        if slice != element.content {
            return Err(GuardError::invalid(format!(
                "element {} content does not match text at {}..{}",
                i, element.start, element.end
            )));
        }
        if element.start < previous_end {
            return Err(GuardError::invalid(format!(
                "element {} starts at {} before the previous element ends at {}",
                i, element.start, previous_end
            )));
        }
        previous_end = element.end;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(elements: &[LatexElement]) -> Vec<ElementKind> {
        elements.iter().map(|e| e.kind).collect()
    }

    fn contents(elements: &[LatexElement]) -> Vec<&str> {
        elements.iter().map(|e| e.content.as_str()).collect()
    }

    #[test]
    fn test_simple_command() {
        let elements = tokenize(r"\item First item");
        assert_eq!(
            elements,
            vec![LatexElement {
                content: r"\item".to_string(),
                start: 0,
                end: 5,
                kind: ElementKind::Command,
                command_name: Some("item".to_string()),
                command_structure: Some(r"\item".to_string()),
            }]
        );
    }

    #[test]
    fn test_command_with_parameters() {
        let elements = tokenize(r"\textbf{bold text}");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].end, 18);
        assert_eq!(elements[0].command_structure.as_deref(), Some(r"\textbf{}"));
    }

    #[test]
    fn test_equation_environment() {
        let text = r"\begin{equation}E = mc^2\end{equation}";
        let elements = tokenize(text);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Equation);
        assert_eq!(elements[0].span(), 0..text.len());
        assert_eq!(elements[0].command_name, None);
    }

    #[test]
    fn test_equation_swallows_inner_markup() {
        let text = r"\begin{equation}\frac{a}{b} = $x$\end{equation} \ref{eq}";
        let elements = tokenize(text);
        assert_eq!(
            kinds(&elements),
            vec![ElementKind::Equation, ElementKind::Command]
        );
        assert_eq!(elements[1].content, r"\ref{eq}");
    }

    #[test]
    fn test_equation_end_inside_braces_is_skipped() {
        let text = r"\begin{equation}\text{\end{equation}} x\end{equation}";
        let elements = tokenize(text);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].end, text.len());
    }

    #[test]
    fn test_unterminated_equation_degrades_to_command() {
        let text = r"\begin{equation} x = 1";
        let elements = tokenize(text);
        assert_eq!(elements[0].kind, ElementKind::Command);
        assert_eq!(elements[0].content, r"\begin{equation}");
        assert_eq!(elements[0].command_name.as_deref(), Some("begin"));
        assert_eq!(elements[0].command_structure.as_deref(), Some(r"\begin{}"));
    }

    #[test]
    fn test_list_environment() {
        let text = "\\begin{enumerate}\n    \\item First item\n    \\item Second item\n\\end{enumerate}";
        let elements = tokenize(text);
        let names: Vec<_> = elements
            .iter()
            .filter_map(|e| e.command_name.as_deref())
            .collect();
        assert_eq!(names, vec!["begin", "item", "item", "end"]);
    }

    #[test]
    fn test_inline_and_display_math() {
        let text = r"Let $a$ and \(b\) with $$c = d$$ and \[e\]";
        let elements = tokenize(text);
        assert_eq!(
            kinds(&elements),
            vec![
                ElementKind::MathInline,
                ElementKind::MathInline,
                ElementKind::MathDisplay,
                ElementKind::MathDisplay,
            ]
        );
        assert_eq!(
            contents(&elements),
            vec!["$a$", r"\(b\)", "$$c = d$$", r"\[e\]"]
        );
    }

    #[test]
    fn test_display_math_spans_lines() {
        let text = "$$\na + b\n$$";
        let elements = tokenize(text);
        assert_eq!(kinds(&elements), vec![ElementKind::MathDisplay]);
    }

    #[test]
    fn test_inline_math_stops_at_newline() {
        let text = "$a\nb$";
        let elements = tokenize(text);
        assert!(elements.is_empty());

        let text = "\\(a\nb\\)";
        let elements = tokenize(text);
        assert!(elements.iter().all(|e| e.kind != ElementKind::MathInline));
    }

    #[test]
    fn test_math_evicts_overlapping_command() {
        let text = r"\textbf{$x$}";
        let elements = tokenize(text);
        assert_eq!(kinds(&elements), vec![ElementKind::MathInline]);
        assert_eq!(elements[0].content, "$x$");
    }

    #[test]
    fn test_commands_inside_math_are_dropped() {
        let text = r"$\alpha + \beta$";
        let elements = tokenize(text);
        assert_eq!(kinds(&elements), vec![ElementKind::MathInline]);
    }

    #[test]
    fn test_nested_command_is_dropped() {
        let text = r"\textbf{\emph{x}} after";
        let elements = tokenize(text);
        assert_eq!(contents(&elements), vec![r"\textbf{\emph{x}}"]);
    }

    #[test]
    fn test_malformed_command() {
        let text = r"\item{unclosed brace";
        let elements = tokenize(text);
        assert_eq!(contents(&elements), vec![text]);
    }

    #[test]
    fn test_empty_and_plain_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("This is plain text without any LaTeX commands.").is_empty());
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let text = "Überblick \\section{Einführung} und $ß$";
        let elements = tokenize(text);
        for e in &elements {
            assert_eq!(&text[e.span()], e.content);
        }
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_elements_are_ordered_and_disjoint() {
        let text = r"\section{A} $x \in \mathbb{R}$ \begin{equation}y\end{equation} \[z\] \cite{k}";
        let elements = tokenize(text);
        for pair in elements.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(validate_elements(text, &elements).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_spans() {
        let text = "abc";
        let bad = LatexElement {
            content: "abcd".to_string(),
            start: 0,
            end: 4,
            kind: ElementKind::Command,
            command_name: None,
            command_structure: None,
        };
        assert!(validate_elements(text, &[bad]).is_err());

        let mismatched = LatexElement {
            content: "xy".to_string(),
            start: 0,
            end: 2,
            kind: ElementKind::MathInline,
            command_name: None,
            command_structure: None,
        };
        assert!(validate_elements(text, &[mismatched]).is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ElementKind::MathInline.name(), "math");
        assert_eq!(ElementKind::MathDisplay.css_class(), "latex-math-display");
        assert!(ElementKind::Equation.priority() > ElementKind::MathDisplay.priority());
    }
}
