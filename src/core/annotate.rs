//! Annotated rendering of tokenized text
//!
//! Every element is wrapped in a `<span>` whose class names its category
//! (`latex-command`, `latex-math`, `latex-math-display`, `latex-equation`).
//! Validated rendering adds `latex-missing` to elements found in a missing set,
//! and detailed rendering additionally wraps the missing content in
//! `<strong>`. Text between elements is copied through untouched.

use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::compare::{elements_equivalent, CompareOptions};
use super::tokenizer::{ElementKind, LatexElement};
use crate::data::constants::{EMPHASIS_CLOSE, EMPHASIS_OPEN, MISSING_CLASS};

/// A missing sub-span of an element, relative to the element's content
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MissingPart {
    pub start: usize,
    pub end: usize,
    pub content: String,
}

/// Wrap every element of `text` in a category-tagged span
///
/// ```rust
/// use texguard::{annotate, tokenize};
///
/// let text = r"\item First";
/// let html = annotate(text, &tokenize(text));
/// assert_eq!(html, r#"<span class="latex-command">\item</span> First"#);
/// ```
pub fn annotate(text: &str, elements: &[LatexElement]) -> String {
    render(text, elements, |out, element| {
        push_span(out, element.kind, false, &element.content);
    })
}

/// Like [`annotate`], marking elements that are equivalent to a member of
/// `missing` with the `latex-missing` class
pub fn annotate_validated(
    text: &str,
    elements: &[LatexElement],
    missing: &[LatexElement],
) -> String {
    annotate_validated_with_options(text, elements, missing, &CompareOptions::default())
}

pub fn annotate_validated_with_options(
    text: &str,
    elements: &[LatexElement],
    missing: &[LatexElement],
    options: &CompareOptions,
) -> String {
    render(text, elements, |out, element| {
        let flagged = is_flagged_missing(element, missing, options);
        push_span(out, element.kind, flagged, &element.content);
    })
}

/// Like [`annotate_validated`], additionally emphasizing the missing parts of
/// each flagged element. `reference_text` is the translated text the missing
/// set was computed against.
pub fn annotate_detailed(
    text: &str,
    elements: &[LatexElement],
    missing: &[LatexElement],
    reference_text: &str,
) -> String {
    annotate_detailed_with_options(
        text,
        elements,
        missing,
        reference_text,
        &CompareOptions::default(),
    )
}

pub fn annotate_detailed_with_options(
    text: &str,
    elements: &[LatexElement],
    missing: &[LatexElement],
    reference_text: &str,
    options: &CompareOptions,
) -> String {
    render(text, elements, |out, element| {
        if !is_flagged_missing(element, missing, options) {
            push_span(out, element.kind, false, &element.content);
            return;
        }

        let mut content = element.content.clone();
        let mut parts = missing_parts(element, reference_text);
        parts.sort_by(|a, b| b.start.cmp(&a.start));
        for part in parts {
            content.replace_range(
                part.start..part.end,
                &format!("{}{}{}", EMPHASIS_OPEN, part.content, EMPHASIS_CLOSE),
            );
        }
        push_span(out, element.kind, true, &content);
    })
}

/// Whether `element` is the same as some member of `missing`, either by
/// position or by the comparator's equivalence rules
pub fn is_flagged_missing(
    element: &LatexElement,
    missing: &[LatexElement],
    options: &CompareOptions,
) -> bool {
    missing
        .iter()
        .any(|m| element.same_position(m) || elements_equivalent(element, m, options))
}

/// Locate the parts of a missing element to emphasize.
///
/// Commands are always reported whole. Math and equations are reported whole
/// unless their content still occurs verbatim somewhere in `reference_text`.
pub fn missing_parts(element: &LatexElement, reference_text: &str) -> Vec<MissingPart> {
    let whole = MissingPart {
        start: 0,
        end: element.content.len(),
        content: element.content.clone(),
    };

    match element.kind {
        ElementKind::Command => vec![whole],
        ElementKind::MathInline | ElementKind::MathDisplay | ElementKind::Equation => {
            if reference_text.contains(element.content.as_str()) {
                Vec::new()
            } else {
                vec![whole]
            }
        }
    }
}

fn push_span(out: &mut String, kind: ElementKind, missing: bool, content: &str) {
    out.push_str("<span class=\"");
    out.push_str(kind.css_class());
    if missing {
        out.push(' ');
        out.push_str(MISSING_CLASS);
    }
    out.push_str("\">");
    out.push_str(content);
    out.push_str("</span>");
}

/// Walk elements by ascending start offset, copying the gaps between them and
/// letting `emit` render each element
fn render<F>(text: &str, elements: &[LatexElement], mut emit: F) -> String
where
    F: FnMut(&mut String, &LatexElement),
{
    if elements.is_empty() {
        return text.to_string();
    }

    let mut ordered: Vec<&LatexElement> = elements.iter().collect();
    ordered.sort_by_key(|e| e.start);

    let mut out = String::with_capacity(text.len() + elements.len() * 32);
    let mut last = 0;

    for element in ordered {
        let in_bounds = element.start >= last
            && element.start < element.end
            && text.get(element.start..element.end).is_some();
        debug_assert!(
            in_bounds,
            "element {}..{} violates the offset contract",
            element.start, element.end
        );
        if !in_bounds {
            warn!(
                start = element.start,
                end = element.end,
                "skipping element outside text or overlapping its predecessor"
            );
            continue;
        }

        out.push_str(&text[last..element.start]);
        emit(&mut out, element);
        last = element.end;
    }

    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compare::compare_elements;
    use crate::core::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_elements_returns_input() {
        let text = "plain <text> & more";
        assert_eq!(annotate(text, &[]), text);
        assert_eq!(annotate_validated(text, &[], &[]), text);
        assert_eq!(annotate_detailed(text, &[], &[], ""), text);
    }

    #[test]
    fn test_plain_annotation() {
        let text = r"\item First item";
        let html = annotate(text, &tokenize(text));
        assert_eq!(html, r#"<span class="latex-command">\item</span> First item"#);
    }

    #[test]
    fn test_each_category_class() {
        let text = r"\emph{a} $b$ $$c$$ \begin{equation}d\end{equation}";
        let html = annotate(text, &tokenize(text));
        assert_eq!(
            html,
            concat!(
                r#"<span class="latex-command">\emph{a}</span> "#,
                r#"<span class="latex-math">$b$</span> "#,
                r#"<span class="latex-math-display">$$c$$</span> "#,
                r#"<span class="latex-equation">\begin{equation}d\end{equation}</span>"#,
            )
        );
    }

    #[test]
    fn test_validated_without_missing_matches_plain() {
        let text = "\\section{Intro}\n\\label{intro} with $x$";
        let elements = tokenize(text);
        assert_eq!(
            annotate_validated(text, &elements, &[]),
            annotate(text, &elements)
        );
    }

    #[test]
    fn test_validated_flags_missing() {
        let original = r"\section{Intro}\label{intro}";
        let translated = r"\section{Introducción}\label{introduccion}";
        let elements = tokenize(original);
        let result = compare_elements(&elements, &tokenize(translated));

        let html = annotate_validated(original, &elements, &result.missing);
        assert_eq!(
            html,
            concat!(
                r#"<span class="latex-command">\section{Intro}</span>"#,
                r#"<span class="latex-command latex-missing">\label{intro}</span>"#,
            )
        );
    }

    #[test]
    fn test_validated_flags_equivalent_duplicates() {
        let original = r"\item a \item b";
        let elements = tokenize(original);
        let result = compare_elements(&elements, &tokenize(r"\item a"));
        assert_eq!(result.missing.len(), 1);

        let html = annotate_validated(original, &elements, &result.missing);
        assert_eq!(html.matches(MISSING_CLASS).count(), 2);
    }

    #[test]
    fn test_detailed_emphasizes_commands() {
        let original = r"See \ref{fig}.";
        let elements = tokenize(original);
        let translated = r"Ver \ref{figura}.";
        let result = compare_elements(&elements, &tokenize(translated));

        let html = annotate_detailed(original, &elements, &result.missing, translated);
        assert_eq!(
            html,
            r#"See <span class="latex-command latex-missing"><strong>\ref{fig}</strong></span>."#
        );
    }

    #[test]
    fn test_detailed_math_found_in_reference_is_not_emphasized() {
        let element = LatexElement::new("$x$", 0, 3, ElementKind::MathInline);
        assert!(missing_parts(&element, "text with $x$ inside").is_empty());
        assert_eq!(
            missing_parts(&element, "no math"),
            vec![MissingPart {
                start: 0,
                end: 3,
                content: "$x$".to_string(),
            }]
        );

        let html = annotate_detailed("$x$", &[element.clone()], &[element], "has $x$");
        assert_eq!(html, r#"<span class="latex-math latex-missing">$x$</span>"#);
    }

    #[test]
    fn test_detailed_math_missing_from_reference() {
        let original = "Let $x^2$ be";
        let translated = "Sea $y^2$";
        let elements = tokenize(original);
        let result = compare_elements(&elements, &tokenize(translated));

        let html = annotate_detailed(original, &elements, &result.missing, translated);
        assert_eq!(
            html,
            r#"Let <span class="latex-math latex-missing"><strong>$x^2$</strong></span> be"#
        );
    }

    #[test]
    fn test_unsorted_elements_are_walked_in_order() {
        let text = r"\a \b";
        let mut elements = tokenize(text);
        elements.reverse();
        assert_eq!(
            annotate(text, &elements),
            r#"<span class="latex-command">\a</span> <span class="latex-command">\b</span>"#
        );
    }
}
