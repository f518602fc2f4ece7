//! Structural comparison of two element sequences
//!
//! Given the elements of an original text and of its translation, the
//! comparator reports which original elements have no structural counterpart
//! in the translation (`missing`) and which translated elements have no
//! counterpart in the original (`different`).
//!
//! ## Equivalence rules
//!
//! | Elements | Match when |
//! |----------|-----------|
//! | `\begin` / `\end` | same name, same skeleton, same environment name |
//! | reference commands (`\label`, `\ref`, `\cite`, `\citet`) | same name, same skeleton, identical content |
//! | other commands | same name, same skeleton (payload may be translated) |
//! | equations | identical content |
//! | inline / display math | identical content, category may differ |
//!
//! Commands are matched greedily as a multiset: each original command claims
//! the first unclaimed equivalent translated command. The search for extra
//! translated commands is a second, independent run with its own claim
//! markers, so the two lists answer separate questions and never share state.

use fxhash::FxHashSet;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::command::environment_name;
use super::tokenizer::{ElementKind, LatexElement};
use crate::data::constants::{
    is_environment_marker, EXTENDED_REFERENCE_COMMANDS, REFERENCE_COMMANDS,
};

// =============================================================================
// Options
// =============================================================================

/// Options controlling which commands must keep their payload verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Commands whose full content must be byte-identical across translation.
    /// Default: `label`, `ref`, `cite`, `citet`
    pub reference_commands: FxHashSet<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            reference_commands: REFERENCE_COMMANDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CompareOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default reference commands plus `\eqref`, `\pageref`, `\cref`, the
    /// natbib citation variants and link targets
    pub fn strict_references() -> Self {
        let mut options = Self::default();
        options
            .reference_commands
            .extend(EXTENDED_REFERENCE_COMMANDS.iter().map(|s| s.to_string()));
        options
    }

    /// Treat one more command as identifier-bearing
    pub fn with_reference_command(mut self, name: impl Into<String>) -> Self {
        self.reference_commands.insert(name.into());
        self
    }

    pub fn is_reference_command(&self, name: &str) -> bool {
        self.reference_commands.contains(name)
    }
}

// =============================================================================
// Result
// =============================================================================

/// Outcome of comparing an original element sequence with a translated one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompareResult {
    /// Original elements with no counterpart in the translation
    pub missing: Vec<LatexElement>,
    /// Translated elements with no counterpart in the original, plus original
    /// math whose counterpart changed between inline and display
    pub different: Vec<LatexElement>,
}

impl CompareResult {
    /// Nothing missing and nothing different
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.different.is_empty()
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Commands carrying a structure skeleton take part in multiset matching
fn is_structured_command(element: &LatexElement) -> bool {
    element.kind == ElementKind::Command && element.command_structure.is_some()
}

/// Structural equivalence of two commands
pub fn commands_match(a: &LatexElement, b: &LatexElement, options: &CompareOptions) -> bool {
    let (Some(name), Some(other_name)) = (a.command_name.as_deref(), b.command_name.as_deref())
    else {
        return false;
    };
    if name != other_name || a.command_structure != b.command_structure {
        return false;
    }

    if is_environment_marker(name) {
        match (environment_name(&a.content), environment_name(&b.content)) {
            (Some(env), Some(other_env)) => env == other_env,
            _ => false,
        }
    } else if options.is_reference_command(name) {
        a.content == b.content
    } else {
        true
    }
}

/// Equivalence of any two elements under the category rule table.
///
/// Structured commands use [`commands_match`]; every other pairing requires
/// identical content. Math elements match across inline and display.
pub fn elements_equivalent(a: &LatexElement, b: &LatexElement, options: &CompareOptions) -> bool {
    if is_structured_command(a) && is_structured_command(b) {
        return commands_match(a, b, options);
    }
    a.content == b.content
}

/// Counterpart rule for the non-command pass
fn non_command_match(original: &LatexElement, translated: &LatexElement) -> bool {
    if is_structured_command(translated) {
        return false;
    }
    match original.kind {
        ElementKind::Equation => {
            translated.kind == ElementKind::Equation && translated.content == original.content
        }
        ElementKind::MathInline | ElementKind::MathDisplay => {
            translated.kind.is_math() && translated.content == original.content
        }
        ElementKind::Command => translated.content == original.content,
    }
}

/// Claim the first unclaimed equivalent command in `pool`
fn claim_match(
    needle: &LatexElement,
    pool: &[&LatexElement],
    claimed: &mut [bool],
    options: &CompareOptions,
) -> bool {
    let hit = pool
        .iter()
        .zip(claimed.iter())
        .position(|(candidate, &used)| !used && commands_match(needle, candidate, options));

    match hit {
        Some(index) => {
            claimed[index] = true;
            true
        }
        None => false,
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Compare two element sequences with the default options
pub fn compare_elements(original: &[LatexElement], translated: &[LatexElement]) -> CompareResult {
    compare_elements_with_options(original, translated, &CompareOptions::default())
}

/// Compare two element sequences.
///
/// `missing` keeps original order (commands first, then the other elements);
/// `different` lists extra translated commands in translated order followed by
/// original math elements whose counterpart changed category.
///
/// An empty original sequence yields an empty result.
pub fn compare_elements_with_options(
    original: &[LatexElement],
    translated: &[LatexElement],
    options: &CompareOptions,
) -> CompareResult {
    let mut result = CompareResult::default();
    if original.is_empty() {
        return result;
    }

    let original_commands: Vec<&LatexElement> =
        original.iter().filter(|e| is_structured_command(e)).collect();
    let translated_commands: Vec<&LatexElement> =
        translated.iter().filter(|e| is_structured_command(e)).collect();

    // What got lost
    let mut claimed_translated = vec![false; translated_commands.len()];
    for command in &original_commands {
        if !claim_match(command, &translated_commands, &mut claimed_translated, options) {
            result.missing.push((*command).clone());
        }
    }

    // What got added
    let mut claimed_original = vec![false; original_commands.len()];
    for command in &translated_commands {
        if !claim_match(command, &original_commands, &mut claimed_original, options) {
            result.different.push((*command).clone());
        }
    }

    for element in original.iter().filter(|e| !is_structured_command(e)) {
        match translated.iter().find(|t| non_command_match(element, t)) {
            None => result.missing.push(element.clone()),
            Some(counterpart) if counterpart.kind != element.kind => {
                result.different.push(element.clone())
            }
            Some(_) => {}
        }
    }

    debug!(
        original = original.len(),
        translated = translated.len(),
        missing = result.missing.len(),
        different = result.different.len(),
        "compared element sequences"
    );
    result
}
