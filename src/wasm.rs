//! WASM bindings for texguard
//!
//! This module provides JavaScript-accessible functions for tokenizing,
//! comparing and highlighting LaTeX in the browser. Element objects use the
//! `{content, startIndex, endIndex, type, commandName?, commandStructure?}`
//! shape; offsets are UTF-8 byte offsets.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{CompareOptions, GuardError, LatexElement};

/// Comparison options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
pub struct WasmCompareOptions {
    /// Use the extended reference command set (`\eqref`, `\cref`, ...)
    #[serde(default)]
    pub strict_references: bool,
    /// Additional commands whose content must not change
    #[serde(default)]
    pub reference_commands: Vec<String>,
}

#[cfg(feature = "wasm")]
impl From<WasmCompareOptions> for CompareOptions {
    fn from(opts: WasmCompareOptions) -> Self {
        let base = if opts.strict_references {
            CompareOptions::strict_references()
        } else {
            CompareOptions::default()
        };
        opts.reference_commands
            .into_iter()
            .fold(base, |options, name| options.with_reference_command(name))
    }
}

/// Summary of translation check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&GuardError::serialization(e.to_string()).to_string()))
}

#[cfg(feature = "wasm")]
fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&GuardError::serialization(e.to_string()).to_string()))
}

#[cfg(feature = "wasm")]
fn options_from_js(options: JsValue) -> CompareOptions {
    if options.is_undefined() || options.is_null() {
        return CompareOptions::default();
    }
    serde_wasm_bindgen::from_value::<WasmCompareOptions>(options)
        .unwrap_or_default()
        .into()
}

/// Tokenize LaTeX text into its markup elements
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "tokenize")]
pub fn tokenize_wasm(text: &str) -> Result<JsValue, JsValue> {
    to_js(&crate::tokenize(text))
}

/// Compare two element arrays produced by `tokenize`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "compareElements")]
pub fn compare_elements_wasm(
    original: JsValue,
    translated: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let original: Vec<LatexElement> = from_js(original)?;
    let translated: Vec<LatexElement> = from_js(translated)?;
    let options = options_from_js(options);
    to_js(&crate::compare_elements_with_options(
        &original,
        &translated,
        &options,
    ))
}

/// Tokenize and compare two texts
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "compareTexts")]
pub fn compare_texts_wasm(
    original: &str,
    translated: &str,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let options = options_from_js(options);
    to_js(&crate::compare_texts_with_options(
        original, translated, &options,
    ))
}

/// Highlight LaTeX elements in text
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "highlight")]
pub fn highlight_wasm(text: &str) -> String {
    crate::annotate(text, &crate::tokenize(text))
}

/// Highlight the original text, flagging what the translation lost
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "highlightWithValidation")]
pub fn highlight_with_validation_wasm(original: &str, translated: &str, detailed: bool) -> String {
    crate::highlight_translation(original, translated, detailed)
}

/// Annotate text with caller-supplied elements and missing set
///
/// The elements are checked against the text before rendering.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "annotateValidated")]
pub fn annotate_validated_wasm(
    text: &str,
    elements: JsValue,
    missing: JsValue,
) -> Result<String, JsValue> {
    let elements: Vec<LatexElement> = from_js(elements)?;
    let missing: Vec<LatexElement> = from_js(missing)?;
    crate::validate_elements(text, &elements).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(crate::annotate_validated(text, &elements, &missing))
}

/// Check a translated document paragraph by paragraph
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkTranslation")]
pub fn check_translation_wasm(
    original: &str,
    translated: &str,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    use crate::diagnostics::DiagnosticLevel;

    let options = options_from_js(options);
    let result = crate::diagnostics::check_translation(original, translated, &options);

    // Group diagnostics by level
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.to_string()),
            DiagnosticLevel::Warning => warnings.push(d.to_string()),
            DiagnosticLevel::Info => infos.push(d.to_string()),
        }
    }

    to_js(&CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    })
}

/// Translation progress of a document
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "documentStats")]
pub fn document_stats_wasm(original: &str, translated: &str) -> Result<JsValue, JsValue> {
    to_js(&crate::DocumentReport::new(original, translated).stats())
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
