//! Slugs, anchors and display titles derived from Python names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::docstring::title_case;

/// A capitalised word following any character.
static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid word regex"));

/// A capital letter following a lowercase letter or digit.
static CASE_STEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid case regex"));

/// Anything not allowed in a constants anchor.
static ANCHOR_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid anchor regex"));

/// Convert a CamelCase or snake_case name to a kebab-case slug.
///
/// Acronym runs stay together until their last capital starts a new word, so `RGBColor` becomes
/// `rgb-color`.
pub fn camel_to_kebab(name: &str) -> String {
    let words = WORD_START.replace_all(name, "${1}-${2}");
    let words = CASE_STEP.replace_all(&words, "${1}-${2}");
    words.replace('_', "-").to_lowercase()
}

/// Anchor of an enumeration's section on the constants page.
pub fn constants_anchor(name: &str) -> String {
    let slug = name.to_lowercase().replace(' ', "-");
    ANCHOR_STRIP.replace_all(&slug, "").into_owned()
}

/// `get_mouse_pos` becomes `Get Mouse Pos`.
pub fn snake_to_title(name: &str) -> String {
    title_case(name.replace('_', " ").trim())
}
