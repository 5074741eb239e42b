use super::text::TextGenerator;
use crate::error::{MockError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Names that would shadow the management routes.
pub const RESERVED_ENTITY_NAMES: &[&str] = &["mock"];

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z][a-z0-9_]*").expect("entity word regex should be valid"));

/// Derive the canonical entity identifier for `description`.
///
/// Asks the backend for a name, then normalizes it to one lowercase singular
/// ASCII word usable as a URL path segment.
///
/// # Errors
///
/// - `Validation` when `description` is blank
/// - `Generation` when the backend fails, the reply has no usable word, or the
///   name is reserved
pub fn derive_entity_name(text: &TextGenerator, description: &str) -> Result<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(MockError::validation("description is required"));
    }
    let raw = text.propose_entity_name(description)?;
    debug!(raw = %raw, "Entity name proposed");
    let name = normalize_entity_name(&raw).ok_or_else(|| {
        MockError::generation(format!("no usable entity name in reply '{}'", raw.trim()))
    })?;
    if RESERVED_ENTITY_NAMES.contains(&name.as_str()) {
        return Err(MockError::generation(format!(
            "entity name '{name}' is reserved"
        )));
    }
    info!(entity = %name, "Entity name derived");
    Ok(name)
}

/// Reduce a free-form reply to a single lowercase singular identifier.
///
/// Returns `None` when the reply holds no ASCII word, or more than one.
#[must_use]
pub fn normalize_entity_name(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    let mut words = WORD.find_iter(&lowered);
    let token = words.next()?.as_str().trim_end_matches('_');
    if words.next().is_some() {
        return None;
    }
    let singular = singularize(token);
    (!singular.is_empty()).then_some(singular)
}

fn singularize(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    // only the sibilant plurals that are unambiguous
    if word.ends_with("sses") || (word.len() > 4 && word.ends_with("xes")) {
        return word[..word.len() - 2].to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if word.len() > 3 && word.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
