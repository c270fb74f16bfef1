//! SOAP message preparation: inline-or-file resolution and placeholder
//! substitution.

use crate::error::{KeywordError, Result};
use crate::xml::is_well_formed;
use std::fs;
use std::path::Path;

/// Returns the envelope text for `message`.
///
/// Well-formed XML is used verbatim. Anything else is taken as the path of a
/// UTF-8 file holding the envelope.
///
/// # Errors
///
/// `KeywordError::MalformedInput` when `message` is neither well-formed XML
/// nor an existing file; `KeywordError::Io` when the file cannot be read as
/// UTF-8 text.
pub fn resolve_message(message: &str) -> Result<String> {
    if is_well_formed(message) {
        return Ok(message.to_string());
    }

    let path = Path::new(message);
    if !path.is_file() {
        return Err(KeywordError::MalformedInput(format!(
            "File '{}' not found or message is not well-formed",
            message
        )));
    }

    tracing::debug!(path = %path.display(), "reading SOAP message from file");
    fs::read_to_string(path).map_err(|e| KeywordError::io(message, e))
}

/// Applies literal `old -> new` substitutions in the given order.
///
/// Substitution is plain text replacement, not XML-aware; a later pair also
/// rewrites text produced by an earlier one.
pub fn apply_replacements(message: &str, replace: &[(String, String)]) -> String {
    replace
        .iter()
        .fold(message.to_string(), |text, (old, new)| {
            if old.is_empty() {
                text
            } else {
                text.replace(old.as_str(), new)
            }
        })
}
