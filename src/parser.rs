//! Pulls the recipe array out of a provider's free-text completion.
//!
//! Models wrap the JSON in prose or markdown fences, so the array is found
//! by scanning for the first `[` and its balanced `]`, skipping anything
//! inside string literals.

use log::debug;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// One recipe object exactly as the provider wrote it.
pub type RawRecipeRecord = Map<String, Value>;

/// Parse the first JSON array found in `raw_text` into recipe records.
pub fn parse(raw_text: &str) -> Result<Vec<RawRecipeRecord>, ParseError> {
    let slice = extract_json_array(raw_text)?;
    debug!("Extracted JSON array of {} bytes", slice.len());

    let items: Vec<Value> = serde_json::from_str(slice)?;
    if items.is_empty() {
        return Err(ParseError::Empty);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(ParseError::NotAnObject(index)),
        })
        .collect()
}

/// Return the substring spanning the first `[` to its matching `]`.
pub fn extract_json_array(text: &str) -> Result<&str, ParseError> {
    let start = text.find('[').ok_or(ParseError::NoArray)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::Unterminated)
}
