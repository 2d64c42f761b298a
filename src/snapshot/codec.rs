//! Snapshot line codec
//!
//! Encodes one `(key, value)` pair per line as `key:value`, escaping the
//! characters that would otherwise break the line structure.
//!
//! ## Escapes
//! ```text
//! ┌───────────┬──────────┐
//! │ Character │ Written  │
//! ├───────────┼──────────┤
//! │ \         │ \\       │
//! │ :         │ \:       │
//! │ LF        │ \n       │
//! │ CR        │ \r       │
//! └───────────┴──────────┘
//! ```
//! Text without backslashes reads back verbatim, so plain `key:value` files
//! written by hand load as expected.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Result, SkipKvError};

/// Separates key from value on each line
pub const DELIMITER: char = ':';

const ESCAPE: char = '\\';

// =============================================================================
// Encoding
// =============================================================================

/// Append `field` to `out`, escaped
pub fn escape_into(out: &mut String, field: &str) {
    for ch in field.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\:"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

/// Append one full record, including the trailing newline
pub fn encode_record<K: Display, V: Display>(out: &mut String, key: &K, value: &V) {
    escape_into(out, &key.to_string());
    out.push(DELIMITER);
    escape_into(out, &value.to_string());
    out.push('\n');
}

// =============================================================================
// Decoding
// =============================================================================

/// Split a line at its first unescaped delimiter
pub fn split_record(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (pos, ch) in line.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            ESCAPE => escaped = true,
            DELIMITER => return Some((&line[..pos], &line[pos + 1..])),
            _ => {}
        }
    }
    None
}

/// Reverse [`escape_into`]. Unknown or dangling escapes are rejected.
pub fn unescape(field: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(ESCAPE) => out.push(ESCAPE),
            Some(DELIMITER) => out.push(DELIMITER),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => return Err(format!("unknown escape sequence '\\{}'", other)),
            None => return Err("dangling escape at end of field".to_string()),
        }
    }
    Ok(out)
}

/// Decode one non-empty line into a typed pair
///
/// `line_no` is 1-based and only used for error reporting. A raw delimiter
/// after the first one is kept as part of the value.
pub fn decode_record<K, V>(line_no: usize, line: &str) -> Result<(K, V)>
where
    K: FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
{
    let (raw_key, raw_value) = split_record(line).ok_or_else(|| {
        SkipKvError::parse(line_no, format!("missing '{}' delimiter", DELIMITER))
    })?;

    let key_text = unescape(raw_key)
        .map_err(|e| SkipKvError::parse(line_no, format!("key: {}", e)))?;
    let value_text = unescape(raw_value)
        .map_err(|e| SkipKvError::parse(line_no, format!("value: {}", e)))?;

    let key = key_text
        .parse::<K>()
        .map_err(|e| SkipKvError::parse(line_no, format!("invalid key {:?}: {}", key_text, e)))?;
    let value = value_text.parse::<V>().map_err(|e| {
        SkipKvError::parse(line_no, format!("invalid value {:?}: {}", value_text, e))
    })?;

    Ok((key, value))
}
