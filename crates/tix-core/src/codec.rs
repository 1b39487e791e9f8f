//! Flat-text codec for the editable ticket representation.
//!
//! One `name=value` line per field. Values are written literally, so a value
//! containing newlines spans several lines in the file, and the parser's
//! lookahead rule stitches it back together: a new field starts only at a
//! line that looks like a header (`token=`), everything else continues the
//! current value.
//!
//! The flip side of that rule is a known ambiguity: a value line that itself
//! begins with `word=` is indistinguishable from a header and starts a new
//! field. That limitation is deliberate and pinned by tests; there is no
//! escaping layer.

use crate::record::FieldMap;

/// Render a field map to editable text, one `name=value` line per field.
#[must_use]
pub fn serialize(fields: &FieldMap) -> String {
    let mut out = String::new();
    for (name, value) in fields {
        out.push_str(name);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Parse editable text back into a field map.
///
/// Never fails: lines before the first header are dropped rather than
/// rejected. Trailing whitespace of each value is stripped. Duplicate
/// headers keep the last value.
#[must_use]
pub fn deserialize(text: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        if let Some((name, rest)) = split_header(line) {
            if let Some((done_name, done_value)) = current.take() {
                fields.insert(done_name, done_value.trim_end().to_string());
            }
            current = Some((name.to_string(), rest.to_string()));
        } else if let Some((_, value)) = current.as_mut() {
            value.push('\n');
            value.push_str(line);
        }
    }

    if let Some((name, value)) = current {
        fields.insert(name, value.trim_end().to_string());
    }

    fields
}

/// A header is a run of non-whitespace characters immediately followed by `=`.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once('=')?;
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return None;
    }
    Some((name, rest))
}
