use crate::error::{MyRsError, Result};

/// Validates and backtick-quotes a table/column identifier.
///
/// Dotted names are quoted per segment: `db.users` becomes `` `db`.`users` ``.
/// Each segment must start with an ASCII letter or underscore and continue
/// with ASCII letters, digits, or underscores. Anything else fails with
/// [`MyRsError::InvalidIdentifier`], so an untrusted name can never smuggle
/// SQL into a rendered statement. Raw expressions never pass through here.
pub fn quote_identifier(raw: &str) -> Result<String> {
    let mut quoted = String::with_capacity(raw.len() + 4);
    for (i, segment) in raw.split('.').enumerate() {
        if !is_valid_segment(segment) {
            return Err(MyRsError::invalid_identifier(raw));
        }
        if i > 0 {
            quoted.push('.');
        }
        quoted.push('`');
        quoted.push_str(segment);
        quoted.push('`');
    }
    Ok(quoted)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
