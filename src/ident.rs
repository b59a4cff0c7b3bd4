use thiserror::Error;

/// The label normalized to nothing the measurements API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid metric identifier derived from label {label:?}")]
pub struct InvalidIdentifier {
    pub label: String,
}

/// Maps a free-form label onto the `[A-Z0-9_]+` identifier scheme.
///
/// Whitespace runs become a single `_` before anything is stripped, so word
/// boundaries survive while punctuation simply disappears. The emptiness check
/// looks at the label alone: an organization prefix never rescues an empty one.
pub fn normalize(label: &str, organization: Option<&str>) -> Result<String, InvalidIdentifier> {
    let mut id = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        let c = c.to_ascii_uppercase();
        if is_identifier_char(c) {
            id.push(c);
        }
    }
    if id.is_empty() {
        return Err(InvalidIdentifier {
            label: label.to_owned(),
        });
    }
    match organization {
        Some(org) => Ok(format!("{}_{id}", org.to_uppercase())),
        None => Ok(id),
    }
}

fn is_identifier_char(c: char) -> bool {
    matches!(c, 'A'..='Z' | '0'..='9' | '_')
}
