use validator::Validate;

use crate::error::{Error, Result};

pub const MAX_IDENTIFIER_LEN: usize = 128;

pub fn validate<T: Validate>(val: &T) -> std::result::Result<(), validator::ValidationErrors> {
    val.validate()
}

/// Accepts the identity references scanning stations emit: non-empty, at most
/// `MAX_IDENTIFIER_LEN` characters, ASCII alphanumerics plus `- _ . : @`.
/// Returns the trimmed id.
pub fn participant_id(raw: &str) -> Result<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(Error::InvalidParticipant("participant id is empty".to_string()));
    }
    if id.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(Error::InvalidParticipant(format!(
            "participant id exceeds {} characters",
            MAX_IDENTIFIER_LEN
        )));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '@')))
    {
        return Err(Error::InvalidParticipant(format!(
            "participant id contains invalid character {:?}",
            bad
        )));
    }
    Ok(id.to_string())
}
