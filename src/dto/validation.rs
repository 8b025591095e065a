//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum accepted length for player identifiers.
const MAX_PLAYER_ID_LENGTH: usize = 64;

/// Validates that a player id is non-blank and of reasonable length.
///
/// Identifiers come from external directories, so beyond length the only
/// requirement is that they contain something printable.
pub fn validate_player_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("player_id_blank");
        err.message = Some("Player id must not be blank".into());
        return Err(err);
    }

    if id.len() > MAX_PLAYER_ID_LENGTH {
        let mut err = ValidationError::new("player_id_length");
        err.message = Some(
            format!(
                "Player id must be at most {} characters (got {})",
                MAX_PLAYER_ID_LENGTH,
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_id_valid() {
        assert!(validate_player_id("p1").is_ok());
        assert!(validate_player_id("espn:4047365").is_ok());
        assert!(validate_player_id(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_player_id_blank() {
        assert!(validate_player_id("").is_err());
        assert!(validate_player_id("   ").is_err());
    }

    #[test]
    fn test_validate_player_id_too_long() {
        assert!(validate_player_id(&"x".repeat(65)).is_err());
    }
}
