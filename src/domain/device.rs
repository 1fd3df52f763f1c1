/// Opaque per-install identifier issued by the push provider.
pub type DeviceToken = String;

/// Caller-asserted owner of a set of device tokens.
pub type UserId = String;

/// Longest token accepted at registration.
pub const MAX_TOKEN_LEN: usize = 4096;

/// Checks that a token is present and of sane length.
///
/// # Errors
/// Returns a message suitable for a 400 response when the token is empty or too long.
pub fn validate_token(token: &str) -> Result<(), String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err("Token is required".into());
    }
    if trimmed.len() > MAX_TOKEN_LEN {
        return Err(format!("Token is too long (max {MAX_TOKEN_LEN} characters)"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token_success() {
        assert!(validate_token("ExponentPushToken[abc]").is_ok());
    }

    #[test]
    fn test_validate_token_empty() {
        assert_eq!(validate_token("   ").unwrap_err(), "Token is required");
    }

    #[test]
    fn test_validate_token_too_long() {
        assert_eq!(validate_token(&"A".repeat(4097)).unwrap_err(), "Token is too long (max 4096 characters)");
    }
}
