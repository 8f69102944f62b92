//! Secret masking for stored integration credentials.
//!
//! Secrets never leave the server in clear text. Reads expose only enough of
//! the value to let a user recognize which key is stored.

/// Masks a secret, keeping at most the last four characters visible.
///
/// Short secrets are fully masked.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::mask_secret;

    #[test]
    fn test_keeps_last_four() {
        assert_eq!(mask_secret("sk-live-abcd1234"), "****1234");
    }

    #[test]
    fn test_short_secret_fully_masked() {
        assert_eq!(mask_secret("abcd"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_masked_never_reveals_prefix() {
        let masked = mask_secret("super-secret-token-xyz9");
        assert!(!masked.contains("super"));
        assert!(masked.ends_with("xyz9"));
    }
}
