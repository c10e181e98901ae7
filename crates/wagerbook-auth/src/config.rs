//! Token authority configuration
//!
//! The signing key and token lifetime are process-wide settings loaded once at
//! startup. An empty key or a zero lifetime is a deployment error, so
//! [`TokenConfig::validate`] is called before a [`TokenAuthority`] is built.
//!
//! [`TokenAuthority`]: crate::TokenAuthority

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum recommended signing key length (256 bits)
pub const RECOMMENDED_KEY_LENGTH: usize = 32;

/// Token signing and lifetime configuration
///
/// Missing fields take their defaults, so a config file only has to name the
/// signing key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Symmetric key used to sign and verify tokens (HS256)
    pub signing_key: String,
    /// How long an issued token stays valid
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
    /// Token issuer claim
    pub issuer: String,
    /// Token audience claim
    pub audience: String,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("signing_key", &"[REDACTED]")
            .field("token_lifetime", &self.token_lifetime)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            signing_key: String::new(), // Must be set by the deployment
            token_lifetime: Duration::from_secs(60 * 60),
            issuer: "wagerbook".to_string(),
            audience: "wagerbook-api".to_string(),
        }
    }
}

impl TokenConfig {
    /// Create a configuration with the given key and lifetime, default issuer/audience
    pub fn new(signing_key: impl Into<String>, token_lifetime: Duration) -> Self {
        Self {
            signing_key: signing_key.into(),
            token_lifetime,
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// Returns every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.signing_key.is_empty() {
            errors.push("signing key must be set".to_string());
        }
        if self.token_lifetime.is_zero() {
            errors.push("token lifetime must be positive".to_string());
        }
        if self.issuer.is_empty() {
            errors.push("token issuer must not be empty".to_string());
        }
        if self.audience.is_empty() {
            errors.push("token audience must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether the signing key is shorter than recommended
    pub fn is_weak_key(&self) -> bool {
        self.signing_key.len() < RECOMMENDED_KEY_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert_eq!(config.token_lifetime, Duration::from_secs(3600));
        assert_eq!(config.issuer, "wagerbook");
        assert!(config.signing_key.is_empty());
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = TokenConfig::default();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["signing key must be set".to_string()]);
    }

    #[test]
    fn test_config_validation_zero_lifetime() {
        let config = TokenConfig::new("a".repeat(32), Duration::ZERO);
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("lifetime")));
    }

    #[test]
    fn test_config_validation_valid() {
        let config = TokenConfig::new("a".repeat(32), Duration::from_secs(60));
        assert!(config.validate().is_ok());
        assert!(!config.is_weak_key());
    }

    #[test]
    fn test_short_key_is_weak_but_valid() {
        let config = TokenConfig::new("short", Duration::from_secs(60));
        assert!(config.validate().is_ok());
        assert!(config.is_weak_key());
    }

    #[test]
    fn test_lifetime_deserializes_from_humantime() {
        let config: TokenConfig = serde_json::from_str(
            r#"{"signing_key":"k","token_lifetime":"15m","issuer":"i","audience":"a"}"#,
        )
        .unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(900));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TokenConfig =
            serde_json::from_str(r#"{"signing_key":"k","token_lifetime":"2h 30m"}"#).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(9000));
        assert_eq!(config.issuer, "wagerbook");
        assert_eq!(config.audience, "wagerbook-api");
    }

    #[test]
    fn test_signing_key_redacted_in_debug() {
        let config = TokenConfig::new("super-secret-value", Duration::from_secs(60));
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }
}
