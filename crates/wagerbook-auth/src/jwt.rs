//! Token Authority
//!
//! Issues and verifies HS256-signed bearer tokens. Verification is stateless:
//! there is no revocation store, so a token stays valid until its `exp`.
//!
//! Expiry is checked here and only here. The JWT library's own `exp`
//! validation is switched off because it applies a leeway and reads the
//! system clock, which would make `verify_at` non-deterministic.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::{resolve_permissions, Claims, IssuedToken, Permission, Role, TokenClaims};

/// Token issuance and verification service
#[derive(Clone)]
pub struct TokenAuthority {
    config: TokenConfig,
    lifetime: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("token_lifetime", &self.config.token_lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Create a new token authority
    ///
    /// Fails with [`AuthError::Config`] when the configuration is invalid; the
    /// caller is expected to treat that as fatal.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        config
            .validate()
            .map_err(|errors| AuthError::Config(errors.join("; ")))?;

        if config.is_weak_key() {
            tracing::warn!("Signing key is shorter than 256 bits");
        }

        let lifetime = Duration::from_std(config.token_lifetime)
            .map_err(|e| AuthError::Config(format!("token lifetime out of range: {}", e)))?;
        Utc::now()
            .checked_add_signed(lifetime)
            .ok_or_else(|| AuthError::Config("token lifetime out of range".to_string()))?;
        let encoding_key = EncodingKey::from_secret(config.signing_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.signing_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            config,
            lifetime,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Configured token lifetime
    pub fn token_lifetime(&self) -> std::time::Duration {
        self.config.token_lifetime
    }

    /// Issue a token for `role`, optionally narrowing its permissions
    ///
    /// No identity check is performed; any caller may request any role.
    pub fn issue(&self, role: Role, permissions: Option<&[Permission]>) -> AuthResult<IssuedToken> {
        self.issue_at(role, permissions, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        role: Role,
        permissions: Option<&[Permission]>,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let permissions = resolve_permissions(role, permissions)?;
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::Internal("token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            role,
            permissions: permissions.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))?;

        tracing::info!(
            role = %role,
            permissions = ?permissions,
            expires_at = claims.exp,
            "Issued token"
        );

        Ok(IssuedToken::new(token, claims.exp, role, permissions))
    }

    /// Verify a serialized token against the current time
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a serialized token as if the current time were `now`
    ///
    /// Fails with [`AuthError::BadSignature`] when the token cannot be trusted
    /// and [`AuthError::Expired`] when `exp` is at or before `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims.into())
    }

    /// Verify a token and run it through the permission/role gate
    pub fn authenticate(
        &self,
        token: &str,
        required_permissions: &[Permission],
        required_roles: &[Role],
    ) -> AuthResult<Claims> {
        let claims = self.verify(token)?;
        claims.authorize(required_permissions, required_roles)?;
        Ok(claims)
    }
}
