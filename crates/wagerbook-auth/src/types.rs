//! Core authentication types
//!
//! Roles, permissions, the role → permission table, token claims and the
//! authorization gate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

// =============================================================================
// Roles & Permissions
// =============================================================================

/// Caller roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full record keeper
    User,
    /// Read-only observer
    Visitor,
}

impl Role {
    /// Every role in the table
    pub const ALL: [Role; 2] = [Role::User, Role::Visitor];

    /// Default permission set for this role
    ///
    /// Never empty.
    pub fn default_permissions(&self) -> BTreeSet<Permission> {
        match self {
            Self::User => BTreeSet::from([Permission::Read, Permission::Write, Permission::Delete]),
            Self::Visitor => BTreeSet::from([Permission::Read]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Visitor => "VISITOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s {
            "USER" => Ok(Self::User),
            "VISITOR" => Ok(Self::Visitor),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

/// Atomic capabilities checked by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    Read,
    Write,
    Delete,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s {
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "DELETE" => Ok(Self::Delete),
            other => Err(AuthError::InvalidPermission(other.to_string())),
        }
    }
}

/// Resolve the permission set a token for `role` should carry
///
/// Without an override the role's default set is used. An override may only
/// narrow that set and must not be empty.
pub fn resolve_permissions(
    role: Role,
    requested: Option<&[Permission]>,
) -> AuthResult<BTreeSet<Permission>> {
    let defaults = role.default_permissions();
    let Some(requested) = requested else {
        return Ok(defaults);
    };

    if requested.is_empty() {
        return Err(AuthError::InvalidPermission("empty permission set".to_string()));
    }

    let requested: BTreeSet<Permission> = requested.iter().copied().collect();
    if let Some(extra) = requested.difference(&defaults).next() {
        return Err(AuthError::InvalidPermission(format!(
            "{} is not granted to role {}",
            extra, role
        )));
    }

    Ok(requested)
}

// =============================================================================
// Token Types
// =============================================================================

/// JWT claims structure (the signed payload)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Role the token was issued for
    pub role: Role,
    /// Granted permissions
    pub permissions: BTreeSet<Permission>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID (unique identifier)
    pub jti: String,
}

/// Verified token payload
///
/// Only produced by [`TokenAuthority::verify`](crate::TokenAuthority::verify);
/// valid for the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
    /// Expiration time (Unix timestamp)
    pub expires_at: i64,
}

impl From<TokenClaims> for Claims {
    fn from(claims: TokenClaims) -> Self {
        Self {
            role: claims.role,
            permissions: claims.permissions,
            expires_at: claims.exp,
        }
    }
}

impl Claims {
    /// Check if claims carry a specific permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Check if claims carry any of the given permissions
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    /// Permission/role gate
    ///
    /// An empty requirement list is not checked. When both lists are given,
    /// both checks must pass.
    pub fn authorize(
        &self,
        required_permissions: &[Permission],
        required_roles: &[Role],
    ) -> AuthResult<&Self> {
        if !required_permissions.is_empty() && !self.has_any_permission(required_permissions) {
            return Err(AuthError::InsufficientPermission);
        }
        if !required_roles.is_empty() && !required_roles.contains(&self.role) {
            return Err(AuthError::InsufficientRole);
        }
        Ok(self)
    }
}

/// Issued bearer token returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Serialized signed token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Expiry (Unix timestamp)
    pub expires_at: i64,
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
}

impl IssuedToken {
    pub fn new(
        access_token: String,
        expires_at: i64,
        role: Role,
        permissions: BTreeSet<Permission>,
    ) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_at,
            role,
            permissions,
        }
    }
}
