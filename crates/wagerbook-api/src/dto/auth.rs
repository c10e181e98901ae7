//! Token issuance DTOs

use serde::{Deserialize, Serialize};
use wagerbook_auth::{Permission, Role};

use crate::error::ApiResult;

/// Token request
///
/// Role and permission names arrive as plain strings so unknown values map
/// to `INVALID_ROLE` / `INVALID_PERMISSION` instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Requested role ("USER" or "VISITOR")
    pub role: String,
    /// Optional narrowing of the role's default permissions
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl TokenRequest {
    /// Parse the role and permission names
    pub fn parse(&self) -> ApiResult<(Role, Option<Vec<Permission>>)> {
        let role: Role = self.role.parse()?;
        let permissions = self
            .permissions
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|name| name.parse::<Permission>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok((role, permissions))
    }
}
