use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::{DomainError, DomainResult},
    models::UserRole,
    service::UserService,
};

/// Fixed validity window for issued session tokens: 24 hours.
pub const TOKEN_TTL_SECS: i64 = 86_400;

/// Claims
///
/// The payload signed into every session token. The principal is resolved
/// entirely from these claims on subsequent requests: the token is the
/// single source of identity and role for its validity window.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's UUID.
    pub sub: Uuid,
    /// The role at issuance time, used for RBAC checks.
    pub role: UserRole,
    /// Expiration time (exp): seconds since epoch after which the token is rejected.
    pub exp: usize,
    /// Issued at (iat): seconds since epoch.
    pub iat: usize,
}

/// issue_token
///
/// Signs a session token for the given principal with the server-held secret.
pub fn issue_token(user_id: Uuid, role: UserRole, secret: &str) -> DomainResult<String> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        role,
        exp: (now + TOKEN_TTL_SECS) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DomainError::Internal(format!("token signing failed: {}", e)))
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the principal every
/// handler receives for ownership and role checks.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: UserRole,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any authenticated handler. Authentication stays in
/// the extractor; handlers only see the resolved principal.
///
/// The process:
/// 1. Dependency resolution: AppConfig (secret, env) and UserService from state.
/// 2. Local bypass: in Env::Local an 'x-user-id' header naming an existing
///    user authenticates as that user. Never active in production.
/// 3. Bearer token extraction and JWT validation (signature + expiry).
/// 4. The principal (id + role) is taken from the validated claims as-is.
///
/// Rejection: `DomainError::Unauthorized` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    UserService: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let users = UserService::from_ref(state);
        let config = AppConfig::from_ref(state);

        // Local development bypass. The named user must exist so the role is
        // loaded from the store rather than trusted from the header.
        if config.env == Env::Local {
            if let Some(user_id_header) = parts.headers.get("x-user-id") {
                if let Ok(id_str) = user_id_header.to_str() {
                    if let Ok(user_id) = Uuid::parse_str(id_str) {
                        if let Ok(user) = users.find_by_id(user_id).await {
                            return Ok(AuthUser {
                                id: user.id,
                                role: user.role,
                            });
                        }
                    }
                }
            }
        }
        // If the bypass did not apply, fall through to standard JWT validation.

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| DomainError::Unauthorized("Missing bearer token".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| DomainError::Unauthorized("Missing bearer token".to_string()))?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;

        // Expired, malformed, and bad-signature tokens are all the same 401
        // from the client's point of view.
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}
