use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

// --- Core Domain Entities ---

/// UserRole
///
/// The RBAC field carried by every user and embedded in issued tokens.
/// Serialized as `"user"` / `"admin"` both over the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// User
///
/// The canonical identity record. The `password` field always holds the argon2
/// hash, never the plaintext: `User::create` takes the already-computed hash,
/// so plaintext never enters the entity. Treated as an immutable value: no
/// mutation API exists, and no operation in this service refreshes `updated_at`
/// after creation (there is no profile-update endpoint).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    // Unique display handle.
    pub username: String,
    // Unique, used as the login key.
    pub email: String,
    // Argon2 PHC string, never plaintext.
    pub password: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Factory for a freshly registered user. Role always starts as `User`;
    /// elevation is an administrative concern outside this service.
    pub fn create(id: Uuid, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password: password_hash,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Post
///
/// A text post owned by a user. `user_id` is a weak reference to the owning
/// User: deleting a post never touches the user, and ownership never
/// transfers. Immutable value: `with_content` produces a new Post rather than
/// mutating in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    // FK to users.id (owner).
    pub user_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Factory enforcing the content invariant: trimmed, non-empty.
    pub fn create(id: Uuid, user_id: Uuid, content: &str) -> DomainResult<Self> {
        let content = Self::validated_content(content)?;
        let now = Utc::now();
        Ok(Self {
            id,
            content,
            user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Produces the post-update value: content replaced only when a new one was
    /// supplied, `updated_at` refreshed unconditionally.
    pub fn with_content(&self, content: Option<&str>) -> DomainResult<Self> {
        let content = match content {
            Some(c) => Self::validated_content(c)?,
            None => self.content.clone(),
        };
        Ok(Self {
            content,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    fn validated_content(content: &str) -> DomainResult<String> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation(
                "Post content must not be empty".to_string(),
            ));
        }
        Ok(content.to_string())
    }
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /auth/register. The plaintext password is hashed
/// before any entity is constructed and is never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreatePostRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub content: String,
}

/// UpdatePostRequest
///
/// Partial payload for PUT /posts/{id}: an omitted `content` keeps the current
/// text but the update still refreshes `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// --- Response Projections (Output Schemas) ---

/// UserResponse
///
/// The public projection of a User. The password hash is not a field here at
/// all, so it can never leak through serialization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// AuthResponse
///
/// Returned by registration: the created user's public projection plus the
/// freshly issued session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
}

/// TokenResponse
///
/// Returned by login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenResponse {
    pub access_token: String,
}
