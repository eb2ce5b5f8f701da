use uuid::Uuid;

use crate::{
    auth::issue_token,
    config::AppConfig,
    error::{DomainError, DomainResult},
    models::{
        AuthResponse, CreatePostRequest, LoginRequest, Post, RegisterRequest, TokenResponse,
        UpdatePostRequest, User, UserResponse,
    },
    repository::{PostRepositoryState, UserRepositoryState},
    security,
};

// Both failed-login causes (unknown email, wrong password) must produce this
// exact message so a caller cannot probe which emails are registered.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// AuthService
///
/// Orchestrates registration and login: uniqueness check, password hashing,
/// entity construction, persistence, token issuance.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepositoryState,
    config: AppConfig,
}

impl AuthService {
    pub fn new(users: UserRepositoryState, config: AppConfig) -> Self {
        Self { users, config }
    }

    /// register
    ///
    /// Fails with `Conflict` if the email is already registered. The hash is
    /// computed before the entity is constructed, so the entity never holds
    /// plaintext. The existence check here is an optimization; a racing
    /// registration still lands on the store's unique constraint, which the
    /// repository surfaces as the same `Conflict`.
    pub async fn register(&self, req: RegisterRequest) -> DomainResult<AuthResponse> {
        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let password_hash = security::hash_password(&req.password)?;
        let user = User::create(Uuid::new_v4(), req.username, req.email, password_hash);
        let user = self.users.save(user).await?;

        let token = issue_token(user.id, user.role, &self.config.jwt_secret)?;

        Ok(AuthResponse {
            user: user.into(),
            access_token: token,
        })
    }

    /// login
    ///
    /// Fails with `Unauthorized` if no user has that email or the hash
    /// comparison fails; the two cases are indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> DomainResult<TokenResponse> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !security::verify_password(&req.password, &user.password)? {
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = issue_token(user.id, user.role, &self.config.jwt_secret)?;

        Ok(TokenResponse {
            access_token: token,
        })
    }
}

/// UserService
///
/// Read-side user operations. Authorization (the admin gate on `find_all`) is
/// applied by the handler that owns the route; the service itself is
/// policy-free.
#[derive(Clone)]
pub struct UserService {
    users: UserRepositoryState,
}

impl UserService {
    pub fn new(users: UserRepositoryState) -> Self {
        Self { users }
    }

    pub async fn find_all(&self) -> DomainResult<Vec<UserResponse>> {
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<UserResponse> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "User", id })?;
        Ok(user.into())
    }

    pub async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserResponse>> {
        let user = self.users.find_by_email(email).await?;
        Ok(user.map(UserResponse::from))
    }
}

/// PostService
///
/// Post lifecycle operations. Ownership is always checked against the post
/// loaded from the store, never against anything the client claims.
#[derive(Clone)]
pub struct PostService {
    posts: PostRepositoryState,
}

impl PostService {
    pub fn new(posts: PostRepositoryState) -> Self {
        Self { posts }
    }

    /// create
    ///
    /// The authenticated principal becomes the owner; content is trimmed and
    /// must be non-empty.
    pub async fn create(&self, principal_id: Uuid, req: CreatePostRequest) -> DomainResult<Post> {
        let post = Post::create(Uuid::new_v4(), principal_id, &req.content)?;
        self.posts.save(post).await
    }

    /// find_all
    ///
    /// All posts, newest first.
    pub async fn find_all(&self) -> DomainResult<Vec<Post>> {
        self.posts.find_all().await
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Post", id })
    }

    /// find_by_user
    ///
    /// All posts owned by one user, newest first.
    pub async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Post>> {
        self.posts.find_by_user_id(user_id).await
    }

    /// update
    ///
    /// Load → ownership check → new immutable value → full-replace save.
    /// An omitted content keeps the text but still refreshes `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        principal_id: Uuid,
        req: UpdatePostRequest,
    ) -> DomainResult<Post> {
        let post = self.find_by_id(id).await?;

        if post.user_id != principal_id {
            return Err(DomainError::Forbidden(
                "You can only update your own posts".to_string(),
            ));
        }

        let updated = post.with_content(req.content.as_deref())?;
        self.posts.save(updated).await
    }

    /// delete
    ///
    /// Load → ownership check → permanent removal.
    pub async fn delete(&self, id: Uuid, principal_id: Uuid) -> DomainResult<()> {
        let post = self.find_by_id(id).await?;

        if post.user_id != principal_id {
            return Err(DomainError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        self.posts.delete(id).await
    }
}
