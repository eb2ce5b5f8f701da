use crate::{
    AppState,
    auth::AuthUser,
    error::{DomainError, DomainResult},
    models::{
        AuthResponse, CreatePostRequest, LoginRequest, Post, RegisterRequest, TokenResponse,
        UpdatePostRequest, UserResponse, UserRole,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates a user account and immediately opens a session.
/// Duplicate emails are rejected with 409 before (and, under a race, by) the
/// store's uniqueness constraint.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> DomainResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// login
///
/// [Public Route] Exchanges email+password for a session token. Wrong
/// password and unknown email return the identical 401.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> DomainResult<Json<TokenResponse>> {
    let response = state.auth.login(payload).await?;
    Ok(Json(response))
}

// --- Post Handlers ---

/// get_posts
///
/// [Public Route] Lists all posts, newest first. Anonymous access permitted.
#[utoipa::path(
    get,
    path = "/posts",
    responses((status = 200, description = "All posts, newest first", body = [Post]))
)]
pub async fn get_posts(State(state): State<AppState>) -> DomainResult<Json<Vec<Post>>> {
    let posts = state.posts.find_all().await?;
    Ok(Json(posts))
}

/// get_post_details
///
/// [Public Route] Retrieves a single post by ID.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> DomainResult<Json<Post>> {
    let post = state.posts.find_by_id(id).await?;
    Ok(Json(post))
}

/// create_post
///
/// [Authenticated Route] Creates a post. The owner is the authenticated
/// principal resolved by the `AuthUser` extractor, never a client-supplied id.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = Post),
        (status = 400, description = "Empty content")
    )
)]
pub async fn create_post(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> DomainResult<(StatusCode, Json<Post>)> {
    let post = state.posts.create(id, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// update_post
///
/// [Authenticated Route] Replaces a post's content.
///
/// *Authorization*: the service loads the current post and rejects with 403
/// unless the principal owns it.
#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> DomainResult<Json<Post>> {
    let post = state.posts.update(id, user_id, payload).await?;
    Ok(Json(post))
}

/// delete_post
///
/// [Authenticated Route] Permanently removes a post.
///
/// *Authorization*: same owner-only check as update, against the loaded post.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> DomainResult<StatusCode> {
    state.posts.delete(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- User Handlers ---

/// get_me
///
/// [Authenticated Route] The authenticated user's own public profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> DomainResult<Json<UserResponse>> {
    let user = state.users.find_by_id(id).await?;
    Ok(Json(user))
}

/// get_my_posts
///
/// [Authenticated Route] Lists the authenticated user's own posts, newest first.
#[utoipa::path(
    get,
    path = "/me/posts",
    responses((status = 200, description = "My posts", body = [Post]))
)]
pub async fn get_my_posts(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> DomainResult<Json<Vec<Post>>> {
    let posts = state.posts.find_by_user(id).await?;
    Ok(Json(posts))
}

/// get_user_details
///
/// [Authenticated Route] Looks up any user's public profile by ID. No role or
/// ownership restriction; any authenticated principal may call it.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = UserResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user_details(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> DomainResult<Json<UserResponse>> {
    let user = state.users.find_by_id(id).await?;
    Ok(Json(user))
}

/// get_admin_users
///
/// [Admin Route] Lists ALL user accounts.
///
/// *RBAC*: strict enforcement of the admin role before touching the service.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Not Admin")
    )
)]
pub async fn get_admin_users(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> DomainResult<Json<Vec<UserResponse>>> {
    if role != UserRole::Admin {
        return Err(DomainError::Forbidden(
            "Administrator role required".to_string(),
        ));
    }
    let users = state.users.find_all().await?;
    Ok(Json(users))
}
