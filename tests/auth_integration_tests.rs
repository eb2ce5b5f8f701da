use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use blog_api::{
    AppState, AuthService, PostService, UserService,
    auth::{AuthUser, Claims, issue_token},
    config::{AppConfig, Env},
    error::{DomainError, DomainResult},
    models::{Post, User, UserRole},
    repository::{PostRepository, UserRepository},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use uuid::Uuid;

// --- Mock Repositories for Auth Logic ---

#[derive(Default)]
struct MockAuthRepo {
    user_to_return: Option<User>,
}

#[async_trait]
impl UserRepository for MockAuthRepo {
    async fn find_by_id(&self, _id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.user_to_return.clone())
    }
    async fn find_by_email(&self, _email: &str) -> DomainResult<Option<User>> {
        Ok(self.user_to_return.clone())
    }
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        Ok(vec![])
    }
    async fn save(&self, user: User) -> DomainResult<User> {
        Ok(user)
    }
}

// The extractor never touches posts; this satisfies state assembly.
struct NoopPostRepo;

#[async_trait]
impl PostRepository for NoopPostRepo {
    async fn find_by_id(&self, _id: Uuid) -> DomainResult<Option<Post>> {
        Ok(None)
    }
    async fn find_all(&self) -> DomainResult<Vec<Post>> {
        Ok(vec![])
    }
    async fn find_by_user_id(&self, _user_id: Uuid) -> DomainResult<Vec<Post>> {
        Ok(vec![])
    }
    async fn save(&self, post: Post) -> DomainResult<Post> {
        Ok(post)
    }
    async fn delete(&self, _id: Uuid) -> DomainResult<()> {
        Ok(())
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn create_token_with(user_id: Uuid, role: UserRole, exp_offset: i64, secret: &str) -> String {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        role,
        iat: now as usize,
        // Negative offsets produce an already-expired token.
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: MockAuthRepo, jwt_secret: String) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = jwt_secret;

    let user_repo = Arc::new(repo) as Arc<dyn UserRepository>;
    let post_repo = Arc::new(NoopPostRepo) as Arc<dyn PostRepository>;

    AppState {
        auth: AuthService::new(user_repo.clone(), config.clone()),
        users: UserService::new(user_repo),
        posts: PostService::new(post_repo),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let token = create_token_with(TEST_USER_ID, UserRole::User, 3600, TEST_JWT_SECRET);

    // No user in the store: the principal is resolved from the validated
    // claims alone, not from a database lookup.
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn test_auth_preserves_admin_role_from_claims() {
    let token = create_token_with(TEST_USER_ID, UserRole::Admin, 3600, TEST_JWT_SECRET);

    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(
        auth_user.unwrap_err(),
        DomainError::Unauthorized(_)
    ));
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    // Expired well past the default validation leeway.
    let token = create_token_with(TEST_USER_ID, UserRole::User, -3600, TEST_JWT_SECRET);

    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(
        auth_user.unwrap_err(),
        DomainError::Unauthorized(_)
    ));
}

#[tokio::test]
async fn test_auth_failure_with_wrong_secret() {
    let token = create_token_with(TEST_USER_ID, UserRole::User, 3600, "some-other-secret");

    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(
        auth_user.unwrap_err(),
        DomainError::Unauthorized(_)
    ));
}

#[tokio::test]
async fn test_issue_token_round_trips_through_extractor() {
    let token = issue_token(TEST_USER_ID, UserRole::Admin, TEST_JWT_SECRET).unwrap();

    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn test_local_bypass_success() {
    let mock_user_id = Uuid::new_v4();
    let mut admin = User::create(
        mock_user_id,
        "local-admin".to_string(),
        "local@dev.com".to_string(),
        "irrelevant-hash".to_string(),
    );
    admin.role = UserRole::Admin;

    let mock_repo = MockAuthRepo {
        user_to_return: Some(admin),
    };

    let app_state = create_app_state(Env::Local, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, mock_user_id);
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let mock_user_id = Uuid::new_v4();
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Provide ONLY the local bypass header
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(
        auth_user.unwrap_err(),
        DomainError::Unauthorized(_)
    ));
}
