use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{Post, User, UserRole};

/// UserRepository Trait
///
/// Abstract persistence contract for the users aggregate. Services depend on
/// this trait, never on the storage technology, so tests can substitute an
/// in-memory implementation.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn UserRepository>`) safely shareable across Axum's asynchronous
/// task boundaries.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    /// Full-replace upsert. A uniqueness violation raised by the store is
    /// surfaced as `Conflict`; the store is the authoritative arbiter even
    /// when the service-level existence check already passed.
    async fn save(&self, user: User) -> DomainResult<User>;
}

/// PostRepository Trait
///
/// Abstract persistence contract for the posts aggregate. Listing methods
/// return entries newest-first (creation time descending), a stated
/// contract, not incidental ordering.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>>;
    async fn find_all(&self) -> DomainResult<Vec<Post>>;
    async fn find_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Post>>;
    /// Full-replace upsert (not a partial patch at the storage level).
    async fn save(&self, post: Post) -> DomainResult<Post>;
    /// Permanent removal. No soft-delete exists in this service.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}

/// The concrete types used to share repository access across the application state.
pub type UserRepositoryState = Arc<dyn UserRepository>;
pub type PostRepositoryState = Arc<dyn PostRepository>;

// --- Row Mapping ---

// Raw database rows. The role column is TEXT constrained by the schema, so
// the row structs keep it as String and the mapping below owns the enum
// conversion, keeping the domain entities free of sqlx concerns.

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            // The CHECK constraint on users.role admits exactly these values.
            role: match row.role.as_str() {
                "admin" => UserRole::Admin,
                _ => UserRole::User,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    content: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            content: row.content,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Maps a save-time failure: unique-constraint violations become `Conflict`
/// with a message naming the violated rule, everything else stays a storage
/// fault.
fn map_save_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("users_username_key") => {
                    DomainError::Conflict("Username already taken".to_string())
                }
                _ => DomainError::Conflict("Email already registered".to_string()),
            };
        }
    }
    DomainError::Storage(e)
}

// --- Postgres Implementations ---

/// PostgresUserRepository
///
/// The concrete `UserRepository` backed by the PostgreSQL connection pool.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET username = $2, email = $3, password = $4, role = $5, updated_at = $7
            RETURNING id, username, email, password, role, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_save_error)?;

        Ok(User::from(row))
    }
}

/// PostgresPostRepository
///
/// The concrete `PostRepository` backed by the PostgreSQL connection pool.
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, content, user_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn find_all(&self) -> DomainResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, content, user_id, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, content, user_id, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn save(&self, post: Post) -> DomainResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, content, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET content = $2, updated_at = $5
            RETURNING id, content, user_id, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(post.user_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_save_error)?;

        Ok(Post::from(row))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
