use crate::models::{
    Blog, BlogSummary, BlogWithOwner, NewBlog, OwnerSummary, UpdateBlogRequest, User,
    UserWithBlogs,
};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, so handlers
/// interact with the record store without knowing the concrete implementation
/// (Postgres in production, in-memory doubles in tests).
///
/// Every method returns `Result`: a store fault must reach the caller as an
/// internal error rather than being swallowed into an empty default.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Blog Retrieval ---
    /// Lists every blog with its owner summary joined in, in insertion order.
    async fn get_blogs_with_owner(&self) -> Result<Vec<BlogWithOwner>, sqlx::Error>;
    /// Retrieves a single blog with its owner summary.
    async fn get_blog_with_owner(&self, id: Uuid) -> Result<Option<BlogWithOwner>, sqlx::Error>;
    /// Retrieves the raw blog row. Used for ownership checks before mutation.
    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, sqlx::Error>;

    // --- Blog Mutation ---
    /// Inserts a new blog owned by `user_id` and appends its id to the owner's
    /// set. Both writes commit together or not at all.
    async fn create_blog(&self, new: NewBlog, user_id: Uuid) -> Result<Blog, sqlx::Error>;
    /// Partial update: supplied fields replace, absent fields are retained.
    /// Returns `None` when the id does not resolve.
    async fn update_blog(
        &self,
        id: Uuid,
        req: UpdateBlogRequest,
    ) -> Result<Option<Blog>, sqlx::Error>;
    /// Removes the blog and retracts its id from the owner's set, together.
    /// Returns false when no blog row matched.
    async fn delete_blog(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Users ---
    /// Resolves a user id, as required by the auth gate.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    /// Lists users with their owned blogs resolved through the owned-set.
    async fn get_users_with_blogs(&self) -> Result<Vec<UserWithBlogs>, sqlx::Error>;

    // --- Test Support ---
    /// Wipes blogs, users, and the owned-set. Reached only through the
    /// local-environment testing router.
    async fn reset(&self) -> Result<(), sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application
/// state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape produced by the blogs-to-users join, folded into
/// [`BlogWithOwner`] before leaving the repository.
#[derive(FromRow)]
struct BlogOwnerRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    author: Option<String>,
    url: String,
    likes: i32,
    username: String,
    name: String,
}

impl From<BlogOwnerRow> for BlogWithOwner {
    fn from(row: BlogOwnerRow) -> Self {
        BlogWithOwner {
            id: row.id,
            title: row.title,
            author: row.author,
            url: row.url,
            likes: row.likes,
            user: OwnerSummary {
                id: row.user_id,
                username: row.username,
                name: row.name,
            },
        }
    }
}

/// Flat row shape for the owned-set join used by the user listing.
#[derive(FromRow)]
struct OwnedBlogRow {
    user_id: Uuid,
    id: Uuid,
    title: String,
    author: Option<String>,
    url: String,
    likes: i32,
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_blogs_with_owner(&self) -> Result<Vec<BlogWithOwner>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BlogOwnerRow>(
            r#"
            SELECT b.id, b.user_id, b.title, b.author, b.url, b.likes, u.username, u.name
            FROM blogs b
            JOIN users u ON b.user_id = u.id
            ORDER BY b.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BlogWithOwner::from).collect())
    }

    async fn get_blog_with_owner(&self, id: Uuid) -> Result<Option<BlogWithOwner>, sqlx::Error> {
        let row = sqlx::query_as::<_, BlogOwnerRow>(
            r#"
            SELECT b.id, b.user_id, b.title, b.author, b.url, b.likes, u.username, u.name
            FROM blogs b
            JOIN users u ON b.user_id = u.id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BlogWithOwner::from))
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, user_id, title, author, url, likes, created_at, updated_at
            FROM blogs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Inserts the blog row and the owned-set link in one transaction, so the
    /// two-sided relation can never be observed half-written.
    async fn create_blog(&self, new: NewBlog, user_id: Uuid) -> Result<Blog, sqlx::Error> {
        let new_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (id, user_id, title, author, url, likes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id, user_id, title, author, url, likes, created_at, updated_at
            "#,
        )
        .bind(new_id)
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.author)
        .bind(&new.url)
        .bind(new.likes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_blogs (user_id, blog_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(blog.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(blog)
    }

    /// Uses `COALESCE` so only the supplied fields replace stored values.
    /// Owner and id are never part of the SET list.
    async fn update_blog(
        &self,
        id: Uuid,
        req: UpdateBlogRequest,
    ) -> Result<Option<Blog>, sqlx::Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                url = COALESCE($4, url),
                likes = COALESCE($5, likes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, author, url, likes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.author)
        .bind(req.url)
        .bind(req.likes)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes the blog row and its owned-set link in one transaction, keeping
    /// the two-sided relation consistent after removal.
    async fn delete_blog(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_blogs WHERE blog_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, name, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Reads the owned-set join and groups it per user. Users with no blogs
    /// still appear, with an empty list.
    async fn get_users_with_blogs(&self) -> Result<Vec<UserWithBlogs>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, name, password_hash FROM users ORDER BY username ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let owned = sqlx::query_as::<_, OwnedBlogRow>(
            r#"
            SELECT ub.user_id, b.id, b.title, b.author, b.url, b.likes
            FROM user_blogs ub
            JOIN blogs b ON ub.blog_id = b.id
            ORDER BY b.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_user: HashMap<Uuid, Vec<BlogSummary>> = HashMap::new();
        for row in owned {
            by_user.entry(row.user_id).or_default().push(BlogSummary {
                id: row.id,
                title: row.title,
                author: row.author,
                url: row.url,
                likes: row.likes,
            });
        }

        Ok(users
            .into_iter()
            .map(|user| UserWithBlogs {
                blogs: by_user.remove(&user.id).unwrap_or_default(),
                id: user.id,
                username: user.username,
                name: user.name,
            })
            .collect())
    }

    async fn reset(&self) -> Result<(), sqlx::Error> {
        // One statement: Postgres requires all FK-linked tables in the same
        // TRUNCATE.
        sqlx::query("TRUNCATE user_blogs, blogs, users")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
