use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record from the `users` table. Rows are written by the
/// external credential service; this application only reads them (auth lookups,
/// owner joins) and maintains the owned-set in `user_blogs`.
///
/// Deliberately carries no serde derives: the credential hash must never reach
/// the wire. Everything user-facing goes through [`OwnerSummary`] or
/// [`UserWithBlogs`].
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    // Opaque to this application. Interpreted only by the credential service.
    pub password_hash: String,
}

/// Blog
///
/// A content record from the `blogs` table. `user_id` is the owner, set once at
/// creation and immutable afterwards; title and url are non-empty for every
/// persisted row.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Blog {
    pub id: Uuid,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i32,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateBlogRequest
///
/// Input payload for submitting a new blog (POST /api/blogs). Every field is
/// optional at the deserialization boundary so that a missing title or url can
/// be answered with a structured 400 instead of a deserializer rejection;
/// [`CreateBlogRequest::validate`] enforces the actual requirements.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i32>,
}

/// NewBlog
///
/// The validated form of a create request. Only constructible through
/// [`CreateBlogRequest::validate`], so a `NewBlog` always has a non-empty title
/// and url and a concrete like count.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i32,
}

impl CreateBlogRequest {
    /// Checks the mandatory fields and applies defaults. Runs before any store
    /// write; a failure here leaves the store untouched.
    pub fn validate(self) -> Result<NewBlog, ApiError> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        match (title, url) {
            (Some(title), Some(url)) => Ok(NewBlog {
                title,
                author: self.author,
                url,
                // Absent likes default to 0.
                likes: self.likes.unwrap_or(0),
            }),
            _ => Err(ApiError::Validation("title or url missing")),
        }
    }
}

/// UpdateBlogRequest
///
/// Partial update payload for modifying an existing blog (PUT /api/blogs/{id}).
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// so only the supplied fields are touched; unspecified fields keep their prior
/// values. The owner and identifier are not part of the payload and can never
/// change through an update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBlogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i32>,
}

// --- Query Output Schemas ---

/// OwnerSummary
///
/// Owner identity fields copied into query results for display. This is a
/// read-time join product, not authoritative storage, and it exposes exactly the
/// public subset of the user record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// BlogWithOwner
///
/// The blog listing shape: a blog enriched with its owner's summary. Serialized
/// with the owner under `user`, which is the field name the frontend reads.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BlogWithOwner {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i32,
    pub user: OwnerSummary,
}

/// BlogSummary
///
/// The per-blog subset shown inside a user listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i32,
}

/// UserWithBlogs
///
/// The user listing shape: public identity fields plus the blogs in the user's
/// owned-set, resolved through `user_blogs` at read time.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserWithBlogs {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub blogs: Vec<BlogSummary>,
}
