use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorBody},
    models::{Blog, BlogWithOwner, CreateBlogRequest, UpdateBlogRequest, UserWithBlogs},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

// --- Handlers ---

/// list_blogs
///
/// [Public Route] Lists every blog with the owner summary (id, username, name)
/// joined into each record. Insertion order; every call re-reads current state.
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses((status = 200, description = "All blogs with owner summaries", body = [BlogWithOwner]))
)]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogWithOwner>>, ApiError> {
    let blogs = state.repo.get_blogs_with_owner().await?;
    Ok(Json(blogs))
}

/// get_blog_details
///
/// [Public Route] Retrieves a single blog with its owner summary.
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Found", body = BlogWithOwner),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_blog_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogWithOwner>, ApiError> {
    match state.repo.get_blog_with_owner(id).await? {
        Some(blog) => Ok(Json(blog)),
        None => Err(ApiError::NotFound("blog not found")),
    }
}

/// create_blog
///
/// [Authenticated Route] Submits a new blog. The owner is taken from the
/// resolved identity, never from the payload. Field validation (title and url
/// required, likes defaulting to 0) runs before any write, so a rejected
/// request leaves the store untouched. The insert and the owner's set append
/// commit as one transaction.
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Created", body = Blog),
        (status = 400, description = "Missing title or url", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody)
    )
)]
pub async fn create_blog(
    AuthUser { id }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let new_blog = payload.validate()?;
    let blog = state.repo.create_blog(new_blog, id).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// update_blog
///
/// [Public Route] Partial update of title/author/url/likes; unspecified fields
/// keep their stored values. Carries no authentication or ownership check,
/// unlike delete: the like counter is bumped through this endpoint by any
/// reader, so the route stays open (see DESIGN.md). Owner and id are immutable.
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated", body = Blog),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<Blog>, ApiError> {
    match state.repo.update_blog(id, payload).await? {
        Some(blog) => Ok(Json(blog)),
        None => Err(ApiError::NotFound("blog not found")),
    }
}

/// delete_blog
///
/// [Authenticated Route] Removes a blog, owner only.
///
/// The record is fetched first so a missing blog and a foreign blog produce
/// distinct failures (404 vs 403); the ownership comparison happens before the
/// destructive call, which also retracts the id from the owner's set.
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Not Owner", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_blog(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let blog = state
        .repo
        .get_blog(id)
        .await?
        .ok_or(ApiError::NotFound("blog not found"))?;

    if blog.user_id != user_id {
        return Err(ApiError::Forbidden("not authorized to delete this blog"));
    }

    // A false here means the row vanished between the fetch and the delete.
    if !state.repo.delete_blog(id).await? {
        return Err(ApiError::NotFound("blog not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// list_users
///
/// [Public Route] Lists users with the blogs in their owned-set denormalized
/// into each record. Credential material never appears in the output.
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "Users with owned blogs", body = [UserWithBlogs]))
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithBlogs>>, ApiError> {
    let users = state.repo.get_users_with_blogs().await?;
    Ok(Json(users))
}

/// reset_state
///
/// [Test-Only Route] Wipes all blogs, users, and the owned-set so end-to-end
/// suites can start from a blank slate. The router carrying this handler is
/// mounted only in the local environment.
#[utoipa::path(
    post,
    path = "/api/testing/reset",
    responses((status = 204, description = "State cleared"))
)]
pub async fn reset_state(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.repo.reset().await?;
    Ok(StatusCode::NO_CONTENT)
}
