use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::Blog;

/// FavoriteBlog
///
/// The projection returned by [`favorite_blog`]: just the fields a caller needs
/// to display the most-liked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FavoriteBlog {
    pub title: String,
    pub author: Option<String>,
    pub likes: i32,
}

/// Sums the like counts over a collection of blogs. An empty slice totals 0.
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().map(|blog| i64::from(blog.likes)).sum()
}

/// Finds the blog with the most likes. Returns `None` for an empty slice.
/// Ties resolve to the earliest entry in iteration order.
pub fn favorite_blog(blogs: &[Blog]) -> Option<FavoriteBlog> {
    blogs
        .iter()
        .fold(None::<&Blog>, |best, blog| match best {
            Some(current) if current.likes >= blog.likes => Some(current),
            _ => Some(blog),
        })
        .map(|blog| FavoriteBlog {
            title: blog.title.clone(),
            author: blog.author.clone(),
            likes: blog.likes,
        })
}
