#![allow(dead_code)]

use async_trait::async_trait;
use blog_board::{
    AppState,
    auth::Claims,
    config::{AppConfig, Env},
    models::{
        Blog, BlogSummary, BlogWithOwner, NewBlog, OwnerSummary, UpdateBlogRequest, User,
        UserWithBlogs,
    },
    repository::{Repository, RepositoryState},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::SystemTime;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "super-secure-test-secret-value-local";

// --- In-Memory Repository ---

/// A stateful stand-in for the Postgres repository. Holds users, blogs, and
/// the owned-set link rows behind mutexes so tests can assert on store state
/// after driving handlers or the full router. `fail` flips every operation
/// into a simulated store failure.
#[derive(Default)]
pub struct InMemoryRepository {
    pub users: Mutex<Vec<User>>,
    pub blogs: Mutex<Vec<Blog>>,
    // (user_id, blog_id) rows mirroring the user_blogs table.
    pub links: Mutex<Vec<(Uuid, Uuid)>>,
    pub fail: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, username: &str, name: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            name: name.to_string(),
            password_hash: "$2b$10$sealed".to_string(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn seed_blog(&self, user_id: Uuid, title: &str, url: &str, likes: i32) -> Blog {
        let blog = Blog {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            author: Some("Seeded Author".to_string()),
            url: url.to_string(),
            likes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.blogs.lock().unwrap().push(blog.clone());
        self.links.lock().unwrap().push((user_id, blog.id));
        blog
    }

    pub fn blog_count(&self) -> usize {
        self.blogs.lock().unwrap().len()
    }

    /// The owned-set for one user, as recorded in the link rows.
    pub fn owned_set(&self, user_id: Uuid) -> Vec<Uuid> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, bid)| *bid)
            .collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), sqlx::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    fn owner_summary(&self, user_id: Uuid) -> Option<OwnerSummary> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| OwnerSummary {
                id: u.id,
                username: u.username.clone(),
                name: u.name.clone(),
            })
    }

    fn with_owner(&self, blog: &Blog) -> Option<BlogWithOwner> {
        self.owner_summary(blog.user_id).map(|user| BlogWithOwner {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user,
        })
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_blogs_with_owner(&self) -> Result<Vec<BlogWithOwner>, sqlx::Error> {
        self.check_failure()?;
        let blogs = self.blogs.lock().unwrap().clone();
        Ok(blogs.iter().filter_map(|b| self.with_owner(b)).collect())
    }

    async fn get_blog_with_owner(&self, id: Uuid) -> Result<Option<BlogWithOwner>, sqlx::Error> {
        self.check_failure()?;
        let blogs = self.blogs.lock().unwrap().clone();
        Ok(blogs
            .iter()
            .find(|b| b.id == id)
            .and_then(|b| self.with_owner(b)))
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
        self.check_failure()?;
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn create_blog(&self, new: NewBlog, user_id: Uuid) -> Result<Blog, sqlx::Error> {
        self.check_failure()?;
        let blog = Blog {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            author: new.author,
            url: new.url,
            likes: new.likes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        // Both writes under the same lock scope, mirroring the transactional
        // behavior of the real store.
        self.blogs.lock().unwrap().push(blog.clone());
        self.links.lock().unwrap().push((user_id, blog.id));
        Ok(blog)
    }

    async fn update_blog(
        &self,
        id: Uuid,
        req: UpdateBlogRequest,
    ) -> Result<Option<Blog>, sqlx::Error> {
        self.check_failure()?;
        let mut blogs = self.blogs.lock().unwrap();
        let Some(blog) = blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(title) = req.title {
            blog.title = title;
        }
        if let Some(author) = req.author {
            blog.author = Some(author);
        }
        if let Some(url) = req.url {
            blog.url = url;
        }
        if let Some(likes) = req.likes {
            blog.likes = likes;
        }
        blog.updated_at = Utc::now();
        Ok(Some(blog.clone()))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.check_failure()?;
        self.links.lock().unwrap().retain(|(_, bid)| *bid != id);
        let mut blogs = self.blogs.lock().unwrap();
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        Ok(blogs.len() < before)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        self.check_failure()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn get_users_with_blogs(&self) -> Result<Vec<UserWithBlogs>, sqlx::Error> {
        self.check_failure()?;
        let users = self.users.lock().unwrap().clone();
        let links = self.links.lock().unwrap().clone();
        let blogs = self.blogs.lock().unwrap().clone();

        Ok(users
            .into_iter()
            .map(|user| {
                let owned = links
                    .iter()
                    .filter(|(uid, _)| *uid == user.id)
                    .filter_map(|(_, bid)| blogs.iter().find(|b| b.id == *bid))
                    .map(|b| BlogSummary {
                        id: b.id,
                        title: b.title.clone(),
                        author: b.author.clone(),
                        url: b.url.clone(),
                        likes: b.likes,
                    })
                    .collect();
                UserWithBlogs {
                    id: user.id,
                    username: user.username,
                    name: user.name,
                    blogs: owned,
                }
            })
            .collect())
    }

    async fn reset(&self) -> Result<(), sqlx::Error> {
        self.check_failure()?;
        self.links.lock().unwrap().clear();
        self.blogs.lock().unwrap().clear();
        self.users.lock().unwrap().clear();
        Ok(())
    }
}

// --- Token and State Helpers ---

/// Mints a bearer token the way the external credential service would.
pub fn create_token(user_id: Uuid, secret: &str, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// Builds an AppState around a shared in-memory repository.
pub fn test_state(repo: RepositoryState, env: Env) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    AppState { repo, config }
}
