//! In-memory repository implementations
//!
//! All repositories built by [`Repositories::new`] share one set of tables, so
//! an ownership lookup always sees the latest write from any other repository.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use quill_types::{ResourceKind, ResourceRef, UserId};

use crate::error::{DbError, DbResult};
use crate::models::{CommentRow, PostRow, UserRow};
use crate::repo::{
    CommentRepository, CreateComment, CreatePost, CreateUser, OwnershipRepository,
    PostRepository, UpdatePost, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: DashMap<UserId, UserRow>,
    users_by_name: DashMap<String, UserId>,
    users_by_email: DashMap<String, UserId>,
    posts: DashMap<u64, PostRow>,
    comments: DashMap<u64, CommentRow>,
    next_user_id: AtomicU64,
    next_post_id: AtomicU64,
    next_comment_id: AtomicU64,
}

impl Tables {
    // IDs start at 1
    fn next(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Shared handle to the in-memory tables
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Tables>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

/// In-memory user repository
#[derive(Clone)]
pub struct MemoryUserRepository {
    db: MemoryDb,
}

impl MemoryUserRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>> {
        Ok(self.db.tables.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRow>> {
        let tables = &self.db.tables;
        Ok(tables
            .users_by_name
            .get(username)
            .and_then(|id| tables.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let tables = &self.db.tables;
        Ok(tables
            .users_by_email
            .get(email)
            .and_then(|id| tables.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let tables = &self.db.tables;
        let id = UserId(Tables::next(&tables.next_user_id));

        // Claim the unique keys first so two concurrent registrations cannot
        // both win the same username or email.
        match tables.users_by_name.entry(user.username.clone()) {
            Entry::Occupied(_) => return Err(DbError::Conflict("username")),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        match tables.users_by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                tables.users_by_name.remove(&user.username);
                return Err(DbError::Conflict("email"));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let row = UserRow {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, row.clone());
        tracing::debug!(user_id = %id, "User created");
        Ok(row)
    }
}

/// In-memory post repository
#[derive(Clone)]
pub struct MemoryPostRepository {
    db: MemoryDb,
}

impl MemoryPostRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: u64) -> DbResult<Option<PostRow>> {
        Ok(self.db.tables.posts.get(&id).map(|r| r.value().clone()))
    }

    async fn list(&self, offset: usize, limit: usize) -> DbResult<Vec<PostRow>> {
        let mut posts: Vec<PostRow> = self
            .db
            .tables
            .posts
            .iter()
            .map(|r| r.value().clone())
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> DbResult<u64> {
        Ok(self.db.tables.posts.len() as u64)
    }

    async fn create(&self, post: CreatePost) -> DbResult<PostRow> {
        let tables = &self.db.tables;
        let now = Utc::now();
        let row = PostRow {
            id: Tables::next(&tables.next_post_id),
            title: post.title,
            content: post.content,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: u64, update: UpdatePost) -> DbResult<PostRow> {
        let mut post = self.db.tables.posts.get_mut(&id).ok_or(DbError::NotFound)?;
        if update.is_empty() {
            return Ok(post.clone());
        }
        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(content) = update.content {
            post.content = content;
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: u64) -> DbResult<()> {
        self.db
            .tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }
}

/// In-memory comment repository
#[derive(Clone)]
pub struct MemoryCommentRepository {
    db: MemoryDb,
}

impl MemoryCommentRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_id(&self, id: u64) -> DbResult<Option<CommentRow>> {
        Ok(self.db.tables.comments.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_post_id(&self, post_id: u64) -> DbResult<Vec<CommentRow>> {
        let mut comments: Vec<CommentRow> = self
            .db
            .tables
            .comments
            .iter()
            .filter(|r| r.post_id == post_id)
            .map(|r| r.value().clone())
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn create(&self, comment: CreateComment) -> DbResult<CommentRow> {
        let tables = &self.db.tables;
        // Holding the post's read guard blocks a concurrent post removal
        // until the comment is in the table.
        let _post = tables.posts.get(&comment.post_id).ok_or(DbError::NotFound)?;
        let now = Utc::now();
        let row = CommentRow {
            id: Tables::next(&tables.next_comment_id),
            content: comment.content,
            user_id: comment.user_id,
            post_id: comment.post_id,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: u64) -> DbResult<()> {
        self.db
            .tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }

    async fn delete_by_post_id(&self, post_id: u64) -> DbResult<u64> {
        let mut removed = 0;
        self.db.tables.comments.retain(|_, c| {
            let keep = c.post_id != post_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

/// In-memory ownership lookup over the post and comment tables
#[derive(Clone)]
pub struct MemoryOwnershipRepository {
    db: MemoryDb,
}

impl MemoryOwnershipRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OwnershipRepository for MemoryOwnershipRepository {
    async fn find_owner(&self, resource: ResourceRef) -> DbResult<Option<UserId>> {
        let tables = &self.db.tables;
        let owner = match resource.kind {
            ResourceKind::Post => tables.posts.get(&resource.id).map(|p| p.user_id),
            ResourceKind::Comment => tables.comments.get(&resource.id).map(|c| c.user_id),
        };
        Ok(owner)
    }
}

/// All repositories bundled together over one shared store
#[derive(Clone)]
pub struct Repositories {
    pub users: MemoryUserRepository,
    pub posts: MemoryPostRepository,
    pub comments: MemoryCommentRepository,
    pub ownership: MemoryOwnershipRepository,
}

impl Repositories {
    /// Create all repositories over a fresh, empty store
    pub fn new() -> Self {
        Self::with_db(MemoryDb::new())
    }

    /// Create all repositories over an existing store
    pub fn with_db(db: MemoryDb) -> Self {
        Self {
            users: MemoryUserRepository::new(db.clone()),
            posts: MemoryPostRepository::new(db.clone()),
            comments: MemoryCommentRepository::new(db.clone()),
            ownership: MemoryOwnershipRepository::new(db),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> CreateUser {
        CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_create_and_lookup() {
        let repos = Repositories::new();
        let alice = repos.users.create(new_user("alice")).await.unwrap();
        assert_eq!(alice.id, UserId(1));

        let by_name = repos.users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, alice.id);
        let by_email = repos
            .users
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, alice.id);
        assert!(repos.users.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_unique_username_and_email() {
        let repos = Repositories::new();
        repos.users.create(new_user("alice")).await.unwrap();

        let err = repos.users.create(new_user("alice")).await.unwrap_err();
        assert_eq!(err, DbError::Conflict("username"));

        let mut other = new_user("alice2");
        other.email = "alice@example.com".to_string();
        let err = repos.users.create(other).await.unwrap_err();
        assert_eq!(err, DbError::Conflict("email"));

        // The failed attempt must not leave its username reserved
        assert!(repos.users.find_by_username("alice2").await.unwrap().is_none());
        repos.users.create(new_user("alice2")).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_update_and_delete() {
        let repos = Repositories::new();
        let post = repos
            .posts
            .create(CreatePost {
                title: "Hello".to_string(),
                content: "World".to_string(),
                user_id: UserId(5),
            })
            .await
            .unwrap();

        let updated = repos
            .posts
            .update(
                post.id,
                UpdatePost {
                    title: Some("Hi".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Hi");
        assert_eq!(updated.content, "World");

        repos.posts.delete(post.id).await.unwrap();
        assert_eq!(repos.posts.delete(post.id).await, Err(DbError::NotFound));
        assert!(matches!(
            repos.posts.update(post.id, UpdatePost::default()).await,
            Err(DbError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_post_list_newest_first_with_paging() {
        let repos = Repositories::new();
        for i in 0..5 {
            repos
                .posts
                .create(CreatePost {
                    title: format!("post {i}"),
                    content: "body".to_string(),
                    user_id: UserId(1),
                })
                .await
                .unwrap();
        }

        assert_eq!(repos.posts.count().await.unwrap(), 5);
        let page = repos.posts.list(0, 2).await.unwrap();
        assert_eq!(page.iter().map(|p| p.id).collect::<Vec<_>>(), vec![5, 4]);
        let last = repos.posts.list(4, 2).await.unwrap();
        assert_eq!(last.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_ownership_reads_latest_state() {
        let repos = Repositories::new();
        let post = repos
            .posts
            .create(CreatePost {
                title: "t".to_string(),
                content: "c".to_string(),
                user_id: UserId(5),
            })
            .await
            .unwrap();
        let comment = repos
            .comments
            .create(CreateComment {
                content: "nice".to_string(),
                user_id: UserId(7),
                post_id: post.id,
            })
            .await
            .unwrap();

        let ownership = &repos.ownership;
        assert_eq!(
            ownership.find_owner(ResourceRef::post(post.id)).await.unwrap(),
            Some(UserId(5))
        );
        assert_eq!(
            ownership
                .find_owner(ResourceRef::comment(comment.id))
                .await
                .unwrap(),
            Some(UserId(7))
        );

        repos.comments.delete_by_post_id(post.id).await.unwrap();
        repos.posts.delete(post.id).await.unwrap();
        assert_eq!(
            ownership.find_owner(ResourceRef::post(post.id)).await.unwrap(),
            None
        );
        assert_eq!(
            ownership
                .find_owner(ResourceRef::comment(comment.id))
                .await
                .unwrap(),
            None
        );
    }

    async fn post_by(repos: &Repositories, user_id: u64) -> PostRow {
        repos
            .posts
            .create(CreatePost {
                title: "t".to_string(),
                content: "c".to_string(),
                user_id: UserId(user_id),
            })
            .await
            .unwrap()
    }

    fn comment_on(post_id: u64) -> CreateComment {
        CreateComment {
            content: "nice".to_string(),
            user_id: UserId(7),
            post_id,
        }
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_rejected() {
        let repos = Repositories::new();
        assert_eq!(
            repos.comments.create(comment_on(42)).await.unwrap_err(),
            DbError::NotFound
        );

        let post = post_by(&repos, 5).await;
        repos.posts.delete(post.id).await.unwrap();
        assert_eq!(
            repos.comments.create(comment_on(post.id)).await.unwrap_err(),
            DbError::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_by_post_id_counts_only_its_comments() {
        let repos = Repositories::new();
        let target = post_by(&repos, 1).await;
        let other = post_by(&repos, 1).await;
        for _ in 0..3 {
            repos.comments.create(comment_on(target.id)).await.unwrap();
        }
        repos.comments.create(comment_on(other.id)).await.unwrap();

        assert_eq!(repos.comments.delete_by_post_id(target.id).await, Ok(3));
        assert_eq!(repos.comments.delete_by_post_id(target.id).await, Ok(0));
        assert_eq!(
            repos.comments.find_by_post_id(other.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delete_by_post_id_with_concurrent_inserts() {
        let repos = Repositories::new();
        let busy = post_by(&repos, 1).await.id;

        for _ in 0..200 {
            let target = post_by(&repos, 1).await;
            repos.comments.create(comment_on(target.id)).await.unwrap();

            let writers: Vec<_> = (0..8)
                .map(|_| {
                    let comments = repos.comments.clone();
                    tokio::spawn(async move {
                        for _ in 0..20 {
                            comments.create(comment_on(busy)).await.unwrap();
                        }
                    })
                })
                .collect();

            let removed = repos.comments.delete_by_post_id(target.id).await.unwrap();
            assert_eq!(removed, 1);

            for writer in writers {
                writer.await.unwrap();
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_post_removal_leaves_no_orphan_comments() {
        let repos = Repositories::new();

        for _ in 0..200 {
            let post_id = post_by(&repos, 1).await.id;

            let writers: Vec<_> = (0..4)
                .map(|_| {
                    let comments = repos.comments.clone();
                    tokio::spawn(async move { comments.create(comment_on(post_id)).await })
                })
                .collect();

            repos.posts.delete(post_id).await.unwrap();
            repos.comments.delete_by_post_id(post_id).await.unwrap();

            for writer in writers {
                match writer.await.unwrap() {
                    Ok(_) | Err(DbError::NotFound) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            assert!(repos.comments.find_by_post_id(post_id).await.unwrap().is_empty());
        }
    }
}
