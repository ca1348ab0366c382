use crate::record::{FullPostRecord, UserRecord};
use ripple_common::model::{
    Id, ModelValidationError,
    post::{CreatePost, Post, PostMarker},
    user::{CreateUser, User, UserMarker},
};
use sqlx::{PgPool, query, query_as, query_scalar};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

/// Postgres `lock_not_available`, raised when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";
/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Timed out waiting for a row lock")]
    LockWaitTimeout,
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl DbError {
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlx(sqlx::Error::Database(err))
                if err.code().as_deref() == Some(UNIQUE_VIOLATION)
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE)
        {
            return DbError::LockWaitTimeout;
        }

        DbError::Sqlx(err)
    }
}

pub struct DbClient {
    pub(crate) pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user: &CreateUser) -> Result<Id<UserMarker>> {
        let user_id: i64 = query_scalar(
            "
            INSERT INTO users (handle)
            VALUES ($1)
            RETURNING user_id
            ",
        )
        .bind(user.handle.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(user_id.into())
    }

    pub async fn fetch_active_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(
            "
            SELECT
                users.user_id,
                users.handle
            FROM
                users
            WHERE
                users.user_id = $1
                AND users.deleted_at IS NULL
            ",
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let user = record.map(User::try_from).transpose()?;
        Ok(user)
    }

    /// Soft-deletes a user, then cascades the feed rows and follow edges that
    /// reference them. The cascades run after the user write commits; the feed
    /// projection is eventually consistent with the user table.
    pub async fn soft_delete_user(&self, user_id: Id<UserMarker>) -> Result<bool> {
        let deleted = query(
            "
            UPDATE users
            SET deleted_at = now()
            WHERE user_id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(user_id.get())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        self.delete_feeds_by_user(user_id).await?;

        query(
            "
            DELETE FROM feed
            WHERE post_id IN (SELECT post_id FROM posts WHERE user_id = $1)
            ",
        )
        .bind(user_id.get())
        .execute(&self.pool)
        .await?;

        query(
            "
            DELETE FROM follows
            WHERE follower_id = $1 OR followed_id = $1
            ",
        )
        .bind(user_id.get())
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    /// Creates a post and fans it out to every follower's feed in the same
    /// transaction. Returns `None` when the author is absent or soft-deleted.
    pub async fn create_post(&self, post: &CreatePost) -> Result<Option<Id<PostMarker>>> {
        let mut tx = self.pool.begin().await?;

        let author_active: Option<i64> = query_scalar(
            "
            SELECT user_id
            FROM users
            WHERE user_id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(post.author_id.get())
        .fetch_optional(&mut *tx)
        .await?;

        if author_active.is_none() {
            return Ok(None);
        }

        let post_id: i64 = query_scalar(
            "
            INSERT INTO posts (user_id, content, media_url)
            VALUES ($1, $2, $3)
            RETURNING post_id
            ",
        )
        .bind(post.author_id.get())
        .bind(post.content.get())
        .bind(post.media_url.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        // Fan-out-on-write: one set-based insert over the follower set.
        query(
            "
            INSERT INTO feed (user_id, post_id)
            SELECT follows.follower_id, $2
            FROM follows
            WHERE follows.followed_id = $1
            ON CONFLICT (user_id, post_id) DO NOTHING
            ",
        )
        .bind(post.author_id.get())
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(post_id.into()))
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, FullPostRecord>(
            "
            SELECT
                posts.post_id,
                posts.content,
                posts.media_url,
                posts.created_at AS post_created_at,
                users.user_id,
                users.handle
            FROM
                posts
                JOIN users ON users.user_id = posts.user_id
            WHERE
                posts.post_id = $1
                AND posts.deleted_at IS NULL
                AND users.deleted_at IS NULL
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    /// Soft-deletes a post and bumps its version counter, then cascades the
    /// feed rows and the like-count projection row referencing it. The like
    /// rows themselves stay, the post row is never physically removed.
    pub async fn soft_delete_post(&self, post_id: Id<PostMarker>) -> Result<bool> {
        let deleted = query(
            "
            UPDATE posts
            SET deleted_at = now(), version = version + 1
            WHERE post_id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(post_id.get())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        self.delete_feeds_by_post(post_id).await?;

        query("DELETE FROM like_counts WHERE post_id = $1")
            .bind(post_id.get())
            .execute(&self.pool)
            .await?;

        Ok(true)
    }
}
