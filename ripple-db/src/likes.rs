use crate::client::{DbClient, Result};
use ripple_common::model::{Id, like::LikeToggle, post::PostMarker, user::UserMarker};
use sqlx::{query, query_scalar};
use tracing::debug;

/// Outcome of [`DbClient::toggle_like`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ToggleLike {
    UserNotFound,
    PostNotFound,
    Completed(LikeToggle),
}

impl DbClient {
    pub async fn toggle_like(
        &self,
        user_id: Id<UserMarker>,
        post_id: Id<PostMarker>,
    ) -> Result<ToggleLike> {
        let mut tx = self.pool.begin().await?;

        let user_exists: bool = query_scalar(
            "
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE user_id = $1 AND deleted_at IS NULL
            )
            ",
        )
        .bind(user_id.get())
        .fetch_one(&mut *tx)
        .await?;

        if !user_exists {
            return Ok(ToggleLike::UserNotFound);
        }

        // Bounded wait on the post lock; expiry maps to DbError::LockWaitTimeout.
        query("SET LOCAL lock_timeout = '5s'")
            .execute(&mut *tx)
            .await?;

        // Serializes toggles on this post until commit. Toggles on other posts
        // and plain count reads are not blocked.
        let locked_post: Option<i64> = query_scalar(
            "
            SELECT post_id
            FROM posts
            WHERE post_id = $1 AND deleted_at IS NULL
            FOR UPDATE
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&mut *tx)
        .await?;

        if locked_post.is_none() {
            return Ok(ToggleLike::PostNotFound);
        }

        let already_liked: bool = query_scalar(
            "
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            ",
        )
        .bind(user_id.get())
        .bind(post_id.get())
        .fetch_one(&mut *tx)
        .await?;

        if already_liked {
            query(
                "
                DELETE FROM likes
                WHERE user_id = $1 AND post_id = $2
                ",
            )
            .bind(user_id.get())
            .bind(post_id.get())
            .execute(&mut *tx)
            .await?;
        } else {
            let inserted = query(
                "
                INSERT INTO likes (user_id, post_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, post_id) DO NOTHING
                ",
            )
            .bind(user_id.get())
            .bind(post_id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted == 0 {
                // A concurrent toggle inserted the same pair first. Both
                // requests converge on "liked", so the conflict is absorbed.
                debug!(%user_id, %post_id, "Duplicate like absorbed");
            }
        }

        let like_count: i64 = query_scalar(
            "
            SELECT COUNT(*)
            FROM likes
            WHERE post_id = $1
            ",
        )
        .bind(post_id.get())
        .fetch_one(&mut *tx)
        .await?;

        query(
            "
            INSERT INTO like_counts (post_id, like_count)
            VALUES ($1, $2)
            ON CONFLICT (post_id) DO UPDATE SET like_count = EXCLUDED.like_count
            ",
        )
        .bind(post_id.get())
        .bind(like_count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ToggleLike::Completed(LikeToggle {
            liked: !already_liked,
            like_count,
        }))
    }

    /// Reads the like-count projection. The hot path never aggregates the
    /// like rows; a post without a projection row reads as zero.
    pub async fn fetch_like_count(&self, post_id: Id<PostMarker>) -> Result<i64> {
        let count: Option<i64> = query_scalar(
            "
            SELECT like_count
            FROM like_counts
            WHERE post_id = $1
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    pub async fn is_liked_by(
        &self,
        user_id: Id<UserMarker>,
        post_id: Id<PostMarker>,
    ) -> Result<bool> {
        let liked = query_scalar(
            "
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            ",
        )
        .bind(user_id.get())
        .bind(post_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }
}
