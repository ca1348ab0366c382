use crate::client::{DbClient, Result};
use ripple_common::model::{Id, user::UserMarker};
use sqlx::{query, query_scalar};

/// Outcome of [`DbClient::toggle_follow`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ToggleFollow {
    UserNotFound(Id<UserMarker>),
    Followed,
    Unfollowed,
}

impl DbClient {
    /// Flips the (follower, followed) edge. The unique constraint makes the
    /// insert race-safe: of two concurrent follow attempts one inserts, the
    /// other falls through to the delete branch and unfollows again, which is
    /// the same convergence a sequential double-toggle has.
    pub async fn toggle_follow(
        &self,
        follower_id: Id<UserMarker>,
        followed_id: Id<UserMarker>,
    ) -> Result<ToggleFollow> {
        let mut tx = self.pool.begin().await?;

        for user_id in [follower_id, followed_id] {
            let active: bool = query_scalar(
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

            if !active {
                return Ok(ToggleFollow::UserNotFound(user_id));
            }
        }

        let inserted = query(
            "
            INSERT INTO follows (follower_id, followed_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followed_id) DO NOTHING
            ",
        )
        .bind(follower_id.get())
        .bind(followed_id.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            tx.commit().await?;
            return Ok(ToggleFollow::Followed);
        }

        query(
            "
            DELETE FROM follows
            WHERE follower_id = $1 AND followed_id = $2
            ",
        )
        .bind(follower_id.get())
        .bind(followed_id.get())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ToggleFollow::Unfollowed)
    }

    pub async fn fetch_followed_ids(
        &self,
        user_id: Id<UserMarker>,
    ) -> Result<Vec<Id<UserMarker>>> {
        let ids: Vec<i64> = query_scalar(
            "
            SELECT followed_id
            FROM follows
            WHERE follower_id = $1
            ORDER BY followed_id
            ",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(Id::from).collect())
    }
}
