use crate::{
    client::{DbClient, Result},
    record::{FeedEntryRecord, FullPostRecord},
};
use ripple_common::{
    model::{Id, feed::FeedEntry, post::Post, post::PostMarker, user::UserMarker},
    page::{Page, PageRequest},
};
use sqlx::{query, query_as};
use tracing::debug;

impl DbClient {
    /// The caller's materialized home feed, newest first. One query fetches
    /// the feed rows joined with their live posts and authors; rows whose
    /// post or author has since been soft-deleted are filtered out.
    ///
    /// Returns `None` when the user is absent or soft-deleted.
    pub async fn fetch_user_feed(
        &self,
        user_id: Id<UserMarker>,
        page: PageRequest,
    ) -> Result<Option<Page<FeedEntry>>> {
        if self.fetch_active_user(user_id).await?.is_none() {
            return Ok(None);
        }

        let records = query_as::<_, FeedEntryRecord>(
            "
            SELECT
                feed.feed_id,
                feed.created_at AS feed_created_at,
                posts.post_id,
                posts.content,
                posts.media_url,
                posts.created_at AS post_created_at,
                users.user_id,
                users.handle
            FROM
                feed
                JOIN posts ON posts.post_id = feed.post_id
                JOIN users ON users.user_id = posts.user_id
            WHERE
                feed.user_id = $1
                AND posts.deleted_at IS NULL
                AND users.deleted_at IS NULL
            ORDER BY feed.created_at DESC, feed.feed_id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.get())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let entries = records
            .into_iter()
            .map(FeedEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Page::new(entries, page)))
    }

    /// All live posts, newest first.
    pub async fn fetch_global_feed(&self, page: PageRequest) -> Result<Page<Post>> {
        let records = query_as::<_, FullPostRecord>(
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
                posts.deleted_at IS NULL
                AND users.deleted_at IS NULL
            ORDER BY posts.created_at DESC, posts.post_id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(posts, page))
    }

    /// Live posts authored by the users the caller follows, newest first.
    /// Derived from the follow graph at query time: the followed-id set is
    /// resolved first, then posts are paged against it.
    ///
    /// Returns `None` when the user is absent or soft-deleted.
    pub async fn fetch_follow_feed(
        &self,
        user_id: Id<UserMarker>,
        page: PageRequest,
    ) -> Result<Option<Page<Post>>> {
        if self.fetch_active_user(user_id).await?.is_none() {
            return Ok(None);
        }

        let followed = self.fetch_followed_ids(user_id).await?;
        if followed.is_empty() {
            return Ok(Some(Page::empty(page)));
        }
        let followed: Vec<i64> = followed.into_iter().map(Id::get).collect();

        let records = query_as::<_, FullPostRecord>(
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
                posts.user_id = ANY($1)
                AND posts.deleted_at IS NULL
                AND users.deleted_at IS NULL
            ORDER BY posts.created_at DESC, posts.post_id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(&followed)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Page::new(posts, page)))
    }

    /// Deletes the caller's feed rows for the given posts. Ids without a
    /// feed row are no-ops; rows of other users are untouched. Rejecting an
    /// empty id list is the caller's (boundary) responsibility.
    pub async fn remove_seen_feeds(
        &self,
        user_id: Id<UserMarker>,
        post_ids: &[Id<PostMarker>],
    ) -> Result<u64> {
        let post_ids: Vec<i64> = post_ids.iter().copied().map(Id::get).collect();

        let removed = query(
            "
            DELETE FROM feed
            WHERE user_id = $1 AND post_id = ANY($2)
            ",
        )
        .bind(user_id.get())
        .bind(&post_ids)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(removed)
    }

    /// Cascade for the post-deletion path: removes every feed row that
    /// references the post, for all receiving users.
    pub async fn delete_feeds_by_post(&self, post_id: Id<PostMarker>) -> Result<u64> {
        let removed = query("DELETE FROM feed WHERE post_id = $1")
            .bind(post_id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(removed)
    }

    /// Cascade for the user-deletion path: removes the user's own feed rows.
    pub async fn delete_feeds_by_user(&self, user_id: Id<UserMarker>) -> Result<u64> {
        let removed = query("DELETE FROM feed WHERE user_id = $1")
            .bind(user_id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(removed)
    }

    /// Removes feed rows whose source post or receiving user has been
    /// soft-deleted since the row was written. Run periodically; the feed
    /// table is an eventually consistent projection and write-path cascades
    /// can miss rows that race with them.
    pub async fn sweep_orphaned_feed_rows(&self) -> Result<u64> {
        let mut removed = query(
            "
            DELETE FROM feed
            USING posts
            WHERE posts.post_id = feed.post_id
              AND posts.deleted_at IS NOT NULL
            ",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        removed += query(
            "
            DELETE FROM feed
            USING users
            WHERE users.user_id = feed.user_id
              AND users.deleted_at IS NOT NULL
            ",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        if removed > 0 {
            debug!(removed, "Swept orphaned feed rows");
        }

        Ok(removed)
    }

    /// Re-derives drifted like-count projection rows from the authoritative
    /// like rows.
    pub async fn reconcile_like_counts(&self) -> Result<u64> {
        let corrected = query(
            "
            UPDATE like_counts
            SET like_count = live.like_count
            FROM (
                SELECT post_id, COUNT(*) AS like_count
                FROM likes
                GROUP BY post_id
            ) AS live
            WHERE live.post_id = like_counts.post_id
              AND live.like_count <> like_counts.like_count
            ",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        let zeroed = query(
            "
            UPDATE like_counts
            SET like_count = 0
            WHERE like_count <> 0
              AND NOT EXISTS (
                  SELECT 1 FROM likes
                  WHERE likes.post_id = like_counts.post_id
              )
            ",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(corrected + zeroed)
    }
}
