use crate::model::{Id, post::Post};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct FeedMarker;

/// A materialized home-feed row, joined with the live post and its author.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct FeedEntry {
    pub id: Id<FeedMarker>,
    pub post: Post,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
