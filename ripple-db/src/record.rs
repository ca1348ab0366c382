use ripple_common::model::{
    ModelValidationError,
    feed::FeedEntry,
    post::{Post, PostContent},
    user::{User, UserHandle},
};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct UserRecord {
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct FullPostRecord {
    pub post_id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub post_created_at: OffsetDateTime,
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct FeedEntryRecord {
    pub feed_id: i64,
    pub feed_created_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub post: FullPostRecord,
}

impl TryFrom<UserRecord> for User {
    type Error = ModelValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.user_id.into(),
            handle: UserHandle::new(value.handle)?,
        })
    }
}

impl TryFrom<FullPostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: FullPostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.into(),
            author: User {
                id: value.user_id.into(),
                handle: UserHandle::new(value.handle)?,
            },
            content: PostContent::new(value.content)?,
            media_url: value.media_url,
            created_at: value.post_created_at,
        })
    }
}

impl TryFrom<FeedEntryRecord> for FeedEntry {
    type Error = ModelValidationError;

    fn try_from(value: FeedEntryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.feed_id.into(),
            post: value.post.try_into()?,
            created_at: value.feed_created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{FeedEntryRecord, FullPostRecord, UserRecord};
    use ripple_common::model::{Id, feed::FeedEntry, post::Post, user::User};
    use time::OffsetDateTime;

    fn post_record() -> FullPostRecord {
        FullPostRecord {
            post_id: 7,
            content: "hello".to_owned(),
            media_url: None,
            post_created_at: OffsetDateTime::UNIX_EPOCH,
            user_id: 2,
            handle: "ada".to_owned(),
        }
    }

    #[test]
    fn user_record_conversion() {
        let user = User::try_from(UserRecord {
            user_id: 2,
            handle: "ada".to_owned(),
        })
        .unwrap();

        assert_eq!(user.id, Id::new(2));
        assert_eq!(user.handle.get(), "ada");
    }

    #[test]
    fn user_record_invalid_handle() {
        let result = User::try_from(UserRecord {
            user_id: 2,
            handle: String::new(),
        });

        assert!(result.is_err());
    }

    #[test]
    fn post_record_conversion() {
        let post = Post::try_from(post_record()).unwrap();

        assert_eq!(post.id, Id::new(7));
        assert_eq!(post.author.id, Id::new(2));
        assert_eq!(post.content.get(), "hello");
        assert_eq!(post.media_url, None);
    }

    #[test]
    fn feed_entry_record_conversion() {
        let entry = FeedEntry::try_from(FeedEntryRecord {
            feed_id: 11,
            feed_created_at: OffsetDateTime::UNIX_EPOCH,
            post: post_record(),
        })
        .unwrap();

        assert_eq!(entry.id, Id::new(11));
        assert_eq!(entry.post.id, Id::new(7));
    }
}
