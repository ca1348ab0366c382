use crate::model::{
    Id,
    user::{User, UserMarker},
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;
use time::OffsetDateTime;

pub const POST_CONTENT_MAX_LEN: usize = 2000;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A live (non-deleted) post joined with its author.
///
/// Soft-deleted posts never cross the model boundary; deletion status is a
/// filtering concern of the persistence layer.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub author: User,
    pub content: PostContent,
    pub media_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CreatePost {
    pub author_id: Id<UserMarker>,
    pub content: PostContent,
    pub media_url: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct PostContent(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The post content is invalid")]
pub struct InvalidPostContentError(String);

impl PostContent {
    pub fn new(content: String) -> Result<Self, InvalidPostContentError> {
        let len = content.chars().count();
        if len > 0 && len <= POST_CONTENT_MAX_LEN {
            Ok(PostContent(content))
        } else {
            Err(InvalidPostContentError(content))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PostContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        PostContent::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"PostContent"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::post::{POST_CONTENT_MAX_LEN, PostContent};

    #[test]
    fn content_validation() {
        assert!(PostContent::new("hello".to_owned()).is_ok());
        assert!(PostContent::new("a".repeat(POST_CONTENT_MAX_LEN)).is_ok());

        assert!(PostContent::new(String::new()).is_err());
        assert!(PostContent::new("a".repeat(POST_CONTENT_MAX_LEN + 1)).is_err());
    }
}
