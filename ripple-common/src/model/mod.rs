pub mod feed;
pub mod follow;
pub mod like;
pub mod post;
pub mod user;

use crate::model::{post::InvalidPostContentError, user::InvalidUserHandleError};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    UserHandle(#[from] InvalidUserHandleError),
    #[error(transparent)]
    PostContent(#[from] InvalidPostContentError),
}

/// Typed wrapper around a database-generated row id.
///
/// The marker type prevents mixing up ids of different entities at compile
/// time while staying a plain `BIGINT` on the wire and in the database.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(i64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<i64> for Id<Marker> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for i64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Id, post::PostMarker, user::UserMarker};

    #[test]
    fn id_round_trip() {
        let id = Id::<UserMarker>::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(Id::<UserMarker>::from(42), id);
    }

    #[test]
    fn id_display() {
        assert_eq!(Id::<PostMarker>::new(7).to_string(), "7");
    }

    #[test]
    fn id_serde_transparent() {
        let id = Id::<PostMarker>::new(1234);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1234");
        assert_eq!(serde_json::from_str::<Id<PostMarker>>("1234").unwrap(), id);
    }
}
