use serde::{Deserialize, Serialize};

/// Outcome of a toggle: the state the pair converged to, plus the
/// authoritative count recomputed under the same transaction.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}

#[cfg(test)]
mod tests {
    use crate::model::like::LikeToggle;

    #[test]
    fn like_toggle_body_shape() {
        let toggle = LikeToggle {
            liked: true,
            like_count: 3,
        };
        assert_eq!(
            serde_json::to_string(&toggle).unwrap(),
            r#"{"liked":true,"like_count":3}"#
        );
    }
}
