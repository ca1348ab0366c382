use serde::{Deserialize, Serialize};

/// Outcome of a follow toggle: the state the edge converged to.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize)]
pub struct FollowToggle {
    pub following: bool,
}
