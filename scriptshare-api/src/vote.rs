use std::collections::HashMap;

use crate::UserId;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Contribution of one vote of this direction to a comment's total
    pub fn weight(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// Per-user vote registry of a single comment.
///
/// Explicit get/set/clear interface on purpose: the votes total of a comment
/// must always equal `tally()`, so every mutation goes through here.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct UserVotes(HashMap<UserId, VoteDirection>);

impl UserVotes {
    pub fn new() -> UserVotes {
        UserVotes(HashMap::new())
    }

    pub fn get(&self, user: &UserId) -> Option<VoteDirection> {
        self.0.get(user).copied()
    }

    pub fn set(&mut self, user: UserId, vote: VoteDirection) {
        self.0.insert(user, vote);
    }

    /// Retracts `user`'s vote; absent entries stay absent
    pub fn clear(&mut self, user: &UserId) {
        self.0.remove(user);
    }

    pub fn apply(&mut self, user: UserId, vote: Option<VoteDirection>) {
        match vote {
            Some(v) => self.set(user, v),
            None => self.clear(&user),
        }
    }

    /// Signed sum of all recorded votes
    pub fn tally(&self) -> i64 {
        self.0.values().map(|v| v.weight()).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of one press of an up/down button
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VoteTransition {
    /// Vote to record for the user afterwards; `None` retracts the entry
    pub next: Option<VoteDirection>,
    /// Amount to add to the comment's votes total
    pub delta: i64,
}

/// Computes the next vote state for one user pressing `direction` with an
/// existing vote of `prior`.
///
/// Pressing the same direction twice retracts the vote; pressing the other
/// direction switches it directly (delta of 2), without passing through a
/// neutral state.
pub fn vote_transition(prior: Option<VoteDirection>, direction: VoteDirection) -> VoteTransition {
    match prior {
        Some(p) if p == direction => VoteTransition {
            next: None,
            delta: -direction.weight(),
        },
        Some(_) => VoteTransition {
            next: Some(direction),
            delta: 2 * direction.weight(),
        },
        None => VoteTransition {
            next: Some(direction),
            delta: direction.weight(),
        },
    }
}

/// Write half of a vote transition, applied atomically by the store: the
/// delta is added to the stored total (never a blind overwrite of it) and the
/// voter's registry entry is set or cleared in the same step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VotePatch {
    pub voter: UserId,
    pub vote: Option<VoteDirection>,
    pub delta: i64,
}
