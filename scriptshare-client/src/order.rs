use std::cmp::Reverse;

use crate::api::{Comment, CommentOrder};

pub trait OrderExt {
    fn sort(&self, comments: &mut [Comment]);
}

impl OrderExt for CommentOrder {
    /// Ties are broken by id so repeated loads render identically
    fn sort(&self, comments: &mut [Comment]) {
        match self {
            CommentOrder::VotesDesc => {
                comments.sort_unstable_by_key(|c| (Reverse(c.votes), c.id))
            }
            CommentOrder::VotesAsc => comments.sort_unstable_by_key(|c| (c.votes, c.id)),
            CommentOrder::CreatedDesc => {
                comments.sort_unstable_by_key(|c| (Reverse(c.created_at), c.id))
            }
            CommentOrder::CreatedAsc => comments.sort_unstable_by_key(|c| (c.created_at, c.id)),
        }
    }
}
