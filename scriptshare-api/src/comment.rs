use uuid::Uuid;

use crate::{CodeBlockId, ScriptId, Time, UserId, UserVotes, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub script_id: ScriptId,
    pub code_block_id: Option<CodeBlockId>,

    pub author_id: UserId,
    pub author_name: String,
    pub content: String,

    pub created_at: Time,
    /// Only meaningful once `is_edited` is true
    pub updated_at: Time,
    pub is_edited: bool,

    /// `None` for top-level comments; the parent's id for replies
    pub parent_id: Option<CommentId>,

    /// Running total; always equal to `user_votes.tally()`
    pub votes: i64,
    pub user_votes: UserVotes,

    /// Child comments, oldest first; populated on top-level comments only
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Checks the votes-total invariant of this comment alone
    pub fn votes_consistent(&self) -> bool {
        self.votes == self.user_votes.tally()
    }

    /// Finds `id` among `comments` or among any of their replies.
    /// Nesting is one level deep, so no recursion is needed.
    pub fn find_in(comments: &[Comment], id: CommentId) -> Option<&Comment> {
        comments
            .iter()
            .find(|c| c.id == id)
            .or_else(|| comments.iter().flat_map(|c| c.replies.iter()).find(|r| r.id == id))
    }

    pub fn find_in_mut(comments: &mut [Comment], id: CommentId) -> Option<&mut Comment> {
        // two passes to keep the borrow checker happy
        if comments.iter().any(|c| c.id == id) {
            return comments.iter_mut().find(|c| c.id == id);
        }
        comments
            .iter_mut()
            .flat_map(|c| c.replies.iter_mut())
            .find(|r| r.id == id)
    }
}

/// Fields the caller provides on creation; the store assigns id and
/// timestamps, and initializes votes to zero
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub script_id: ScriptId,
    pub code_block_id: Option<CodeBlockId>,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    pub parent_id: Option<CommentId>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ParentFilter {
    /// Top-level comments and replies alike
    Any,
    /// `parent_id` is null
    TopLevel,
    /// Replies to one specific comment
    RepliesTo(CommentId),
}

/// Predicate set of a store query or subscription
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentFilter {
    pub script_id: ScriptId,
    /// Matched exactly: threads not scoped to a code block store `None` here
    pub code_block_id: Option<CodeBlockId>,
    pub parent: ParentFilter,
}

impl CommentFilter {
    pub fn matches(&self, c: &Comment) -> bool {
        if c.script_id != self.script_id || c.code_block_id != self.code_block_id {
            return false;
        }
        match self.parent {
            ParentFilter::Any => true,
            ParentFilter::TopLevel => c.parent_id.is_none(),
            ParentFilter::RepliesTo(parent) => c.parent_id == Some(parent),
        }
    }
}
