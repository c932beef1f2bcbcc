use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod comment;
pub use comment::{Comment, CommentFilter, CommentId, NewComment, ParentFilter};

mod error;
pub use error::Error;

mod script;
pub use script::{CodeBlockId, ScriptId};

mod sort;
pub use sort::{CommentOrder, SortMode};

mod store;
pub use store::{Identity, Store};

mod user;
pub use user::UserId;

mod vote;
pub use vote::{vote_transition, UserVotes, VoteDirection, VotePatch, VoteTransition};

/// Character limit for a top-level comment body
pub const MAX_COMMENT_LEN: usize = 1000;

/// Character limit for a reply body
pub const MAX_REPLY_LEN: usize = 500;

/// Validates a comment or reply body before it goes anywhere near the store.
///
/// Returns `Ok(None)` for text that is empty after trimming: submitting an
/// empty body is a no-op for the caller, not an error. `kind` is the
/// user-facing noun used in error messages ("Comment" or "Reply").
pub fn validate_content(
    kind: &'static str,
    text: &str,
    limit: usize,
) -> Result<Option<String>, Error> {
    if text.contains('\0') {
        return Err(Error::NullByteInString(text.to_string()));
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let len = trimmed.chars().count();
    if len > limit {
        return Err(Error::ContentTooLong { kind, limit, len });
    }
    Ok(Some(trimmed.to_string()))
}
