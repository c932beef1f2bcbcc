use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Input rejected before any store round-trip
    #[error("{kind} cannot exceed {limit} characters.")]
    ContentTooLong {
        kind: &'static str,
        limit: usize,
        len: usize,
    },

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    /// Caller has no identity; resolved by a login redirect, not shown as an
    /// error string
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Comment {0:?} not found")]
    NotFound(CommentId),

    /// Store failure while reading the thread; payload keeps the underlying
    /// cause for the logs, the display string is what the user sees
    #[error("Failed to load comments.")]
    Fetch(String),

    #[error("Failed to post comment. Please try again.")]
    Submit(String),

    #[error("Failed to register vote. Please try again.")]
    Vote(String),
}
