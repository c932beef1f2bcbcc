use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Comment, CommentFilter, CommentId, CommentOrder, NewComment, VotePatch};

/// The hosted comment collection, seen through the narrow contract this
/// subsystem actually uses. The store is the sole owner of durable state;
/// everything the client holds is a derived projection.
#[async_trait]
pub trait Store {
    /// One-shot query for all records matching `filter`, in `order`
    async fn query(
        &self,
        filter: &CommentFilter,
        order: CommentOrder,
    ) -> anyhow::Result<Vec<Comment>>;

    /// Creates a record with a store-assigned id and timestamps, zero votes
    /// and an empty vote registry
    async fn create(&self, new: NewComment) -> anyhow::Result<CommentId>;

    /// Applies a vote patch atomically: adds the delta to the stored total
    /// and sets or clears the voter's registry entry in the same step.
    /// Returns the new total.
    async fn apply_vote(&self, id: CommentId, patch: VotePatch) -> anyhow::Result<i64>;

    async fn get(&self, id: CommentId) -> anyhow::Result<Option<Comment>>;

    /// Live change feed: the receiver fires whenever a record matching
    /// `filter` is created or updated. Dropping the receiver unsubscribes.
    async fn subscribe(
        &self,
        filter: CommentFilter,
    ) -> anyhow::Result<mpsc::UnboundedReceiver<()>>;
}

/// Authentication handle, passed explicitly into every operation that needs
/// a caller instead of being read from a process-wide singleton
pub trait Identity {
    fn current_user(&self) -> Option<crate::UserId>;
    fn display_name(&self) -> Option<String>;
    /// Invoked when an operation requires a user and there is none; in the
    /// web UI this is the login redirect
    fn on_unauthenticated(&self);
}
