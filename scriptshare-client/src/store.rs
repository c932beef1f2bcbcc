use anyhow::Context;
use tokio::sync::mpsc;

use crate::{
    api::{
        validate_content, vote_transition, CodeBlockId, Comment, CommentFilter, CommentId,
        CommentOrder, Error, Identity, NewComment, ParentFilter, ScriptId, SortMode, Store,
        UserId, VoteDirection, VotePatch, MAX_COMMENT_LEN, MAX_REPLY_LEN,
    },
    OrderExt,
};

/// In-memory view of one content item's comment thread.
///
/// The store is the source of truth; this only holds a derived projection
/// used for rendering and for computing vote transitions. All operations
/// take the caller's identity explicitly.
pub struct CommentStore<S> {
    store: S,
    script_id: ScriptId,
    code_block_id: Option<CodeBlockId>,
    sort: SortMode,
    comments: Vec<Comment>,
}

impl<S: Store> CommentStore<S> {
    pub fn new(store: S, script_id: ScriptId, code_block_id: Option<CodeBlockId>) -> Self {
        CommentStore {
            store,
            script_id,
            code_block_id,
            sort: SortMode::default(),
            comments: Vec::new(),
        }
    }

    /// Top-level comments of the current projection, each with its replies
    /// populated oldest-first
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub async fn set_sort(&mut self, sort: SortMode) -> Result<(), Error> {
        self.sort = sort;
        self.refresh().await
    }

    /// Reloads the thread from the store. On failure the projection is
    /// emptied and the error surfaced, never swallowed.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        match self.assemble().await {
            Ok(comments) => {
                self.comments = comments;
                Ok(())
            }
            Err(err) => {
                tracing::error!(?err, script = ?self.script_id, "failed loading comments");
                self.comments.clear();
                Err(Error::Fetch(format!("{err:#}")))
            }
        }
    }

    /// One query for the top-level comments in the current sort order, then
    /// one reply query per comment, oldest reply first
    async fn assemble(&self) -> anyhow::Result<Vec<Comment>> {
        let order = self.sort.order();
        let mut comments = self
            .store
            .query(&self.filter(ParentFilter::TopLevel), order)
            .await
            .context("querying top-level comments")?;
        for c in comments.iter_mut() {
            c.replies = self
                .store
                .query(
                    &self.filter(ParentFilter::RepliesTo(c.id)),
                    CommentOrder::CreatedAsc,
                )
                .await
                .with_context(|| format!("querying replies of comment {:?}", c.id))?;
        }
        // the store already ordered them, but normalize tie-breaking locally
        order.sort(&mut comments);
        Ok(comments)
    }

    /// Submits a top-level comment. Empty (after trimming) text is silently
    /// ignored and reported as `Ok(None)`; on success the projection is
    /// reloaded.
    pub async fn submit_comment(
        &mut self,
        identity: &dyn Identity,
        text: &str,
    ) -> Result<Option<CommentId>, Error> {
        self.submit(identity, None, text).await
    }

    /// Same as `submit_comment` with the shorter reply limit; `parent_id`
    /// must name a top-level comment of the current projection.
    pub async fn submit_reply(
        &mut self,
        identity: &dyn Identity,
        parent_id: CommentId,
        text: &str,
    ) -> Result<Option<CommentId>, Error> {
        self.submit(identity, Some(parent_id), text).await
    }

    async fn submit(
        &mut self,
        identity: &dyn Identity,
        parent_id: Option<CommentId>,
        text: &str,
    ) -> Result<Option<CommentId>, Error> {
        let author_id = self.require_user(identity)?;
        if let Some(parent) = parent_id {
            // replies may only target a top-level comment of this thread
            if !self.comments.iter().any(|c| c.id == parent) {
                return Err(Error::NotFound(parent));
            }
        }
        let (kind, limit) = match parent_id {
            None => ("Comment", MAX_COMMENT_LEN),
            Some(_) => ("Reply", MAX_REPLY_LEN),
        };
        let content = match validate_content(kind, text, limit)? {
            Some(content) => content,
            None => return Ok(None),
        };
        let new = NewComment {
            script_id: self.script_id,
            code_block_id: self.code_block_id,
            author_id,
            author_name: identity
                .display_name()
                .unwrap_or_else(|| String::from("Anonymous")),
            content,
            parent_id,
        };
        let id = self.store.create(new).await.map_err(|err| {
            tracing::error!(?err, ?parent_id, "failed to post comment");
            Error::Submit(format!("{err:#}"))
        })?;
        // the record persisted; a failure here is a fetch failure, with the
        // projection already emptied by refresh
        self.refresh().await?;
        Ok(Some(id))
    }

    /// Applies one press of the up/down button for the calling user and
    /// returns the confirmed new vote total.
    ///
    /// The transition is computed from the caller's prior vote in the
    /// projection; the write itself is an atomic delta applied by the store,
    /// so two concurrent voters cannot lose each other's update.
    pub async fn vote(
        &mut self,
        identity: &dyn Identity,
        comment_id: CommentId,
        direction: VoteDirection,
    ) -> Result<i64, Error> {
        let voter = self.require_user(identity)?;
        let prior = Comment::find_in(&self.comments, comment_id)
            .ok_or(Error::NotFound(comment_id))?
            .user_votes
            .get(&voter);
        let transition = vote_transition(prior, direction);
        let patch = VotePatch {
            voter,
            vote: transition.next,
            delta: transition.delta,
        };
        let total = self
            .store
            .apply_vote(comment_id, patch)
            .await
            .map_err(|err| {
                tracing::error!(?err, ?comment_id, "failed to register vote");
                Error::Vote(format!("{err:#}"))
            })?;
        // fold the confirmed server state back into the projection; ordering
        // is refreshed on the next reload, not mid-interaction
        if let Some(c) = Comment::find_in_mut(&mut self.comments, comment_id) {
            c.votes = total;
            c.user_votes.apply(voter, transition.next);
        }
        Ok(total)
    }

    /// Change feed for the whole thread, replies included; callers reload
    /// via `refresh` on each notification. Dropping the receiver
    /// unsubscribes.
    pub async fn watch(&self) -> Result<mpsc::UnboundedReceiver<()>, Error> {
        self.store
            .subscribe(self.filter(ParentFilter::Any))
            .await
            .map_err(|err| {
                tracing::error!(?err, script = ?self.script_id, "failed to subscribe");
                Error::Fetch(format!("{err:#}"))
            })
    }

    fn require_user(&self, identity: &dyn Identity) -> Result<UserId, Error> {
        match identity.current_user() {
            Some(user) => Ok(user),
            None => {
                identity.on_unauthenticated();
                Err(Error::Unauthenticated)
            }
        }
    }

    fn filter(&self, parent: ParentFilter) -> CommentFilter {
        CommentFilter {
            script_id: self.script_id,
            code_block_id: self.code_block_id,
            parent,
        }
    }
}
