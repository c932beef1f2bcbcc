use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::Utc;
use scriptshare_client::{
    api::{
        Comment, CommentFilter, CommentId, CommentOrder, Identity, NewComment, Store, Time,
        UserId, UserVotes, Uuid, VotePatch,
    },
    OrderExt,
};
use tokio::sync::mpsc;

/// In-memory stand-in for the hosted comment collection. Clones share the
/// same state, so several clients can be pointed at one server.
#[derive(Clone)]
pub struct MockServer(Arc<Mutex<Inner>>);

struct Inner {
    comments: BTreeMap<CommentId, Comment>,
    feeds: Vec<Feed>,
    // server-assigned creation times, strictly monotonic so orderings are
    // deterministic in tests
    now: Time,
    fail_reads: bool,
    fail_writes: bool,
}

struct Feed {
    filter: CommentFilter,
    sender: mpsc::UnboundedSender<()>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer(Arc::new(Mutex::new(Inner {
            comments: BTreeMap::new(),
            feeds: Vec::new(),
            now: Utc::now(),
            fail_reads: false,
            fail_writes: false,
        })))
    }

    /// Makes every subsequent query/get fail, for exercising fetch-error
    /// paths
    pub fn set_fail_reads(&self, fail: bool) {
        self.0.lock().unwrap().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.0.lock().unwrap().fail_writes = fail;
    }

    /// Durable state of one record, for assertions
    pub fn comment(&self, id: CommentId) -> Option<Comment> {
        self.0.lock().unwrap().comments.get(&id).cloned()
    }

    pub fn num_comments(&self) -> usize {
        self.0.lock().unwrap().comments.len()
    }

    fn notify(inner: &mut Inner, changed: &Comment) {
        inner
            .feeds
            .retain(|f| !f.filter.matches(changed) || f.sender.send(()).is_ok());
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait]
impl Store for MockServer {
    async fn query(
        &self,
        filter: &CommentFilter,
        order: CommentOrder,
    ) -> anyhow::Result<Vec<Comment>> {
        let inner = self.0.lock().unwrap();
        anyhow::ensure!(!inner.fail_reads, "injected read failure");
        let mut res = inner
            .comments
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect::<Vec<_>>();
        order.sort(&mut res);
        Ok(res)
    }

    async fn create(&self, new: NewComment) -> anyhow::Result<CommentId> {
        let mut inner = self.0.lock().unwrap();
        anyhow::ensure!(!inner.fail_writes, "injected write failure");
        if let Some(parent) = new.parent_id {
            let parent = inner
                .comments
                .get(&parent)
                .ok_or_else(|| anyhow::anyhow!("parent comment {parent:?} is not in store"))?;
            anyhow::ensure!(
                parent.is_top_level(),
                "parent comment {:?} is itself a reply",
                parent.id,
            );
            anyhow::ensure!(
                parent.script_id == new.script_id && parent.code_block_id == new.code_block_id,
                "parent comment {:?} belongs to another thread",
                parent.id,
            );
        }
        inner.now = inner.now + chrono::Duration::seconds(1);
        let comment = Comment {
            id: CommentId(Uuid::new_v4()),
            script_id: new.script_id,
            code_block_id: new.code_block_id,
            author_id: new.author_id,
            author_name: new.author_name,
            content: new.content,
            created_at: inner.now,
            updated_at: inner.now,
            is_edited: false,
            parent_id: new.parent_id,
            votes: 0,
            user_votes: UserVotes::new(),
            replies: Vec::new(),
        };
        let id = comment.id;
        inner.comments.insert(id, comment.clone());
        Self::notify(&mut inner, &comment);
        Ok(id)
    }

    async fn apply_vote(&self, id: CommentId, patch: VotePatch) -> anyhow::Result<i64> {
        let mut inner = self.0.lock().unwrap();
        anyhow::ensure!(!inner.fail_writes, "injected write failure");
        let comment = inner
            .comments
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("comment {id:?} is not in store"))?;
        comment.votes += patch.delta;
        comment.user_votes.apply(patch.voter, patch.vote);
        let changed = comment.clone();
        Self::notify(&mut inner, &changed);
        Ok(changed.votes)
    }

    async fn get(&self, id: CommentId) -> anyhow::Result<Option<Comment>> {
        let inner = self.0.lock().unwrap();
        anyhow::ensure!(!inner.fail_reads, "injected read failure");
        Ok(inner.comments.get(&id).cloned())
    }

    async fn subscribe(
        &self,
        filter: CommentFilter,
    ) -> anyhow::Result<mpsc::UnboundedReceiver<()>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.0.lock().unwrap().feeds.push(Feed { filter, sender });
        Ok(receiver)
    }
}

/// Identity handle for tests; counts login redirects instead of navigating
pub struct MockIdentity {
    user: Option<UserId>,
    name: Option<String>,
    redirects: AtomicUsize,
}

impl MockIdentity {
    pub fn signed_in(user: UserId, name: &str) -> MockIdentity {
        MockIdentity {
            user: Some(user),
            name: Some(name.to_string()),
            redirects: AtomicUsize::new(0),
        }
    }

    /// Signed in, but the identity provider has no display name on file
    pub fn nameless(user: UserId) -> MockIdentity {
        MockIdentity {
            user: Some(user),
            name: None,
            redirects: AtomicUsize::new(0),
        }
    }

    pub fn anonymous() -> MockIdentity {
        MockIdentity {
            user: None,
            name: None,
            redirects: AtomicUsize::new(0),
        }
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::Relaxed)
    }
}

impl Identity for MockIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user
    }

    fn display_name(&self) -> Option<String> {
        self.name.clone()
    }

    fn on_unauthenticated(&self) {
        self.redirects.fetch_add(1, Ordering::Relaxed);
    }
}
