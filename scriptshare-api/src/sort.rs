/// User-selectable ordering of a thread's top-level comments
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Votes descending
    Top,
    /// Creation time descending
    New,
    /// Votes ascending
    Controversial,
}

impl Default for SortMode {
    fn default() -> SortMode {
        SortMode::Top
    }
}

impl SortMode {
    pub fn order(self) -> CommentOrder {
        match self {
            SortMode::Top => CommentOrder::VotesDesc,
            SortMode::New => CommentOrder::CreatedDesc,
            SortMode::Controversial => CommentOrder::VotesAsc,
        }
    }
}

/// Ordering a store query returns its records in.
///
/// Replies are not independently sortable: reply queries always use
/// `CreatedAsc`, the three others map from [`SortMode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum CommentOrder {
    VotesDesc,
    VotesAsc,
    CreatedDesc,
    CreatedAsc,
}
