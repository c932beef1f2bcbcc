mod order;
pub use order::OrderExt;

mod store;
pub use store::CommentStore;

pub mod api {
    pub use scriptshare_api::*;
}

pub mod prelude {
    pub use crate::OrderExt;
}
