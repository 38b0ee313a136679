pub mod summary_feed;

pub use summary_feed::{cache_busted, SummarySource};
