pub mod hydrator;
pub mod shared_items;

pub use hydrator::{FeedCard, FeedHydrator, FeedItem};
pub use shared_items::SharedItemsTracker;
