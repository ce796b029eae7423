pub mod batch;
pub mod feed;
pub mod toggle;
