pub mod errors;
pub mod interaction_client;

pub use interaction_client::HttpInteractionService;
