pub mod config;
pub mod dto;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use dto::{BatchCallback, BatchId, CheckOutcome, StatusCheckResult, StatusRequest};
pub use scheduler::BatchRequestScheduler;
