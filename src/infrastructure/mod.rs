pub mod http;
pub mod monitoring;
