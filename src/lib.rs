//! Client-side interaction sync for the voice-note app: optimistic like and
//! share toggles reconciled against the server, plus batched status reads
//! for feeds.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
