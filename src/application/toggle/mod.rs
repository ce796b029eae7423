pub mod controller;
pub mod notice;

pub use controller::{ChangeListener, LoadTicket, ToggleInteractionController, ToggleOutcome};
pub use notice::{InteractionNotifier, Notice, NoticeKind};
