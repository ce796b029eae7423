pub mod errors;
pub mod kind;
pub mod service;
pub mod state;

pub use errors::InteractionError;
pub use kind::{CheckKind, InteractionKind, InteractionSubject};
pub use service::{LikeStatus, RemoteInteractionService, ShareStatus};
pub use state::{ControllerPhase, InteractionState, InteractionStatus, ToggleSnapshot};
