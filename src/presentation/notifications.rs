use crate::application::toggle::{InteractionNotifier, Notice, NoticeKind};
use tokio::sync::mpsc;

/// Writes notices to the log. Used by the CLI and as a fallback sink.
pub struct TracingNotifier;

impl InteractionNotifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::RateLimited => {
                tracing::info!(subject = %notice.subject, message = %notice.message, "notice")
            }
            NoticeKind::Unauthenticated | NoticeKind::Failed => {
                tracing::warn!(subject = %notice.subject, message = %notice.message, "notice")
            }
        }
    }
}

/// Forwards notices to whatever renders toasts.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl InteractionNotifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::debug!("notice dropped, no toast receiver");
        }
    }
}
