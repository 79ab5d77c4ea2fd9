// ── User-visible notices ──
//
// Errors and warnings the shell should surface (a toast, a log line,
// stderr). Delivery is fire-and-forget: a dropped receiver never turns
// into a failure on the reporting side.

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(CoreError),
    Warning(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{e}"),
            Self::Warning(msg) => f.write_str(msg),
        }
    }
}

/// Sending half of the notice channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NoticeSender {
    tx: mpsc::UnboundedSender<Notice>,
}

pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Create a connected sender/receiver pair.
pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NoticeSender { tx }, rx)
}

impl NoticeSender {
    /// A sender whose notices go nowhere.
    pub fn disconnected() -> Self {
        notice_channel().0
    }

    pub fn send(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            warn!("notice receiver dropped");
        }
    }

    pub fn error(&self, err: CoreError) {
        self.send(Notice::Error(err));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(Notice::Warning(message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_arrive_in_order() {
        let (tx, mut rx) = notice_channel();
        tx.warning("first");
        tx.error(CoreError::NotConnected);

        assert_eq!(rx.try_recv().ok(), Some(Notice::Warning("first".into())));
        assert_eq!(rx.try_recv().ok(), Some(Notice::Error(CoreError::NotConnected)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disconnected_sender_does_not_panic() {
        let tx = NoticeSender::disconnected();
        tx.warning("nobody listening");
    }
}
