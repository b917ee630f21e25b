//! User-visible notifications.

/// Severity of a notice, mapped by hosts to toast styling and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A dismissible message surfaced to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sink for user-visible notices. The UI layer supplies the real
/// implementation; the library ships a tracing-backed one.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Notifier that forwards notices to the tracing subscriber. Useful for
/// headless hosts and as a default.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                tracing::error!(title = %notice.title, "notice: {}", notice.message)
            }
            NoticeLevel::Warning => {
                tracing::warn!(title = %notice.title, "notice: {}", notice.message)
            }
            _ => tracing::info!(title = %notice.title, "notice: {}", notice.message),
        }
    }
}
