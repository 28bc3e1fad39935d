//! Outbound user notifications.

/// Severity of a transient user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Fire-and-forget sink for transient user-facing messages.
///
/// The embedding UI decides presentation (a toast stack, nothing at all);
/// the session controller only reports. No return value is consumed.
pub trait NotificationSink {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}
