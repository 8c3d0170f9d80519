use recruit_core::{Notice, NoticeKind, Notifier};

use crate::cli::output;

/// Prints every notice as it arrives.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Info => output::info(&notice.message),
            NoticeKind::Success => output::success(&notice.message),
            NoticeKind::Error => output::error(&notice.message),
        }
    }
}
