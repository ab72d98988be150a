//! Transient user-facing notices
//!
//! Every failure that reaches an operation boundary ends up here as one short
//! message. The shell prints and drains them after each command.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Notice flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Sink for notices
pub trait Notifier {
    fn notify(&mut self, kind: NoticeKind, text: &str);

    fn success(&mut self, text: &str) {
        self.notify(NoticeKind::Success, text);
    }

    fn error(&mut self, text: &str) {
        self.notify(NoticeKind::Error, text);
    }
}

/// In-memory notice queue
///
/// Bounded so a long shell session does not accumulate unread notices.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: VecDeque<Notice>,
    capacity: usize,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}

impl NoticeBoard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notices: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Remove and return everything queued so far
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&mut self, kind: NoticeKind, text: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(notice = text),
            NoticeKind::Error => tracing::warn!(notice = text),
        }

        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            kind,
            text: text.to_string(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_board() {
        let mut board = NoticeBoard::default();
        board.success("Saved successfully");
        board.error("Failed to delete item");

        let drained = board.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, NoticeKind::Error);
        assert!(board.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut board = NoticeBoard::with_capacity(2);
        board.error("a");
        board.error("b");
        board.error("c");

        let texts: Vec<_> = board.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }
}
