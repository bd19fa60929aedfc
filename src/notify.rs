//! User-facing notices.
//!
//! Every outcome that used to be a popup (connection failure, backend
//! rejection, upload confirmation) is a [`Notice`] handed to a [`Notifier`].

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use crate::color::{palette, Rgba};

/// Message shown when a backend cannot be reached.
pub const CANNOT_CONNECT: &str = "Cannot connect to backend";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Success or neutral information.
    Info,
    /// Something failed.
    Error,
}

impl NoticeKind {
    /// Accent color for this kind.
    #[must_use]
    pub const fn color(self) -> Rgba {
        match self {
            Self::Info => palette::INFO,
            Self::Error => palette::ERROR,
        }
    }
}

/// A titled message with a severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notice {
    /// An informational notice.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// The notice for an unreachable backend.
    #[must_use]
    pub fn cannot_connect() -> Self {
        Self::error("Connection error", CANNOT_CONNECT)
    }

    /// Whether this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Something that displays notices.
pub trait Notifier {
    /// Show one notice.
    fn notify(&self, notice: &Notice);
}

/// Log a notice through `tracing` at a level matching its kind.
pub(crate) fn trace(notice: &Notice) {
    match notice.kind {
        NoticeKind::Info => tracing::info!(title = %notice.title, "{}", notice.message),
        NoticeKind::Error => tracing::warn!(title = %notice.title, "{}", notice.message),
    }
}

/// Writes notices to a stream, one per line, optionally colored.
pub struct TerminalNotifier<W: Write + Send> {
    out: Mutex<W>,
    color: bool,
}

impl<W: Write + Send> TerminalNotifier<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            color: false,
        }
    }

    /// Enable ANSI colors.
    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TerminalNotifier<std::io::Stderr> {
    /// Notifier on standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notice: &Notice) {
        trace(notice);
        let tag = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Error => "error",
        };
        let line = if self.color {
            format!(
                "{}[{tag}]\x1b[0m {}: {}",
                notice.kind.color().ansi_fg(),
                notice.title,
                notice.message
            )
        } else {
            format!("[{tag}] {}: {}", notice.title, notice.message)
        };
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Display failures are not worth surfacing.
        let _ = writeln!(out, "{line}");
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(n) => n.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The most recent notice.
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        trace(notice);
        match self.notices.lock() {
            Ok(mut n) => n.push(notice.clone()),
            Err(poisoned) => poisoned.into_inner().push(notice.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_notifier_plain() {
        let notifier = TerminalNotifier::new(Vec::new());
        notifier.notify(&Notice::cannot_connect());
        notifier.notify(&Notice::info("Upload", "File uploaded"));
        let text = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(
            text,
            "[error] Connection error: Cannot connect to backend\n[info] Upload: File uploaded\n"
        );
    }

    #[test]
    fn test_terminal_notifier_color() {
        let notifier = TerminalNotifier::new(Vec::new()).color(true);
        notifier.notify(&Notice::error("Run", "boom"));
        let text = String::from_utf8(notifier.into_inner()).unwrap();
        assert!(text.starts_with("\x1b[38;2;248;113;113m[error]\x1b[0m"));
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        assert!(notifier.last().is_none());
        notifier.notify(&Notice::info("a", "b"));
        notifier.notify(&Notice::cannot_connect());
        assert_eq!(notifier.notices().len(), 2);
        assert!(notifier.last().unwrap().is_error());
    }

    #[test]
    fn test_notice_serializes_kind_lowercase() {
        let json = serde_json::to_value(Notice::info("t", "m")).unwrap();
        assert_eq!(json["kind"], "info");
        assert_eq!(Notice::info("t", "m").to_string(), "t: m");
    }
}
