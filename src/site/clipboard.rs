//! Click-to-copy contact details.

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

pub const COPIED_LABEL: &str = "Copied!";
/// How long the confirmation replaces the item's text.
pub const COPIED_FOR: Duration = Duration::from_millis(2000);

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard kept in process, for the headless runner and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyItem {
    text: String,
    copied: bool,
}

impl CopyItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            copied: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> &str {
        if self.copied { COPIED_LABEL } else { &self.text }
    }

    /// Copies the item's own text, never the confirmation. Returns how long
    /// the confirmation shows, or `None` when the clipboard refused.
    pub fn click<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> Option<Duration> {
        match clipboard.write_text(&self.text) {
            Ok(()) => {
                self.copied = true;
                Some(COPIED_FOR)
            }
            Err(err) => {
                debug!(error = %err, "could not copy text");
                None
            }
        }
    }

    pub fn revert(&mut self) {
        self.copied = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    impl Clipboard for Denied {
        fn write_text(&mut self, _text: &str) -> Result<()> {
            anyhow::bail!("permission denied")
        }
    }

    #[test]
    fn copy_shows_confirmation_until_reverted() {
        let mut clipboard = MemoryClipboard::default();
        let mut item = CopyItem::new("01234 567890");
        assert_eq!(item.click(&mut clipboard), Some(COPIED_FOR));
        assert_eq!(item.label(), "Copied!");
        assert_eq!(clipboard.contents(), Some("01234 567890"));

        // a second click still copies the number
        item.click(&mut clipboard);
        assert_eq!(clipboard.contents(), Some("01234 567890"));

        item.revert();
        assert_eq!(item.label(), "01234 567890");
    }

    #[test]
    fn refused_copy_keeps_label() {
        let mut item = CopyItem::new("info@example.com");
        assert_eq!(item.click(&mut Denied), None);
        assert_eq!(item.label(), "info@example.com");
    }
}
