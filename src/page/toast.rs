use std::time::{Duration, Instant};

use crate::page::element::{Element, Page};
use crate::utils::{TOAST_HIDE_MS, TOAST_ID};

// ============================================================================
// TOAST NOTIFIER
// ============================================================================

/// Styling category for a toast message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastLevel {
    #[default]
    Success,
    Error,
    Warning,
}

impl ToastLevel {
    pub fn as_class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
        }
    }
}

impl Page {
    /// Show a transient toast; a `None` level falls back to success styling.
    ///
    /// The singleton `#toast` element is created under the root on first
    /// use and reused afterwards. Showing a new toast replaces any pending
    /// hide deadline, so rapid calls keep only the latest message and
    /// restart the 3 s window.
    pub fn show_toast(&mut self, message: &str, level: Option<ToastLevel>) {
        self.show_toast_at(message, level, Instant::now());
    }

    pub(crate) fn show_toast_at(
        &mut self,
        message: &str,
        level: Option<ToastLevel>,
        now: Instant,
    ) {
        let level = level.unwrap_or_default();
        let index = self.toast_index();
        let toast = &mut self.root.children[index];
        toast.set_text(message);
        toast.set_class_list(&["toast", level.as_class(), "show"]);
        self.toast_hide_at = Some(now + Duration::from_millis(TOAST_HIDE_MS));
    }

    /// Advance the hide timer; call once per UI tick.
    ///
    /// Past the deadline only the "show" marker is removed, leaving the
    /// base and level classes for the next render.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.toast_hide_at {
            if now >= deadline {
                self.toast_hide_at = None;
                if let Some(toast) = self.query_mut(&format!("#{}", TOAST_ID)) {
                    toast.remove_class("show");
                }
            }
        }
    }

    pub fn toast_visible(&self) -> bool {
        self.query(&format!("#{}", TOAST_ID))
            .is_some_and(|toast| toast.has_class("show"))
    }

    fn toast_index(&mut self) -> usize {
        let existing = self
            .root
            .children
            .iter()
            .position(|child| child.id.as_deref() == Some(TOAST_ID));
        if let Some(index) = existing {
            return index;
        }
        let mut toast = Element::with_id("div", TOAST_ID);
        toast.add_class("toast");
        self.root.children.push(toast);
        self.root.children.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_node_is_created_once() {
        let mut page = Page::new();
        page.show_toast("saved", None);
        page.show_toast("saved again", None);
        assert_eq!(page.query_all(".toast").len(), 1);
    }

    #[test]
    fn test_default_level_is_success() {
        let mut page = Page::new();
        page.show_toast("saved", None);
        let toast = page.query("#toast").unwrap();
        assert_eq!(toast.text, "saved");
        assert!(toast.has_class("success"));
        assert!(toast.has_class("show"));
    }

    #[test]
    fn test_hide_removes_only_show_marker() {
        let now = Instant::now();
        let mut page = Page::new();
        page.show_toast_at("rebooting", Some(ToastLevel::Warning), now);

        page.tick(now + Duration::from_millis(TOAST_HIDE_MS - 1));
        assert!(page.toast_visible());

        page.tick(now + Duration::from_millis(TOAST_HIDE_MS + 1));
        let toast = page.query("#toast").unwrap();
        assert!(!toast.has_class("show"));
        assert!(toast.has_class("toast"));
        assert!(toast.has_class("warning"));
    }

    #[test]
    fn test_second_toast_cancels_pending_hide() {
        let now = Instant::now();
        let mut page = Page::new();
        page.show_toast_at("saved", None, now);
        page.show_toast_at("request failed", Some(ToastLevel::Error), now + Duration::from_millis(2000));

        // Past the first deadline, before the second: the first hide was
        // cancelled and the latest message is still showing.
        page.tick(now + Duration::from_millis(3500));
        assert!(page.toast_visible());
        let toast = page.query("#toast").unwrap();
        assert_eq!(toast.text, "request failed");
        assert!(toast.has_class("error"));
        assert!(!toast.has_class("success"));

        page.tick(now + Duration::from_millis(5001));
        assert!(!page.toast_visible());
    }
}
