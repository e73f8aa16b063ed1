//! Host surface
//!
//! The boundary between the reordering engine and whatever actually draws
//! the tabs. A browser host backs this with DOM reads and inline styles,
//! a headless host with [`crate::DisplayList`].

use std::fmt;
use std::time::Duration;

use tabstrip_items::Title;

use crate::geometry::Rect;
use crate::session::SessionTicket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
}

/// A mouse event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: MouseButton,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(button: MouseButton, client_x: f64, client_y: f64) -> Self {
        Self {
            button,
            client_x,
            client_y,
        }
    }

    pub fn primary(client_x: f64, client_y: f64) -> Self {
        Self::new(MouseButton::Primary, client_x, client_y)
    }

    pub fn is_primary(&self) -> bool {
        self.button == MouseButton::Primary
    }
}

/// A global cursor override, restored when disposed or dropped.
///
/// Disposal runs the restore action at most once.
pub struct CursorOverride {
    cursor: String,
    restore: Option<Box<dyn FnOnce() + Send>>,
}

impl CursorOverride {
    pub fn new<F>(cursor: impl Into<String>, restore: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cursor: cursor.into(),
            restore: Some(Box::new(restore)),
        }
    }

    /// An override with nothing to restore, for hosts without a cursor.
    pub fn noop(cursor: impl Into<String>) -> Self {
        Self {
            cursor: cursor.into(),
            restore: None,
        }
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn is_disposed(&self) -> bool {
        self.restore.is_none()
    }

    pub fn dispose(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

impl Drop for CursorOverride {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for CursorOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorOverride")
            .field("cursor", &self.cursor)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Everything the engine and the tab bar need from the visual layer.
///
/// Tab indices always refer to the display list, which the tab bar keeps in
/// positional lockstep with its item list.
pub trait HostSurface {
    /// Client rect of the strip's content region
    fn content_rect(&self) -> Rect;

    /// Client rect of the visible tab at `index`, including any relative offset
    fn tab_rect(&self, index: usize) -> Option<Rect>;

    /// Client rect of the tab's close icon
    fn close_icon_rect(&self, index: usize) -> Option<Rect>;

    /// Left edge relative to the content region, ignoring relative offsets
    fn tab_offset_left(&self, index: usize) -> f64;

    fn tab_offset_width(&self, index: usize) -> f64;

    /// Computed `margin-left`, unparsed
    fn tab_margin_left(&self, index: usize) -> String;

    fn tab_count(&self) -> usize;

    /// Shift a tab from its laid-out position; `None` restores it.
    fn set_tab_offset(&mut self, index: usize, offset: Option<f64>);

    fn set_tab_dragging(&mut self, index: usize, dragging: bool);

    fn set_bar_dragging(&mut self, dragging: bool);

    fn set_tab_current(&mut self, index: usize, current: bool);

    fn set_tab_z_index(&mut self, index: usize, z_index: i32);

    fn insert_tab(&mut self, index: usize, title: &Title);

    fn remove_tab(&mut self, index: usize);

    fn move_tab(&mut self, from: usize, to: usize);

    fn update_tab(&mut self, index: usize, title: &Title);

    fn override_cursor(&mut self, cursor: &str) -> CursorOverride;

    /// Start receiving document-level move and release events.
    fn capture_pointer(&mut self);

    /// Stop receiving document-level events. Paired with `capture_pointer`.
    fn release_pointer(&mut self);

    /// Call back into the tab bar with `ticket` once `delay` has passed.
    fn schedule_transition_end(&mut self, ticket: SessionTicket, delay: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_cursor_override_disposes_once() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&restored);

        let mut cursor = CursorOverride::new("default", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(cursor.cursor(), "default");
        assert!(!cursor.is_disposed());

        cursor.dispose();
        cursor.dispose();
        drop(cursor);
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cursor_override_restores_on_drop() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&restored);

        {
            let _cursor = CursorOverride::new("default", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }
}
