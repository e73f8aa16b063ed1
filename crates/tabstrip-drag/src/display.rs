//! Headless display list
//!
//! A [`HostSurface`] with no document behind it: a single row of tabs with
//! fixed widths and CSS-style left margins, laid out left to right inside
//! the content rect. Every visual write is recorded so callers can inspect
//! what a browser host would have been asked to do.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use tabstrip_items::Title;

use crate::geometry::{parse_px, Rect};
use crate::host::{CursorOverride, HostSurface};
use crate::session::SessionTicket;

const DEFAULT_TAB_WIDTH: f64 = 100.0;
const CLOSE_ICON_SIZE: f64 = 16.0;
const CLOSE_ICON_INSET: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTab {
    pub title: Title,
    pub width: f64,
    /// Computed `margin-left`, as a browser would report it
    pub margin_left: String,
    /// Relative offset, `None` when neutral
    pub offset: Option<f64>,
    pub dragging: bool,
    pub current: bool,
    pub z_index: i32,
}

#[derive(Debug)]
pub struct DisplayList {
    content: Rect,
    tabs: Vec<DisplayTab>,
    tab_width: f64,
    tab_margin: String,
    bar_dragging: bool,
    /// Cursors currently overridden, shared with the restore closures
    cursors: Arc<Mutex<Vec<String>>>,
    pointer_captures: usize,
    pointer_releases: usize,
    scheduled: Vec<(SessionTicket, Duration)>,
    offset_writes: usize,
}

impl DisplayList {
    pub fn new(content: Rect) -> Self {
        Self {
            content,
            tabs: Vec::new(),
            tab_width: DEFAULT_TAB_WIDTH,
            tab_margin: "0px".to_string(),
            bar_dragging: false,
            cursors: Arc::new(Mutex::new(Vec::new())),
            pointer_captures: 0,
            pointer_releases: 0,
            scheduled: Vec::new(),
            offset_writes: 0,
        }
    }

    /// Size and margin given to tabs created through `insert_tab`
    pub fn with_tab_style(mut self, width: f64, margin_left: impl Into<String>) -> Self {
        self.tab_width = width;
        self.tab_margin = margin_left.into();
        self
    }

    /// Append a tab with explicit metrics.
    pub fn push_tab(&mut self, title: &Title, width: f64, margin_left: impl Into<String>) {
        self.tabs.push(DisplayTab {
            title: title.clone(),
            width,
            margin_left: margin_left.into(),
            offset: None,
            dragging: false,
            current: false,
            z_index: 0,
        });
    }

    pub fn set_content_rect(&mut self, content: Rect) {
        self.content = content;
    }

    pub fn tabs(&self) -> &[DisplayTab] {
        &self.tabs
    }

    pub fn tab(&self, index: usize) -> Option<&DisplayTab> {
        self.tabs.get(index)
    }

    pub fn titles(&self) -> Vec<String> {
        self.tabs.iter().map(|tab| tab.title.text.clone()).collect()
    }

    pub fn offsets(&self) -> Vec<Option<f64>> {
        self.tabs.iter().map(|tab| tab.offset).collect()
    }

    /// Number of times a non-neutral offset was written
    pub fn offset_writes(&self) -> usize {
        self.offset_writes
    }

    pub fn is_bar_dragging(&self) -> bool {
        self.bar_dragging
    }

    pub fn active_cursors(&self) -> usize {
        self.cursors.lock().len()
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.pointer_captures > self.pointer_releases
    }

    pub fn pointer_captures(&self) -> usize {
        self.pointer_captures
    }

    pub fn pointer_releases(&self) -> usize {
        self.pointer_releases
    }

    pub fn scheduled(&self) -> &[(SessionTicket, Duration)] {
        &self.scheduled
    }

    /// Hand over every scheduled transition end, oldest first.
    pub fn take_scheduled(&mut self) -> Vec<(SessionTicket, Duration)> {
        std::mem::take(&mut self.scheduled)
    }

    /// Center of the tab at `index` in client coordinates
    pub fn tab_center(&self, index: usize) -> Option<(f64, f64)> {
        self.tab_rect(index)
            .map(|rect| (rect.left + rect.width / 2.0, rect.top + rect.height / 2.0))
    }
}

impl HostSurface for DisplayList {
    fn content_rect(&self) -> Rect {
        self.content
    }

    fn tab_rect(&self, index: usize) -> Option<Rect> {
        let tab = self.tabs.get(index)?;
        let left = self.content.left + self.tab_offset_left(index) + tab.offset.unwrap_or(0.0);
        Some(Rect::new(left, self.content.top, tab.width, self.content.height))
    }

    fn close_icon_rect(&self, index: usize) -> Option<Rect> {
        let tab = self.tab_rect(index)?;
        Some(Rect::new(
            tab.right() - CLOSE_ICON_SIZE - CLOSE_ICON_INSET,
            tab.top + (tab.height - CLOSE_ICON_SIZE) / 2.0,
            CLOSE_ICON_SIZE,
            CLOSE_ICON_SIZE,
        ))
    }

    fn tab_offset_left(&self, index: usize) -> f64 {
        let preceding: f64 = self
            .tabs
            .iter()
            .take(index)
            .map(|tab| parse_px(&tab.margin_left) + tab.width)
            .sum();
        let own_margin = self
            .tabs
            .get(index)
            .map(|tab| parse_px(&tab.margin_left))
            .unwrap_or(0.0);
        preceding + own_margin
    }

    fn tab_offset_width(&self, index: usize) -> f64 {
        self.tabs.get(index).map(|tab| tab.width).unwrap_or(0.0)
    }

    fn tab_margin_left(&self, index: usize) -> String {
        self.tabs
            .get(index)
            .map(|tab| tab.margin_left.clone())
            .unwrap_or_default()
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn set_tab_offset(&mut self, index: usize, offset: Option<f64>) {
        if let Some(tab) = self.tabs.get_mut(index) {
            if offset.is_some() {
                self.offset_writes += 1;
            }
            tab.offset = offset;
        }
    }

    fn set_tab_dragging(&mut self, index: usize, dragging: bool) {
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.dragging = dragging;
        }
    }

    fn set_bar_dragging(&mut self, dragging: bool) {
        self.bar_dragging = dragging;
    }

    fn set_tab_current(&mut self, index: usize, current: bool) {
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.current = current;
        }
    }

    fn set_tab_z_index(&mut self, index: usize, z_index: i32) {
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.z_index = z_index;
        }
    }

    fn insert_tab(&mut self, index: usize, title: &Title) {
        let index = index.min(self.tabs.len());
        self.tabs.insert(
            index,
            DisplayTab {
                title: title.clone(),
                width: self.tab_width,
                margin_left: self.tab_margin.clone(),
                offset: None,
                dragging: false,
                current: false,
                z_index: 0,
            },
        );
    }

    fn remove_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.tabs.remove(index);
        }
    }

    fn move_tab(&mut self, from: usize, to: usize) {
        if from < self.tabs.len() && to < self.tabs.len() {
            let tab = self.tabs.remove(from);
            self.tabs.insert(to, tab);
        }
    }

    fn update_tab(&mut self, index: usize, title: &Title) {
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.title = title.clone();
        }
    }

    fn override_cursor(&mut self, cursor: &str) -> CursorOverride {
        self.cursors.lock().push(cursor.to_string());

        let cursors = Arc::clone(&self.cursors);
        let restored = cursor.to_string();
        CursorOverride::new(cursor, move || {
            let mut cursors = cursors.lock();
            if let Some(position) = cursors.iter().rposition(|c| *c == restored) {
                cursors.remove(position);
            }
        })
    }

    fn capture_pointer(&mut self) {
        self.pointer_captures += 1;
    }

    fn release_pointer(&mut self) {
        self.pointer_releases += 1;
    }

    fn schedule_transition_end(&mut self, ticket: SessionTicket, delay: Duration) {
        self.scheduled.push((ticket, delay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> DisplayList {
        let mut display = DisplayList::new(Rect::new(10.0, 50.0, 400.0, 30.0));
        display.push_tab(&Title::new("A"), 100.0, "0px");
        display.push_tab(&Title::new("B"), 120.0, "2px");
        display
    }

    #[test]
    fn test_tab_rects_follow_layout_and_offset() {
        let mut display = strip();
        assert_eq!(display.tab_rect(1), Some(Rect::new(112.0, 50.0, 120.0, 30.0)));

        display.set_tab_offset(1, Some(-30.0));
        assert_eq!(display.tab_rect(1).unwrap().left, 82.0);
        // Layout reads ignore relative offsets
        assert_eq!(display.tab_offset_left(1), 102.0);
        assert!(display.tab_rect(2).is_none());
    }

    #[test]
    fn test_close_icon_inside_tab() {
        let display = strip();
        let tab = display.tab_rect(0).unwrap();
        let icon = display.close_icon_rect(0).unwrap();
        assert!(tab.contains(icon.left, icon.top));
        assert!(tab.contains(icon.right() - 0.5, icon.bottom() - 0.5));
    }

    #[test]
    fn test_display_list_mutations() {
        let mut display = strip().with_tab_style(80.0, "1px");
        display.insert_tab(9, &Title::new("C"));
        assert_eq!(display.titles(), vec!["A", "B", "C"]);
        assert_eq!(display.tab(2).unwrap().width, 80.0);

        display.move_tab(2, 0);
        assert_eq!(display.titles(), vec!["C", "A", "B"]);

        display.update_tab(1, &Title::new("Z"));
        display.remove_tab(0);
        assert_eq!(display.titles(), vec!["Z", "B"]);
    }

    #[test]
    fn test_cursor_bookkeeping() {
        let mut display = strip();
        let mut first = display.override_cursor("default");
        let second = display.override_cursor("default");
        assert_eq!(display.active_cursors(), 2);

        first.dispose();
        first.dispose();
        assert_eq!(display.active_cursors(), 1);

        drop(second);
        assert_eq!(display.active_cursors(), 0);
    }
}
