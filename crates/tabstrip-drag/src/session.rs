//! Drag session
//!
//! One press-move-release interaction. The session holds everything the
//! engine decided at press and activation time, plus the pure math that
//! turns a pointer position into tab offsets.

use crate::geometry::{Rect, TabLayout};
use crate::host::CursorOverride;

/// Identity of one drag session.
///
/// Deferred callbacks carry the ticket they were scheduled with and act only
/// if it still names the live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionTicket(u64);

impl SessionTicket {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed, threshold not crossed yet; nothing visible has happened
    Pressed,
    /// Tabs follow the pointer
    Dragging,
    /// Released, waiting for the snap transition to finish
    Releasing,
}

impl DragPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragPhase::Pressed => "pressed",
            DragPhase::Dragging => "dragging",
            DragPhase::Releasing => "releasing",
        }
    }
}

impl std::fmt::Display for DragPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
pub struct DragSession {
    pub(crate) ticket: SessionTicket,
    pub(crate) phase: DragPhase,
    /// Index of the dragged tab
    pub(crate) tab_index: usize,
    pub(crate) press_x: f64,
    pub(crate) press_y: f64,
    /// Press point relative to the dragged tab's left edge
    pub(crate) tab_press_x: f64,
    /// Live candidate destination; equal to `tab_index` means no move
    pub(crate) target_index: usize,
    pub(crate) detach_requested: bool,
    /// Filled once, on activation
    pub(crate) geometry: Vec<TabLayout>,
    pub(crate) content_rect: Rect,
    pub(crate) cursor: Option<CursorOverride>,
    pub(crate) pointer_captured: bool,
    pub(crate) aborted: bool,
}

impl DragSession {
    pub(crate) fn new(
        ticket: SessionTicket,
        tab_index: usize,
        press_x: f64,
        press_y: f64,
        tab_press_x: f64,
    ) -> Self {
        Self {
            ticket,
            phase: DragPhase::Pressed,
            tab_index,
            press_x,
            press_y,
            tab_press_x,
            target_index: tab_index,
            detach_requested: false,
            geometry: Vec::new(),
            content_rect: Rect::default(),
            cursor: None,
            pointer_captured: false,
            aborted: false,
        }
    }

    pub fn ticket(&self) -> SessionTicket {
        self.ticket
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn tab_index(&self) -> usize {
        self.tab_index
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn press_position(&self) -> (f64, f64) {
        (self.press_x, self.press_y)
    }

    pub fn is_drag_active(&self) -> bool {
        self.phase != DragPhase::Pressed
    }

    pub fn detach_requested(&self) -> bool {
        self.detach_requested
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn geometry(&self) -> &[TabLayout] {
        &self.geometry
    }

    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }

    /// True once the pointer has moved at least `threshold` on either axis.
    pub(crate) fn exceeds_drag_threshold(
        &self,
        client_x: f64,
        client_y: f64,
        threshold: f64,
    ) -> bool {
        let dx = (client_x - self.press_x).abs();
        let dy = (client_y - self.press_y).abs();
        dx.max(dy) >= threshold
    }

    /// True when the pointer lies outside the content region grown by `threshold`.
    pub(crate) fn exceeds_detach_threshold(
        &self,
        client_x: f64,
        client_y: f64,
        threshold: f64,
    ) -> bool {
        let bounds = self.content_rect.expanded(threshold);
        client_x < bounds.left
            || client_x >= bounds.right()
            || client_y < bounds.top
            || client_y >= bounds.bottom()
    }

    fn dragged_layout(&self) -> TabLayout {
        self.geometry
            .get(self.tab_index)
            .copied()
            .unwrap_or_default()
    }

    /// Keep the dragged tab inside the strip.
    pub(crate) fn clamp_offset(&self, offset: f64) -> f64 {
        let tab = self.dragged_layout();
        let limit = self.content_rect.width - tab.left - tab.width;
        offset.min(limit).max(-tab.left)
    }

    /// Offsets for every tab at pointer position `client_x`, and the target index.
    pub(crate) fn live_offsets(&self, client_x: f64) -> (Vec<Option<f64>>, usize) {
        let tab = self.dragged_layout();
        let target_left = client_x - self.content_rect.left - self.tab_press_x;
        let target_right = target_left + tab.width;

        let mut target = self.tab_index;
        let offsets = self
            .geometry
            .iter()
            .enumerate()
            .map(|(i, layout)| {
                if i < self.tab_index && target_left < layout.midpoint() {
                    target = target.min(i);
                    let neighbor_margin = self.geometry[i + 1].margin_left;
                    Some(tab.width + neighbor_margin)
                } else if i > self.tab_index && target_right > layout.midpoint() {
                    target = target.max(i);
                    Some(-tab.width - layout.margin_left)
                } else if i == self.tab_index {
                    Some(self.clamp_offset(client_x - self.press_x))
                } else {
                    None
                }
            })
            .collect();

        (offsets, target)
    }

    /// Offset that snaps the dragged tab onto its target slot.
    pub(crate) fn final_offset(&self) -> f64 {
        let tab = self.dragged_layout();
        let ideal = match self.geometry.get(self.target_index) {
            Some(target) if self.target_index > self.tab_index => {
                target.right() - tab.width - tab.left
            }
            Some(target) if self.target_index < self.tab_index => target.left - tab.left,
            _ => 0.0,
        };
        self.clamp_offset(ideal)
    }
}
