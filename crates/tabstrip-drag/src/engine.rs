//! Reorder engine
//!
//! Drives a single [`DragSession`] from raw pointer events. The engine only
//! speaks in tab indices; mapping indices to items and committing a move is
//! the tab bar's job.
//!
//! A move is handled in two phases so that a tear-off handler can run in
//! between: [`ReorderEngine::track_move`] decides thresholds and reports a
//! detach, [`ReorderEngine::layout_move`] repositions the tabs and does
//! nothing if the session it was given is gone by then.

use std::time::Duration;

use crate::geometry::snapshot;
use crate::host::{HostSurface, PointerEvent};
use crate::session::{DragPhase, DragSession, SessionTicket};

/// Pointer travel, on either axis, before a press becomes a drag
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Distance outside the content region before a detach is requested
pub const DETACH_THRESHOLD: f64 = 20.0;

/// Length of the snap transition after release. Must match the styling.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(150);

/// Cursor held for the duration of an active drag
const DRAG_CURSOR: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    pub drag_threshold: f64,
    pub detach_threshold: f64,
    pub transition_duration: Duration,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
            detach_threshold: DETACH_THRESHOLD,
            transition_duration: TRANSITION_DURATION,
        }
    }
}

/// Result of the tracking phase of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveProgress {
    pub ticket: SessionTicket,
    pub tab_index: usize,
    /// Set on the single move that first left the detach bounds
    pub detach: bool,
}

/// A committed reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug)]
pub struct ReorderEngine {
    config: DragConfig,
    session: Option<DragSession>,
    next_ticket: u64,
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl ReorderEngine {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
            next_ticket: 1,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Takes effect from the next session.
    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<DragPhase> {
        self.session.as_ref().map(|session| session.phase)
    }

    /// True once the drag threshold has been crossed
    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_drag_active())
    }

    /// True if `ticket` names the live, unaborted session
    pub fn is_live(&self, ticket: SessionTicket) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.ticket == ticket && !session.aborted)
    }

    /// Start a session for a primary press on the tab at `index`.
    ///
    /// Returns `None` if a session already exists or the tab has no rect.
    pub fn press(
        &mut self,
        index: usize,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> Option<SessionTicket> {
        if self.session.is_some() || !event.is_primary() {
            return None;
        }
        let tab_rect = host.tab_rect(index)?;

        let ticket = SessionTicket::new(self.next_ticket);
        self.next_ticket += 1;

        let mut session = DragSession::new(
            ticket,
            index,
            event.client_x,
            event.client_y,
            event.client_x - tab_rect.left,
        );
        host.capture_pointer();
        session.pointer_captured = true;
        self.session = Some(session);

        tracing::debug!(%ticket, index, "Drag session started");

        Some(ticket)
    }

    /// Threshold and detach bookkeeping for a pointer move.
    ///
    /// Returns `None` when the move has no visible effect: no session, the
    /// threshold not crossed yet, or the session already releasing.
    pub fn track_move(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> Option<MoveProgress> {
        let config = self.config;
        let session = self.session.as_mut()?;

        match session.phase {
            DragPhase::Releasing => return None,
            DragPhase::Pressed => {
                if !session.exceeds_drag_threshold(
                    event.client_x,
                    event.client_y,
                    config.drag_threshold,
                ) {
                    return None;
                }
                activate(session, host);
            }
            DragPhase::Dragging => {}
        }

        let detach = !session.detach_requested
            && session.exceeds_detach_threshold(
                event.client_x,
                event.client_y,
                config.detach_threshold,
            );
        if detach {
            session.detach_requested = true;
            tracing::debug!(
                ticket = %session.ticket,
                index = session.tab_index,
                x = event.client_x,
                y = event.client_y,
                "Detach threshold exceeded"
            );
        }

        Some(MoveProgress {
            ticket: session.ticket,
            tab_index: session.tab_index,
            detach,
        })
    }

    /// Reposition every tab for a move tracked under `ticket`.
    pub fn layout_move(
        &mut self,
        ticket: SessionTicket,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) {
        if !self.is_live(ticket) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase != DragPhase::Dragging {
            return;
        }

        let (offsets, target) = session.live_offsets(event.client_x);
        for (index, offset) in offsets.into_iter().enumerate() {
            host.set_tab_offset(index, offset);
        }
        session.target_index = target;
    }

    /// Handle a primary release.
    ///
    /// Returns the ticket of the scheduled transition end, or `None` if the
    /// session never activated and has simply been discarded.
    pub fn release(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> Option<SessionTicket> {
        if !event.is_primary() {
            return None;
        }
        let session = self.session.as_mut()?;
        if session.phase == DragPhase::Releasing {
            return None;
        }

        release_pointer(session, host);

        if session.phase == DragPhase::Pressed {
            tracing::trace!(ticket = %session.ticket, "Press released below drag threshold");
            self.session = None;
            return None;
        }

        let offset = session.final_offset();
        host.set_tab_offset(session.tab_index, Some(offset));
        host.set_tab_dragging(session.tab_index, false);
        session.phase = DragPhase::Releasing;
        host.schedule_transition_end(session.ticket, self.config.transition_duration);

        tracing::debug!(
            ticket = %session.ticket,
            from = session.tab_index,
            to = session.target_index,
            "Drag released"
        );

        Some(session.ticket)
    }

    /// Finish the release transition scheduled under `ticket`.
    ///
    /// Stale tickets are ignored. Returns the reorder to commit, if the
    /// target differs from the origin.
    pub fn complete(
        &mut self,
        ticket: SessionTicket,
        host: &mut dyn HostSurface,
    ) -> Option<Reorder> {
        if !self.is_live(ticket) || self.phase() != Some(DragPhase::Releasing) {
            tracing::trace!(%ticket, "Ignoring stale transition end");
            return None;
        }
        let mut session = self.session.take()?;

        reset_offsets(&session, host);
        dispose_cursor(&mut session);
        host.set_bar_dragging(false);

        if session.target_index == session.tab_index {
            return None;
        }

        Some(Reorder {
            from: session.tab_index,
            to: session.target_index,
        })
    }

    /// Tear down any session immediately, without a settle transition.
    ///
    /// Returns the aborted session, or `None` if there was nothing to abort.
    pub fn abort(&mut self, host: &mut dyn HostSurface) -> Option<DragSession> {
        let mut session = self.session.take()?;
        session.aborted = true;

        release_pointer(&mut session, host);

        if session.is_drag_active() {
            reset_offsets(&session, host);
            dispose_cursor(&mut session);
            host.set_tab_dragging(session.tab_index, false);
            host.set_bar_dragging(false);
        }

        tracing::debug!(ticket = %session.ticket, phase = %session.phase, "Drag aborted");

        Some(session)
    }
}

fn activate(session: &mut DragSession, host: &mut dyn HostSurface) {
    let count = host.tab_count();
    session.geometry = snapshot(&*host, count);
    session.content_rect = host.content_rect();
    session.cursor = Some(host.override_cursor(DRAG_CURSOR));
    host.set_tab_dragging(session.tab_index, true);
    host.set_bar_dragging(true);
    session.phase = DragPhase::Dragging;

    tracing::debug!(
        ticket = %session.ticket,
        index = session.tab_index,
        tabs = session.geometry.len(),
        "Drag activated"
    );
}

fn release_pointer(session: &mut DragSession, host: &mut dyn HostSurface) {
    if std::mem::take(&mut session.pointer_captured) {
        host.release_pointer();
    }
}

fn reset_offsets(session: &DragSession, host: &mut dyn HostSurface) {
    let count = session.geometry.len().min(host.tab_count());
    for index in 0..count {
        host.set_tab_offset(index, None);
    }
}

fn dispose_cursor(session: &mut DragSession) {
    if let Some(mut cursor) = session.cursor.take() {
        cursor.dispose();
    }
}
