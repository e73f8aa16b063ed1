//! Transition timer
//!
//! Drives the one deferred step of a drag, the end of the release
//! transition, on a tokio runtime. Hosts keep a [`TimerHandle`] and call
//! [`TimerHandle::schedule`] from `schedule_transition_end`; the event loop
//! awaits [`TransitionTimer::next_expired`] and passes each ticket to
//! `TabBar::handle_transition_end`.
//!
//! Nothing here is cancellable. A ticket whose session was aborted or
//! replaced in the meantime is simply ignored by the tab bar.

use std::time::Duration;
use tokio::sync::mpsc;

use tabstrip_drag::SessionTicket;

pub struct TransitionTimer {
    sender: mpsc::UnboundedSender<SessionTicket>,
    receiver: mpsc::UnboundedReceiver<SessionTicket>,
}

#[derive(Debug, Clone)]
pub struct TimerHandle {
    sender: mpsc::UnboundedSender<SessionTicket>,
}

impl TransitionTimer {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            sender: self.sender.clone(),
        }
    }

    /// Wait for the next ticket whose delay has elapsed.
    pub async fn next_expired(&mut self) -> Option<SessionTicket> {
        self.receiver.recv().await
    }
}

impl Default for TransitionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerHandle {
    /// Deliver `ticket` after `delay`. Must be called within a tokio runtime.
    pub fn schedule(&self, ticket: SessionTicket, delay: Duration) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(ticket).is_err() {
                tracing::trace!(%ticket, "Transition timer dropped before firing");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstrip_drag::{DisplayList, PointerEvent, Rect};
    use tabstrip_items::{Item, Title};

    use crate::bar::TabBar;
    use crate::config::TabBarConfig;
    use crate::events::TabBarEvent;

    #[tokio::test]
    async fn test_tickets_fire_in_delay_order() {
        let mut timer = TransitionTimer::new();
        let handle = timer.handle();

        handle.schedule(SessionTicket::new(2), Duration::from_millis(30));
        handle.schedule(SessionTicket::new(1), Duration::from_millis(1));

        assert_eq!(timer.next_expired().await, Some(SessionTicket::new(1)));
        assert_eq!(timer.next_expired().await, Some(SessionTicket::new(2)));
    }

    #[tokio::test]
    async fn test_drives_drag_completion() {
        let mut config = TabBarConfig::new(true);
        config.transition_duration_ms = 1;

        let mut bar = TabBar::new(config).unwrap();
        let mut display =
            DisplayList::new(Rect::new(0.0, 0.0, 300.0, 30.0)).with_tab_style(100.0, "0px");
        for name in ["Red", "Yellow", "Blue"] {
            bar.add_item(Item::new(Title::new(name)), &mut display);
        }

        let moves = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&moves);
        bar.subscribe(move |event| {
            if let TabBarEvent::Moved { from_index, to_index, .. } = event {
                sink.lock().push((*from_index, *to_index));
            }
        });

        bar.handle_mouse_down(&PointerEvent::primary(50.0, 15.0), &mut display);
        bar.handle_mouse_move(&PointerEvent::primary(260.0, 15.0), &mut display);
        bar.handle_mouse_up(&PointerEvent::primary(260.0, 15.0), &mut display);

        let mut timer = TransitionTimer::new();
        let handle = timer.handle();
        for (ticket, delay) in display.take_scheduled() {
            handle.schedule(ticket, delay);
        }

        let ticket = timer.next_expired().await.unwrap();
        bar.handle_transition_end(ticket, &mut display);

        assert_eq!(*moves.lock(), vec![(0, 2)]);
        assert_eq!(display.titles(), vec!["Yellow", "Blue", "Red"]);
    }
}
