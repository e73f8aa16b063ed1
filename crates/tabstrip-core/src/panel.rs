//! Tab panel
//!
//! A tab bar over a stack of content panes. The stack is kept in the same
//! order as the bar by replaying the bar's own notifications, so drags,
//! tear-offs and close requests all reach it the same way.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use tabstrip_drag::{HostSurface, PointerEvent, SessionTicket};
use tabstrip_items::Item;

use crate::bar::TabBar;
use crate::config::TabBarConfig;
use crate::error::CoreError;
use crate::events::{EventResponse, TabBarEvent};
use crate::Result;

/// Content that can live in a [`TabPanel`].
pub trait PaneContent {
    /// The item shown as this pane's tab. Required before the pane can be
    /// added to a panel.
    fn tab_item(&self) -> Option<Item>;
}

pub struct TabPanel<T> {
    bar: TabBar,
    panes: Vec<T>,
    /// Bar notifications not yet applied to the stack
    events: Arc<Mutex<VecDeque<TabBarEvent>>>,
    /// Pane waiting for the bar to report where it was inserted
    pending: Option<T>,
    /// Panes that left the panel without being asked for by `remove_pane`
    removed: Vec<T>,
}

impl<T: PaneContent> TabPanel<T> {
    pub fn new(config: TabBarConfig) -> Result<Self> {
        let mut bar = TabBar::new(config)?;
        let events = Arc::new(Mutex::new(VecDeque::new()));

        let queue = Arc::clone(&events);
        bar.subscribe(move |event| queue.lock().push_back(event.clone()));

        Ok(Self {
            bar,
            panes: Vec::new(),
            events,
            pending: None,
            removed: Vec::new(),
        })
    }

    pub fn tab_bar(&self) -> &TabBar {
        &self.bar
    }

    /// Direct access to the bar. Call [`TabPanel::sync`] after mutating it.
    pub fn tab_bar_mut(&mut self) -> &mut TabBar {
        &mut self.bar
    }

    pub fn panes(&self) -> &[T] {
        &self.panes
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn pane_at(&self, index: usize) -> Option<&T> {
        self.panes.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.bar.current_index()
    }

    /// The pane whose tab is current
    pub fn current_pane(&self) -> Option<&T> {
        self.current_index().and_then(|index| self.panes.get(index))
    }

    pub fn set_current_index(&mut self, index: usize, host: &mut dyn HostSurface) -> bool {
        let item = self.bar.item_at(index).cloned();
        if item.is_none() {
            return false;
        }
        let changed = self.bar.set_current_item(item, host);
        self.sync(host);
        changed
    }

    pub fn add_pane(&mut self, content: T, host: &mut dyn HostSurface) -> Result<usize> {
        self.insert_pane(self.panes.len(), content, host)
    }

    /// Insert a pane at `index`, clamped to the stack.
    ///
    /// Fails with [`CoreError::MissingTitle`] if the content has no tab
    /// item. Content whose item is already shown moves that pane to `index`
    /// and replaces it; the replaced pane goes to [`TabPanel::take_removed`].
    pub fn insert_pane(
        &mut self,
        index: usize,
        content: T,
        host: &mut dyn HostSurface,
    ) -> Result<usize> {
        let item = content.tab_item().ok_or(CoreError::MissingTitle)?;

        self.pending = Some(content);
        let index = self.bar.insert_item(index, item, host);
        self.sync(host);

        if let Some(content) = self.pending.take() {
            if let Some(slot) = self.panes.get_mut(index) {
                let replaced = std::mem::replace(slot, content);
                self.removed.push(replaced);
            }
        }

        Ok(index)
    }

    pub fn remove_pane(&mut self, index: usize, host: &mut dyn HostSurface) -> Option<T> {
        let item = self.bar.remove_at(index, host)?;
        self.sync(host);

        let position = self
            .removed
            .iter()
            .position(|pane| pane.tab_item().as_ref() == Some(&item))?;
        Some(self.removed.remove(position))
    }

    /// Hand over panes that were closed or torn off.
    pub fn take_removed(&mut self) -> Vec<T> {
        std::mem::take(&mut self.removed)
    }

    pub fn handle_mouse_down(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        let response = self.bar.handle_mouse_down(event, host);
        self.sync(host);
        response
    }

    pub fn handle_mouse_move(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        let response = self.bar.handle_mouse_move(event, host);
        self.sync(host);
        response
    }

    pub fn handle_mouse_up(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        let response = self.bar.handle_mouse_up(event, host);
        self.sync(host);
        response
    }

    pub fn handle_click(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        let response = self.bar.handle_click(event, host);
        self.sync(host);
        response
    }

    pub fn handle_transition_end(&mut self, ticket: SessionTicket, host: &mut dyn HostSurface) {
        self.bar.handle_transition_end(ticket, host);
        self.sync(host);
    }

    /// Re-render changed titles, then apply every pending bar notification
    /// to the pane stack.
    pub fn sync(&mut self, host: &mut dyn HostSurface) {
        self.bar.process_title_changes(host);

        loop {
            let next = self.events.lock().pop_front();
            let Some(event) = next else {
                break;
            };

            match event {
                TabBarEvent::Inserted { index, .. } => {
                    if let Some(content) = self.pending.take() {
                        let index = index.min(self.panes.len());
                        self.panes.insert(index, content);
                    }
                }
                TabBarEvent::Removed { index, .. } => {
                    if index < self.panes.len() {
                        self.removed.push(self.panes.remove(index));
                    }
                }
                TabBarEvent::Moved {
                    from_index,
                    to_index,
                    ..
                } => {
                    if from_index < self.panes.len() && to_index < self.panes.len() {
                        let pane = self.panes.remove(from_index);
                        self.panes.insert(to_index, pane);
                    }
                }
                TabBarEvent::CloseRequested { item, .. } => {
                    // Removal queues a `Removed` event, handled on a later turn
                    self.bar.remove_item(&item, host);
                }
                TabBarEvent::CurrentChanged { .. }
                | TabBarEvent::DetachRequested(_)
                | TabBarEvent::TitleChanged { .. } => {}
            }
        }
    }
}

impl<T> std::fmt::Debug for TabPanel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabPanel")
            .field("bar", &self.bar)
            .field("panes", &self.panes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DetachResponse;
    use tabstrip_drag::{DisplayList, Rect};
    use tabstrip_items::Title;

    #[derive(Debug)]
    struct Page {
        body: &'static str,
        item: Option<Item>,
    }

    impl Page {
        fn titled(body: &'static str) -> Self {
            Self {
                body,
                item: Some(Item::new(Title::new(body).closable(true))),
            }
        }
    }

    impl PaneContent for Page {
        fn tab_item(&self) -> Option<Item> {
            self.item.clone()
        }
    }

    fn bodies(panel: &TabPanel<Page>) -> Vec<&'static str> {
        panel.panes().iter().map(|page| page.body).collect()
    }

    fn panel_with(names: &[&'static str]) -> (TabPanel<Page>, DisplayList) {
        let mut panel = TabPanel::new(TabBarConfig::new(true)).unwrap();
        let mut display = DisplayList::new(Rect::new(0.0, 0.0, 100.0 * names.len() as f64, 30.0));
        for name in names {
            panel.add_pane(Page::titled(name), &mut display).unwrap();
        }
        (panel, display)
    }

    #[test]
    fn test_pane_without_title_is_rejected() {
        let (mut panel, mut display) = panel_with(&["Red"]);
        let untitled = Page {
            body: "Orphan",
            item: None,
        };

        let result = panel.add_pane(untitled, &mut display);
        assert!(matches!(result, Err(CoreError::MissingTitle)));
        assert_eq!(panel.pane_count(), 1);
        assert_eq!(panel.tab_bar().item_count(), 1);
    }

    #[test]
    fn test_panes_follow_tabs() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow", "Blue"]);
        assert_eq!(bodies(&panel), vec!["Red", "Yellow", "Blue"]);
        assert_eq!(panel.current_pane().unwrap().body, "Red");

        assert!(panel.set_current_index(2, &mut display));
        assert_eq!(panel.current_pane().unwrap().body, "Blue");
        assert!(!panel.set_current_index(7, &mut display));

        let index = panel.insert_pane(0, Page::titled("Green"), &mut display).unwrap();
        assert_eq!(index, 0);
        assert_eq!(bodies(&panel), vec!["Green", "Red", "Yellow", "Blue"]);
        assert_eq!(display.titles(), vec!["Green", "Red", "Yellow", "Blue"]);
    }

    #[test]
    fn test_drag_reorders_stack() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow", "Blue"]);

        panel.handle_mouse_down(&PointerEvent::primary(150.0, 15.0), &mut display);
        panel.handle_mouse_move(&PointerEvent::primary(40.0, 15.0), &mut display);
        panel.handle_mouse_up(&PointerEvent::primary(40.0, 15.0), &mut display);
        for (ticket, _) in display.take_scheduled() {
            panel.handle_transition_end(ticket, &mut display);
        }

        assert_eq!(bodies(&panel), vec!["Yellow", "Red", "Blue"]);
        assert_eq!(panel.current_pane().unwrap().body, "Yellow");
    }

    #[test]
    fn test_close_request_removes_pane() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow", "Blue"]);

        let icon = display.close_icon_rect(1).unwrap();
        let click = PointerEvent::primary(icon.left + 1.0, icon.top + 1.0);
        panel.handle_click(&click, &mut display);

        assert_eq!(bodies(&panel), vec!["Red", "Blue"]);
        assert_eq!(display.titles(), vec!["Red", "Blue"]);
        let removed = panel.take_removed();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].body, "Yellow");
        assert!(panel.take_removed().is_empty());
    }

    #[test]
    fn test_tear_off_hands_pane_back() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow", "Blue"]);
        panel
            .tab_bar_mut()
            .set_detach_handler(|_| DetachResponse::TearOff);

        panel.handle_mouse_down(&PointerEvent::primary(250.0, 15.0), &mut display);
        panel.handle_mouse_move(&PointerEvent::primary(250.0, 100.0), &mut display);

        assert_eq!(bodies(&panel), vec!["Red", "Yellow"]);
        let removed = panel.take_removed();
        assert_eq!(removed[0].body, "Blue");
        assert!(panel.tab_bar().drag_session().is_none());
    }

    #[test]
    fn test_remove_pane_returns_content() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow"]);

        let page = panel.remove_pane(0, &mut display).unwrap();
        assert_eq!(page.body, "Red");
        assert_eq!(bodies(&panel), vec!["Yellow"]);
        assert_eq!(panel.current_pane().unwrap().body, "Yellow");
        assert!(panel.take_removed().is_empty());
        assert!(panel.remove_pane(5, &mut display).is_none());
    }

    #[test]
    fn test_reinserting_shown_item_moves_and_replaces() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow"]);
        let item = panel.pane_at(0).unwrap().tab_item();

        let replacement = Page {
            body: "Red v2",
            item,
        };
        let index = panel.insert_pane(1, replacement, &mut display).unwrap();

        assert_eq!(index, 1);
        assert_eq!(bodies(&panel), vec!["Yellow", "Red v2"]);
        assert_eq!(panel.tab_bar().item_count(), 2);

        let replaced = panel.take_removed();
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].body, "Red");
    }

    #[test]
    fn test_sync_rerenders_changed_titles() {
        let (mut panel, mut display) = panel_with(&["Red", "Yellow"]);
        let item = panel.pane_at(1).unwrap().tab_item().unwrap();

        item.set_title(Title::new("Gold"));
        assert_eq!(display.titles(), vec!["Red", "Yellow"]);

        panel.sync(&mut display);
        assert_eq!(display.titles(), vec!["Red", "Gold"]);
        assert_eq!(bodies(&panel), vec!["Red", "Yellow"]);
    }
}
