//! Tab bar
//!
//! Glues the ordered item list to the reordering engine. The host forwards
//! raw mouse events here; the bar hit-tests them, drives the engine, keeps
//! the host's display list in step with the item list and tells listeners
//! what happened.
//!
//! Every list mutator releases an in-progress drag before touching the list,
//! so the engine never acts on stale indices.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use tabstrip_drag::{DragSession, HostSurface, PointerEvent, ReorderEngine, SessionTicket};
use tabstrip_items::{CurrentChange, Item, ItemList, ObserverId};

use crate::config::TabBarConfig;
use crate::events::{DetachRequest, DetachResponse, EventResponse, TabBarEvent};
use crate::Result;

type Listener = Box<dyn FnMut(&TabBarEvent) + Send>;
type DetachHandler = Box<dyn FnMut(&DetachRequest) -> DetachResponse + Send>;

pub struct TabBar {
    config: TabBarConfig,
    items: ItemList,
    engine: ReorderEngine,
    listeners: Vec<Listener>,
    detach_handler: Option<DetachHandler>,
    /// Items whose title changed since the last re-render
    title_changes: Arc<Mutex<Vec<Item>>>,
    observers: HashMap<Uuid, ObserverId>,
}

impl TabBar {
    pub fn new(config: TabBarConfig) -> Result<Self> {
        config.validate()?;
        let engine = ReorderEngine::new(config.drag_config());

        Ok(Self {
            config,
            items: ItemList::new(),
            engine,
            listeners: Vec::new(),
            detach_handler: None,
            title_changes: Arc::new(Mutex::new(Vec::new())),
            observers: HashMap::new(),
        })
    }

    pub fn config(&self) -> &TabBarConfig {
        &self.config
    }

    pub fn tabs_movable(&self) -> bool {
        self.config.tabs_movable
    }

    /// Making tabs immovable releases any drag in progress.
    pub fn set_tabs_movable(&mut self, movable: bool, host: &mut dyn HostSurface) {
        if !movable {
            self.release_mouse(host);
        }
        self.config.tabs_movable = movable;
    }

    pub fn items(&self) -> &[Item] {
        self.items.items()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.items.item_at(index)
    }

    pub fn index_of(&self, item: &Item) -> Option<usize> {
        self.items.index_of(item)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.items.current()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.items.current_index()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.engine.session()
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Register a listener for every [`TabBarEvent`].
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&TabBarEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Decide what happens when a tab is pulled out of the bar.
    pub fn set_detach_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&DetachRequest) -> DetachResponse + Send + 'static,
    {
        self.detach_handler = Some(Box::new(handler));
    }

    pub fn clear_detach_handler(&mut self) {
        self.detach_handler = None;
    }

    /// Select an item. Items not in the bar select nothing.
    ///
    /// Returns true if the current item changed.
    pub fn set_current_item(&mut self, item: Option<Item>, host: &mut dyn HostSurface) -> bool {
        match self.items.set_current(item) {
            Some(change) => {
                self.refresh_order(host);
                self.emit_current_change(change);
                true
            }
            None => false,
        }
    }

    pub fn add_item(&mut self, item: Item, host: &mut dyn HostSurface) -> usize {
        self.insert_item(self.items.len(), item, host)
    }

    /// Insert `item` at `index`, clamped to the list. An item already in the
    /// bar is moved instead. Returns the item's final index.
    pub fn insert_item(&mut self, index: usize, item: Item, host: &mut dyn HostSurface) -> usize {
        self.release_mouse(host);

        let outcome = self.items.insert(index, item.clone());
        match outcome.moved_from {
            Some(from) => {
                if from != outcome.index {
                    host.move_tab(from, outcome.index);
                    self.emit(TabBarEvent::Moved {
                        item,
                        from_index: from,
                        to_index: outcome.index,
                    });
                }
            }
            None => {
                host.insert_tab(outcome.index, &item.title());
                self.observe(&item);
                tracing::debug!(item_id = %item.id(), index = outcome.index, "Inserted tab");
                self.emit(TabBarEvent::Inserted {
                    item,
                    index: outcome.index,
                });
            }
        }

        self.refresh_order(host);
        if let Some(change) = outcome.current_change {
            self.emit_current_change(change);
        }

        outcome.index
    }

    /// Move the item at `from` to `to`. Returns false for out-of-range
    /// indices; `from == to` succeeds without a notification.
    pub fn move_item(&mut self, from: usize, to: usize, host: &mut dyn HostSurface) -> bool {
        self.release_mouse(host);
        self.commit_move(from, to, host)
    }

    pub fn remove_at(&mut self, index: usize, host: &mut dyn HostSurface) -> Option<Item> {
        self.release_mouse(host);

        let outcome = self.items.remove_at(index)?;
        host.remove_tab(outcome.index);
        self.unobserve(&outcome.item);
        tracing::debug!(item_id = %outcome.item.id(), index = outcome.index, "Removed tab");

        self.refresh_order(host);
        self.emit(TabBarEvent::Removed {
            item: outcome.item.clone(),
            index: outcome.index,
        });
        if let Some(change) = outcome.current_change {
            self.emit_current_change(change);
        }

        Some(outcome.item)
    }

    /// Remove `item`, returning the index it had.
    pub fn remove_item(&mut self, item: &Item, host: &mut dyn HostSurface) -> Option<usize> {
        let index = self.items.index_of(item)?;
        self.remove_at(index, host).map(|_| index)
    }

    pub fn clear(&mut self, host: &mut dyn HostSurface) {
        self.release_mouse(host);

        let (removed, current_change) = self.items.clear();
        // Back to front, so every reported index is valid when it is applied
        for (index, item) in removed.into_iter().enumerate().rev() {
            host.remove_tab(index);
            self.unobserve(&item);
            self.emit(TabBarEvent::Removed { item, index });
        }
        if let Some(change) = current_change {
            self.emit_current_change(change);
        }
    }

    /// Abort any drag in progress, immediately and without a settle
    /// transition. Safe to call at any time.
    pub fn release_mouse(&mut self, host: &mut dyn HostSurface) {
        self.engine.abort(host);
    }

    /// Release the drag and stop observing item titles.
    pub fn dispose(&mut self, host: &mut dyn HostSurface) {
        self.release_mouse(host);
        self.unobserve_all();
        self.title_changes.lock().clear();
    }

    /// Index of the first visible tab containing the point.
    pub fn hit_test(&self, client_x: f64, client_y: f64, host: &dyn HostSurface) -> Option<usize> {
        (0..host.tab_count()).find(|&index| {
            host.tab_rect(index)
                .is_some_and(|rect| rect.contains(client_x, client_y))
        })
    }

    pub fn handle_mouse_down(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        self.process_title_changes(host);

        if !event.is_primary() || self.engine.session().is_some() {
            return EventResponse::Ignored;
        }
        let Some(index) = self.hit_test(event.client_x, event.client_y, host) else {
            return EventResponse::Ignored;
        };
        if self.on_close_button(host, index, event) {
            return EventResponse::Ignored;
        }

        let pressed = self.config.tabs_movable && self.engine.press(index, event, host).is_some();
        let response = if pressed {
            EventResponse::Consumed
        } else {
            EventResponse::Ignored
        };

        // Selection follows the press whether or not a drag ever starts
        let item = self.items.item_at(index).cloned();
        self.set_current_item(item, host);

        response
    }

    pub fn handle_mouse_move(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        self.process_title_changes(host);

        if self.engine.session().is_none() {
            return EventResponse::Ignored;
        }
        let Some(progress) = self.engine.track_move(event, host) else {
            return EventResponse::Consumed;
        };

        if progress.detach {
            self.request_detach(progress.tab_index, event, host);
        }

        // A tear-off above ends the session and turns this into a no-op
        self.engine.layout_move(progress.ticket, event, host);

        EventResponse::Consumed
    }

    pub fn handle_mouse_up(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        self.process_title_changes(host);

        if !event.is_primary() || self.engine.session().is_none() {
            return EventResponse::Ignored;
        }
        self.engine.release(event, host);
        EventResponse::Consumed
    }

    /// A click on a closable tab's close icon requests a close. Other
    /// clicks on tabs are swallowed; the preceding press already selected.
    ///
    /// The click that trails a drag's release lands while the session is
    /// still settling and belongs to the drag, not to whatever tab is now
    /// under the pointer.
    pub fn handle_click(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn HostSurface,
    ) -> EventResponse {
        if !event.is_primary() {
            return EventResponse::Ignored;
        }
        if self.engine.session().is_some() {
            return EventResponse::Consumed;
        }
        let Some(index) = self.hit_test(event.client_x, event.client_y, host) else {
            return EventResponse::Ignored;
        };

        if self.on_close_button(host, index, event) {
            if let Some(item) = self.items.item_at(index).cloned() {
                tracing::debug!(item_id = %item.id(), index, "Close requested");
                self.emit(TabBarEvent::CloseRequested { item, index });
            }
        }

        EventResponse::Consumed
    }

    /// Called by the host when the transition scheduled under `ticket` ends.
    pub fn handle_transition_end(&mut self, ticket: SessionTicket, host: &mut dyn HostSurface) {
        if let Some(reorder) = self.engine.complete(ticket, host) {
            if !self.commit_move(reorder.from, reorder.to, host) {
                tracing::warn!(
                    from = reorder.from,
                    to = reorder.to,
                    len = self.items.len(),
                    "Dropping reorder with stale indices"
                );
            }
        }
    }

    /// Re-render every tab whose title changed since the last call.
    pub fn process_title_changes(&mut self, host: &mut dyn HostSurface) {
        let changed: Vec<Item> = std::mem::take(&mut *self.title_changes.lock());

        let mut seen = Vec::with_capacity(changed.len());
        for item in changed {
            if seen.contains(&item) {
                continue;
            }
            seen.push(item.clone());

            let Some(index) = self.items.index_of(&item) else {
                continue;
            };

            if self.config.cancel_drag_on_title_change
                && self
                    .engine
                    .session()
                    .is_some_and(|session| session.tab_index() == index)
            {
                self.release_mouse(host);
            }

            host.update_tab(index, &item.title());
            self.emit(TabBarEvent::TitleChanged { item, index });
        }
    }

    fn request_detach(&mut self, index: usize, event: &PointerEvent, host: &mut dyn HostSurface) {
        let Some(item) = self.items.item_at(index).cloned() else {
            return;
        };
        let request = DetachRequest {
            item,
            index,
            client_x: event.client_x,
            client_y: event.client_y,
        };

        self.emit(TabBarEvent::DetachRequested(request.clone()));
        let response = self
            .detach_handler
            .as_mut()
            .map(|handler| handler(&request))
            .unwrap_or_default();

        if response == DetachResponse::TearOff {
            tracing::debug!(item_id = %request.item.id(), index, "Tearing off tab");
            self.remove_at(index, host);
        }
    }

    fn commit_move(&mut self, from: usize, to: usize, host: &mut dyn HostSurface) -> bool {
        if !self.items.move_item(from, to) {
            return false;
        }
        if from == to {
            return true;
        }

        host.move_tab(from, to);
        self.refresh_order(host);

        if let Some(item) = self.items.item_at(to).cloned() {
            tracing::debug!(item_id = %item.id(), from, to, "Moved tab");
            self.emit(TabBarEvent::Moved {
                item,
                from_index: from,
                to_index: to,
            });
        }
        true
    }

    /// Mark the current tab and stack tabs so the current one is on top,
    /// then earlier tabs above later ones.
    fn refresh_order(&self, host: &mut dyn HostSurface) {
        let count = self.items.len();
        let current = self.items.current_index();
        for index in 0..count {
            let is_current = current == Some(index);
            let z_index = if is_current { count } else { count - index - 1 };
            host.set_tab_current(index, is_current);
            host.set_tab_z_index(index, z_index as i32);
        }
    }

    /// Only closable tabs show a close icon; elsewhere the icon's area is
    /// part of the tab body.
    fn on_close_button(&self, host: &dyn HostSurface, index: usize, event: &PointerEvent) -> bool {
        self.items.item_at(index).is_some_and(Item::is_closable)
            && host
                .close_icon_rect(index)
                .is_some_and(|rect| rect.contains(event.client_x, event.client_y))
    }

    fn emit_current_change(&mut self, change: CurrentChange) {
        self.emit(TabBarEvent::CurrentChanged {
            old: change.old,
            new: change.new,
            old_index: change.old_index,
            new_index: change.new_index,
        });
    }

    fn emit(&mut self, event: TabBarEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn observe(&mut self, item: &Item) {
        let queue = Arc::clone(&self.title_changes);
        let id = item.observe_title(move |item| queue.lock().push(item.clone()));
        self.observers.insert(item.id(), id);
    }

    fn unobserve(&mut self, item: &Item) {
        if let Some(id) = self.observers.remove(&item.id()) {
            item.unobserve_title(id);
        }
    }

    fn unobserve_all(&mut self) {
        for item in self.items.items() {
            if let Some(id) = self.observers.remove(&item.id()) {
                item.unobserve_title(id);
            }
        }
    }
}

impl Drop for TabBar {
    fn drop(&mut self) {
        self.unobserve_all();
    }
}

impl fmt::Debug for TabBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabBar")
            .field("config", &self.config)
            .field("items", &self.items)
            .field("engine", &self.engine)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
