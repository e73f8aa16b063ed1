//! Tab bar notifications

use tabstrip_items::Item;

/// What a listener is told about a tab bar.
#[derive(Debug, Clone, PartialEq)]
pub enum TabBarEvent {
    /// The current item changed, by press, setter or list mutation
    CurrentChanged {
        old: Option<Item>,
        new: Option<Item>,
        old_index: Option<usize>,
        new_index: Option<usize>,
    },
    /// The close icon of a closable tab was clicked
    CloseRequested { item: Item, index: usize },
    /// A dragged tab was pulled past the detach threshold
    DetachRequested(DetachRequest),
    /// An item changed position, by drag or programmatically
    Moved {
        item: Item,
        from_index: usize,
        to_index: usize,
    },
    Inserted { item: Item, index: usize },
    Removed { item: Item, index: usize },
    /// A title change was re-rendered
    TitleChanged { item: Item, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetachRequest {
    pub item: Item,
    /// Index of the item when the drag started
    pub index: usize,
    pub client_x: f64,
    pub client_y: f64,
}

/// A detach handler's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetachResponse {
    /// Keep dragging inside this bar
    #[default]
    Ignore,
    /// Remove the item from this bar now; the drag ends with it
    TearOff,
}

/// How a host should treat the raw event after the bar has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Not for the tab bar; let it propagate
    Ignored,
    /// Handled; prevent the default action and stop propagation
    Consumed,
}

impl EventResponse {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResponse::Consumed)
    }
}
