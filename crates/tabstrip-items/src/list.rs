//! Ordered item list
//!
//! The source of truth behind a tab bar. Tracks the current item and the
//! item that was current before it, which is preferred when the current
//! item is removed.
//!
//! This type knows nothing about drags. Callers that own a drag session
//! must release it before calling any mutator here.

use crate::item::Item;

/// A change of the current item, with indices as they are after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentChange {
    pub old: Option<Item>,
    pub new: Option<Item>,
    /// Position of `old` in the list, `None` if it is no longer there
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Final position of the item
    pub index: usize,
    /// Set when the item was already present and got moved instead
    pub moved_from: Option<usize>,
    pub current_change: Option<CurrentChange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub item: Item,
    pub index: usize,
    pub current_change: Option<CurrentChange>,
}

#[derive(Debug, Default)]
pub struct ItemList {
    items: Vec<Item>,
    current: Option<Item>,
    previous: Option<Item>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn index_of(&self, item: &Item) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.index_of(item).is_some()
    }

    pub fn current(&self) -> Option<&Item> {
        self.current.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().and_then(|item| self.index_of(item))
    }

    /// The item that was current before the current one, if still tracked
    pub fn previous(&self) -> Option<&Item> {
        self.previous.as_ref()
    }

    /// Set the current item. Items absent from the list are coerced to `None`.
    ///
    /// Returns the change, or `None` when the current item stays the same.
    pub fn set_current(&mut self, item: Option<Item>) -> Option<CurrentChange> {
        let item = item.filter(|item| self.contains(item));
        if item == self.current {
            return None;
        }

        let old = std::mem::replace(&mut self.current, item.clone());
        if old.is_some() {
            self.previous = old.clone();
        }

        Some(self.change(old, item))
    }

    /// Insert an item at `index`, clamped into `[0, len]`.
    ///
    /// An item that is already present is moved to the clamped index instead,
    /// so the list never holds duplicates. The first item inserted into a
    /// list without a current item becomes current.
    pub fn insert(&mut self, index: usize, item: Item) -> InsertOutcome {
        if let Some(from) = self.index_of(&item) {
            let to = index.min(self.items.len() - 1);
            self.move_item(from, to);
            return InsertOutcome {
                index: to,
                moved_from: Some(from),
                current_change: None,
            };
        }

        let index = index.min(self.items.len());
        self.items.insert(index, item.clone());

        let current_change = if self.current.is_none() {
            self.set_current(Some(item))
        } else {
            None
        };

        InsertOutcome {
            index,
            moved_from: None,
            current_change,
        }
    }

    /// Move the item at `from` to `to`.
    ///
    /// Returns false if either index is out of range. `from == to` succeeds
    /// without touching the list.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        true
    }

    /// Remove the item at `index`, repairing the current item if needed.
    pub fn remove_at(&mut self, index: usize) -> Option<RemoveOutcome> {
        if index >= self.items.len() {
            return None;
        }

        let item = self.items.remove(index);
        if self.previous.as_ref() == Some(&item) {
            self.previous = None;
        }

        let current_change = if self.current.as_ref() == Some(&item) {
            let replacement = self
                .previous
                .take()
                .filter(|previous| self.contains(previous))
                .or_else(|| self.items.get(index).cloned())
                .or_else(|| index.checked_sub(1).and_then(|i| self.items.get(i).cloned()));

            self.current = replacement.clone();
            Some(self.change(Some(item.clone()), replacement))
        } else {
            None
        };

        Some(RemoveOutcome {
            item,
            index,
            current_change,
        })
    }

    pub fn remove(&mut self, item: &Item) -> Option<RemoveOutcome> {
        let index = self.index_of(item)?;
        self.remove_at(index)
    }

    /// Remove every item. Returns the removed items in order.
    pub fn clear(&mut self) -> (Vec<Item>, Option<CurrentChange>) {
        let removed = std::mem::take(&mut self.items);
        self.previous = None;

        let current_change = self
            .current
            .take()
            .map(|old| self.change(Some(old), None));

        (removed, current_change)
    }

    fn change(&self, old: Option<Item>, new: Option<Item>) -> CurrentChange {
        let old_index = old.as_ref().and_then(|item| self.index_of(item));
        let new_index = new.as_ref().and_then(|item| self.index_of(item));
        CurrentChange {
            old,
            new,
            old_index,
            new_index,
        }
    }
}
