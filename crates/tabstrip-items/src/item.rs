//! Item handle
//!
//! An item is one tab-worthy entity. Handles are cheap to clone and compare
//! by identity, never by title. The same item must not be held by two bars
//! at once.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::title::Title;

/// Handle returned by [`Item::observe_title`], used to stop observing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type TitleObserver = Arc<dyn Fn(&Item) + Send + Sync>;

struct ItemInner {
    id: Uuid,
    title: RwLock<Title>,
    observers: Mutex<Vec<(ObserverId, TitleObserver)>>,
    next_observer: AtomicU64,
}

#[derive(Clone)]
pub struct Item {
    inner: Arc<ItemInner>,
}

impl Item {
    pub fn new(title: Title) -> Self {
        Self {
            inner: Arc::new(ItemInner {
                id: Uuid::new_v4(),
                title: RwLock::new(title),
                observers: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(0),
            }),
        }
    }

    /// Unique identifier, stable for the item's lifetime
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Snapshot of the current title
    pub fn title(&self) -> Title {
        self.inner.title.read().clone()
    }

    pub fn text(&self) -> String {
        self.inner.title.read().text.clone()
    }

    pub fn is_closable(&self) -> bool {
        self.inner.title.read().closable
    }

    /// Replace the title and notify every observer.
    pub fn set_title(&self, title: Title) {
        {
            let mut current = self.inner.title.write();
            if *current == title {
                return;
            }
            *current = title;
        }
        self.notify_observers();
    }

    /// Edit the title in place and notify every observer.
    pub fn update_title<F>(&self, f: F)
    where
        F: FnOnce(&mut Title),
    {
        let changed = {
            let mut current = self.inner.title.write();
            let before = current.clone();
            f(&mut current);
            *current != before
        };
        if changed {
            self.notify_observers();
        }
    }

    /// Register a callback run after every title change.
    pub fn observe_title<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&Item) + Send + Sync + 'static,
    {
        let id = ObserverId(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        self.inner.observers.lock().push((id, Arc::new(observer)));
        id
    }

    /// Returns false if the observer was not registered.
    pub fn unobserve_title(&self, id: ObserverId) -> bool {
        let mut observers = self.inner.observers.lock();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    fn notify_observers(&self) {
        // Observers may touch this item again, so call them outside the lock.
        let observers: Vec<TitleObserver> = self
            .inner
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        tracing::trace!(item_id = %self.inner.id, observers = observers.len(), "Title changed");

        for observer in observers {
            observer(self);
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Item {}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.inner.id)
            .field("title", &self.inner.title.read().text)
            .finish()
    }
}
