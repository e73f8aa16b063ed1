//! Tabstrip Items
//!
//! The data side of a tab bar: opaque item handles carrying an observable
//! display title, and the ordered list that backs the bar.
//! Insertion order is display order is drag geometry order.

mod item;
mod list;
mod title;

pub use item::{Item, ObserverId};
pub use list::{CurrentChange, InsertOutcome, ItemList, RemoveOutcome};
pub use title::Title;
