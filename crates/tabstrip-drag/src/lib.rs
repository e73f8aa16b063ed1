//! Tabstrip Drag
//!
//! The reordering state machine behind a tab bar:
//! ```text
//! Idle
//!   ↓ primary press on a tab
//! Pressed
//!   ↓ pointer travels past the drag threshold
//! Dragging
//!   ↓ primary release
//! Releasing
//!   ↓ transition end
//! Idle
//! ```
//! Any state returns to `Idle` at once through an abort.
//!
//! The engine never touches a document directly. Everything visual goes
//! through a [`HostSurface`] handed into each call.

mod display;
mod engine;
mod geometry;
mod host;
mod session;

pub use display::{DisplayList, DisplayTab};
pub use engine::{DragConfig, MoveProgress, Reorder, ReorderEngine};
pub use engine::{DETACH_THRESHOLD, DRAG_THRESHOLD, TRANSITION_DURATION};
pub use geometry::{parse_px, snapshot, Rect, TabLayout};
pub use host::{CursorOverride, HostSurface, MouseButton, PointerEvent};
pub use session::{DragPhase, DragSession, SessionTicket};
