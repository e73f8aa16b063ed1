//! Tabstrip Core
//!
//! A row of tabs that can be reordered by dragging, and a tabbed container
//! that keeps a stack of content panes in step with it.
//! The visual layer is supplied by the caller as a [`HostSurface`].

mod bar;
mod config;
mod error;
mod events;
mod panel;
mod timer;

pub use bar::TabBar;
pub use config::TabBarConfig;
pub use error::CoreError;
pub use events::{DetachRequest, DetachResponse, EventResponse, TabBarEvent};
pub use panel::{PaneContent, TabPanel};
pub use timer::{TimerHandle, TransitionTimer};

// Re-export the building blocks
pub use tabstrip_drag::{
    CursorOverride, DisplayList, DisplayTab, DragConfig, DragPhase, DragSession, HostSurface,
    MouseButton, PointerEvent, Rect, SessionTicket, TabLayout, DETACH_THRESHOLD, DRAG_THRESHOLD,
    TRANSITION_DURATION,
};
pub use tabstrip_items::{CurrentChange, Item, ItemList, Title};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "tabstrip_core=info,tabstrip_drag=info,tabstrip_items=info";

/// Install a `tracing` subscriber for tab bar diagnostics.
///
/// Drag sessions are logged at `debug`, title changes at `trace`. Returns
/// `false` if a global subscriber was already installed.
///
/// ```
/// assert!(tabstrip_core::init_logging());
/// assert!(!tabstrip_core::init_logging());
/// ```
pub fn init_logging() -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_installs_once() {
        init_logging();
        assert!(!init_logging());
        tracing::debug!(filter = DEFAULT_LOG_FILTER, "Logging ready");
    }
}
