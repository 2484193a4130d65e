//! Panel-wide state shared across components.
//!
//! Owned by the orchestrator and passed into pure component functions, never
//! an ambient global. One instance lives for the life of the client.

use crate::display::PageState;
use crate::net::ConnectionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Mirrors the `(orientation: portrait)` media query: portrait when the
    /// viewport is taller than it is wide.
    pub fn from_viewport(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// The single mutable UI context: orientation, pagination, connection phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub orientation: Orientation,
    pub phase: ConnectionPhase,
    pub pages: PageState,
    /// Last reported viewport dimensions (width, height) in pixels.
    pub viewport: (u32, u32),
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            orientation: Orientation::Landscape,
            phase: ConnectionPhase::Disconnected,
            pages: PageState::Inactive,
            viewport: (0, 0),
        }
    }

    pub fn is_pagination_active(&self) -> bool {
        self.pages.is_active()
    }

    pub fn current_page(&self) -> usize {
        self.pages.current()
    }
}
