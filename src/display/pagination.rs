//! Current-page state and the transitions that keep it within bounds.

use tracing::debug;

use crate::state::Orientation;

/// Pagination state. `current` only exists while paging is active, so the
/// "valid only while active" rule is structural rather than a convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Inactive,
    Active { page_count: usize, current: usize },
}

impl PageState {
    /// Reconcile against a freshly rendered scene.
    ///
    /// Paging is active iff the orientation is landscape and the scene has
    /// more than one page; portrait never paginates. `new_data` marks a
    /// layout change from the server, which always returns the user to page
    /// 0. A same-data re-render that preserves the page count (a window
    /// resize, typically) keeps the current page instead of jarring the user
    /// back to the start.
    pub fn reconcile(self, orientation: Orientation, page_count: usize, new_data: bool) -> PageState {
        if orientation != Orientation::Landscape || page_count < 2 {
            return PageState::Inactive;
        }
        let current = match self {
            PageState::Active {
                page_count: previous,
                current,
            } if !new_data && previous == page_count => current.min(page_count - 1),
            _ => 0,
        };
        PageState::Active {
            page_count,
            current,
        }
    }

    /// Request page `target`. Out-of-range requests clamp to the valid
    /// range. Returns the new index when the visible window must shift;
    /// `None` when inactive or already on the target page.
    pub fn go_to_page(&mut self, target: isize) -> Option<usize> {
        let PageState::Active {
            page_count,
            current,
        } = self
        else {
            return None;
        };
        let clamped = target.clamp(0, *page_count as isize - 1) as usize;
        if clamped == *current {
            return None;
        }
        debug!("page {} -> {}", current, clamped);
        *current = clamped;
        Some(clamped)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PageState::Active { .. })
    }

    pub fn current(&self) -> usize {
        match self {
            PageState::Active { current, .. } => *current,
            PageState::Inactive => 0,
        }
    }

    /// Dot indicator model: (dot count, active dot), present only while
    /// paging is active.
    pub fn dots(&self) -> Option<(usize, usize)> {
        match self {
            PageState::Active {
                page_count,
                current,
            } => Some((*page_count, *current)),
            PageState::Inactive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_iff_landscape_and_multiple_pages() {
        for (orientation, pages, expect_active) in [
            (Orientation::Landscape, 3, true),
            (Orientation::Landscape, 1, false),
            (Orientation::Landscape, 0, false),
            (Orientation::Portrait, 3, false),
            (Orientation::Portrait, 1, false),
        ] {
            let state = PageState::Inactive.reconcile(orientation, pages, true);
            assert_eq!(state.is_active(), expect_active, "{orientation:?} {pages}");
        }
    }

    #[test]
    fn test_new_layout_resets_to_page_zero() {
        let state = PageState::Active {
            page_count: 3,
            current: 2,
        };
        let state = state.reconcile(Orientation::Landscape, 3, true);
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn test_page_count_preserving_rerender_keeps_current() {
        let state = PageState::Active {
            page_count: 3,
            current: 2,
        };
        let state = state.reconcile(Orientation::Landscape, 3, false);
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn test_page_count_change_resets_to_page_zero() {
        let state = PageState::Active {
            page_count: 3,
            current: 2,
        };
        let state = state.reconcile(Orientation::Landscape, 4, false);
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn test_orientation_flip_round_trip_deactivates() {
        let state = PageState::Active {
            page_count: 3,
            current: 2,
        };
        let portrait = state.reconcile(Orientation::Portrait, 1, false);
        assert_eq!(portrait, PageState::Inactive);
        let back = portrait.reconcile(Orientation::Landscape, 3, false);
        assert_eq!(back.current(), 0);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut state = PageState::Active {
            page_count: 3,
            current: 1,
        };
        assert_eq!(state.go_to_page(-5), Some(0));
        assert_eq!(state.go_to_page(99), Some(2));
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn test_go_to_page_is_idempotent() {
        let mut state = PageState::Active {
            page_count: 3,
            current: 0,
        };
        assert_eq!(state.go_to_page(1), Some(1));
        assert_eq!(state.go_to_page(1), None);
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_go_to_page_ignored_while_inactive() {
        let mut state = PageState::Inactive;
        assert_eq!(state.go_to_page(2), None);
        assert_eq!(state, PageState::Inactive);
    }

    #[test]
    fn test_dots_track_active_page() {
        let state = PageState::Active {
            page_count: 4,
            current: 3,
        };
        assert_eq!(state.dots(), Some((4, 3)));
        assert_eq!(PageState::Inactive.dots(), None);
    }
}
