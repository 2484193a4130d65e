//! Single-pointer horizontal swipe detection.
//!
//! Turns raw touch coordinates into discrete page commands. Multi-touch is
//! ignored at every stage: no gesture state is recorded or mutated while
//! more than one contact is down.

/// Horizontal movement below this is an incidental wiggle, not the start of
/// a swipe; beyond it the gesture claims the pointer and native vertical
/// scrolling must be suppressed until the touch ends.
const SWIPE_SLOP_PX: f64 = 10.0;

/// Discrete page command produced by a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left: advance one page.
    NextPage,
    /// Finger moved right: go back one page.
    PreviousPage,
}

#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold_px: f64,
    start_x: f64,
    current_x: f64,
    tracking: bool,
    swiping: bool,
}

impl SwipeTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            start_x: 0.0,
            current_x: 0.0,
            tracking: false,
            swiping: false,
        }
    }

    pub fn touch_start(&mut self, contacts: usize, x: f64) {
        if contacts != 1 {
            return;
        }
        self.start_x = x;
        self.current_x = x;
        self.tracking = true;
        self.swiping = false;
    }

    /// Track finger movement. Returns true while the gesture is a horizontal
    /// swipe and the caller must suppress default scroll behavior.
    pub fn touch_move(&mut self, contacts: usize, x: f64) -> bool {
        if contacts != 1 || !self.tracking {
            return false;
        }
        self.current_x = x;
        if !self.swiping && (self.current_x - self.start_x).abs() > SWIPE_SLOP_PX {
            self.swiping = true;
        }
        self.swiping
    }

    /// Finish the gesture, yielding a page command when the travel exceeded
    /// the threshold. Gesture state is reset regardless of the outcome.
    pub fn touch_end(&mut self) -> Option<Swipe> {
        let result = if self.tracking && self.swiping {
            let delta = self.current_x - self.start_x;
            if delta < -self.threshold_px {
                Some(Swipe::NextPage)
            } else if delta > self.threshold_px {
                Some(Swipe::PreviousPage)
            } else {
                None
            }
        } else {
            None
        };
        self.reset();
        result
    }

    pub fn reset(&mut self) {
        self.start_x = 0.0;
        self.current_x = 0.0;
        self.tracking = false;
        self.swiping = false;
    }
}
