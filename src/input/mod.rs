//! Touch input interpretation.

mod gesture;

pub use gesture::{Swipe, SwipeTracker};
