//! Scene construction and pagination for the button grid.

mod grid;
mod pagination;

pub use grid::{GridRenderer, Scene, Tile, TilePage};
pub use pagination::PageState;
