//! Pure layout → scene computation.
//!
//! The renderer is a function of (layout, buttons, orientation) and nothing
//! else: rendering the same inputs twice yields the same `Scene`, and no
//! input combination panics. Landscape materializes every page up front so
//! that page changes are a positional shift on the surface rather than a
//! rebuild; portrait ignores the page structure entirely and flattens.

use tracing::warn;

use crate::model::{Button, ButtonsById, Layout};
use crate::state::Orientation;

/// One rendered cell. Blank filler tiles have no `button_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub button_id: Option<String>,
    /// Display label of the backing button; empty for blank tiles.
    pub name: String,
    /// Icon asset path, cleared once the icon is known to be unloadable.
    pub icon: Option<String>,
    /// Text shown on the tile (under the icon, or alone).
    pub caption: Option<String>,
}

impl Tile {
    pub fn blank() -> Tile {
        Tile {
            button_id: None,
            name: String::new(),
            icon: None,
            caption: None,
        }
    }

    fn for_button(button: &Button) -> Tile {
        Tile {
            button_id: Some(button.id.clone()),
            name: button.name.clone(),
            icon: button.has_icon().then(|| button.icon_path.clone()),
            caption: Some(button.name.clone()),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.button_id.is_none()
    }

    /// Icon failed to load: drop it and fall back to a text caption.
    ///
    /// Inserting the caption unconditionally would double the label when one
    /// is already present, so this is a no-op once degraded. Returns whether
    /// the tile changed.
    pub fn degrade_to_text(&mut self) -> bool {
        if self.icon.is_none() {
            return false;
        }
        self.icon = None;
        if self.caption.is_none() {
            self.caption = Some(self.name.clone());
        }
        true
    }
}

/// One materialized page: `rows × cols` tiles in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePage {
    pub tiles: Vec<Tile>,
}

/// Renderer output, consumed by a `PanelSurface`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene {
    /// Nothing to show yet: no layout received, or a layout with no pages.
    Empty,
    /// Landscape presentation, every page materialized.
    Paged {
        rows: usize,
        cols: usize,
        pages: Vec<TilePage>,
    },
    /// Portrait presentation: one flattened scrollable grid.
    Flat { cols: usize, tiles: Vec<Tile> },
}

impl Scene {
    pub fn page_count(&self) -> usize {
        match self {
            Scene::Empty => 0,
            Scene::Paged { pages, .. } => pages.len(),
            Scene::Flat { .. } => 1,
        }
    }

    fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        let tiles: Vec<&mut Tile> = match self {
            Scene::Empty => Vec::new(),
            Scene::Paged { pages, .. } => pages
                .iter_mut()
                .flat_map(|page| page.tiles.iter_mut())
                .collect(),
            Scene::Flat { tiles, .. } => tiles.iter_mut().collect(),
        };
        tiles.into_iter()
    }

    /// Degrade every tile backed by `button_id` to text-only. Returns one of
    /// the changed tiles (they are all identical) or `None` if nothing had an
    /// icon left to drop.
    pub fn degrade_icon(&mut self, button_id: &str) -> Option<Tile> {
        let mut degraded = None;
        for tile in self.tiles_mut() {
            if tile.button_id.as_deref() == Some(button_id) && tile.degrade_to_text() {
                degraded = Some(tile.clone());
            }
        }
        degraded
    }
}

/// Builds scenes from validated layouts.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    portrait_cols: usize,
}

impl GridRenderer {
    pub fn new(portrait_cols: usize) -> Self {
        Self {
            portrait_cols: portrait_cols.max(1),
        }
    }

    pub fn render(
        &self,
        layout: Option<&Layout>,
        buttons: &ButtonsById,
        orientation: Orientation,
    ) -> Scene {
        let Some(layout) = layout else {
            return Scene::Empty;
        };
        if layout.is_empty() {
            return Scene::Empty;
        }
        match orientation {
            Orientation::Landscape => self.render_paged(layout, buttons),
            Orientation::Portrait => self.render_flat(layout, buttons),
        }
    }

    fn render_paged(&self, layout: &Layout, buttons: &ButtonsById) -> Scene {
        let pages = layout
            .pages
            .iter()
            .map(|page| TilePage {
                tiles: page
                    .grid
                    .iter()
                    .flat_map(|row| row.iter())
                    .map(|id| tile_for_cell(id, buttons))
                    .collect(),
            })
            .collect();
        Scene::Paged {
            rows: layout.rows_per_page,
            cols: layout.cols_per_page,
            pages,
        }
    }

    /// Portrait never consults `rows_per_page`/`cols_per_page`: pages are
    /// concatenated in index order, row-major, with empty and unknown cells
    /// filtered out.
    fn render_flat(&self, layout: &Layout, buttons: &ButtonsById) -> Scene {
        let tiles = layout
            .pages
            .iter()
            .flat_map(|page| page.grid.iter())
            .flat_map(|row| row.iter())
            .map(|id| tile_for_cell(id, buttons))
            .filter(|tile| !tile.is_blank())
            .collect();
        Scene::Flat {
            cols: self.portrait_cols,
            tiles,
        }
    }
}

fn tile_for_cell(id: &str, buttons: &ButtonsById) -> Tile {
    if id.is_empty() {
        return Tile::blank();
    }
    match buttons.get(id) {
        Some(button) => Tile::for_button(button),
        None => {
            warn!("layout references unknown button id '{id}', rendering empty cell");
            Tile::blank()
        }
    }
}
