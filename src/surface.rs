//! The seam between the pure panel core and whatever actually draws it.

use tracing::info;

use crate::display::{Scene, Tile};
use crate::net::ConnectionPhase;
use crate::state::PanelState;

/// Implemented by the embedding shell.
///
/// `present` is a full rebuild; `show_page` is a pure positional shift over
/// the already-presented pages (dot highlighting included) and must not
/// rebuild anything; `update_tile` patches a single tile after an icon
/// degrades.
pub trait PanelSurface {
    fn present(&mut self, scene: &Scene, state: &PanelState);
    fn show_page(&mut self, index: usize);
    fn update_tile(&mut self, button_id: &str, tile: &Tile);
    fn connection_status(&mut self, phase: ConnectionPhase);
}

/// Headless surface that sketches the grid into the log. Lets the client run
/// without a display shell attached.
#[derive(Debug, Default)]
pub struct TextSurface;

impl TextSurface {
    fn sketch_row(tiles: &[Tile]) -> String {
        let cells: Vec<String> = tiles
            .iter()
            .map(|tile| {
                let label = tile.caption.as_deref().unwrap_or("");
                format!("{label:^12}")
            })
            .collect();
        format!("|{}|", cells.join("|"))
    }
}

impl PanelSurface for TextSurface {
    fn present(&mut self, scene: &Scene, state: &PanelState) {
        match scene {
            Scene::Empty => info!("No buttons configured."),
            Scene::Paged { rows, cols, pages } => {
                info!(
                    "{} page(s) of {rows}x{cols}, showing page {}",
                    pages.len(),
                    state.current_page()
                );
                if let Some(page) = pages.get(state.current_page()) {
                    for row in page.tiles.chunks(*cols) {
                        info!("{}", Self::sketch_row(row));
                    }
                }
                if let Some((count, active)) = state.pages.dots() {
                    let dots: String = (0..count)
                        .map(|i| if i == active { '\u{25cf}' } else { '\u{25cb}' })
                        .collect();
                    info!("{dots}");
                }
            }
            Scene::Flat { cols, tiles } => {
                info!("{} button(s) in a {cols}-column grid", tiles.len());
                for row in tiles.chunks(*cols) {
                    info!("{}", Self::sketch_row(row));
                }
            }
        }
    }

    fn show_page(&mut self, index: usize) {
        info!("showing page {index}");
    }

    fn update_tile(&mut self, button_id: &str, _tile: &Tile) {
        info!("tile '{button_id}' degraded to text");
    }

    fn connection_status(&mut self, phase: ConnectionPhase) {
        info!("{}", phase.status_text());
    }
}
