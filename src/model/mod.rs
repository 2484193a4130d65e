//! Button set and layout data as delivered by the server.
//!
//! The full button set is replaced wholesale on every server update, never
//! patched incrementally, so everything here is plain immutable data plus the
//! validation that turns an untrusted wire layout into one the renderer can
//! iterate without bounds checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// One pressable button as configured on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Unique, non-empty identifier reported back on press.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Icon asset path; empty means text-only.
    #[serde(default)]
    pub icon_path: String,
}

impl Button {
    pub fn has_icon(&self) -> bool {
        !self.icon_path.trim().is_empty()
    }

    /// A button the client can actually render and report.
    pub fn is_renderable(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}

/// Derived id → button mapping, rebuilt from scratch on every update.
pub type ButtonsById = HashMap<String, Button>;

/// Build the lookup map, dropping entries the client cannot use. A bad
/// button never takes the rest of the set with it.
pub fn buttons_by_id(buttons: Vec<Button>) -> ButtonsById {
    let mut map = ButtonsById::with_capacity(buttons.len());
    for button in buttons {
        if !button.is_renderable() {
            warn!(
                "dropping button with empty id or name (id: '{}', name: '{}')",
                button.id, button.name
            );
            continue;
        }
        let id = button.id.clone();
        if map.insert(id.clone(), button).is_some() {
            warn!("duplicate button id '{}', keeping the later entry", id);
        }
    }
    map
}

/// One page of the paged (landscape) arrangement: a `rows_per_page ×
/// cols_per_page` grid of button ids, row-major, `""` for an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPage {
    pub page_index: i64,
    pub grid: Vec<Vec<String>>,
}

/// Server-supplied arrangement of the current button set into fixed-size
/// pages. Always run [`Layout::normalize`] before using a layout that came
/// off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows_per_page: usize,
    pub cols_per_page: usize,
    pub page_count: usize,
    pub pages: Vec<LayoutPage>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("rows_per_page and cols_per_page must be at least 1 (got {rows}x{cols})")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("page_count {declared} does not match the {actual} pages present")]
    PageCountMismatch { declared: usize, actual: usize },
    #[error("duplicate page_index {0}")]
    DuplicatePageIndex(i64),
    #[error(
        "page_index {page_index} grid is {rows}x{cols}, expected {expected_rows}x{expected_cols}"
    )]
    GridShape {
        page_index: i64,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

impl Layout {
    /// Validate the wire invariants and sort pages by `page_index`.
    ///
    /// Wire page indices are unique but not guaranteed contiguous or
    /// zero-based; after sorting, navigation uses dense positional indices
    /// and the wire values are not consulted again. A layout with zero pages
    /// is accepted and renders as an empty placeholder.
    pub fn normalize(mut self) -> Result<Layout, LayoutError> {
        if self.page_count != self.pages.len() {
            return Err(LayoutError::PageCountMismatch {
                declared: self.page_count,
                actual: self.pages.len(),
            });
        }
        if self.pages.is_empty() {
            return Ok(self);
        }
        if self.rows_per_page == 0 || self.cols_per_page == 0 {
            return Err(LayoutError::ZeroDimension {
                rows: self.rows_per_page,
                cols: self.cols_per_page,
            });
        }
        for page in &self.pages {
            let rows = page.grid.len();
            let cols = page.grid.iter().map(Vec::len).max().unwrap_or(0);
            let uniform = page.grid.iter().all(|row| row.len() == self.cols_per_page);
            if rows != self.rows_per_page || !uniform {
                return Err(LayoutError::GridShape {
                    page_index: page.page_index,
                    rows,
                    cols,
                    expected_rows: self.rows_per_page,
                    expected_cols: self.cols_per_page,
                });
            }
        }
        self.pages.sort_by_key(|page| page.page_index);
        for pair in self.pages.windows(2) {
            if pair[0].page_index == pair[1].page_index {
                return Err(LayoutError::DuplicatePageIndex(pair[0].page_index));
            }
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: i64, rows: usize, cols: usize) -> LayoutPage {
        LayoutPage {
            page_index: index,
            grid: vec![vec![String::new(); cols]; rows],
        }
    }

    #[test]
    fn test_normalize_sorts_non_contiguous_page_indices() {
        let layout = Layout {
            rows_per_page: 2,
            cols_per_page: 2,
            page_count: 3,
            pages: vec![page(7, 2, 2), page(1, 2, 2), page(4, 2, 2)],
        };
        let layout = layout.normalize().unwrap();
        let order: Vec<i64> = layout.pages.iter().map(|p| p.page_index).collect();
        assert_eq!(order, vec![1, 4, 7]);
    }

    #[test]
    fn test_normalize_rejects_page_count_mismatch() {
        let layout = Layout {
            rows_per_page: 2,
            cols_per_page: 2,
            page_count: 2,
            pages: vec![page(0, 2, 2)],
        };
        assert_eq!(
            layout.normalize(),
            Err(LayoutError::PageCountMismatch {
                declared: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_normalize_rejects_zero_dimensions() {
        let layout = Layout {
            rows_per_page: 0,
            cols_per_page: 3,
            page_count: 1,
            pages: vec![page(0, 0, 0)],
        };
        assert!(matches!(
            layout.normalize(),
            Err(LayoutError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_ragged_grid() {
        let mut bad = page(0, 2, 3);
        bad.grid[1].pop();
        let layout = Layout {
            rows_per_page: 2,
            cols_per_page: 3,
            page_count: 1,
            pages: vec![bad],
        };
        assert!(matches!(
            layout.normalize(),
            Err(LayoutError::GridShape { page_index: 0, .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_duplicate_page_index() {
        let layout = Layout {
            rows_per_page: 1,
            cols_per_page: 1,
            page_count: 2,
            pages: vec![page(3, 1, 1), page(3, 1, 1)],
        };
        assert_eq!(
            layout.normalize(),
            Err(LayoutError::DuplicatePageIndex(3))
        );
    }

    #[test]
    fn test_normalize_accepts_empty_layout() {
        let layout = Layout {
            rows_per_page: 0,
            cols_per_page: 0,
            page_count: 0,
            pages: vec![],
        };
        assert!(layout.normalize().unwrap().is_empty());
    }

    #[test]
    fn test_buttons_by_id_drops_invalid_entries() {
        let buttons = vec![
            Button {
                id: "a".into(),
                name: "Alpha".into(),
                icon_path: String::new(),
            },
            Button {
                id: String::new(),
                name: "No id".into(),
                icon_path: String::new(),
            },
            Button {
                id: "b".into(),
                name: String::new(),
                icon_path: String::new(),
            },
        ];
        let map = buttons_by_id(buttons);
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"].name, "Alpha");
    }

    #[test]
    fn test_buttons_by_id_keeps_later_duplicate() {
        let buttons = vec![
            Button {
                id: "a".into(),
                name: "First".into(),
                icon_path: String::new(),
            },
            Button {
                id: "a".into(),
                name: "Second".into(),
                icon_path: String::new(),
            },
        ];
        let map = buttons_by_id(buttons);
        assert_eq!(map["a"].name, "Second");
    }

    #[test]
    fn test_has_icon_ignores_whitespace() {
        let button = Button {
            id: "a".into(),
            name: "Alpha".into(),
            icon_path: "  ".into(),
        };
        assert!(!button.has_icon());
    }
}
