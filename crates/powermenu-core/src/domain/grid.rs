//! Button grid geometry.
//!
//! Backends use [`layout_cells`] both to draw the buttons and to work out
//! which button, if any, a pointer press landed on.  Buttons fill the grid
//! row by row, `buttons_per_row` to a row, inside the window minus its
//! margins.  All cells share one size.

use super::dispatch::PointerTarget;

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns `true` if the point lies inside (right/bottom edges excluded).
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        px >= self.x && py >= self.y && i64::from(px) < right && i64::from(py) < bottom
    }

    /// Centre point, rounded towards the top-left.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add((self.width / 2) as i32),
            self.y.saturating_add((self.height / 2) as i32),
        )
    }
}

/// Space kept clear around the grid, per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(value: u32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(230)
    }
}

/// Gaps between rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub row: u32,
    pub column: u32,
}

/// Everything that shapes the grid apart from the window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub margins: Margins,
    pub spacing: Spacing,
    /// Buttons per row; `0` is treated as `1`.
    pub buttons_per_row: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            spacing: Spacing::default(),
            buttons_per_row: 3,
        }
    }
}

/// Computes one cell per button for a window of `width × height`.
pub fn layout_cells(spec: &GridSpec, width: u32, height: u32, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let per_row = spec.buttons_per_row.max(1) as usize;
    let columns = per_row.min(count) as u32;
    let rows = count.div_ceil(per_row) as u32;

    let m = spec.margins;
    let inner_width = width.saturating_sub(m.left.saturating_add(m.right));
    let inner_height = height.saturating_sub(m.top.saturating_add(m.bottom));
    let cell_width =
        inner_width.saturating_sub(spec.spacing.column.saturating_mul(columns - 1)) / columns;
    let cell_height =
        inner_height.saturating_sub(spec.spacing.row.saturating_mul(rows - 1)) / rows;

    (0..count)
        .map(|i| {
            let column = (i % per_row) as u32;
            let row = (i / per_row) as u32;
            let x = cell_origin(m.left, column, cell_width, spec.spacing.column);
            let y = cell_origin(m.top, row, cell_height, spec.spacing.row);
            Rect::new(x, y, cell_width, cell_height)
        })
        .collect()
}

/// Offset of the `index`-th cell along one axis, clamped to `i32::MAX`.
fn cell_origin(margin: u32, index: u32, cell: u32, gap: u32) -> i32 {
    let stride = u64::from(cell) + u64::from(gap);
    let offset = u64::from(margin).saturating_add(u64::from(index).saturating_mul(stride));
    i32::try_from(offset).unwrap_or(i32::MAX)
}

/// Maps a pointer position to the button cell under it.
pub fn hit_test(cells: &[Rect], x: i32, y: i32) -> PointerTarget {
    cells
        .iter()
        .position(|cell| cell.contains(x, y))
        .map_or(PointerTarget::Background, PointerTarget::Button)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
