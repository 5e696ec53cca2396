//! Terrain layers backing the battleground.

use battletank_core::{CellCoord, TileIndex, WorldPoint};

/// Fixed-size rectangular battleground with two parallel terrain layers.
///
/// The ground layer is purely decorative; the wall layer marks impassable
/// cells. Both layers are dense row-major arrays sharing the grid's
/// dimensions, which stay fixed for the lifetime of a loaded level.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    ground: Vec<Option<TileIndex>>,
    walls: Vec<Option<TileIndex>>,
}

impl Grid {
    /// Creates a new grid from pre-decoded terrain layers.
    ///
    /// The level producer validates that each layer holds exactly
    /// `width * height` cells before handing the layers over; the grid
    /// itself performs no further structural validation.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        ground: Vec<Option<TileIndex>>,
        walls: Vec<Option<TileIndex>>,
    ) -> Self {
        Self {
            width,
            height,
            ground,
            walls,
        }
    }

    /// Number of cell columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether a continuous world-space point lies within the
    /// half-open grid bounds.
    ///
    /// The check applies to bullet positions as well as unit cells, so it
    /// operates on continuous coordinates rather than whole cells.
    #[must_use]
    pub fn is_inside(&self, point: WorldPoint) -> bool {
        point.x() >= 0.0
            && point.x() < self.width as f32
            && point.y() >= 0.0
            && point.y() < self.height as f32
    }

    /// Reports whether the provided cell lies within the grid.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Decorative ground tile at the provided cell, if any.
    #[must_use]
    pub fn ground_at(&self, cell: CellCoord) -> Option<TileIndex> {
        self.index(cell)
            .and_then(|index| self.ground.get(index).copied().flatten())
    }

    /// Wall tile at the provided cell, if any; `Some` cells are impassable.
    #[must_use]
    pub fn wall_at(&self, cell: CellCoord) -> Option<TileIndex> {
        self.index(cell)
            .and_then(|index| self.walls.get(index).copied().flatten())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() < 0 || cell.y() < 0 {
            return None;
        }

        let column = cell.x() as u32;
        let row = cell.y() as u32;
        if column >= self.width || row >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
    }
}
