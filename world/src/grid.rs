//! Dense row-major tile storage.

use std::sync::Arc;

use marble_lab_core::{CellCoord, GridDimensions, GridError, Tile};

/// Fixed-size level grid addressed by row and column.
///
/// Tiles live in a single flat allocation shared between clones, so taking a
/// snapshot is cheap and writes copy the storage only while it is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: GridDimensions,
    tiles: Arc<Vec<Tile>>,
}

impl Grid {
    /// Creates a grid where every cell holds the default tile.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            tiles: Arc::new(vec![Tile::default(); dimensions.cell_count()]),
        }
    }

    /// Rebuilds a grid from tiles listed in row-major order.
    pub fn from_flat_sequence(
        dimensions: GridDimensions,
        tiles: Vec<Tile>,
    ) -> Result<Self, GridError> {
        let expected = dimensions.cell_count();
        if tiles.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: tiles.len(),
            });
        }

        Ok(Self {
            dimensions,
            tiles: Arc::new(tiles),
        })
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Tile stored at the provided cell.
    pub fn get(&self, cell: CellCoord) -> Result<Tile, GridError> {
        let index = self.index(cell)?;
        Ok(self.tiles[index])
    }

    /// Returns a copy of the grid with a single cell replaced.
    ///
    /// The receiver is left untouched; untouched cells compare equal between
    /// the two grids.
    pub fn set(&self, cell: CellCoord, tile: Tile) -> Result<Self, GridError> {
        let mut next = self.clone();
        next.set_in_place(cell, tile)?;
        Ok(next)
    }

    /// Replaces a single cell, copying the storage first if it is shared.
    pub(crate) fn set_in_place(&mut self, cell: CellCoord, tile: Tile) -> Result<(), GridError> {
        let index = self.index(cell)?;
        Arc::make_mut(&mut self.tiles)[index] = tile;
        Ok(())
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Copies the tiles out in row-major order, ready for serialisation.
    #[must_use]
    pub fn to_flat_sequence(&self) -> Vec<Tile> {
        self.tiles.as_ref().clone()
    }

    /// Iterates over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.dimensions.columns() as usize)
    }

    fn index(&self, cell: CellCoord) -> Result<usize, GridError> {
        self.dimensions
            .index(cell)
            .ok_or(GridError::OutOfRange {
                cell,
                dimensions: self.dimensions,
            })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridDimensions::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marble_lab_core::{TileType, WallMask};

    fn small() -> GridDimensions {
        GridDimensions::new(2, 3).expect("valid dimensions")
    }

    #[test]
    fn new_grid_is_fully_populated_with_floor() {
        let grid = Grid::default();
        assert_eq!(grid.tiles().len(), 64);
        assert!(grid.tiles().iter().all(|tile| *tile == Tile::default()));
    }

    #[test]
    fn get_rejects_cells_outside_bounds() {
        let grid = Grid::new(small());
        assert!(grid.get(CellCoord::new(1, 2)).is_ok());
        assert_eq!(
            grid.get(CellCoord::new(2, 0)),
            Err(GridError::OutOfRange {
                cell: CellCoord::new(2, 0),
                dimensions: small(),
            })
        );
        assert!(grid.get(CellCoord::new(0, 3)).is_err());
    }

    #[test]
    fn set_returns_new_grid_and_keeps_receiver() {
        let grid = Grid::new(small());
        let hole = Tile::new(TileType::Hole, WallMask::NONE);
        let next = grid.set(CellCoord::new(1, 1), hole).expect("cell in range");

        assert_eq!(grid.get(CellCoord::new(1, 1)), Ok(Tile::default()));
        assert_eq!(next.get(CellCoord::new(1, 1)), Ok(hole));
        for cell in small().cells().filter(|cell| *cell != CellCoord::new(1, 1)) {
            assert_eq!(grid.get(cell), next.get(cell));
        }
    }

    #[test]
    fn set_rejects_cells_outside_bounds() {
        let grid = Grid::new(small());
        assert!(grid.set(CellCoord::new(5, 5), Tile::default()).is_err());
    }

    #[test]
    fn flat_sequence_round_trips() {
        let grid = Grid::new(small())
            .set(CellCoord::new(0, 2), Tile::new(TileType::Goal, WallMask::ALL))
            .and_then(|grid| grid.set(CellCoord::new(1, 0), Tile::new(TileType::Marble, WallMask::UP)))
            .expect("cells in range");

        let flat = grid.to_flat_sequence();
        assert_eq!(flat[2].tile_type(), TileType::Goal);
        assert_eq!(flat[3].tile_type(), TileType::Marble);

        let restored = Grid::from_flat_sequence(small(), flat).expect("shape matches");
        assert_eq!(restored, grid);
    }

    #[test]
    fn flat_sequence_with_wrong_length_is_rejected() {
        let short = vec![Tile::default(); 5];
        let long = vec![Tile::default(); 7];
        assert_eq!(
            Grid::from_flat_sequence(small(), short),
            Err(GridError::ShapeMismatch {
                expected: 6,
                actual: 5
            })
        );
        assert_eq!(
            Grid::from_flat_sequence(small(), long),
            Err(GridError::ShapeMismatch {
                expected: 6,
                actual: 7
            })
        );
    }

    #[test]
    fn rows_split_storage_by_column_count() {
        let grid = Grid::new(small());
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 3));
    }
}
