#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Marble Lab level editor.
//!
//! This crate defines the value types that make up a level and the message
//! surface that connects adapters, the authoritative edit session, and pure
//! systems. Adapters submit [`Command`] values describing desired mutations,
//! the session executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values that systems and presenters react to. Systems
//! consume event streams and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Set of wall sides attached to a single tile, stored as a 4-bit mask.
///
/// Bit 0 is the upper side, bit 1 the right side, bit 2 the lower side and
/// bit 3 the left side. Serialises as the bare integer mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WallMask(u8);

impl WallMask {
    /// Mask without any walls.
    pub const NONE: Self = Self(0);
    /// Wall along the upper edge of the tile.
    pub const UP: Self = Self(1 << 0);
    /// Wall along the right edge of the tile.
    pub const RIGHT: Self = Self(1 << 1);
    /// Wall along the lower edge of the tile.
    pub const DOWN: Self = Self(1 << 2);
    /// Wall along the left edge of the tile.
    pub const LEFT: Self = Self(1 << 3);
    /// Mask with every side walled.
    pub const ALL: Self = Self::UP.with(Self::RIGHT).with(Self::DOWN).with(Self::LEFT);

    /// Single-side masks in clockwise order starting at the top.
    pub const SIDES: [Self; 4] = [Self::UP, Self::RIGHT, Self::DOWN, Self::LEFT];

    /// Builds a mask from raw bits, rejecting values outside the four sides.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Raw bit representation of the mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether any side of `query` is present in this mask.
    ///
    /// This is an any-of test: `mask.has(WallMask::ALL)` holds as soon as a
    /// single side is walled, and nothing ever has [`WallMask::NONE`].
    #[must_use]
    pub const fn has(self, query: Self) -> bool {
        self.0 & query.0 != 0
    }

    /// Union of both masks.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// This mask with every side of `other` cleared.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Reports whether no side is walled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the single-side masks contained in this mask.
    pub fn sides(self) -> impl Iterator<Item = WallMask> {
        Self::SIDES.into_iter().filter(move |side| self.has(*side))
    }
}

impl TryFrom<u8> for WallMask {
    type Error = InvalidWallMask;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(InvalidWallMask(bits))
    }
}

impl From<WallMask> for u8 {
    fn from(mask: WallMask) -> Self {
        mask.bits()
    }
}

impl fmt::Display for WallMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut first = true;
        for side in self.sides() {
            if !first {
                write!(f, "+")?;
            }
            first = false;
            let name = match side {
                Self::UP => "up",
                Self::RIGHT => "right",
                Self::DOWN => "down",
                _ => "left",
            };
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

/// Raw value that does not describe a valid [`WallMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("wall mask {0} sets bits outside the four tile sides")]
pub struct InvalidWallMask(pub u8);

/// Kind of content occupying a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Nothing at all; the marble falls off the board here.
    Empty,
    /// Plain floor the marble can roll across.
    #[default]
    Floor,
    /// Starting position of the marble.
    Marble,
    /// Tile the marble has to reach.
    Goal,
    /// Pit that swallows the marble.
    Hole,
}

impl TileType {
    /// Every tile type in declaration order.
    pub const ALL: [Self; 5] = [Self::Empty, Self::Floor, Self::Marble, Self::Goal, Self::Hole];

    /// Human readable name, identical to the serialised form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Floor => "Floor",
            Self::Marble => "Marble",
            Self::Goal => "Goal",
            Self::Hole => "Hole",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable contents of a single grid cell.
///
/// Serialises as `{"type": "<TileType>", "walls": <mask>}`. Both fields are
/// always written; missing fields fall back to the defaults when reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile {
    #[serde(rename = "type")]
    tile_type: TileType,
    walls: WallMask,
}

impl Tile {
    /// Creates a tile from its parts.
    #[must_use]
    pub const fn new(tile_type: TileType, walls: WallMask) -> Self {
        Self { tile_type, walls }
    }

    /// Kind of content on the tile.
    #[must_use]
    pub const fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Walls attached to the tile.
    #[must_use]
    pub const fn walls(&self) -> WallMask {
        self.walls
    }

    /// Copy of the tile with a different type.
    #[must_use]
    pub const fn with_type(self, tile_type: TileType) -> Self {
        Self { tile_type, ..self }
    }

    /// Copy of the tile with a different wall mask.
    #[must_use]
    pub const fn with_walls(self, walls: WallMask) -> Self {
        Self { walls, ..self }
    }
}

/// Editing modes that decide how painting interprets the brush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Paint floor-level tile types.
    #[default]
    Floor,
    /// Add or clear walls without touching the tile type.
    Walls,
    /// Place objects such as the marble and the goal.
    Objects,
    /// Reset cells to empty tiles without walls.
    Erase,
}

impl EditMode {
    /// Every edit mode in the order they are offered to the user.
    pub const ALL: [Self; 4] = [Self::Floor, Self::Walls, Self::Objects, Self::Erase];

    /// Human readable name of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Floor => "Floor",
            Self::Walls => "Walls",
            Self::Objects => "Objects",
            Self::Erase => "Erase",
        }
    }
}

/// Tile type and wall mask currently applied by painting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Brush {
    /// Tile type written in floor and object modes.
    pub tile_type: TileType,
    /// Walls merged into cells in wall mode.
    pub walls: WallMask,
}

impl Brush {
    /// Creates a new brush with explicit field values.
    #[must_use]
    pub const fn new(tile_type: TileType, walls: WallMask) -> Self {
        Self { tile_type, walls }
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Number of rows and columns in a level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// Dimensions used by the editor unless configured otherwise.
    pub const DEFAULT: Self = Self {
        rows: 8,
        columns: 8,
    };

    /// Creates a dimension descriptor. Returns `None` if either side is zero.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Option<Self> {
        if rows == 0 || columns == 0 {
            None
        } else {
            Some(Self { rows, columns })
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Row-major index of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Failures raised by grid addressing and reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The requested cell lies outside the grid bounds.
    #[error("cell {cell} lies outside the {dimensions} grid")]
    OutOfRange {
        /// Cell that was requested.
        cell: CellCoord,
        /// Dimensions of the grid that rejected the request.
        dimensions: GridDimensions,
    },
    /// A flat tile sequence does not match the grid's cell count.
    #[error("expected {expected} tiles but received {actual}")]
    ShapeMismatch {
        /// Number of tiles required to fill the grid.
        expected: usize,
        /// Number of tiles that were provided.
        actual: usize,
    },
}

/// Result of a load performed by the persistence gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document was read and decoded.
    Loaded {
        /// Name of the document as presented to the user.
        display_name: String,
        /// Tiles in row-major order.
        tiles: Vec<Tile>,
    },
    /// The document could not be read or decoded.
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

/// Result of a save performed by the persistence gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The level was written completely.
    Saved {
        /// Name of the document as presented to the user.
        display_name: String,
    },
    /// The level could not be written.
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

/// Summary of the most recent finished load or save, kept for presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferReport {
    /// A level was loaded from the named document.
    Loaded {
        /// Name of the document that was read.
        display_name: String,
    },
    /// A load failed and the grid was left untouched.
    LoadFailed,
    /// The level was saved to the named document.
    Saved {
        /// Name of the document that was written.
        display_name: String,
    },
    /// A save failed.
    SaveFailed,
}

impl TransferReport {
    /// Short message suitable for a toast or status line.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Loaded { display_name } => format!("Level loaded from: {display_name}"),
            Self::LoadFailed => "Failed to load level!".to_owned(),
            Self::Saved { display_name } => format!("Level saved to: {display_name}"),
            Self::SaveFailed => "Failed to save level!".to_owned(),
        }
    }
}

/// Reasons a paint request may leave the grid untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaintRejection {
    /// A load or save is in flight.
    Loading,
    /// The cell was already painted during the current stroke.
    AlreadyPainted,
    /// The cell lies outside the grid.
    OutOfRange,
}

/// Reasons a load, save or level reset request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferRejection {
    /// Another load or save is still in flight.
    Busy,
    /// A completion arrived without a matching begin.
    NotInProgress,
}

/// Commands that express all permissible edit session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a new stroke, forgetting which cells the previous one touched.
    BeginStroke,
    /// Applies the brush to a single cell.
    PaintCell {
        /// Cell under the pointer.
        cell: CellCoord,
    },
    /// Finishes the current stroke.
    EndStroke,
    /// Abandons the current stroke. Painted cells keep their new contents.
    CancelStroke,
    /// Switches the active edit mode.
    SelectEditMode {
        /// Mode to activate.
        mode: EditMode,
    },
    /// Chooses the tile type applied by the brush.
    SelectTileType {
        /// Tile type to paint with.
        tile_type: TileType,
    },
    /// Chooses the walls applied by the brush.
    SelectWallMask {
        /// Walls to paint with.
        mask: WallMask,
    },
    /// Replaces the grid with a fresh default level.
    NewLevel,
    /// Marks a load as in flight.
    BeginLoad,
    /// Finishes the in-flight load with the gateway's result.
    CompleteLoad {
        /// Result reported by the gateway.
        outcome: LoadOutcome,
    },
    /// Marks a save as in flight and captures the tiles to write.
    BeginSave,
    /// Finishes the in-flight save with the gateway's result.
    CompleteSave {
        /// Result reported by the gateway.
        outcome: SaveOutcome,
    },
}

/// Events broadcast by the edit session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new stroke began.
    StrokeStarted,
    /// A cell received new contents.
    CellPainted {
        /// Cell that changed.
        cell: CellCoord,
        /// Contents before painting.
        before: Tile,
        /// Contents after painting.
        after: Tile,
    },
    /// A paint request was ignored.
    PaintRejected {
        /// Cell named by the request.
        cell: CellCoord,
        /// Why the request was ignored.
        reason: PaintRejection,
    },
    /// The current stroke finished.
    StrokeEnded,
    /// The current stroke was cancelled.
    StrokeCancelled,
    /// The edit mode changed.
    EditModeChanged {
        /// Mode that became active.
        mode: EditMode,
    },
    /// The brush changed.
    BrushChanged {
        /// Brush that became active.
        brush: Brush,
    },
    /// The grid was replaced with a default level.
    LevelReset,
    /// A request to reset the level was refused.
    LevelResetRejected {
        /// Why the reset was refused.
        reason: TransferRejection,
    },
    /// A load began; painting is suspended until it completes.
    LoadStarted,
    /// The grid was replaced by a loaded level.
    LevelLoaded {
        /// Name of the document that was read.
        display_name: String,
    },
    /// A load failed and the grid was left untouched.
    LoadFailed {
        /// Description of the failure.
        reason: String,
    },
    /// A save began; the captured tiles should be handed to the gateway.
    SaveStarted {
        /// Tiles to persist in row-major order.
        tiles: Vec<Tile>,
    },
    /// The level was written.
    LevelSaved {
        /// Name of the document that was written.
        display_name: String,
    },
    /// The level could not be written.
    SaveFailed {
        /// Description of the failure.
        reason: String,
    },
    /// A load or save request was refused.
    TransferRejected {
        /// Why the request was refused.
        reason: TransferRejection,
    },
}
