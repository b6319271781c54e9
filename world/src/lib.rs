#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative edit session state for Marble Lab.
//!
//! The [`EditSession`] owns the level grid, the active edit mode, the brush
//! and the bookkeeping for strokes and in-flight file transfers. Every
//! mutation is available both as an inherent method and as a
//! [`Command`] routed through [`apply`], which reports what happened as
//! [`Event`] values.

mod grid;
mod shared;

use std::collections::HashSet;

pub use grid::Grid;
pub use shared::SharedSession;

use marble_lab_core::{
    Brush, CellCoord, Command, EditMode, Event, GridDimensions, GridError, LoadOutcome,
    PaintRejection, SaveOutcome, Tile, TileType, TransferRejection, TransferReport, WallMask,
};

/// Computes the contents of a painted cell.
///
/// Erasing wipes the tile, wall mode merges the brush walls into the
/// existing ones (an empty wall brush clears them instead) and the remaining
/// modes replace the tile type while keeping the walls.
#[must_use]
pub fn paint_tile(current: Tile, mode: EditMode, brush: Brush) -> Tile {
    match mode {
        EditMode::Erase => Tile::new(TileType::Empty, WallMask::NONE),
        EditMode::Walls => {
            if brush.walls.is_empty() {
                current.with_walls(WallMask::NONE)
            } else {
                current.with_walls(current.walls().with(brush.walls))
            }
        }
        EditMode::Floor | EditMode::Objects => current.with_type(brush.tile_type),
    }
}

/// Outcome of a single paint request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintResult {
    /// The cell received new contents.
    Painted {
        /// Contents before painting.
        before: Tile,
        /// Contents after painting.
        after: Tile,
    },
    /// The request was ignored and the grid is unchanged.
    Rejected(PaintRejection),
}

/// Result of a completed load or save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferCompletion {
    /// The transfer finished successfully.
    Succeeded {
        /// Name of the document involved.
        display_name: String,
    },
    /// The transfer failed; the grid is unchanged.
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transfer {
    Load,
    Save,
}

/// Represents the authoritative level editor state.
#[derive(Debug)]
pub struct EditSession {
    grid: Grid,
    edit_mode: EditMode,
    brush: Brush,
    stroke: HashSet<CellCoord>,
    transfer: Option<Transfer>,
    last_transfer: Option<TransferReport>,
}

impl EditSession {
    /// Creates a session with a default level of the provided size.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            grid: Grid::new(dimensions),
            edit_mode: EditMode::default(),
            brush: Brush::default(),
            stroke: HashSet::new(),
            transfer: None,
            last_transfer: None,
        }
    }

    /// Reports whether a load or save is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.transfer.is_some()
    }

    /// Starts a new stroke.
    pub fn begin_stroke(&mut self) {
        self.stroke.clear();
    }

    /// Finishes the current stroke.
    pub fn end_stroke(&mut self) {
        self.stroke.clear();
    }

    /// Abandons the current stroke. Cells already painted keep their contents.
    pub fn cancel_stroke(&mut self) {
        self.stroke.clear();
    }

    /// Applies the brush to a single cell.
    ///
    /// Requests are ignored while a transfer is in flight and for cells the
    /// current stroke already touched. An out-of-range cell is a caller bug
    /// and is reported as an error.
    pub fn paint_cell(&mut self, cell: CellCoord) -> Result<PaintResult, GridError> {
        if self.is_loading() {
            return Ok(PaintResult::Rejected(PaintRejection::Loading));
        }

        let before = self.grid.get(cell)?;
        if !self.stroke.insert(cell) {
            return Ok(PaintResult::Rejected(PaintRejection::AlreadyPainted));
        }

        let after = paint_tile(before, self.edit_mode, self.brush);
        if after != before {
            self.grid.set_in_place(cell, after)?;
        }
        Ok(PaintResult::Painted { before, after })
    }

    /// Activates an edit mode. Entering erase mode switches the brush to empty tiles.
    pub fn select_edit_mode(&mut self, mode: EditMode) {
        self.edit_mode = mode;
        if mode == EditMode::Erase {
            self.brush.tile_type = TileType::Empty;
        }
    }

    /// Chooses the tile type to paint with, dropping any wall selection.
    pub fn select_tile_type(&mut self, tile_type: TileType) {
        self.brush = Brush::new(tile_type, WallMask::NONE);
    }

    /// Chooses the walls to paint with.
    pub fn select_wall_mask(&mut self, mask: WallMask) {
        self.brush.walls = mask;
    }

    /// Replaces the grid with a fresh level of the same size.
    pub fn new_level(&mut self) -> Result<(), TransferRejection> {
        if self.is_loading() {
            return Err(TransferRejection::Busy);
        }
        self.grid = Grid::new(self.grid.dimensions());
        self.stroke.clear();
        Ok(())
    }

    /// Marks a load as in flight, suspending painting until it completes.
    pub fn begin_load(&mut self) -> Result<(), TransferRejection> {
        self.begin_transfer(Transfer::Load)
    }

    /// Finishes the in-flight load.
    ///
    /// On success the grid is swapped for the loaded one in a single step.
    /// A failed read or a tile count that does not match the grid leaves the
    /// grid untouched. The loading flag is cleared either way.
    pub fn complete_load(
        &mut self,
        outcome: LoadOutcome,
    ) -> Result<TransferCompletion, TransferRejection> {
        self.finish_transfer(Transfer::Load)?;

        let completion = match outcome {
            LoadOutcome::Loaded {
                display_name,
                tiles,
            } => match Grid::from_flat_sequence(self.grid.dimensions(), tiles) {
                Ok(grid) => {
                    self.grid = grid;
                    self.stroke.clear();
                    TransferCompletion::Succeeded { display_name }
                }
                Err(error) => TransferCompletion::Failed {
                    reason: format!("{display_name}: {error}"),
                },
            },
            LoadOutcome::Failed { reason } => TransferCompletion::Failed { reason },
        };

        self.last_transfer = Some(match &completion {
            TransferCompletion::Succeeded { display_name } => TransferReport::Loaded {
                display_name: display_name.clone(),
            },
            TransferCompletion::Failed { .. } => TransferReport::LoadFailed,
        });
        Ok(completion)
    }

    /// Marks a save as in flight and returns the tiles to hand to the gateway.
    pub fn begin_save(&mut self) -> Result<Vec<Tile>, TransferRejection> {
        self.begin_transfer(Transfer::Save)?;
        Ok(self.grid.to_flat_sequence())
    }

    /// Finishes the in-flight save. The grid is never modified by saving.
    pub fn complete_save(
        &mut self,
        outcome: SaveOutcome,
    ) -> Result<TransferCompletion, TransferRejection> {
        self.finish_transfer(Transfer::Save)?;

        let (report, completion) = match outcome {
            SaveOutcome::Saved { display_name } => (
                TransferReport::Saved {
                    display_name: display_name.clone(),
                },
                TransferCompletion::Succeeded { display_name },
            ),
            SaveOutcome::Failed { reason } => {
                (TransferReport::SaveFailed, TransferCompletion::Failed { reason })
            }
        };
        self.last_transfer = Some(report);
        Ok(completion)
    }

    fn begin_transfer(&mut self, transfer: Transfer) -> Result<(), TransferRejection> {
        if self.transfer.is_some() {
            return Err(TransferRejection::Busy);
        }
        self.transfer = Some(transfer);
        Ok(())
    }

    fn finish_transfer(&mut self, transfer: Transfer) -> Result<(), TransferRejection> {
        if self.transfer != Some(transfer) {
            return Err(TransferRejection::NotInProgress);
        }
        self.transfer = None;
        Ok(())
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(GridDimensions::DEFAULT)
    }
}

/// Applies the provided command to the session, reporting every change as an event.
pub fn apply(session: &mut EditSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginStroke => {
            session.begin_stroke();
            out_events.push(Event::StrokeStarted);
        }
        Command::PaintCell { cell } => match session.paint_cell(cell) {
            Ok(PaintResult::Painted { before, after }) => {
                log::debug!("painted {cell}: {before:?} -> {after:?}");
                out_events.push(Event::CellPainted {
                    cell,
                    before,
                    after,
                });
            }
            Ok(PaintResult::Rejected(reason)) => {
                log::trace!("paint at {cell} ignored: {reason:?}");
                out_events.push(Event::PaintRejected { cell, reason });
            }
            Err(error) => {
                log::warn!("paint request rejected: {error}");
                out_events.push(Event::PaintRejected {
                    cell,
                    reason: PaintRejection::OutOfRange,
                });
            }
        },
        Command::EndStroke => {
            session.end_stroke();
            out_events.push(Event::StrokeEnded);
        }
        Command::CancelStroke => {
            session.cancel_stroke();
            out_events.push(Event::StrokeCancelled);
        }
        Command::SelectEditMode { mode } => {
            let previous = session.brush;
            session.select_edit_mode(mode);
            log::debug!("edit mode = {}", mode.name());
            out_events.push(Event::EditModeChanged { mode });
            if session.brush != previous {
                out_events.push(Event::BrushChanged {
                    brush: session.brush,
                });
            }
        }
        Command::SelectTileType { tile_type } => {
            session.select_tile_type(tile_type);
            log::debug!("tile type = {tile_type}");
            out_events.push(Event::BrushChanged {
                brush: session.brush,
            });
        }
        Command::SelectWallMask { mask } => {
            session.select_wall_mask(mask);
            log::debug!("wall mask = {mask}");
            out_events.push(Event::BrushChanged {
                brush: session.brush,
            });
        }
        Command::NewLevel => match session.new_level() {
            Ok(()) => {
                log::info!("started a new {} level", session.grid.dimensions());
                out_events.push(Event::LevelReset);
            }
            Err(reason) => {
                log::warn!("new level refused: {reason:?}");
                out_events.push(Event::LevelResetRejected { reason });
            }
        },
        Command::BeginLoad => match session.begin_load() {
            Ok(()) => out_events.push(Event::LoadStarted),
            Err(reason) => reject_transfer(reason, out_events),
        },
        Command::CompleteLoad { outcome } => match session.complete_load(outcome) {
            Ok(TransferCompletion::Succeeded { display_name }) => {
                log::info!("loaded level from {display_name}");
                out_events.push(Event::LevelLoaded { display_name });
            }
            Ok(TransferCompletion::Failed { reason }) => {
                log::error!("load failed: {reason}");
                out_events.push(Event::LoadFailed { reason });
            }
            Err(reason) => reject_transfer(reason, out_events),
        },
        Command::BeginSave => match session.begin_save() {
            Ok(tiles) => out_events.push(Event::SaveStarted { tiles }),
            Err(reason) => reject_transfer(reason, out_events),
        },
        Command::CompleteSave { outcome } => match session.complete_save(outcome) {
            Ok(TransferCompletion::Succeeded { display_name }) => {
                log::info!("saved level as {display_name}");
                out_events.push(Event::LevelSaved { display_name });
            }
            Ok(TransferCompletion::Failed { reason }) => {
                log::error!("save failed: {reason}");
                out_events.push(Event::SaveFailed { reason });
            }
            Err(reason) => reject_transfer(reason, out_events),
        },
    }
}

fn reject_transfer(reason: TransferRejection, out_events: &mut Vec<Event>) {
    log::warn!("transfer request refused: {reason:?}");
    out_events.push(Event::TransferRejected { reason });
}

/// Immutable view of the session state handed to presenters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Level grid at the time of the snapshot.
    pub grid: Grid,
    /// Active edit mode.
    pub edit_mode: EditMode,
    /// Active brush.
    pub brush: Brush,
    /// Whether a load or save was in flight.
    pub is_loading: bool,
    /// Summary of the last finished transfer, if any.
    pub last_transfer: Option<TransferReport>,
}

/// Query functions that provide read-only access to the session.
pub mod query {
    use marble_lab_core::{Brush, CellCoord, EditMode, GridDimensions, GridError, Tile, TransferReport};

    use super::{EditSession, Grid, SessionSnapshot};

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn grid(session: &EditSession) -> &Grid {
        &session.grid
    }

    /// Retrieves the tile stored at the provided cell.
    pub fn tile_at(session: &EditSession, cell: CellCoord) -> Result<Tile, GridError> {
        session.grid.get(cell)
    }

    /// Reports the dimensions of the level grid.
    #[must_use]
    pub fn dimensions(session: &EditSession) -> GridDimensions {
        session.grid.dimensions()
    }

    /// Reports the active edit mode.
    #[must_use]
    pub fn edit_mode(session: &EditSession) -> EditMode {
        session.edit_mode
    }

    /// Reports the active brush.
    #[must_use]
    pub fn brush(session: &EditSession) -> Brush {
        session.brush
    }

    /// Reports whether a load or save is in flight.
    #[must_use]
    pub fn is_loading(session: &EditSession) -> bool {
        session.is_loading()
    }

    /// Summary of the most recent finished load or save.
    #[must_use]
    pub fn last_transfer(session: &EditSession) -> Option<&TransferReport> {
        session.last_transfer.as_ref()
    }

    /// Captures an immutable snapshot of the whole session state.
    #[must_use]
    pub fn snapshot(session: &EditSession) -> SessionSnapshot {
        SessionSnapshot {
            grid: session.grid.clone(),
            edit_mode: session.edit_mode,
            brush: session.brush,
            is_loading: session.is_loading(),
            last_transfer: session.last_transfer.clone(),
        }
    }
}
