//! Headless editor loop that feeds scripted operations through the systems.

use std::{mem, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Result};
use marble_lab_core::{
    CellCoord, Command, EditMode, Event, GridDimensions, PaintRejection, TransferReport,
};
use marble_lab_persistence::{dispatch, FileDocuments, JsonLevelGateway, JsonStyle};
use marble_lab_system_palette::Palette;
use marble_lab_system_stroke::{PointerPhase, StrokeInput, StrokeSystem};
use marble_lab_world::{query, EditSession, SessionSnapshot, SharedSession};

use crate::script::Operation;

type FileGateway = JsonLevelGateway<FileDocuments>;

/// Drives one edit session the way an interactive front end would.
pub(crate) struct Editor {
    session: SharedSession,
    gateway: Arc<FileGateway>,
    stroke: StrokeSystem,
    palette: Palette,
    stroke_backlog: Vec<Event>,
    palette_backlog: Vec<Event>,
    painted: usize,
}

impl Editor {
    /// Creates an editor with a blank level of the given size.
    pub(crate) fn new(dimensions: GridDimensions, style: JsonStyle) -> Self {
        Self {
            session: SharedSession::new(EditSession::new(dimensions)),
            gateway: Arc::new(JsonLevelGateway::new(FileDocuments, style)),
            stroke: StrokeSystem::new(),
            palette: Palette::new(),
            stroke_backlog: Vec::new(),
            palette_backlog: Vec::new(),
            painted: 0,
        }
    }

    /// Number of cells that received new contents so far.
    pub(crate) fn painted_cells(&self) -> usize {
        self.painted
    }

    /// Current state of the session.
    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Applies a single scripted operation.
    ///
    /// Painting outside the grid aborts the operation with an error.
    pub(crate) fn run(&mut self, operation: &Operation) -> Result<()> {
        match operation {
            Operation::Mode(mode) => self.submit(vec![Command::SelectEditMode { mode: *mode }])?,
            Operation::Pick(option) => {
                let events = mem::take(&mut self.palette_backlog);
                let mut commands = Vec::new();
                self.palette.handle(&events, Some(*option), &mut commands);
                if commands.is_empty() {
                    bail!(
                        "'{}' is not offered in {} mode",
                        option.label(),
                        self.palette.mode().name()
                    );
                }
                self.submit(commands)?;
            }
            Operation::Stroke(cells) => {
                let Some((first, rest)) = cells.split_first() else {
                    return Ok(());
                };
                let painted = self.drag(*first, rest);
                let finish = if painted.is_ok() {
                    PointerPhase::Release
                } else {
                    PointerPhase::Cancel
                };
                self.pointer(StrokeInput::new(finish, None))?;
                painted?;
            }
            Operation::NewLevel => self.submit(vec![Command::NewLevel])?,
        }
        Ok(())
    }

    /// Loads a level from disk, replacing the current grid.
    pub(crate) fn load(&mut self, path: PathBuf) -> Result<TransferReport> {
        let handle = dispatch::spawn_load(self.session.clone(), Arc::clone(&self.gateway), path);
        let events = handle
            .join()
            .map_err(|_| anyhow!("load worker panicked"))?;
        self.record(events.clone());
        finish_transfer(&self.session, &events)
    }

    /// Saves the current level to disk.
    pub(crate) fn save(&mut self, path: PathBuf) -> Result<TransferReport> {
        let handle = dispatch::spawn_save(self.session.clone(), Arc::clone(&self.gateway), path);
        let events = handle
            .join()
            .map_err(|_| anyhow!("save worker panicked"))?;
        self.record(events.clone());
        finish_transfer(&self.session, &events)
    }

    fn drag(&mut self, first: CellCoord, rest: &[CellCoord]) -> Result<()> {
        self.pointer(StrokeInput::new(PointerPhase::Press, Some(first)))?;
        for cell in rest {
            self.pointer(StrokeInput::new(PointerPhase::Drag, Some(*cell)))?;
        }
        Ok(())
    }

    fn pointer(&mut self, input: StrokeInput) -> Result<()> {
        let events = mem::take(&mut self.stroke_backlog);
        let mut commands = Vec::new();
        self.stroke.handle(&events, input, &mut commands);
        self.submit(commands)
    }

    fn submit(&mut self, commands: Vec<Command>) -> Result<()> {
        let events = self.session.apply_all(commands);
        let mut outside = None;
        for event in &events {
            match event {
                Event::CellPainted { .. } => self.painted += 1,
                Event::PaintRejected {
                    cell,
                    reason: PaintRejection::OutOfRange,
                } => outside = Some(*cell),
                Event::PaintRejected { cell, reason } => {
                    log::warn!("paint at {cell} skipped: {reason:?}");
                }
                Event::EditModeChanged { mode } if *mode == EditMode::Erase => {
                    log::debug!("erase mode selected; brush switched to empty tiles");
                }
                _ => {}
            }
        }
        self.record(events);

        match outside {
            Some(cell) => bail!(
                "cell {cell} is outside the {} grid",
                self.session.read(query::dimensions)
            ),
            None => Ok(()),
        }
    }

    fn record(&mut self, events: Vec<Event>) {
        self.palette_backlog.extend(events.iter().cloned());
        self.stroke_backlog.extend(events);
    }
}

fn finish_transfer(session: &SharedSession, events: &[Event]) -> Result<TransferReport> {
    let failure = events.iter().find_map(|event| match event {
        Event::LoadFailed { reason } | Event::SaveFailed { reason } => Some(reason.clone()),
        Event::TransferRejected { reason } => Some(format!("{reason:?}")),
        _ => None,
    });

    let report = session.read(|session| query::last_transfer(session).cloned());
    match (failure, report) {
        (None, Some(report)) => Ok(report),
        (Some(reason), report) => {
            let message = report.map_or_else(|| "Transfer refused".to_owned(), |r| r.message());
            bail!("{message} ({reason})")
        }
        (None, None) => bail!("transfer finished without a report"),
    }
}
