#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure stroke system that turns pointer gestures over the grid into paint commands.

use marble_lab_core::{CellCoord, Command, Event};

/// Stage of a pointer gesture reported by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// The pointer went down; a tap or drag begins.
    Press,
    /// The pointer moved while held down.
    Drag,
    /// The pointer was lifted.
    Release,
    /// The platform aborted the gesture.
    Cancel,
}

/// Input snapshot distilled from adapter-provided pointer data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeInput {
    /// Stage of the gesture.
    pub phase: PointerPhase,
    /// Grid cell under the pointer, if the pointer is over the grid.
    pub cell: Option<CellCoord>,
}

impl StrokeInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(phase: PointerPhase, cell: Option<CellCoord>) -> Self {
        Self { phase, cell }
    }
}

/// Stroke system that translates pointer input into stroke commands.
///
/// Cells are deduplicated by the session itself, so drags may report the
/// same cell repeatedly. While a load or save is in flight the system stops
/// emitting paint commands, mirroring a disabled editing surface.
#[derive(Debug, Clone, Default)]
pub struct StrokeSystem {
    transfer_in_flight: bool,
    pressed: bool,
}

impl StrokeSystem {
    /// Creates a new stroke system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transfer_in_flight: false,
            pressed: false,
        }
    }

    /// Reports whether the system considers the pointer held down.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Consumes session events and pointer input to emit stroke commands.
    pub fn handle(&mut self, events: &[Event], input: StrokeInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LoadStarted | Event::SaveStarted { .. } => self.transfer_in_flight = true,
                Event::LevelLoaded { .. }
                | Event::LoadFailed { .. }
                | Event::LevelSaved { .. }
                | Event::SaveFailed { .. } => self.transfer_in_flight = false,
                _ => {}
            }
        }

        match input.phase {
            PointerPhase::Press => {
                self.pressed = true;
                out.push(Command::BeginStroke);
                self.paint(input.cell, out);
            }
            PointerPhase::Drag => {
                if self.pressed {
                    self.paint(input.cell, out);
                }
            }
            PointerPhase::Release => {
                if self.pressed {
                    self.pressed = false;
                    out.push(Command::EndStroke);
                }
            }
            PointerPhase::Cancel => {
                if self.pressed {
                    self.pressed = false;
                    out.push(Command::CancelStroke);
                }
            }
        }
    }

    fn paint(&self, cell: Option<CellCoord>, out: &mut Vec<Command>) {
        if self.transfer_in_flight {
            return;
        }
        if let Some(cell) = cell {
            out.push(Command::PaintCell { cell });
        }
    }
}
