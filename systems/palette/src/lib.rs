#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure palette system describing which brushes each edit mode offers.

use std::borrow::Cow;

use marble_lab_core::{Brush, Command, EditMode, Event, TileType, WallMask};

/// Tile types offered in floor mode.
const FLOOR_TILES: [TileType; 2] = [TileType::Floor, TileType::Hole];
/// Tile types offered in object mode.
const OBJECT_TILES: [TileType; 2] = [TileType::Marble, TileType::Goal];
/// Wall masks offered in wall mode, in display order.
const WALL_MASKS: [WallMask; 6] = [
    WallMask::UP,
    WallMask::RIGHT,
    WallMask::DOWN,
    WallMask::LEFT,
    WallMask::ALL,
    WallMask::NONE,
];

/// Single selectable entry of the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteOption {
    /// Paint with the given tile type.
    Tile(TileType),
    /// Paint with the given walls.
    Walls(WallMask),
}

impl PaletteOption {
    /// Label shown next to the option.
    ///
    /// Masks combining several sides, which the palette never offers, are
    /// described side by side, e.g. `up+left`.
    #[must_use]
    pub fn label(self) -> Cow<'static, str> {
        match self {
            Self::Tile(tile_type) => Cow::Borrowed(tile_type.name()),
            Self::Walls(mask) => wall_label(mask),
        }
    }

    /// Reports whether the option matches the brush.
    #[must_use]
    pub fn is_selected(self, brush: Brush) -> bool {
        match self {
            Self::Tile(tile_type) => brush.tile_type == tile_type,
            Self::Walls(mask) => brush.walls == mask,
        }
    }

    fn command(self) -> Command {
        match self {
            Self::Tile(tile_type) => Command::SelectTileType { tile_type },
            Self::Walls(mask) => Command::SelectWallMask { mask },
        }
    }
}

fn wall_label(mask: WallMask) -> Cow<'static, str> {
    match mask {
        WallMask::NONE => Cow::Borrowed("None"),
        WallMask::UP => Cow::Borrowed("Up"),
        WallMask::RIGHT => Cow::Borrowed("Right"),
        WallMask::DOWN => Cow::Borrowed("Down"),
        WallMask::LEFT => Cow::Borrowed("Left"),
        WallMask::ALL => Cow::Borrowed("All"),
        other => Cow::Owned(other.to_string()),
    }
}

/// Palette system that validates brush picks against the active edit mode.
#[derive(Debug, Clone)]
pub struct Palette {
    mode: EditMode,
    transfer_in_flight: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Creates a palette tracking the default edit mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: EditMode::Floor,
            transfer_in_flight: false,
        }
    }

    /// Options offered for the provided mode. Erase mode offers none.
    #[must_use]
    pub fn options(mode: EditMode) -> Vec<PaletteOption> {
        match mode {
            EditMode::Floor => FLOOR_TILES.into_iter().map(PaletteOption::Tile).collect(),
            EditMode::Objects => OBJECT_TILES.into_iter().map(PaletteOption::Tile).collect(),
            EditMode::Walls => WALL_MASKS.into_iter().map(PaletteOption::Walls).collect(),
            EditMode::Erase => Vec::new(),
        }
    }

    /// Edit mode the palette last observed.
    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    /// Consumes session events and an optional pick, emitting a selection command.
    ///
    /// Picks that the current mode does not offer, or that arrive while a
    /// load or save is in flight, are dropped.
    pub fn handle(&mut self, events: &[Event], pick: Option<PaletteOption>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::EditModeChanged { mode } => self.mode = *mode,
                Event::LoadStarted | Event::SaveStarted { .. } => self.transfer_in_flight = true,
                Event::LevelLoaded { .. }
                | Event::LoadFailed { .. }
                | Event::LevelSaved { .. }
                | Event::SaveFailed { .. } => self.transfer_in_flight = false,
                _ => {}
            }
        }

        if self.transfer_in_flight {
            return;
        }

        if let Some(pick) = pick {
            if Self::options(self.mode).contains(&pick) {
                out.push(pick.command());
            }
        }
    }
}
