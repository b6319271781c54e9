//! JSON encoding of level documents.
//!
//! A level is stored as a flat JSON array of tiles in row-major order, e.g.
//! `[{"type":"Floor","walls":0},{"type":"Hole","walls":5}, ...]`.

use std::io::Read;

use marble_lab_core::Tile;

/// Layout of the emitted JSON text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// Single line without insignificant whitespace.
    #[default]
    Compact,
    /// Indented, one field per line.
    Pretty,
}

/// Encodes tiles into a JSON document.
pub fn encode_tiles(tiles: &[Tile], style: JsonStyle) -> Result<Vec<u8>, serde_json::Error> {
    match style {
        JsonStyle::Compact => serde_json::to_vec(tiles),
        JsonStyle::Pretty => serde_json::to_vec_pretty(tiles),
    }
}

/// Decodes tiles from an in-memory JSON document.
pub fn decode_tiles(bytes: &[u8]) -> Result<Vec<Tile>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Decodes tiles from a JSON stream.
pub fn read_tiles(reader: impl Read) -> Result<Vec<Tile>, serde_json::Error> {
    serde_json::from_reader(reader)
}
