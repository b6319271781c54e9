use marble_lab_core::{Tile, TileType, WallMask};
use marble_lab_world::Grid;

fn glyph(tile_type: TileType) -> char {
    match tile_type {
        TileType::Empty => ' ',
        TileType::Floor => '.',
        TileType::Marble => 'o',
        TileType::Goal => '*',
        TileType::Hole => 'x',
    }
}

/// Renders the grid as text, three lines and three columns per tile.
///
/// Walls are drawn on the tile edges: `-` above and below, `|` left and right.
pub(crate) fn render(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        out.push_str(&edge_line(row, WallMask::UP));
        for tile in row {
            out.push(if tile.walls().has(WallMask::LEFT) { '|' } else { ' ' });
            out.push(glyph(tile.tile_type()));
            out.push(if tile.walls().has(WallMask::RIGHT) { '|' } else { ' ' });
        }
        out.push('\n');
        out.push_str(&edge_line(row, WallMask::DOWN));
    }
    out
}

fn edge_line(row: &[Tile], side: WallMask) -> String {
    let mut line: String = row
        .iter()
        .map(|tile| if tile.walls().has(side) { " - " } else { "   " })
        .collect();
    let trimmed = line.trim_end().len();
    line.truncate(trimmed);
    line.push('\n');
    line
}
