//! Parser for scripted edit operations.
//!
//! Scripts hold one operation per line; `#` starts a comment:
//!
//! ```text
//! mode walls
//! walls up
//! stroke 0,0 0,1 0,2
//! mode floor
//! tile hole
//! paint 3 4
//! ```

use marble_lab_core::{CellCoord, EditMode, TileType, WallMask};
use marble_lab_system_palette::PaletteOption;

/// Single edit operation read from a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    /// Switch the edit mode.
    Mode(EditMode),
    /// Pick a brush from the palette.
    Pick(PaletteOption),
    /// Press on the first cell, drag across the rest and release.
    Stroke(Vec<CellCoord>),
    /// Start over from a blank level.
    NewLevel,
}

/// Failures raised while parsing a script.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ScriptError {
    /// The operation keyword is not known.
    #[error("line {line}: unknown operation '{keyword}'")]
    UnknownOperation { line: usize, keyword: String },
    /// An argument could not be understood.
    #[error("line {line}: invalid {what} '{value}'")]
    InvalidArgument {
        line: usize,
        what: &'static str,
        value: String,
    },
    /// The operation received the wrong number of arguments.
    #[error("line {line}: '{keyword}' expects {expected}")]
    WrongArity {
        line: usize,
        keyword: String,
        expected: &'static str,
    },
}

/// Parses a whole script, numbering lines from one.
pub(crate) fn parse_script(text: &str) -> Result<Vec<Operation>, ScriptError> {
    let mut operations = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(operation) = parse_line(line, index + 1)? {
            operations.push(operation);
        }
    }
    Ok(operations)
}

/// Parses a single line. Blank lines and comments yield `None`.
pub(crate) fn parse_line(line: &str, number: usize) -> Result<Option<Operation>, ScriptError> {
    let content = line.split('#').next().unwrap_or_default().trim();
    let mut words = content.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let keyword = keyword.to_ascii_lowercase();

    let arity = |expected: &'static str| ScriptError::WrongArity {
        line: number,
        keyword: keyword.clone(),
        expected,
    };
    let single = |expected: &'static str| match args.as_slice() {
        [value] => Ok(*value),
        _ => Err(arity(expected)),
    };

    let operation = match keyword.as_str() {
        "mode" => Operation::Mode(parse_mode(single("one edit mode")?, number)?),
        "tile" => Operation::Pick(PaletteOption::Tile(parse_tile_type(
            single("one tile type")?,
            number,
        )?)),
        "walls" => Operation::Pick(PaletteOption::Walls(parse_walls(
            single("one wall side")?,
            number,
        )?)),
        "paint" => match args.as_slice() {
            [row, column] => Operation::Stroke(vec![CellCoord::new(
                parse_index(row, "row", number)?,
                parse_index(column, "column", number)?,
            )]),
            _ => return Err(arity("a row and a column")),
        },
        "stroke" => {
            if args.is_empty() {
                return Err(arity("at least one row,column pair"));
            }
            let cells = args
                .iter()
                .map(|pair| parse_cell(pair, number))
                .collect::<Result<Vec<_>, _>>()?;
            Operation::Stroke(cells)
        }
        "new" => {
            if !args.is_empty() {
                return Err(arity("no arguments"));
            }
            Operation::NewLevel
        }
        _ => {
            return Err(ScriptError::UnknownOperation {
                line: number,
                keyword: keyword.clone(),
            })
        }
    };
    Ok(Some(operation))
}

fn invalid(line: usize, what: &'static str, value: &str) -> ScriptError {
    ScriptError::InvalidArgument {
        line,
        what,
        value: value.to_owned(),
    }
}

fn parse_mode(value: &str, line: usize) -> Result<EditMode, ScriptError> {
    EditMode::ALL
        .into_iter()
        .find(|mode| mode.name().eq_ignore_ascii_case(value))
        .ok_or_else(|| invalid(line, "edit mode", value))
}

fn parse_tile_type(value: &str, line: usize) -> Result<TileType, ScriptError> {
    TileType::ALL
        .into_iter()
        .find(|tile_type| tile_type.name().eq_ignore_ascii_case(value))
        .ok_or_else(|| invalid(line, "tile type", value))
}

fn parse_walls(value: &str, line: usize) -> Result<WallMask, ScriptError> {
    match value.to_ascii_lowercase().as_str() {
        "up" => Ok(WallMask::UP),
        "right" => Ok(WallMask::RIGHT),
        "down" => Ok(WallMask::DOWN),
        "left" => Ok(WallMask::LEFT),
        "all" => Ok(WallMask::ALL),
        "none" => Ok(WallMask::NONE),
        _ => Err(invalid(line, "wall side", value)),
    }
}

fn parse_index(value: &str, what: &'static str, line: usize) -> Result<u32, ScriptError> {
    value.parse().map_err(|_| invalid(line, what, value))
}

fn parse_cell(pair: &str, line: usize) -> Result<CellCoord, ScriptError> {
    let (row, column) = pair
        .split_once(',')
        .ok_or_else(|| invalid(line, "cell", pair))?;
    Ok(CellCoord::new(
        parse_index(row.trim(), "row", line)?,
        parse_index(column.trim(), "column", line)?,
    ))
}
