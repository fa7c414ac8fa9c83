use std::{fmt, str::FromStr};

use argent_core::{CellCoord, TowerKind};
use thiserror::Error;

/// Separates the tower kind from its cell.
const KIND_DELIMITER: char = '@';
/// Separates the column from the row.
const CELL_DELIMITER: char = ',';

/// Tower requested on the command line as `kind@column,row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerPlacement {
    /// Kind of tower to build.
    pub(crate) kind: TowerKind,
    /// Cell the tower occupies.
    pub(crate) cell: CellCoord,
}

impl fmt::Display for TowerPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{KIND_DELIMITER}{}{CELL_DELIMITER}{}",
            kind_name(self.kind),
            self.cell.column(),
            self.cell.row()
        )
    }
}

impl FromStr for TowerPlacement {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, cell) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or_else(|| LayoutError::MissingCell(trimmed.to_owned()))?;
        let kind = parse_kind(kind)?;

        let (column, row) = cell
            .split_once(CELL_DELIMITER)
            .ok_or_else(|| LayoutError::InvalidCell(cell.to_owned()))?;
        let column = column
            .trim()
            .parse::<u32>()
            .map_err(|_| LayoutError::InvalidCell(cell.to_owned()))?;
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|_| LayoutError::InvalidCell(cell.to_owned()))?;

        Ok(Self {
            kind,
            cell: CellCoord::new(column, row),
        })
    }
}

/// Errors raised while parsing a tower placement argument.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum LayoutError {
    /// The argument did not contain the `@` delimiter.
    #[error("'{0}' is missing a cell, expected kind@column,row")]
    MissingCell(String),
    /// The tower kind was not recognised.
    #[error("unknown tower kind '{0}'")]
    UnknownKind(String),
    /// The cell could not be parsed as `column,row`.
    #[error("could not parse cell '{0}', expected column,row")]
    InvalidCell(String),
}

fn parse_kind(name: &str) -> Result<TowerKind, LayoutError> {
    let name = name.trim();
    TowerKind::ALL
        .into_iter()
        .find(|kind| kind_name(*kind).eq_ignore_ascii_case(name))
        .ok_or_else(|| LayoutError::UnknownKind(name.to_owned()))
}

fn kind_name(kind: TowerKind) -> &'static str {
    match kind {
        TowerKind::Dart => "dart",
        TowerKind::Bullet => "bullet",
        TowerKind::Lightning => "lightning",
        TowerKind::Flame => "flame",
        TowerKind::Freeze => "freeze",
        TowerKind::Fork => "fork",
    }
}
