//! Session configuration shared by every adapter.

use argent_core::{EconomyConfig, GridConfig, RowBand, WorldConfig};
use argent_system_wave_director::WaveTuning;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything required to start a session.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// configuration file only needs to name what it changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Playing field layout.
    pub grid: GridConfig,
    /// Starting lives and resource points.
    pub economy: EconomyConfig,
    /// Simulation ticks per simulated second.
    pub ticks_per_second: u32,
    /// Seed of the default random source.
    pub seed: u64,
    /// Wave pacing.
    pub waves: WaveTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            grid: world.grid,
            economy: world.economy,
            ticks_per_second: world.ticks_per_second,
            seed: 0,
            waves: WaveTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// World parameters derived from the configuration.
    #[must_use]
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            grid: self.grid,
            economy: self.economy,
            ticks_per_second: self.ticks_per_second,
        }
    }

    /// Rejects layouts and pacing the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.columns < 2 || grid.rows == 0 {
            return Err(ConfigError::GridTooSmall {
                columns: grid.columns,
                rows: grid.rows,
            });
        }

        if !grid.cell_length.is_finite() || grid.cell_length <= 0.0 {
            return Err(ConfigError::InvalidCellLength(grid.cell_length));
        }

        validate_band("entrance", grid.entrance, grid.rows)?;
        validate_band("exit", grid.exit, grid.rows)?;

        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        let chance = self.waves.substitution_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::InvalidSubstitutionChance(chance));
        }

        Ok(())
    }
}

fn validate_band(band: &'static str, rows: RowBand, grid_rows: u32) -> Result<(), ConfigError> {
    let end = rows.start().checked_add(rows.len());
    if rows.is_empty() || end.map_or(true, |end| end > grid_rows) {
        return Err(ConfigError::InvalidBand {
            band,
            start: rows.start(),
            len: rows.len(),
        });
    }
    Ok(())
}

/// Reasons a configuration is refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot hold separate entrance and exit columns.
    #[error("grid of {columns}x{rows} cells is too small, at least 2x1 is required")]
    GridTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Cells must have a positive, finite side length.
    #[error("cell length must be positive and finite, got {0}")]
    InvalidCellLength(f32),
    /// A band is empty or reaches past the last row.
    #[error("{band} band of {len} rows starting at row {start} does not fit the grid")]
    InvalidBand {
        /// Which band was rejected.
        band: &'static str,
        /// First row of the band.
        start: u32,
        /// Number of rows in the band.
        len: u32,
    },
    /// The clock must advance.
    #[error("ticks per second must be positive")]
    ZeroTickRate,
    /// Probabilities must lie within `[0, 1]`.
    #[error("substitution chance must lie within [0, 1], got {0}")]
    InvalidSubstitutionChance(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn bands_must_fit_the_grid() {
        let mut config = SimulationConfig::default();
        config.grid.exit = RowBand::new(10, 3);

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBand {
                band: "exit",
                start: 10,
                len: 3,
            })
        );

        config.grid.exit = RowBand::new(4, 0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBand { band: "exit", .. })
        ));
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        let mut config = SimulationConfig::default();
        config.grid.columns = 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall {
                columns: 1,
                rows: 12,
            })
        );

        let mut config = SimulationConfig::default();
        config.grid.cell_length = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCellLength(_))
        ));

        let mut config = SimulationConfig::default();
        config.ticks_per_second = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickRate));
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let error = ConfigError::InvalidBand {
            band: "entrance",
            start: 11,
            len: 2,
        };
        assert_eq!(
            error.to_string(),
            "entrance band of 2 rows starting at row 11 does not fit the grid"
        );
    }
}
