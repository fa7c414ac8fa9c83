//! Cell matrix holding terrain occupancy and the tower registry.

use argent_core::{CellCoord, GridConfig, PlacementError, TowerId, TowerKind};
use glam::Vec2;

use crate::{
    navigation,
    towers::{TowerRegistry, TowerState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TerrainState {
    Empty,
    Occupied,
}

/// Playing field: terrain, bands and the towers standing on it.
#[derive(Debug)]
pub(crate) struct Grid {
    config: GridConfig,
    terrain: Vec<TerrainState>,
    towers: TowerRegistry,
}

impl Grid {
    pub(crate) fn new(config: GridConfig) -> Self {
        let capacity_u64 = u64::from(config.columns) * u64::from(config.rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            config,
            terrain: vec![TerrainState::Empty; capacity],
            towers: TowerRegistry::new(),
        }
    }

    pub(crate) fn config(&self) -> &GridConfig {
        &self.config
    }

    pub(crate) fn columns(&self) -> u32 {
        self.config.columns
    }

    pub(crate) fn rows(&self) -> u32 {
        self.config.rows
    }

    pub(crate) fn cell_length(&self) -> f32 {
        self.config.cell_length
    }

    pub(crate) fn towers(&self) -> &TowerRegistry {
        &self.towers
    }

    pub(crate) fn towers_mut(&mut self) -> &mut TowerRegistry {
        &mut self.towers
    }

    pub(crate) fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.config.columns && cell.row() < self.config.rows
    }

    pub(crate) fn is_entrance(&self, cell: CellCoord) -> bool {
        cell.column() == 0 && self.config.entrance.contains(cell.row()) && self.in_bounds(cell)
    }

    pub(crate) fn is_exit(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell)
            && cell.column() + 1 == self.config.columns
            && self.config.exit.contains(cell.row())
    }

    /// Entrance cells that lie inside the grid.
    pub(crate) fn entrance_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.config
            .entrance
            .rows()
            .map(|row| CellCoord::new(0, row))
            .filter(|cell| self.in_bounds(*cell))
    }

    /// Exit cells that lie inside the grid.
    pub(crate) fn exit_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let column = self.config.columns.saturating_sub(1);
        self.config
            .exit
            .rows()
            .map(move |row| CellCoord::new(column, row))
            .filter(|cell| self.in_bounds(*cell))
    }

    /// Reports whether ground units cannot enter the cell.
    pub(crate) fn is_blocked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.terrain.get(index))
            .map_or(true, |state| *state == TerrainState::Occupied)
    }

    /// Reports whether the cell lies on the entrance or exit column. Both
    /// columns stay free of towers on every row.
    fn in_reserved_column(&self, cell: CellCoord) -> bool {
        cell.column() == 0 || cell.column() + 1 == self.config.columns
    }

    /// Local placement rules: bounds, reserved columns and occupancy.
    pub(crate) fn can_place(&self, cell: CellCoord) -> Result<(), PlacementError> {
        if !self.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if self.in_reserved_column(cell) {
            return Err(PlacementError::ReservedBand);
        }

        if self.is_blocked(cell) {
            return Err(PlacementError::Occupied);
        }

        Ok(())
    }

    /// Occupies the cell and registers a tower, unless doing so would leave
    /// an entrance cell without a ground route to the exit.
    pub(crate) fn place(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        self.can_place(cell)?;

        self.set_terrain(cell, TerrainState::Occupied);
        if !navigation::ground_route_exists(self) {
            self.set_terrain(cell, TerrainState::Empty);
            return Err(PlacementError::WouldSeverPath);
        }

        Ok(self.towers.insert(kind, cell))
    }

    /// Clears the cell and deregisters the tower standing on it.
    pub(crate) fn remove(&mut self, cell: CellCoord) -> Option<TowerState> {
        let id = self.towers.at(cell)?;
        self.set_terrain(cell, TerrainState::Empty);
        self.towers.remove(id)
    }

    /// Centre of the cell in world units.
    pub(crate) fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let length = self.config.cell_length;
        Vec2::new(
            (cell.column() as f32 + 0.5) * length,
            (cell.row() as f32 + 0.5) * length,
        )
    }

    /// Cell containing the position, clamped to the grid.
    pub(crate) fn cell_at(&self, position: Vec2) -> CellCoord {
        let length = self.config.cell_length;
        let clamp = |value: f32, count: u32| -> u32 {
            if length <= 0.0 || count == 0 {
                return 0;
            }
            let index = (value / length).floor().max(0.0) as u32;
            index.min(count - 1)
        };
        CellCoord::new(
            clamp(position.x, self.config.columns),
            clamp(position.y, self.config.rows),
        )
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.config.columns).ok()?;
        Some(row * width + column)
    }

    fn set_terrain(&mut self, cell: CellCoord, state: TerrainState) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.terrain.get_mut(index) {
                *slot = state;
            }
        }
    }
}
