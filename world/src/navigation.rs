//! Breadth-first route planning over the grid.

use std::collections::VecDeque;

use argent_core::CellCoord;

use crate::grid::Grid;

/// Ground distances to the exit band, built by a reverse breadth-first search
/// seeded from every exit cell.
///
/// Distances default to `u16::MAX` for unreachable cells so callers can
/// distinguish sealed pockets from traversable tiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct ExitField {
    width: u32,
    height: u32,
    distances: Vec<u16>,
}

impl ExitField {
    /// Builds the field for the grid's current terrain.
    pub(crate) fn from_grid(grid: &Grid) -> Self {
        let mut field = Self::default();
        let exits: Vec<CellCoord> = grid.exit_cells().collect();
        field.rebuild_with(grid.columns(), grid.rows(), &exits, |cell| {
            grid.is_blocked(cell)
        });
        field
    }

    fn rebuild_with<F>(&mut self, width: u32, height: u32, exits: &[CellCoord], mut is_blocked: F)
    where
        F: FnMut(CellCoord) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;
        self.distances.clear();
        self.distances.resize(cell_count, u16::MAX);

        if cell_count == 0 {
            return;
        }

        let mut queue = VecDeque::new();

        for &exit in exits {
            if exit.column() >= width || exit.row() >= height || is_blocked(exit) {
                continue;
            }

            if let Some(index) = index(width_usize, exit) {
                if self.distances[index] == 0 {
                    continue;
                }

                self.distances[index] = 0;
                queue.push_back(exit);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(width_usize, cell) else {
                continue;
            };
            let current_distance = self.distances[current_index];

            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }

            let next_distance = current_distance + 1;

            for neighbor in neighbors(cell, width, height) {
                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(width_usize, neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Ground distance from the cell to the nearest exit cell, if reachable.
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u16> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        index(width, cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != u16::MAX)
    }
}

/// Reports whether every entrance cell has a ground route to the exit band.
pub(crate) fn ground_route_exists(grid: &Grid) -> bool {
    let field = ExitField::from_grid(grid);
    grid.entrance_cells()
        .all(|cell| field.distance(cell).is_some())
}

/// Shortest route from `start` to the exit band.
///
/// The returned waypoints exclude `start` and end on an exit cell. Neighbours
/// expand east, south, north, west, which fixes the choice among equally
/// short routes. Flying units may cross occupied cells, but only on steps
/// that land east of the column they started in.
pub(crate) fn find_route(grid: &Grid, start: CellCoord, flies: bool) -> Option<Vec<CellCoord>> {
    let width = grid.columns();
    let height = grid.rows();
    let width_usize = usize::try_from(width).ok()?;
    let cell_count = width_usize.checked_mul(usize::try_from(height).ok()?)?;
    let start_index = grid.index(start)?;

    let mut parents: Vec<Option<usize>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    visited[start_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let Some(current_index) = index(width_usize, cell) else {
            continue;
        };

        if grid.is_exit(cell) {
            return Some(reconstruct(&parents, width_usize, current_index, start_index));
        }

        for neighbor in neighbors(cell, width, height) {
            let Some(neighbor_index) = index(width_usize, neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            let passable =
                !grid.is_blocked(neighbor) || (flies && neighbor.column() > start.column());
            if !passable {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(current_index);
            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct(
    parents: &[Option<usize>],
    width: usize,
    goal: usize,
    start: usize,
) -> Vec<CellCoord> {
    let mut route = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        route.push(cell_at(width, cursor));
        match parents.get(cursor).copied().flatten() {
            Some(parent) => cursor = parent,
            None => break,
        }
    }
    route.reverse();
    route
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> CellCoord {
    let column = u32::try_from(index % width.max(1)).unwrap_or(u32::MAX);
    let row = u32::try_from(index / width.max(1)).unwrap_or(u32::MAX);
    CellCoord::new(column, row)
}
