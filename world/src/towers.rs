//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use argent_core::{CellCoord, TowerId, TowerKind};

/// Ticks a tower keeps flashing after taking damage.
const FLASH_TICKS: u32 = 30;

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell holding the tower.
    pub(crate) cell: CellCoord,
    pub(crate) health: f32,
    pub(crate) flash_ticks: u32,
    /// Tick on which the tower last fired.
    pub(crate) last_fired: Option<u64>,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            health: kind.stats().max_health,
            flash_ticks: 0,
            last_fired: None,
        }
    }

    /// Applies enemy damage, returning whether the tower is destroyed.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.flash_ticks = FLASH_TICKS;
        self.health <= 0.0
    }

    pub(crate) fn decay_flash(&mut self) {
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
    }

    /// Ticks remaining until the tower may fire again at `tick`.
    pub(crate) fn ready_in(&self, tick: u64, ticks_per_second: u32) -> u32 {
        let Some(last) = self.last_fired else {
            return 0;
        };
        let interval = u64::from(self.kind.fire_interval_ticks(ticks_per_second));
        let ready_at = last.saturating_add(interval);
        u32::try_from(ready_at.saturating_sub(tick)).unwrap_or(u32::MAX)
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, kind, cell));
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Tower standing on the provided cell, if any.
    pub(crate) fn at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    pub(crate) fn count_of(&self, kind: TowerKind) -> u32 {
        let count = self
            .entries
            .values()
            .filter(|tower| tower.kind == kind)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Iterates towers in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}
