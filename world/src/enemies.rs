//! Enemy state and the per-tick enemy state machine.

use std::{collections::BTreeMap, f32::consts::TAU};

use argent_core::{AttackProfile, CellCoord, EnemyId, EnemyKind, EnemySnapshot, Event, TowerId};
use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::{grid::Grid, navigation};

/// Enemies in the first columns may neither start nor continue an attack.
const ATTACK_EXCLUSION_COLUMNS: u32 = 4;
/// Radius around the exit cell centre that counts as arrival.
const ARRIVAL_RADIUS: f32 = 5.0;
/// Animation phase advanced per tick of movement.
const WOBBLE_STEP: f32 = 0.05;

/// Towers currently under an engaged attack, keyed by tower.
///
/// A tower appears at most once, which enforces a single attacker per tower.
#[derive(Debug, Default)]
pub(crate) struct AttackLocks {
    holders: BTreeMap<TowerId, EnemyId>,
}

impl AttackLocks {
    fn held_by_other(&self, tower: TowerId, enemy: EnemyId) -> bool {
        self.holders
            .get(&tower)
            .is_some_and(|holder| *holder != enemy)
    }

    /// Records `enemy` as the attacker of `tower`, unless another holds it.
    fn engage(&mut self, tower: TowerId, enemy: EnemyId) -> bool {
        if self.held_by_other(tower, enemy) {
            return false;
        }
        let _ = self.holders.insert(tower, enemy);
        true
    }

    fn release(&mut self, tower: TowerId, enemy: EnemyId) {
        if self.holders.get(&tower) == Some(&enemy) {
            let _ = self.holders.remove(&tower);
        }
    }

    pub(crate) fn release_tower(&mut self, tower: TowerId) {
        let _ = self.holders.remove(&tower);
    }

    pub(crate) fn release_enemy(&mut self, enemy: EnemyId) {
        self.holders.retain(|_, holder| *holder != enemy);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (TowerId, EnemyId)> + '_ {
        self.holders.iter().map(|(tower, enemy)| (*tower, *enemy))
    }
}

/// Everything an enemy may read or mutate while updating.
pub(crate) struct EnemyContext<'a, R: Rng> {
    pub(crate) grid: &'a mut Grid,
    pub(crate) locks: &'a mut AttackLocks,
    pub(crate) rng: &'a mut R,
    pub(crate) events: &'a mut Vec<Event>,
    /// Set when this update destroyed a tower.
    pub(crate) layout_changed: bool,
}

#[derive(Clone, Copy, Debug)]
struct AttackLock {
    tower: TowerId,
    elapsed: u32,
    cooldown: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) appearance: EnemyKind,
    pub(crate) level: u32,
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    max_health: f32,
    path: Vec<CellCoord>,
    path_index: usize,
    path_invalid: bool,
    frozen_ticks: u32,
    attack: Option<AttackLock>,
    wobble_phase: f32,
    lateral_offset: f32,
}

impl Enemy {
    pub(crate) fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        appearance: EnemyKind,
        level: u32,
        position: Vec2,
    ) -> Self {
        let max_health = kind.max_health(level);
        Self {
            id,
            kind,
            appearance,
            level,
            position,
            health: max_health,
            max_health,
            path: Vec::new(),
            path_index: 0,
            path_invalid: true,
            frozen_ticks: 0,
            attack: None,
            wobble_phase: 0.0,
            lateral_offset: 0.0,
        }
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn invalidate_path(&mut self) {
        self.path_invalid = true;
    }

    /// Collision diameter in world units.
    pub(crate) fn size(&self, cell_length: f32) -> f32 {
        self.kind.stats().size_cells * cell_length
    }

    pub(crate) fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    /// Freezes the enemy unless it is already frozen.
    pub(crate) fn freeze(&mut self, ticks: u32) -> bool {
        if self.frozen_ticks > 0 {
            return false;
        }
        self.frozen_ticks = ticks;
        true
    }

    fn is_holding_attack(&self) -> bool {
        self.attack.is_some_and(|lock| lock.elapsed > 0)
    }

    /// Advances the enemy by one tick. Returns `true` exactly when the enemy
    /// reached the exit this tick.
    pub(crate) fn update<R: Rng>(&mut self, ctx: &mut EnemyContext<'_, R>) -> bool {
        if self.frozen_ticks > 0 {
            self.frozen_ticks -= 1;
            return false;
        }

        if self.path_invalid || self.path_index >= self.path.len() {
            let start = ctx.grid.cell_at(self.position);
            let Some(route) = navigation::find_route(ctx.grid, start, self.kind.stats().flies)
            else {
                return false;
            };
            self.path = route;
            self.path_index = 0;
            self.path_invalid = false;
        }

        if !self.is_holding_attack() {
            self.advance_along_path(ctx.grid);
        }

        let cell = ctx.grid.cell_at(self.position);
        if cell.column() < ATTACK_EXCLUSION_COLUMNS {
            self.end_attack(ctx.locks);
            return false;
        }

        if let Some(profile) = self.kind.stats().attack {
            if self.attack.is_none() {
                self.try_acquire(profile, ctx);
            }

            if self.attack.is_some() && self.execute_attack(profile, ctx) {
                return false;
            }
        }

        ctx.grid.is_exit(cell)
            && self.position.distance(ctx.grid.cell_center(cell)) < ARRIVAL_RADIUS
    }

    fn advance_along_path(&mut self, grid: &Grid) {
        let Some(waypoint) = self.path.get(self.path_index).copied() else {
            return;
        };

        let speed = self.kind.stats().speed;
        let target = grid.cell_center(waypoint);
        let delta = target - self.position;
        let distance = delta.length();

        if distance <= speed {
            self.position = target;
            self.path_index += 1;
            return;
        }

        self.position += delta / distance * speed;

        let wobble = self.kind.stats().wobble;
        self.wobble_phase += WOBBLE_STEP;
        if self.wobble_phase > TAU {
            self.wobble_phase -= TAU;
        }
        self.lateral_offset = (self.wobble_phase * wobble.frequency).sin() * wobble.amplitude;
    }

    fn try_acquire<R: Rng>(&mut self, profile: AttackProfile, ctx: &mut EnemyContext<'_, R>) {
        if ctx.rng.gen::<f32>() >= profile.chance {
            return;
        }

        let reach = profile.range_cells * ctx.grid.cell_length();
        let candidates: Vec<TowerId> = ctx
            .grid
            .towers()
            .iter()
            .filter(|tower| {
                self.position.distance(ctx.grid.cell_center(tower.cell)) <= reach
                    && !ctx.locks.held_by_other(tower.id, self.id)
            })
            .map(|tower| tower.id)
            .collect();

        if candidates.is_empty() {
            return;
        }

        let tower = candidates[ctx.rng.gen_range(0..candidates.len())];
        trace!(enemy = self.id.get(), tower = tower.get(), "enemy locked onto tower");
        self.attack = Some(AttackLock {
            tower,
            elapsed: 0,
            cooldown: profile.rate_ticks,
        });
    }

    /// Runs one tick of the current attack. Returns `true` while the enemy
    /// must hold its position.
    fn execute_attack<R: Rng>(
        &mut self,
        profile: AttackProfile,
        ctx: &mut EnemyContext<'_, R>,
    ) -> bool {
        let Some(mut lock) = self.attack else {
            return false;
        };

        let Some(tower_cell) = ctx.grid.towers().get(lock.tower).map(|tower| tower.cell) else {
            self.end_attack(ctx.locks);
            self.path_invalid = true;
            return true;
        };

        if tower_cell.column() < ATTACK_EXCLUSION_COLUMNS {
            self.end_attack(ctx.locks);
            return true;
        }

        let reach = profile.range_cells * ctx.grid.cell_length();
        let in_range = self.position.distance(ctx.grid.cell_center(tower_cell)) <= reach;
        if !in_range || lock.elapsed >= profile.duration_ticks {
            self.end_attack(ctx.locks);
            return false;
        }

        if !ctx.locks.engage(lock.tower, self.id) {
            self.attack = None;
            return false;
        }

        lock.elapsed += 1;
        if lock.cooldown > 0 {
            lock.cooldown -= 1;
            self.attack = Some(lock);
            return true;
        }

        lock.cooldown = profile.rate_ticks;
        self.attack = Some(lock);
        self.strike(lock.tower, tower_cell, profile.damage, ctx);
        true
    }

    fn strike<R: Rng>(
        &mut self,
        tower: TowerId,
        cell: CellCoord,
        damage: f32,
        ctx: &mut EnemyContext<'_, R>,
    ) {
        let destroyed = match ctx.grid.towers_mut().get_mut(tower) {
            Some(state) => state.take_damage(damage),
            None => return,
        };

        if !destroyed {
            ctx.events.push(Event::EnemyAttackedTower {
                enemy: self.id,
                tower,
                damage,
            });
            return;
        }

        let _ = ctx.grid.remove(cell);
        ctx.locks.release_tower(tower);
        self.attack = None;
        ctx.layout_changed = true;
        ctx.events.push(Event::TowerDestroyed {
            tower,
            cell,
            attacker: self.id,
        });
    }

    fn end_attack(&mut self, locks: &mut AttackLocks) {
        if let Some(lock) = self.attack.take() {
            locks.release(lock.tower, self.id);
        }
    }

    pub(crate) fn snapshot(&self, grid: &Grid) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            appearance: self.appearance,
            position: self.position,
            cell: grid.cell_at(self.position),
            lateral_offset: self.lateral_offset,
            health: self.health,
            max_health: self.max_health,
            level: self.level,
            size: self.size(grid.cell_length()),
            frozen: self.frozen_ticks > 0,
            attacking: self.is_holding_attack(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argent_core::{GridConfig, RowBand, TowerKind};
    use rand::rngs::mock::StepRng;

    fn arena() -> Grid {
        Grid::new(GridConfig {
            columns: 10,
            rows: 5,
            cell_length: 10.0,
            entrance: RowBand::single(2),
            exit: RowBand::single(2),
        })
    }

    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn walker(id: u32, kind: EnemyKind, x: f32) -> Enemy {
        Enemy::spawn(EnemyId::new(id), kind, kind, 1, Vec2::new(x, 25.0))
    }

    fn tick(
        enemy: &mut Enemy,
        grid: &mut Grid,
        locks: &mut AttackLocks,
        rng: &mut StepRng,
    ) -> (bool, Vec<Event>) {
        let mut events = Vec::new();
        let mut ctx = EnemyContext {
            grid,
            locks,
            rng,
            events: &mut events,
            layout_changed: false,
        };
        let arrived = enemy.update(&mut ctx);
        (arrived, events)
    }

    #[test]
    fn frozen_enemy_does_not_move() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        let mut enemy = walker(0, EnemyKind::Spider, 0.0);
        assert!(enemy.freeze(3));
        assert!(!enemy.freeze(10), "freezing does not stack");

        for _ in 0..3 {
            let _ = tick(&mut enemy, &mut grid, &mut locks, &mut never());
            assert_eq!(enemy.position, Vec2::new(0.0, 25.0));
        }
        let _ = tick(&mut enemy, &mut grid, &mut locks, &mut never());
        assert!(enemy.position.x > 0.0);
    }

    #[test]
    fn enemy_arrives_near_exit_centre() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        let mut enemy = walker(0, EnemyKind::Hawk, 80.0);
        enemy.path = vec![CellCoord::new(9, 2)];
        enemy.path_invalid = false;

        let mut ticks = 0;
        loop {
            ticks += 1;
            let (arrived, _) = tick(&mut enemy, &mut grid, &mut locks, &mut never());
            if arrived {
                break;
            }
            assert!(ticks < 20, "enemy never arrived");
        }
        assert!(enemy.position.distance(Vec2::new(95.0, 25.0)) < ARRIVAL_RADIUS);
        assert_eq!(ticks, 8);
    }

    #[test]
    fn enemies_near_the_entrance_never_attack() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        assert!(grid.place(TowerKind::Dart, CellCoord::new(2, 1)).is_ok());
        let mut enemy = walker(0, EnemyKind::Ghoul, 25.0);

        for _ in 0..5 {
            let _ = tick(&mut enemy, &mut grid, &mut locks, &mut always());
            assert!(enemy.attack.is_none());
        }
    }

    #[test]
    fn attacker_holds_position_and_damages_on_cooldown() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        let tower = grid
            .place(TowerKind::Dart, CellCoord::new(6, 1))
            .expect("placement succeeds");
        let mut enemy = walker(3, EnemyKind::Ghoul, 65.0);
        enemy.path = vec![CellCoord::new(7, 2), CellCoord::new(8, 2), CellCoord::new(9, 2)];
        enemy.path_invalid = false;

        let (_, events) = tick(&mut enemy, &mut grid, &mut locks, &mut always());
        assert!(events.is_empty());
        let held_at = enemy.position;
        assert_eq!(locks.iter().collect::<Vec<_>>(), vec![(tower, EnemyId::new(3))]);

        let mut hits = 0;
        for _ in 0..60 {
            let (_, events) = tick(&mut enemy, &mut grid, &mut locks, &mut always());
            assert_eq!(enemy.position, held_at);
            hits += events.len();
        }
        assert_eq!(hits, 1, "first hit lands once the full cooldown elapses");
        let health = grid.towers().get(tower).map_or(0.0, |state| state.health);
        assert!((health - 99.2).abs() < 1e-4, "unexpected health {health}");
    }

    #[test]
    fn attack_ends_after_its_duration() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        let tower = grid
            .place(TowerKind::Dart, CellCoord::new(6, 1))
            .expect("placement succeeds");
        let mut enemy = walker(1, EnemyKind::Ghoul, 65.0);
        enemy.path = vec![CellCoord::new(7, 2)];
        enemy.path_invalid = false;

        let mut rng = always();
        let _ = tick(&mut enemy, &mut grid, &mut locks, &mut rng);
        for _ in 0..180 {
            let _ = tick(&mut enemy, &mut grid, &mut locks, &mut never());
        }
        assert!(enemy.attack.is_none(), "lock released once the duration is spent");
        assert_eq!(locks.iter().count(), 0);
        let health = grid.towers().get(tower).map_or(0.0, |state| state.health);
        assert!((health - 98.4).abs() < 1e-4, "two hits land within the duration");
    }

    #[test]
    fn second_enemy_cannot_lock_an_engaged_tower() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        let _ = grid
            .place(TowerKind::Dart, CellCoord::new(6, 1))
            .expect("placement succeeds");
        let mut first = walker(1, EnemyKind::Ghoul, 65.0);
        let mut second = walker(2, EnemyKind::Ghoul, 65.0);
        for enemy in [&mut first, &mut second] {
            enemy.path = vec![CellCoord::new(7, 2)];
            enemy.path_invalid = false;
        }

        let _ = tick(&mut first, &mut grid, &mut locks, &mut always());
        let _ = tick(&mut second, &mut grid, &mut locks, &mut always());

        assert!(first.is_holding_attack());
        assert!(second.attack.is_none());
    }

    #[test]
    fn destroyed_tower_is_removed_from_the_grid() {
        let mut grid = arena();
        let mut locks = AttackLocks::default();
        let tower = grid
            .place(TowerKind::Dart, CellCoord::new(6, 1))
            .expect("placement succeeds");
        if let Some(state) = grid.towers_mut().get_mut(tower) {
            state.health = 1.0;
        }
        let mut enemy = walker(1, EnemyKind::Blob, 65.0);
        enemy.path = vec![CellCoord::new(7, 2)];
        enemy.path_invalid = false;

        let mut destroyed = Vec::new();
        for _ in 0..200 {
            let (_, events) = tick(&mut enemy, &mut grid, &mut locks, &mut always());
            destroyed.extend(
                events
                    .into_iter()
                    .filter(|event| matches!(event, Event::TowerDestroyed { .. })),
            );
        }

        assert_eq!(
            destroyed,
            vec![Event::TowerDestroyed {
                tower,
                cell: CellCoord::new(6, 1),
                attacker: EnemyId::new(1),
            }]
        );
        assert!(grid.towers().get(tower).is_none());
        assert!(!grid.is_blocked(CellCoord::new(6, 1)));
    }
}
