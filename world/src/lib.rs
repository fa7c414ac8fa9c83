#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Argent.
//!
//! The world owns the grid, the tower registry, and every live enemy,
//! projectile and death marker. It changes only through [`apply`], which
//! executes a single [`Command`], and [`tick`], which advances enemies and
//! presentation timers by one simulation tick.

mod effects;
mod enemies;
mod grid;
mod navigation;
mod projectiles;
mod towers;

use argent_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, Phase, PlacementError, ProjectileId,
    RemovalError, TowerId, TowerKind, WorldConfig, FREEZE_DURATION_TICKS,
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, trace};

use effects::DeathEffect;
use enemies::{AttackLocks, Enemy, EnemyContext};
use grid::Grid;
use projectiles::Projectile;

#[derive(Clone, Copy, Debug)]
struct Ledger {
    lives: u32,
    score: u64,
    resources: u32,
}

/// Represents the authoritative Argent world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
    projectiles: Vec<Projectile>,
    next_projectile_id: ProjectileId,
    effects: Vec<DeathEffect>,
    locks: AttackLocks,
    ledger: Ledger,
    phase: Phase,
    ticks_per_second: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world using the default layout and starting balances.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(WorldConfig::default())
    }

    fn from_config(config: WorldConfig) -> Self {
        Self {
            grid: Grid::new(config.grid),
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
            effects: Vec::new(),
            locks: AttackLocks::default(),
            ledger: Ledger {
                lives: config.economy.lives,
                score: 0,
                resources: config.economy.resources,
            },
            phase: Phase::Build,
            ticks_per_second: config.ticks_per_second.max(1),
            tick_index: 0,
        }
    }

    fn invalidate_paths(&mut self) {
        for enemy in &mut self.enemies {
            enemy.invalidate_path();
        }
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord) -> Result<TowerId, PlacementError> {
        if !self.phase.allows_construction() {
            return Err(PlacementError::InvalidPhase);
        }

        self.grid.can_place(cell)?;

        let cost = kind.cost();
        if cost > self.ledger.resources {
            return Err(PlacementError::InsufficientFunds {
                needed: cost,
                available: self.ledger.resources,
            });
        }

        if let Some(limit) = kind.stats().limit {
            if self.grid.towers().count_of(kind) >= limit {
                return Err(PlacementError::KindLimitReached { limit });
            }
        }

        let tower = self.grid.place(kind, cell)?;
        self.ledger.resources -= cost;
        self.invalidate_paths();
        Ok(tower)
    }

    fn remove_tower(&mut self, cell: CellCoord) -> Result<(TowerId, u32), RemovalError> {
        if !self.phase.allows_construction() {
            return Err(RemovalError::InvalidPhase);
        }

        let state = self.grid.remove(cell).ok_or(RemovalError::MissingTower)?;
        let refund = state.kind.refund(state.health);
        self.ledger.resources = self.ledger.resources.saturating_add(refund);
        self.locks.release_tower(state.id);
        self.invalidate_paths();
        Ok((state.id, refund))
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        appearance: EnemyKind,
        row: u32,
        level: u32,
        out_events: &mut Vec<Event>,
    ) {
        let cell = CellCoord::new(0, row);
        if !self.grid.is_entrance(cell) {
            debug!(row, "ignoring spawn outside the entrance band");
            return;
        }

        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));

        let level = level.max(1);
        let position = Vec2::new(0.0, self.grid.cell_center(cell).y);
        self.enemies
            .push(Enemy::spawn(id, kind, appearance, level, position));
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            cell,
            level,
        });
    }

    fn fire_projectile(
        &mut self,
        tower: TowerId,
        enemy: EnemyId,
        aim: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        if self.phase != Phase::Play {
            return;
        }

        if !self
            .enemies
            .iter()
            .any(|candidate| candidate.id == enemy && !candidate.is_dead())
        {
            return;
        }

        let tick = self.tick_index;
        let ticks_per_second = self.ticks_per_second;
        let (kind, cell) = {
            let Some(state) = self.grid.towers_mut().get_mut(tower) else {
                return;
            };
            if state.ready_in(tick, ticks_per_second) > 0 {
                return;
            }
            state.last_fired = Some(tick);
            (state.kind, state.cell)
        };

        let stats = kind.stats();
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        let origin = self.grid.cell_center(cell);
        self.projectiles.push(Projectile::launch(
            id,
            stats.projectile,
            origin,
            aim,
            stats.damage,
        ));
        trace!(tower = tower.get(), enemy = enemy.get(), tick, "tower fired");
        out_events.push(Event::TowerFired {
            tower,
            projectile: id,
            kind: stats.projectile,
        });
    }

    fn resolve_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let cell_length = self.grid.cell_length();
        let mut index = 0;
        while index < self.projectiles.len() {
            if !self.projectiles[index].advance() {
                index += 1;
                continue;
            }

            let projectile = self.projectiles.remove(index);
            let struck = self.enemies.iter_mut().find(|enemy| {
                !enemy.is_dead()
                    && enemy.position.distance(projectile.position) < enemy.size(cell_length) / 2.0
            });

            let hit = match struck {
                Some(enemy) => {
                    if projectile.kind.freezes() {
                        if enemy.freeze(FREEZE_DURATION_TICKS) {
                            out_events.push(Event::EnemyFrozen {
                                enemy: enemy.id,
                                ticks: FREEZE_DURATION_TICKS,
                            });
                        }
                    } else {
                        enemy.apply_damage(projectile.damage);
                    }
                    Some(enemy.id)
                }
                None => None,
            };

            out_events.push(Event::ProjectileResolved {
                projectile: projectile.id,
                hit,
            });
        }

        self.bury_dead(out_events);
    }

    fn update_enemies<R: Rng>(&mut self, rng: &mut R, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.enemies.len() {
            let (arrived, layout_changed) = {
                let mut ctx = EnemyContext {
                    grid: &mut self.grid,
                    locks: &mut self.locks,
                    rng: &mut *rng,
                    events: &mut *out_events,
                    layout_changed: false,
                };
                let arrived = self.enemies[index].update(&mut ctx);
                (arrived, ctx.layout_changed)
            };

            if layout_changed {
                self.invalidate_paths();
            }

            if !arrived {
                index += 1;
                continue;
            }

            let enemy = self.enemies.remove(index);
            self.locks.release_enemy(enemy.id);
            self.ledger.lives = self.ledger.lives.saturating_sub(1);
            out_events.push(Event::EnemyEscaped {
                enemy: enemy.id,
                lives_remaining: self.ledger.lives,
            });

            if self.ledger.lives == 0 {
                info!(score = self.ledger.score, tick = self.tick_index, "game over");
                self.phase = Phase::GameOver;
                out_events.push(Event::PhaseChanged {
                    phase: Phase::GameOver,
                });
                return;
            }
        }

        self.bury_dead(out_events);
    }

    fn bury_dead(&mut self, out_events: &mut Vec<Event>) {
        if !self.enemies.iter().any(Enemy::is_dead) {
            return;
        }

        let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.enemies).into_iter().partition(Enemy::is_dead);
        self.enemies = alive;

        for enemy in dead {
            let reward = enemy.kind.reward(enemy.level);
            let bonus = enemy.kind.stats().score_bonus;
            self.ledger.resources = self.ledger.resources.saturating_add(reward);
            self.ledger.score = self
                .ledger
                .score
                .saturating_add(u64::from(reward) + u64::from(bonus));
            self.locks.release_enemy(enemy.id);
            self.effects
                .push(DeathEffect::new(enemy.kind, enemy.appearance, enemy.position));
            out_events.push(Event::EnemyDied {
                enemy: enemy.id,
                kind: enemy.kind,
                reward,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure { config } => {
            *world = World::from_config(config);
            out_events.push(Event::PhaseChanged { phase: world.phase });
        }
        Command::SetPhase { phase } => {
            world.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
        Command::PlaceTower { kind, cell } => match world.place_tower(kind, cell) {
            Ok(tower) => out_events.push(Event::TowerPlaced { tower, kind, cell }),
            Err(reason) => {
                debug!(?kind, ?cell, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        },
        Command::RemoveTower { cell } => match world.remove_tower(cell) {
            Ok((tower, refund)) => out_events.push(Event::TowerRemoved {
                tower,
                cell,
                refund,
            }),
            Err(reason) => {
                debug!(?cell, %reason, "tower removal rejected");
                out_events.push(Event::TowerRemovalRejected { cell, reason });
            }
        },
        Command::SpawnEnemy {
            kind,
            appearance,
            row,
            level,
        } => world.spawn_enemy(kind, appearance, row, level, out_events),
        Command::FireProjectile { tower, enemy, aim } => {
            world.fire_projectile(tower, enemy, aim, out_events);
        }
        Command::ResolveProjectiles => {
            if world.phase == Phase::Play {
                world.resolve_projectiles(out_events);
            }
        }
    }
}

/// Advances the clock by one tick while the world is in [`Phase::Play`].
///
/// Every enemy updates in spawn order: arrivals cost a life and a game over
/// ends the tick early. Deaths are harvested, then death markers age. Towers
/// and projectiles are driven separately through [`apply`].
pub fn tick<R: Rng>(world: &mut World, rng: &mut R, out_events: &mut Vec<Event>) {
    if world.phase != Phase::Play {
        return;
    }

    world.tick_index = world.tick_index.saturating_add(1);
    out_events.push(Event::TimeAdvanced {
        tick: world.tick_index,
    });

    for tower in world.grid.towers_mut().iter_mut() {
        tower.decay_flash();
    }

    world.update_enemies(rng, out_events);
    if world.phase != Phase::Play {
        return;
    }

    effects::advance(&mut world.effects);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use argent_core::{
        CellCoord, DeathEffectSnapshot, EnemyId, EnemySnapshot, EnemyView, GridConfig,
        LedgerSnapshot, Phase, ProjectileSnapshot, TowerId, TowerKind, TowerSnapshot, TowerView,
    };

    use super::{navigation, World};

    /// Phase the world is currently in.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Number of ticks elapsed while playing.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Simulation ticks per simulated second.
    #[must_use]
    pub fn ticks_per_second(world: &World) -> u32 {
        world.ticks_per_second
    }

    /// Lives, score and resource points.
    #[must_use]
    pub fn ledger(world: &World) -> LedgerSnapshot {
        LedgerSnapshot {
            lives: world.ledger.lives,
            score: world.ledger.score,
            resources: world.ledger.resources,
        }
    }

    /// Layout the grid was built from.
    #[must_use]
    pub fn grid_config(world: &World) -> GridConfig {
        *world.grid.config()
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemies(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| enemy.snapshot(&world.grid))
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the towers on the grid.
    #[must_use]
    pub fn towers(world: &World) -> TowerView {
        let cell_length = world.grid.cell_length();
        let snapshots: Vec<TowerSnapshot> = world
            .grid
            .towers()
            .iter()
            .map(|tower| {
                let stats = tower.kind.stats();
                TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    cell: tower.cell,
                    center: world.grid.cell_center(tower.cell),
                    range: stats.range_cells * cell_length,
                    health: tower.health,
                    max_health: stats.max_health,
                    flash_ticks: tower.flash_ticks,
                }
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Tower standing on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.grid.towers().at(cell)
    }

    /// Number of towers of the given kind on the grid.
    #[must_use]
    pub fn tower_count(world: &World, kind: TowerKind) -> u32 {
        world.grid.towers().count_of(kind)
    }

    /// Reports whether the cell is out of bounds or holds a tower.
    #[must_use]
    pub fn is_occupied(world: &World, cell: CellCoord) -> bool {
        world.grid.is_blocked(cell)
    }

    /// Local placement rules for the cell: in bounds, off the entrance and
    /// exit columns, and unoccupied. Connectivity is not checked.
    #[must_use]
    pub fn can_place(world: &World, cell: CellCoord) -> bool {
        world.grid.can_place(cell).is_ok()
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Death markers that are still visible.
    #[must_use]
    pub fn death_effects(world: &World) -> Vec<DeathEffectSnapshot> {
        world
            .effects
            .iter()
            .map(|effect| effect.snapshot())
            .collect()
    }

    /// Towers under an engaged attack and the enemy attacking each.
    #[must_use]
    pub fn attack_locks(world: &World) -> Vec<(TowerId, EnemyId)> {
        world.locks.iter().collect()
    }

    /// Shortest route from `start` to the exit band, excluding `start`.
    #[must_use]
    pub fn shortest_route(world: &World, start: CellCoord, flies: bool) -> Option<Vec<CellCoord>> {
        navigation::find_route(&world.grid, start, flies)
    }

    /// Ground distance in cells from `cell` to the nearest exit cell.
    #[must_use]
    pub fn exit_distance(world: &World, cell: CellCoord) -> Option<u32> {
        navigation::ExitField::from_grid(&world.grid)
            .distance(cell)
            .map(u32::from)
    }

    /// Reports whether every entrance cell reaches the exit band on foot.
    #[must_use]
    pub fn entrances_connected(world: &World) -> bool {
        navigation::ground_route_exists(&world.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argent_core::{EconomyConfig, GridConfig, RowBand};
    use rand::rngs::mock::StepRng;

    fn playing_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::SetPhase { phase: Phase::Play }, &mut events);
        world
    }

    #[test]
    fn placement_charges_the_tower_cost() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Lightning,
                cell: CellCoord::new(5, 5),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TowerPlaced {
                tower: TowerId::new(0),
                kind: TowerKind::Lightning,
                cell: CellCoord::new(5, 5),
            }]
        );
        assert_eq!(query::ledger(&world).resources, 160);
    }

    #[test]
    fn unaffordable_tower_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Configure {
                config: WorldConfig {
                    economy: EconomyConfig {
                        lives: 20,
                        resources: 30,
                    },
                    ..WorldConfig::default()
                },
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Lightning,
                cell: CellCoord::new(5, 5),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TowerPlacementRejected {
                kind: TowerKind::Lightning,
                cell: CellCoord::new(5, 5),
                reason: PlacementError::InsufficientFunds {
                    needed: 40,
                    available: 30,
                },
            }]
        );
        assert!(!query::is_occupied(&world, CellCoord::new(5, 5)));
    }

    #[test]
    fn fork_towers_are_limited() {
        let mut world = World::new();
        world.ledger.resources = 10_000;
        let mut events = Vec::new();
        for column in 2..13 {
            apply(
                &mut world,
                Command::PlaceTower {
                    kind: TowerKind::Fork,
                    cell: CellCoord::new(column, 0),
                },
                &mut events,
            );
        }

        assert_eq!(query::tower_count(&world, TowerKind::Fork), 10);
        assert_eq!(
            events.last(),
            Some(&Event::TowerPlacementRejected {
                kind: TowerKind::Fork,
                cell: CellCoord::new(12, 0),
                reason: PlacementError::KindLimitReached { limit: 10 },
            })
        );
    }

    #[test]
    fn removal_refund_is_prorated_by_health() {
        let mut world = World::new();
        let mut events = Vec::new();
        let cell = CellCoord::new(7, 3);
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Bullet,
                cell,
            },
            &mut events,
        );
        if let Some(tower) = world.grid.towers_mut().get_mut(TowerId::new(0)) {
            tower.health = 50.0;
        }
        events.clear();

        apply(&mut world, Command::RemoveTower { cell }, &mut events);

        assert_eq!(
            events,
            vec![Event::TowerRemoved {
                tower: TowerId::new(0),
                cell,
                refund: 12,
            }]
        );
        assert_eq!(query::ledger(&world).resources, 200 - 25 + 12);

        events.clear();
        apply(&mut world, Command::RemoveTower { cell }, &mut events);
        assert_eq!(
            events,
            vec![Event::TowerRemovalRejected {
                cell,
                reason: RemovalError::MissingTower,
            }]
        );
    }

    #[test]
    fn construction_is_refused_after_game_over() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPhase {
                phase: Phase::GameOver,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Dart,
                cell: CellCoord::new(5, 5),
            },
            &mut events,
        );

        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::InvalidPhase,
                ..
            }]
        ));
    }

    #[test]
    fn lethal_hit_buries_enemy_in_the_same_resolution() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Spider,
                appearance: EnemyKind::Spider,
                row: 6,
                level: 1,
            },
            &mut events,
        );
        world.enemies[0].health = 0.5;
        let target = world.enemies[0].position;
        world.projectiles.push(Projectile::launch(
            ProjectileId::new(0),
            argent_core::ProjectileKind::Dart,
            target + Vec2::new(3.0, 0.0),
            target,
            1.0,
        ));
        events.clear();

        apply(&mut world, Command::ResolveProjectiles, &mut events);

        assert_eq!(query::enemy_count(&world), 0);
        assert_eq!(
            events,
            vec![
                Event::ProjectileResolved {
                    projectile: ProjectileId::new(0),
                    hit: Some(EnemyId::new(0)),
                },
                Event::EnemyDied {
                    enemy: EnemyId::new(0),
                    kind: EnemyKind::Spider,
                    reward: 2,
                },
            ]
        );
        let ledger = query::ledger(&world);
        assert_eq!(ledger.resources, 202);
        assert_eq!(ledger.score, 2);
        assert_eq!(query::death_effects(&world).len(), 1);
    }

    #[test]
    fn shots_wait_for_the_tower_cooldown() {
        let mut world = playing_world();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Dart,
                cell: CellCoord::new(5, 2),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Spider,
                appearance: EnemyKind::Spider,
                row: 6,
                level: 1,
            },
            &mut events,
        );
        let fire = Command::FireProjectile {
            tower: TowerId::new(0),
            enemy: EnemyId::new(0),
            aim: Vec2::new(25.0, 325.0),
        };
        let shots = |world: &mut World, events: &mut Vec<Event>| {
            events.clear();
            apply(world, fire.clone(), events);
            events
                .iter()
                .filter(|event| matches!(event, Event::TowerFired { .. }))
                .count()
        };

        assert_eq!(shots(&mut world, &mut events), 1);
        assert_eq!(shots(&mut world, &mut events), 0, "one shot per tick");

        for _ in 0..59 {
            tick(&mut world, &mut rng, &mut events);
        }
        assert_eq!(shots(&mut world, &mut events), 0, "dart reloads for 60 ticks");

        tick(&mut world, &mut rng, &mut events);
        assert_eq!(shots(&mut world, &mut events), 1);
        assert_eq!(query::projectiles(&world).len(), 2);
    }

    #[test]
    fn freeze_hits_do_not_stack() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Spider,
                appearance: EnemyKind::Spider,
                row: 6,
                level: 1,
            },
            &mut events,
        );
        let target = world.enemies[0].position;
        for id in 0..2 {
            world.projectiles.push(Projectile::launch(
                ProjectileId::new(id),
                argent_core::ProjectileKind::Freeze,
                target,
                target,
                0.0,
            ));
        }
        events.clear();

        apply(&mut world, Command::ResolveProjectiles, &mut events);

        let frozen = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyFrozen { .. }))
            .count();
        assert_eq!(frozen, 1);
        assert_eq!(world.enemies[0].health, 10.0);

        let mut rng = StepRng::new(0, 0);
        for _ in 0..FREEZE_DURATION_TICKS {
            tick(&mut world, &mut rng, &mut events);
        }
        assert_eq!(world.enemies[0].position, target, "frozen for exactly 60 ticks");
        tick(&mut world, &mut rng, &mut events);
        assert!(world.enemies[0].position.x > target.x);
    }

    #[test]
    fn spawns_outside_the_entrance_band_are_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Configure {
                config: WorldConfig {
                    grid: GridConfig {
                        entrance: RowBand::new(4, 3),
                        ..GridConfig::default()
                    },
                    ..WorldConfig::default()
                },
            },
            &mut events,
        );
        events.clear();

        for row in [3, 4, 6, 7] {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    kind: EnemyKind::Hawk,
                    appearance: EnemyKind::Hawk,
                    row,
                    level: 2,
                },
                &mut events,
            );
        }

        assert_eq!(query::enemy_count(&world), 2);
        let rows: Vec<u32> = query::enemies(&world)
            .iter()
            .map(|enemy| enemy.cell.row())
            .collect();
        assert_eq!(rows, vec![4, 6]);
    }

    #[test]
    fn clock_only_runs_while_playing() {
        let mut world = World::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);

        tick(&mut world, &mut rng, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::tick_index(&world), 0);

        apply(&mut world, Command::SetPhase { phase: Phase::Play }, &mut events);
        tick(&mut world, &mut rng, &mut events);
        assert_eq!(events.last(), Some(&Event::TimeAdvanced { tick: 1 }));
    }
}
