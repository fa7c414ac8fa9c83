#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Argent tower-defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The simulation submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values that systems
//! and presentation collaborators react to. Systems read immutable snapshots
//! and respond exclusively with new command batches.

mod kinds;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use kinds::{
    AttackProfile, EnemyKind, EnemyStats, ProjectileKind, TowerKind, TowerStats, Wobble,
    FREEZE_DURATION_TICKS,
};

/// Top-level phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Planning phase before the first wave; the clock does not run.
    Build,
    /// The clock runs and waves advance.
    Play,
    /// The clock is suspended; placement is still accepted.
    Paused,
    /// Every life was lost. Only a reset leaves this phase.
    GameOver,
}

impl Phase {
    /// Reports whether towers may be placed or removed in this phase.
    #[must_use]
    pub const fn allows_construction(self) -> bool {
        matches!(self, Self::Build | Self::Play | Self::Paused)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world with a fresh one built from the configuration.
    Configure {
        /// Layout, economy and clock parameters for the new world.
        config: WorldConfig,
    },
    /// Requests that the world enter the provided phase.
    SetPhase {
        /// Phase the world should activate.
        phase: Phase,
    },
    /// Requests placement of a tower on a single cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell that will hold the tower.
        cell: CellCoord,
    },
    /// Requests removal of the tower standing on the provided cell.
    RemoveTower {
        /// Cell holding the tower.
        cell: CellCoord,
    },
    /// Requests that an enemy enter the grid at the entrance column.
    SpawnEnemy {
        /// Behavioural kind of the enemy.
        kind: EnemyKind,
        /// Kind whose colour scheme the enemy wears.
        appearance: EnemyKind,
        /// Entrance row the enemy starts on.
        row: u32,
        /// Level driving health and reward.
        level: u32,
    },
    /// Requests that a tower launch a projectile at a captured point.
    FireProjectile {
        /// Tower firing the shot.
        tower: TowerId,
        /// Enemy the tower selected.
        enemy: EnemyId,
        /// Target point captured at firing time.
        aim: Vec2,
    },
    /// Advances every projectile and resolves those that arrived.
    ResolveProjectiles,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Announces that the world entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell holding the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was removed by the player.
    TowerRemoved {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Cell the tower stood on.
        cell: CellCoord,
        /// Resource points returned to the player.
        refund: u32,
    },
    /// Reports that a tower removal request was rejected.
    TowerRemovalRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// A tower's health reached zero under enemy attack.
    TowerDestroyed {
        /// Identifier of the destroyed tower.
        tower: TowerId,
        /// Cell the tower stood on.
        cell: CellCoord,
        /// Enemy that landed the final hit.
        attacker: EnemyId,
    },
    /// A tower launched a projectile.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Projectile that was launched.
        projectile: ProjectileId,
        /// Kind of the launched projectile.
        kind: ProjectileKind,
    },
    /// An enemy entered the grid.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Behavioural kind of the enemy.
        kind: EnemyKind,
        /// Entrance cell the enemy starts on.
        cell: CellCoord,
        /// Level of the enemy.
        level: u32,
    },
    /// An enemy landed a hit on a tower that survived it.
    EnemyAttackedTower {
        /// Attacking enemy.
        enemy: EnemyId,
        /// Tower that took the hit.
        tower: TowerId,
        /// Damage dealt.
        damage: f32,
    },
    /// A projectile reached its target point.
    ProjectileResolved {
        /// Projectile that was consumed.
        projectile: ProjectileId,
        /// Enemy struck by the projectile, if any.
        hit: Option<EnemyId>,
    },
    /// A freeze projectile froze an enemy.
    EnemyFrozen {
        /// Frozen enemy.
        enemy: EnemyId,
        /// Ticks the enemy stays frozen.
        ticks: u32,
    },
    /// An enemy's health reached zero.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Resource points awarded.
        reward: u32,
    },
    /// An enemy reached the exit and cost a life.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the escape.
        lives_remaining: u32,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Contiguous run of rows along the entrance or exit column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowBand {
    start: u32,
    len: u32,
}

impl RowBand {
    /// Creates a band covering `len` rows beginning at `start`.
    #[must_use]
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Creates a band covering a single row.
    #[must_use]
    pub const fn single(row: u32) -> Self {
        Self { start: row, len: 1 }
    }

    /// First row of the band.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Number of rows in the band.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Reports whether the band covers no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reports whether `row` lies within the band.
    #[must_use]
    pub const fn contains(&self, row: u32) -> bool {
        row >= self.start && row - self.start < self.len
    }

    /// Iterator over the rows of the band in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = u32> {
        self.start..self.start.saturating_add(self.len)
    }
}

/// Layout of the playing field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Side length of a cell in world units.
    pub cell_length: f32,
    /// Rows along column 0 where enemies enter.
    pub entrance: RowBand,
    /// Rows along the last column where enemies leave.
    pub exit: RowBand,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 18,
            rows: 12,
            cell_length: 56.0,
            entrance: RowBand::single(6),
            exit: RowBand::single(6),
        }
    }
}

/// Starting balances of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Lives available before the game ends.
    pub lives: u32,
    /// Resource points available for construction.
    pub resources: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            lives: 20,
            resources: 200,
        }
    }
}

/// Parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Playing field layout.
    pub grid: GridConfig,
    /// Starting balances.
    pub economy: EconomyConfig,
    /// Simulation ticks per simulated second.
    pub ticks_per_second: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            economy: EconomyConfig::default(),
            ticks_per_second: 60,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The game is over, so placement is disabled.
    #[error("towers cannot be placed in the current phase")]
    InvalidPhase,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell already holds a tower.
    #[error("cell is already occupied")]
    Occupied,
    /// The requested cell lies in the entrance or exit column.
    #[error("cell is reserved for the entrance or exit")]
    ReservedBand,
    /// The player cannot afford the tower.
    #[error("tower costs {needed} but only {available} is available")]
    InsufficientFunds {
        /// Cost of the requested tower.
        needed: u32,
        /// Resource points held by the player.
        available: u32,
    },
    /// The tower would leave an entrance cell without a route to the exit.
    #[error("placement would seal the route to the exit")]
    WouldSeverPath,
    /// The map already holds the maximum number of towers of this kind.
    #[error("at most {limit} towers of this kind may stand at once")]
    KindLimitReached {
        /// Maximum number of towers of the kind.
        limit: u32,
    },
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum RemovalError {
    /// The game is over, so removal is disabled.
    #[error("towers cannot be removed in the current phase")]
    InvalidPhase,
    /// No tower stands on the requested cell.
    #[error("no tower stands on the cell")]
    MissingTower,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Behavioural kind of the enemy.
    pub kind: EnemyKind,
    /// Kind whose colour scheme the enemy wears.
    pub appearance: EnemyKind,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Grid cell containing the position.
    pub cell: CellCoord,
    /// Lateral presentation offset perpendicular to the direction of travel.
    pub lateral_offset: f32,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Level of the enemy.
    pub level: u32,
    /// Collision diameter in world units.
    pub size: f32,
    /// Indicates whether the enemy is frozen.
    pub frozen: bool,
    /// Indicates whether the enemy is engaged in a tower attack.
    pub attacking: bool,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the spawn health.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell holding the tower.
    pub cell: CellCoord,
    /// Centre of the tower in world units.
    pub center: Vec2,
    /// Targeting radius in world units.
    pub range: f32,
    /// Remaining health.
    pub health: f32,
    /// Health the tower was built with.
    pub max_health: f32,
    /// Ticks left on the damage flash.
    pub flash_ticks: u32,
}

/// Read-only snapshot describing all towers on the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Kind of the projectile.
    pub kind: ProjectileKind,
    /// Current position in world units.
    pub position: Vec2,
    /// Point the projectile travels toward.
    pub target: Vec2,
}

/// Fading marker left where an enemy died.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeathEffectSnapshot {
    /// Kind of the enemy that died.
    pub kind: EnemyKind,
    /// Colour scheme of the enemy that died.
    pub appearance: EnemyKind,
    /// Position where the enemy died.
    pub position: Vec2,
    /// Ticks left before the marker disappears.
    pub remaining_ticks: u32,
}

/// Player-facing balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LedgerSnapshot {
    /// Lives left.
    pub lives: u32,
    /// Accumulated score.
    pub score: u64,
    /// Resource points available for construction.
    pub resources: u32,
}

/// Target chosen by a tower for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that selected the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Position of the enemy when it was selected.
    pub aim: Vec2,
    /// Distance between the tower centre and the enemy.
    pub distance: f32,
}
