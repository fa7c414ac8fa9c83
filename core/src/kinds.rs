//! Kind enumerations and their static stat tables.
//!
//! Every tunable number that distinguishes one tower, enemy, or projectile
//! from another lives here so the world and the systems read a single source.

use serde::{Deserialize, Serialize};

/// Types of towers that can be constructed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap, short-ranged starter tower.
    Dart,
    /// Medium-ranged tower with a slightly faster cadence.
    Bullet,
    /// Medium-ranged tower with a slow cadence and heavier hits.
    Lightning,
    /// Rapid-fire tower restricted to cardinal firing lanes.
    Flame,
    /// Tower whose projectiles freeze instead of damaging.
    Freeze,
    /// Expensive long-ranged tower with a per-map limit.
    Fork,
}

/// Static combat parameters describing a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Targeting radius measured in cells.
    pub range_cells: f32,
    /// Shots fired per simulated second.
    pub fire_rate: f32,
    /// Whether targets outside the cardinal lanes may be engaged.
    pub fires_diagonally: bool,
    /// Health the tower is constructed with.
    pub max_health: f32,
    /// Resource points spent on construction.
    pub cost: u32,
    /// Refund granted for removing an undamaged tower.
    pub base_refund: u32,
    /// Maximum number of towers of this kind allowed on the map.
    pub limit: Option<u32>,
    /// Projectile launched when the tower fires.
    pub projectile: ProjectileKind,
}

const TOWER_MAX_HEALTH: f32 = 100.0;

impl TowerKind {
    /// Every tower kind in shop order.
    pub const ALL: [TowerKind; 6] = [
        Self::Dart,
        Self::Bullet,
        Self::Lightning,
        Self::Flame,
        Self::Freeze,
        Self::Fork,
    ];

    /// Returns the stat table entry for the tower kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Dart => TowerStats {
                damage: 1.0,
                range_cells: 2.0,
                fire_rate: 1.0,
                fires_diagonally: true,
                max_health: TOWER_MAX_HEALTH,
                cost: 10,
                base_refund: 10,
                limit: None,
                projectile: ProjectileKind::Dart,
            },
            Self::Bullet => TowerStats {
                damage: 1.1,
                range_cells: 3.0,
                fire_rate: 1.2,
                fires_diagonally: true,
                max_health: TOWER_MAX_HEALTH,
                cost: 25,
                base_refund: 25,
                limit: None,
                projectile: ProjectileKind::Bullet,
            },
            Self::Lightning => TowerStats {
                damage: 1.2,
                range_cells: 3.0,
                fire_rate: 0.8,
                fires_diagonally: true,
                max_health: TOWER_MAX_HEALTH,
                cost: 40,
                base_refund: 40,
                limit: None,
                projectile: ProjectileKind::Lightning,
            },
            Self::Flame => TowerStats {
                damage: 1.3,
                range_cells: 2.0,
                fire_rate: 3.0,
                fires_diagonally: false,
                max_health: TOWER_MAX_HEALTH,
                cost: 60,
                base_refund: 60,
                limit: None,
                projectile: ProjectileKind::Flame,
            },
            Self::Freeze => TowerStats {
                damage: 0.0,
                range_cells: 2.0,
                fire_rate: 1.0,
                fires_diagonally: true,
                max_health: TOWER_MAX_HEALTH,
                cost: 75,
                base_refund: 75,
                limit: None,
                projectile: ProjectileKind::Freeze,
            },
            Self::Fork => TowerStats {
                damage: 2.0,
                range_cells: 4.0,
                fire_rate: 1.5,
                fires_diagonally: true,
                max_health: TOWER_MAX_HEALTH,
                cost: 150,
                base_refund: 150,
                limit: Some(10),
                projectile: ProjectileKind::Dart,
            },
        }
    }

    /// Resource points required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Number of ticks between shots at the provided tick rate.
    ///
    /// Always at least one so a tower can never fire twice within a tick.
    #[must_use]
    pub fn fire_interval_ticks(self, ticks_per_second: u32) -> u32 {
        let rate = self.stats().fire_rate;
        if rate <= 0.0 {
            return u32::MAX;
        }

        let ticks = (ticks_per_second as f32 / rate).round();
        (ticks as u32).max(1)
    }

    /// Refund granted when a tower of this kind is removed at `health`.
    ///
    /// The base refund is prorated by the remaining health fraction and
    /// truncated to whole resource points.
    #[must_use]
    pub fn refund(self, health: f32) -> u32 {
        let stats = self.stats();
        let fraction = (health / stats.max_health).clamp(0.0, 1.0);
        (stats.base_refund as f32 * fraction).floor() as u32
    }
}

/// Types of enemies that march through the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker without an attack.
    Spider,
    /// Fast walker that bites towers at close range.
    Snake,
    /// Fastest walker without an attack.
    Hawk,
    /// Slow walker with a longer reach.
    Ghoul,
    /// Boss: slow, durable and heavy-hitting.
    Blob,
}

/// Parameters of an enemy's tower attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackProfile {
    /// Damage dealt to the tower per hit.
    pub damage: f32,
    /// Maximum distance to the tower centre, measured in cells.
    pub range_cells: f32,
    /// Ticks between consecutive hits.
    pub rate_ticks: u32,
    /// Ticks an attack may last before the enemy moves on.
    pub duration_ticks: u32,
    /// Probability per eligible tick of looking for a tower to attack.
    pub chance: f32,
}

/// Presentation-only lateral sway of a walking enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wobble {
    /// Peak lateral displacement in world units.
    pub amplitude: f32,
    /// Multiplier applied to the shared animation phase.
    pub frequency: f32,
}

/// Static parameters describing an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// World units travelled per tick.
    pub speed: f32,
    /// Whether the enemy may cross towers while advancing eastward.
    pub flies: bool,
    /// Tower attack, if the kind has one.
    pub attack: Option<AttackProfile>,
    /// Collision diameter as a fraction of the cell length.
    pub size_cells: f32,
    /// Multiplier applied to the level-derived health.
    pub health_multiplier: f32,
    /// Multiplier applied to the level-derived kill reward.
    pub reward_multiplier: u32,
    /// Score bonus awarded on top of the reward.
    pub score_bonus: u32,
    /// Lateral sway parameters.
    pub wobble: Wobble,
}

const ENEMY_SIZE_CELLS: f32 = 0.8;
const BOSS_SIZE_CELLS: f32 = 1.2;
const HEALTH_PER_LEVEL: f32 = 10.0;
const REWARD_PER_LEVEL: u32 = 2;

impl EnemyKind {
    /// Regular kinds in wave rotation order.
    pub const REGULAR: [EnemyKind; 4] = [Self::Spider, Self::Snake, Self::Hawk, Self::Ghoul];

    /// Returns the stat table entry for the enemy kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Spider => EnemyStats {
                speed: 0.9,
                flies: false,
                attack: None,
                size_cells: ENEMY_SIZE_CELLS,
                health_multiplier: 1.0,
                reward_multiplier: 1,
                score_bonus: 0,
                wobble: Wobble {
                    amplitude: 0.5,
                    frequency: 1.0,
                },
            },
            Self::Snake => EnemyStats {
                speed: 1.1,
                flies: false,
                attack: Some(AttackProfile {
                    damage: 0.5,
                    range_cells: 1.0,
                    rate_ticks: 60,
                    duration_ticks: 120,
                    chance: 0.3,
                }),
                size_cells: ENEMY_SIZE_CELLS,
                health_multiplier: 1.0,
                reward_multiplier: 1,
                score_bonus: 0,
                wobble: Wobble {
                    amplitude: 0.8,
                    frequency: 1.5,
                },
            },
            Self::Hawk => EnemyStats {
                speed: 1.4,
                flies: false,
                attack: None,
                size_cells: ENEMY_SIZE_CELLS,
                health_multiplier: 1.0,
                reward_multiplier: 1,
                score_bonus: 0,
                wobble: Wobble {
                    amplitude: 1.0,
                    frequency: 0.8,
                },
            },
            Self::Ghoul => EnemyStats {
                speed: 0.8,
                flies: false,
                attack: Some(AttackProfile {
                    damage: 0.8,
                    range_cells: 1.5,
                    rate_ticks: 60,
                    duration_ticks: 180,
                    chance: 0.25,
                }),
                size_cells: ENEMY_SIZE_CELLS,
                health_multiplier: 1.0,
                reward_multiplier: 1,
                score_bonus: 0,
                wobble: Wobble {
                    amplitude: 0.7,
                    frequency: 0.5,
                },
            },
            Self::Blob => EnemyStats {
                speed: 0.6,
                flies: false,
                attack: Some(AttackProfile {
                    damage: 2.0,
                    range_cells: 2.0,
                    rate_ticks: 180,
                    duration_ticks: 240,
                    chance: 0.5,
                }),
                size_cells: BOSS_SIZE_CELLS,
                health_multiplier: 5.0,
                reward_multiplier: 5,
                score_bonus: 1000,
                wobble: Wobble {
                    amplitude: 0.0,
                    frequency: 0.0,
                },
            },
        }
    }

    /// Reports whether the kind only appears on boss waves.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Blob)
    }

    /// Kind of the regular wave that follows a wave of this kind.
    #[must_use]
    pub const fn next_in_rotation(self) -> Self {
        match self {
            Self::Spider => Self::Snake,
            Self::Snake => Self::Hawk,
            Self::Hawk => Self::Ghoul,
            Self::Ghoul | Self::Blob => Self::Spider,
        }
    }

    /// Health of a freshly spawned enemy at `level`.
    #[must_use]
    pub fn max_health(self, level: u32) -> f32 {
        HEALTH_PER_LEVEL * level as f32 * self.stats().health_multiplier
    }

    /// Resource points awarded for killing an enemy at `level`.
    #[must_use]
    pub const fn reward(self, level: u32) -> u32 {
        REWARD_PER_LEVEL
            .saturating_mul(level)
            .saturating_mul(self.stats().reward_multiplier)
    }
}

/// Projectile variants launched by towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Slow needle launched by dart and fork towers.
    Dart,
    /// Fastest projectile.
    Bullet,
    /// Lightning bolt.
    Lightning,
    /// Slow fireball.
    Flame,
    /// Freezes on hit instead of dealing damage.
    Freeze,
}

/// Ticks a freeze hit keeps an enemy in place.
pub const FREEZE_DURATION_TICKS: u32 = 60;

impl ProjectileKind {
    /// World units travelled per tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Dart => 6.0,
            Self::Bullet => 8.0,
            Self::Lightning => 7.0,
            Self::Flame => 4.0,
            Self::Freeze => 5.0,
        }
    }

    /// Reports whether a hit freezes rather than damages.
    #[must_use]
    pub const fn freezes(self) -> bool {
        matches!(self, Self::Freeze)
    }
}
