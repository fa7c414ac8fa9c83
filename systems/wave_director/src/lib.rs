#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave progression system responsible for emitting enemy spawn commands.
//!
//! A wave plans a number of enemies of one kind and releases them on a
//! randomized cooldown. Once every planned enemy has spawned and the field is
//! clear, the next wave begins: either a single boss or the next regular kind
//! in rotation with a larger headcount.

use argent_core::{Command, EnemyKind, Phase, RowBand};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cadence of boss waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossSchedule {
    /// Boss waves only occur at indices strictly above this one.
    pub grace: u32,
    /// Boss waves occur on indices divisible by this period.
    pub period: u32,
}

impl Default for BossSchedule {
    fn default() -> Self {
        Self {
            grace: 5,
            period: 5,
        }
    }
}

impl BossSchedule {
    /// Reports whether the wave at `index` is a boss wave.
    #[must_use]
    pub const fn is_boss_wave(&self, index: u32) -> bool {
        self.period > 0 && index > self.grace && index % self.period == 0
    }
}

/// Tunable pacing of waves. Durations are in simulation ticks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Enemies planned for the first wave.
    pub base_enemies: u32,
    /// Extra enemies planned per wave index.
    pub enemies_per_wave: u32,
    /// Delay before the very first spawn.
    pub first_wave_delay_ticks: u32,
    /// Upper bound of the inter-spawn cooldown on the first wave.
    pub cooldown_ceiling_ticks: u32,
    /// Lower bound of the inter-spawn cooldown, capped by the upper bound.
    pub cooldown_lower_ticks: u32,
    /// Smallest upper bound the cooldown may shrink to.
    pub cooldown_floor_ticks: u32,
    /// Shrinkage of the cooldown upper bound per wave index.
    pub cooldown_step_ticks: u32,
    /// Pause before the first spawn of a later wave, before shrinkage.
    pub wave_delay_ticks: u32,
    /// Shrinkage of the pause per wave index.
    pub wave_delay_step_ticks: u32,
    /// Smallest pause between waves.
    pub wave_delay_floor_ticks: u32,
    /// Probability that a spawn is replaced by another regular kind.
    pub substitution_chance: f64,
    /// First wave index on which substitution may happen.
    pub substitution_from_wave: u32,
    /// Boss wave cadence.
    pub boss: BossSchedule,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_enemies: 10,
            enemies_per_wave: 2,
            first_wave_delay_ticks: 60,
            cooldown_ceiling_ticks: 180,
            cooldown_lower_ticks: 90,
            cooldown_floor_ticks: 60,
            cooldown_step_ticks: 10,
            wave_delay_ticks: 120,
            wave_delay_step_ticks: 10,
            wave_delay_floor_ticks: 60,
            substitution_chance: 0.05,
            substitution_from_wave: 4,
            boss: BossSchedule::default(),
        }
    }
}

impl WaveTuning {
    /// Number of enemies planned for the wave at `index`.
    #[must_use]
    pub fn planned_enemies(&self, index: u32) -> u32 {
        if self.boss.is_boss_wave(index) {
            return 1;
        }
        self.base_enemies
            .saturating_add(self.enemies_per_wave.saturating_mul(index))
    }

    /// Inclusive bounds of the cooldown rolled after each spawn of wave `index`.
    #[must_use]
    pub fn cooldown_bounds(&self, index: u32) -> (u32, u32) {
        let upper = self
            .cooldown_ceiling_ticks
            .saturating_sub(self.cooldown_step_ticks.saturating_mul(index))
            .max(self.cooldown_floor_ticks);
        (self.cooldown_lower_ticks.min(upper), upper)
    }

    /// Pause before the first spawn of wave `index`.
    #[must_use]
    pub fn wave_delay(&self, index: u32) -> u32 {
        if index == 0 {
            return self.first_wave_delay_ticks;
        }
        self.wave_delay_ticks
            .saturating_sub(self.wave_delay_step_ticks.saturating_mul(index))
            .max(self.wave_delay_floor_ticks)
    }
}

/// Progress of the active wave, exposed for the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveState {
    /// Zero-based index of the active wave.
    pub index: u32,
    /// Kind the wave is made of.
    pub kind: EnemyKind,
    /// Enemies planned for the wave.
    pub planned: u32,
    /// Enemies spawned so far.
    pub spawned: u32,
    /// Reports whether the following wave is a boss wave.
    pub next_is_boss: bool,
}

/// Pure system that emits spawn commands and advances waves while playing.
#[derive(Clone, Debug)]
pub struct WaveDirector {
    tuning: WaveTuning,
    index: u32,
    kind: EnemyKind,
    planned: u32,
    spawned: u32,
    timer: u32,
    interval: u32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(WaveTuning::default())
    }
}

impl WaveDirector {
    /// Creates a director positioned before the first spider wave.
    #[must_use]
    pub fn new(tuning: WaveTuning) -> Self {
        Self {
            tuning,
            index: 0,
            kind: EnemyKind::Spider,
            planned: tuning.planned_enemies(0),
            spawned: 0,
            timer: 0,
            interval: tuning.wave_delay(0),
        }
    }

    /// Pacing the director was built with.
    #[must_use]
    pub fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    /// Snapshot of the active wave.
    #[must_use]
    pub fn state(&self) -> WaveState {
        WaveState {
            index: self.index,
            kind: self.kind,
            planned: self.planned,
            spawned: self.spawned,
            next_is_boss: self.tuning.boss.is_boss_wave(self.index.saturating_add(1)),
        }
    }

    /// Runs one tick of wave logic.
    ///
    /// `enemies_alive` is the number of enemies on the field before this
    /// tick's spawns are applied. Spawn rows are drawn uniformly from the
    /// entrance band.
    pub fn handle<R: Rng>(
        &mut self,
        phase: Phase,
        enemies_alive: usize,
        entrance: RowBand,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Play || entrance.is_empty() {
            return;
        }

        if self.spawned < self.planned {
            self.timer = self.timer.saturating_add(1);
            if self.timer < self.interval {
                return;
            }

            self.timer = 0;
            let (lower, upper) = self.tuning.cooldown_bounds(self.index);
            self.interval = rng.gen_range(lower..=upper);

            let kind = self.roll_kind(rng);
            let row = entrance.start() + rng.gen_range(0..entrance.len());
            self.spawned += 1;
            out.push(Command::SpawnEnemy {
                kind,
                appearance: self.kind,
                row,
                level: self.index.saturating_add(1),
            });
            return;
        }

        if enemies_alive == 0 {
            self.advance_wave();
        }
    }

    fn roll_kind<R: Rng>(&self, rng: &mut R) -> EnemyKind {
        if self.index < self.tuning.substitution_from_wave || self.spawned == 0 {
            return self.kind;
        }

        if rng.gen::<f64>() >= self.tuning.substitution_chance {
            return self.kind;
        }

        let alternatives: Vec<EnemyKind> = EnemyKind::REGULAR
            .into_iter()
            .filter(|kind| *kind != self.kind)
            .collect();
        if alternatives.is_empty() {
            return self.kind;
        }
        alternatives[rng.gen_range(0..alternatives.len())]
    }

    fn advance_wave(&mut self) {
        self.index = self.index.saturating_add(1);
        self.spawned = 0;
        self.timer = 0;
        self.kind = if self.tuning.boss.is_boss_wave(self.index) {
            EnemyKind::Blob
        } else {
            self.kind.next_in_rotation()
        };
        self.planned = self.tuning.planned_enemies(self.index);
        self.interval = self.tuning.wave_delay(self.index);
        info!(
            wave = self.index,
            kind = ?self.kind,
            planned = self.planned,
            "wave started"
        );
    }
}
