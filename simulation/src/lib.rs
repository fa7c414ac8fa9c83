#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session driver that wires the world and the pure systems into ticks.
//!
//! A [`Simulation`] owns the world, every system and the random source. Each
//! call to [`Simulation::step`] runs one tick in a fixed order: enemies and
//! death markers advance inside the world, towers pick targets and fire,
//! projectiles resolve, and the wave director schedules spawns. Player input
//! enters through [`Simulation::handle_input`] or the typed construction and
//! phase operations, and every refusal comes back as an error. Adapters read
//! the HUD, world queries and drained events after a step completes.

mod config;
mod state_machine;

use std::vec::Drain;

use argent_core::{
    CellCoord, Command, Event, Phase, PlacementError, RemovalError, TowerId, TowerKind,
    TowerTarget,
};
use argent_system_tower_targeting::TowerTargeting;
use argent_system_wave_director::WaveDirector;
use argent_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

pub use argent_system_wave_director::{WaveState, WaveTuning};
pub use config::{ConfigError, SimulationConfig};
pub use state_machine::{next_phase, Transition, TransitionError};

/// Discrete player input accepted by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Build a tower of the given kind on a cell.
    PlaceTower {
        /// Kind of tower to build.
        kind: TowerKind,
        /// Target cell.
        cell: CellCoord,
    },
    /// Remove the tower standing on a cell.
    RemoveTower {
        /// Cell holding the tower.
        cell: CellCoord,
    },
    /// Make a tower kind the active selection.
    SelectTowerKind {
        /// Kind to select.
        kind: TowerKind,
    },
    /// Pause a running clock or resume a paused one.
    TogglePause,
    /// Leave the planning phase.
    Start,
    /// Discard the session and start over.
    Reset,
}

/// Reasons a discrete input event was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    /// The world refused to build the tower.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// The world refused to remove the tower.
    #[error(transparent)]
    Removal(#[from] RemovalError),
    /// The phase does not accept the transition.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The selected kind costs more than the player holds.
    #[error("{kind:?} costs {cost} but only {available} is available")]
    UnaffordableSelection {
        /// Kind the player tried to select.
        kind: TowerKind,
        /// Construction cost of that kind.
        cost: u32,
        /// Resource points held.
        available: u32,
    },
}

/// Semantic sound cues derived from world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// A tower launched a projectile.
    TowerFired,
    /// An enemy hit a tower.
    EnemyAttackedTower,
    /// An enemy died.
    EnemyDied,
}

/// Maps a world event to the sound cue it should trigger, if any.
#[must_use]
pub fn audio_cue(event: &Event) -> Option<AudioCue> {
    match event {
        Event::TowerFired { .. } => Some(AudioCue::TowerFired),
        Event::EnemyAttackedTower { .. } | Event::TowerDestroyed { .. } => {
            Some(AudioCue::EnemyAttackedTower)
        }
        Event::EnemyDied { .. } => Some(AudioCue::EnemyDied),
        _ => None,
    }
}

/// Player-facing summary of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hud {
    /// Active phase.
    pub phase: Phase,
    /// Ticks elapsed while playing.
    pub tick: u64,
    /// Lives left.
    pub lives: u32,
    /// Accumulated score.
    pub score: u64,
    /// Resource points available.
    pub resources: u32,
    /// Progress of the active wave.
    pub wave: WaveState,
    /// Enemies on the field.
    pub enemies_alive: usize,
    /// The field is clear and the next wave is a boss wave.
    pub boss_incoming: bool,
    /// Tower kind currently selected for construction.
    pub selected: TowerKind,
}

/// A complete game session.
#[derive(Debug)]
pub struct Simulation<R = ChaCha8Rng> {
    config: SimulationConfig,
    world: World,
    targeting: TowerTargeting,
    director: WaveDirector,
    rng: R,
    selected: TowerKind,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation<ChaCha8Rng> {
    /// Creates a session whose random source is seeded from the configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a session drawing every gameplay roll from `rng`.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Configure {
                config: config.world_config(),
            },
            &mut events,
        );
        events.clear();

        Ok(Self {
            config,
            world,
            targeting: TowerTargeting::new(),
            director: WaveDirector::new(config.waves),
            rng,
            selected: TowerKind::Dart,
            targets: Vec::new(),
            commands: Vec::new(),
            events,
        })
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only access to the world for [`argent_world::query`] calls.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Active phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Runs one tick. Outside [`Phase::Play`] nothing changes.
    ///
    /// Every tower holding a target requests a shot. The world fires only
    /// those whose cooldown has elapsed.
    pub fn step(&mut self) {
        world::tick(&mut self.world, &mut self.rng, &mut self.events);

        let phase = query::phase(&self.world);
        if phase != Phase::Play {
            return;
        }

        let towers = query::towers(&self.world);
        let enemies = query::enemies(&self.world);
        self.targeting.handle(phase, &towers, &enemies, &mut self.targets);
        let shots = self.targets.iter().map(|target| Command::FireProjectile {
            tower: target.tower,
            enemy: target.enemy,
            aim: target.aim,
        });
        self.commands.extend(shots);
        self.commands.push(Command::ResolveProjectiles);
        self.flush_commands();

        let entrance = query::grid_config(&self.world).entrance;
        self.director.handle(
            query::phase(&self.world),
            query::enemy_count(&self.world),
            entrance,
            &mut self.rng,
            &mut self.commands,
        );
        self.flush_commands();

        trace!(
            tick = query::tick_index(&self.world),
            enemies = query::enemy_count(&self.world),
            "tick complete"
        );
    }

    /// Leaves the planning phase and starts the clock.
    pub fn start(&mut self) -> Result<Phase, TransitionError> {
        self.transition(Transition::Start)
    }

    /// Pauses a running clock or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<Phase, TransitionError> {
        let transition = if query::phase(&self.world) == Phase::Paused {
            Transition::Resume
        } else {
            Transition::Pause
        };
        self.transition(transition)
    }

    /// Replaces the world and the wave schedule with fresh ones built from
    /// the configuration. The random source carries on.
    pub fn reset(&mut self) -> Result<Phase, TransitionError> {
        let phase = next_phase(query::phase(&self.world), Transition::Reset)?;
        self.execute(Command::Configure {
            config: self.config.world_config(),
        });
        debug_assert_eq!(query::phase(&self.world), phase);
        self.director = WaveDirector::new(self.config.waves);
        self.targeting = TowerTargeting::new();
        self.selected = TowerKind::Dart;
        self.targets.clear();
        info!(seed = self.config.seed, ?phase, "session reset");
        Ok(phase)
    }

    /// Builds a tower, returning its identifier or the reason it was refused.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        let start = self.events.len();
        self.execute(Command::PlaceTower { kind, cell });
        self.events[start..]
            .iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::InvalidPhase))
    }

    /// Removes a tower, returning the refunded resource points.
    pub fn remove_tower(&mut self, cell: CellCoord) -> Result<u32, RemovalError> {
        let start = self.events.len();
        self.execute(Command::RemoveTower { cell });
        self.events[start..]
            .iter()
            .find_map(|event| match event {
                Event::TowerRemoved { refund, .. } => Some(Ok(*refund)),
                Event::TowerRemovalRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(RemovalError::MissingTower))
    }

    /// Selects a tower kind if the player can currently afford it.
    pub fn select_tower_kind(&mut self, kind: TowerKind) -> bool {
        let resources = query::ledger(&self.world).resources;
        if kind.cost() > resources {
            debug!(?kind, cost = kind.cost(), resources, "selection unaffordable");
            return false;
        }
        self.selected = kind;
        true
    }

    /// Tower kind currently selected.
    #[must_use]
    pub fn selected_tower_kind(&self) -> TowerKind {
        self.selected
    }

    /// Routes a discrete input event to the matching operation and reports
    /// why it was refused, if it was.
    pub fn handle_input(&mut self, input: InputEvent) -> Result<(), InputError> {
        match input {
            InputEvent::PlaceTower { kind, cell } => {
                let _ = self.place_tower(kind, cell)?;
            }
            InputEvent::RemoveTower { cell } => {
                let _ = self.remove_tower(cell)?;
            }
            InputEvent::SelectTowerKind { kind } => {
                if !self.select_tower_kind(kind) {
                    return Err(InputError::UnaffordableSelection {
                        kind,
                        cost: kind.cost(),
                        available: query::ledger(&self.world).resources,
                    });
                }
            }
            InputEvent::TogglePause => {
                let _ = self.toggle_pause()?;
            }
            InputEvent::Start => {
                let _ = self.start()?;
            }
            InputEvent::Reset => {
                let _ = self.reset()?;
            }
        }
        Ok(())
    }

    /// Removes and returns every event produced since the last drain.
    pub fn drain_events(&mut self) -> Drain<'_, Event> {
        self.events.drain(..)
    }

    /// Player-facing summary of the session.
    #[must_use]
    pub fn hud(&self) -> Hud {
        let ledger = query::ledger(&self.world);
        let wave = self.director.state();
        let enemies_alive = query::enemy_count(&self.world);
        Hud {
            phase: query::phase(&self.world),
            tick: query::tick_index(&self.world),
            lives: ledger.lives,
            score: ledger.score,
            resources: ledger.resources,
            wave,
            enemies_alive,
            boss_incoming: wave.next_is_boss && enemies_alive == 0,
            selected: self.selected,
        }
    }

    fn transition(&mut self, transition: Transition) -> Result<Phase, TransitionError> {
        let phase = next_phase(query::phase(&self.world), transition)?;
        self.execute(Command::SetPhase { phase });
        debug!(?transition, ?phase, "phase transition");
        Ok(phase)
    }

    fn execute(&mut self, command: Command) {
        self.commands.push(command);
        self.flush_commands();
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
