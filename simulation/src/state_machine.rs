//! Player-driven phase transitions.
//!
//! The world moves itself into [`Phase::GameOver`]; every other phase change
//! originates from the player and is validated here.

use argent_core::Phase;
use thiserror::Error;

/// Phase changes the player may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Leaves the planning phase and starts the clock.
    Start,
    /// Suspends the clock.
    Pause,
    /// Restarts a suspended clock.
    Resume,
    /// Discards the session and returns to planning.
    Reset,
}

/// Rejection of a transition that the current phase does not allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The transition has no edge out of the phase.
    #[error("cannot {transition:?} while in {phase:?}")]
    Invalid {
        /// Phase the session was in.
        phase: Phase,
        /// Requested transition.
        transition: Transition,
    },
}

/// Computes the phase reached by applying `transition` in `phase`.
pub fn next_phase(phase: Phase, transition: Transition) -> Result<Phase, TransitionError> {
    match (phase, transition) {
        (_, Transition::Reset) => Ok(Phase::Build),
        (Phase::Build, Transition::Start) => Ok(Phase::Play),
        (Phase::Play, Transition::Pause) => Ok(Phase::Paused),
        (Phase::Paused, Transition::Resume) => Ok(Phase::Play),
        _ => Err(TransitionError::Invalid { phase, transition }),
    }
}
