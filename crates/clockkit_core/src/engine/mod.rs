//! Countdown timer and stopwatch engines plus the seams they are driven through.
//!
//! # Responsibility
//! - Keep remaining/elapsed time anchored to wall-clock instants.
//! - Own the tick source and alert output so every state exit releases them.
//!
//! # Invariants
//! - Display values are recomputed from absolute timestamps on every read;
//!   a delayed or dropped tick never skews them.
//! - Pause/reset/finish cancel the tick source before returning; a tick that
//!   still arrives afterwards is a no-op.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod alert;
pub mod clock;
pub mod stopwatch;
pub mod tick;
pub mod timer;

/// Operation invoked from a state that does not permit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { state, action } => {
                write!(f, "cannot {action} while {state}")
            }
        }
    }
}

impl Error for EngineError {}
