//! Deterministic flight simulation
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time only advances through `FlightSession::tick`
//! - Seeded RNG only
//! - No rendering or platform calls; effects are queued as commands

pub mod collision;
pub mod flight;
pub mod input;
pub mod session;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wind;

pub use collision::{ExitEdge, check_exit};
pub use flight::{apex_height, in_flight_envelope, integrate};
pub use input::{InputMode, Nudge, SwipeTracker, TouchPoint};
pub use session::{DebugSnapshot, FlightSession};
pub use state::{BalloonColor, BalloonState, FlightPhase, RngState, TouchForceState};
pub use timer::{SessionTimer, StopwatchTime};
pub use wind::{WindChange, WindPhase, WindState};
