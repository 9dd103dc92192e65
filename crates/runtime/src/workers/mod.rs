//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker executes combat commands; the runtime may add a
//! ticker that drives fixed steps on a wall-clock interval.

mod simulation;

pub use simulation::{Command, SimulationWorker};
