//! Monte Carlo estimation of reconstruction probability for
//! two-dimensional erasure-coded data squares.
//!
//! A logical `k x k` square is extended to a `2k x 2k` coded square. Light
//! nodes each reveal a batch of random cells; a row or column with at least
//! `k` known cells can be decoded, which may unlock crossing lines in turn.
//! The [`Simulation`] driver finds, per size, the smallest number of light
//! nodes for which the square is reconstructable with a target probability.

pub mod config;
pub mod error;
pub mod grid;
pub mod progress;
pub mod rng;
pub mod sample;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{SimError, SimResult};
pub use grid::DataSquare;
pub use progress::{MemorySink, NullSink, ProgressEvent, ProgressSink, TracingSink};
pub use rng::SimRng;
pub use sample::{Coordinate, SampleSet};
pub use simulation::{PointEstimate, Simulation, SimulationReport, SizeOutcome};
