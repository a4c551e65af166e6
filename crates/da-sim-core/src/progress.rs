//! Progress reporting for sweeps.
//!
//! The driver never formats output itself. It hands records to a
//! [`ProgressSink`]:
//! - [`TracingSink`]: structured `tracing` events (default)
//! - [`MemorySink`]: keeps every event, for tests and embedding
//! - [`NullSink`]: discards everything

use crate::simulation::{PointEstimate, SizeOutcome};
use crate::SimulationConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One progress record emitted by a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Start { target_probability: f64 },
    SizeStart { size: usize, initial_lights: usize },
    Point(PointEstimate),
    SizeDone(SizeOutcome),
}

/// Receiver for sweep progress
pub trait ProgressSink {
    /// Called once before the first size
    fn on_start(&mut self, _config: &SimulationConfig) {}

    /// A new logical size begins at `initial_lights` samplers
    fn on_size_start(&mut self, size: usize, initial_lights: usize);

    /// One (size, lights) point has been estimated
    fn on_point(&mut self, point: &PointEstimate);

    /// A size finished, either at target or at its bound
    fn on_size_done(&mut self, outcome: &SizeOutcome);
}

/// Logs progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_start(&mut self, config: &SimulationConfig) {
        info!(
            target_probability = config.target_probability,
            "Starting simulation with target probability {:.2}%",
            config.target_probability * 100.0
        );
    }

    fn on_size_start(&mut self, size: usize, initial_lights: usize) {
        info!(size, initial_lights, "Processing size {0}x{0}", size * 2);
    }

    fn on_point(&mut self, point: &PointEstimate) {
        info!(
            size = point.size,
            lights = point.lights,
            "Lights: {}, Success Rate: {:.2}% ({}/{})",
            point.lights,
            point.probability * 100.0,
            point.successes,
            point.trials
        );
    }

    fn on_size_done(&mut self, outcome: &SizeOutcome) {
        match *outcome {
            SizeOutcome::Reached { size, lights, .. } => {
                info!(
                    size,
                    lights,
                    "Target probability reached for size {} with {} lights",
                    size,
                    lights
                );
            }
            SizeOutcome::Exhausted {
                size,
                rounds,
                best_probability,
                ..
            } => {
                warn!(
                    size,
                    rounds,
                    "Target not reached for size {} after {} rounds (best {:.2}%)",
                    size,
                    rounds,
                    best_probability * 100.0
                );
            }
        }
    }
}

/// Collects every event in order
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<ProgressEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Point estimates only, in emission order
    pub fn points(&self) -> impl Iterator<Item = &PointEstimate> {
        self.events.iter().filter_map(|e| match e {
            ProgressEvent::Point(p) => Some(p),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ProgressSink for MemorySink {
    fn on_start(&mut self, config: &SimulationConfig) {
        self.events.push(ProgressEvent::Start {
            target_probability: config.target_probability,
        });
    }

    fn on_size_start(&mut self, size: usize, initial_lights: usize) {
        self.events.push(ProgressEvent::SizeStart {
            size,
            initial_lights,
        });
    }

    fn on_point(&mut self, point: &PointEstimate) {
        self.events.push(ProgressEvent::Point(point.clone()));
    }

    fn on_size_done(&mut self, outcome: &SizeOutcome) {
        self.events.push(ProgressEvent::SizeDone(outcome.clone()));
    }
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_size_start(&mut self, _size: usize, _initial_lights: usize) {}
    fn on_point(&mut self, _point: &PointEstimate) {}
    fn on_size_done(&mut self, _outcome: &SizeOutcome) {}
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn on_start(&mut self, config: &SimulationConfig) {
        (**self).on_start(config)
    }

    fn on_size_start(&mut self, size: usize, initial_lights: usize) {
        (**self).on_size_start(size, initial_lights)
    }

    fn on_point(&mut self, point: &PointEstimate) {
        (**self).on_point(point)
    }

    fn on_size_done(&mut self, outcome: &SizeOutcome) {
        (**self).on_size_done(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lights: usize, successes: usize) -> PointEstimate {
        PointEstimate::new(4, lights, successes, 10)
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        sink.on_start(&SimulationConfig::default());
        sink.on_size_start(4, 2);
        sink.on_point(&point(2, 3));
        sink.on_point(&point(3, 10));
        sink.on_size_done(&SizeOutcome::Reached {
            size: 4,
            lights: 3,
            rounds: 2,
            probability: 1.0,
        });

        assert_eq!(sink.events().len(), 5);
        assert!(matches!(
            sink.events()[1],
            ProgressEvent::SizeStart {
                size: 4,
                initial_lights: 2
            }
        ));
        let lights: Vec<usize> = sink.points().map(|p| p.lights).collect();
        assert_eq!(lights, vec![2, 3]);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_sink_through_mut_ref() {
        fn feed<S: ProgressSink>(mut sink: S) {
            sink.on_size_start(8, 1);
        }
        let mut sink = MemorySink::new();
        feed(&mut sink);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_event_json_shape() {
        let event = ProgressEvent::SizeStart {
            size: 16,
            initial_lights: 10,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "size_start");
        assert_eq!(json["size"], 16);
    }
}
