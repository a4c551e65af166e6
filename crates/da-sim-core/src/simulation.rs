//! Sweep driver.
//!
//! For each logical size the driver raises the sampler count until the
//! empirical reconstruction rate reaches the target, then doubles the size.

use crate::progress::ProgressSink;
use crate::{DataSquare, SampleSet, SimResult, SimulationConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Empirical success rate at one (size, lights) point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEstimate {
    pub size: usize,
    pub lights: usize,
    pub successes: usize,
    pub trials: usize,
    pub probability: f64,
}

impl PointEstimate {
    pub fn new(size: usize, lights: usize, successes: usize, trials: usize) -> Self {
        let probability = if trials > 0 {
            successes as f64 / trials as f64
        } else {
            0.0
        };
        Self {
            size,
            lights,
            successes,
            trials,
            probability,
        }
    }
}

/// How the sampler-count sweep ended for one size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SizeOutcome {
    /// `lights` samplers met the target probability
    Reached {
        size: usize,
        lights: usize,
        rounds: usize,
        probability: f64,
    },
    /// The round or sampler-count bound was hit first
    Exhausted {
        size: usize,
        rounds: usize,
        last_lights: Option<usize>,
        best_probability: f64,
    },
}

impl SizeOutcome {
    pub fn size(&self) -> usize {
        match *self {
            SizeOutcome::Reached { size, .. } | SizeOutcome::Exhausted { size, .. } => size,
        }
    }

    /// Number of sampler counts estimated for this size
    pub fn rounds(&self) -> usize {
        match *self {
            SizeOutcome::Reached { rounds, .. } | SizeOutcome::Exhausted { rounds, .. } => rounds,
        }
    }

    /// Minimum sampler count found, if the target was reached
    pub fn lights(&self) -> Option<usize> {
        match *self {
            SizeOutcome::Reached { lights, .. } => Some(lights),
            SizeOutcome::Exhausted { .. } => None,
        }
    }
}

/// Result of a full sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub outcomes: Vec<SizeOutcome>,
    /// Number of (size, lights) points estimated
    pub points: usize,
}

impl SimulationReport {
    pub fn lights_for(&self, size: usize) -> Option<usize> {
        self.outcomes
            .iter()
            .find(|o| o.size() == size)
            .and_then(SizeOutcome::lights)
    }

    pub fn all_reached(&self) -> bool {
        self.outcomes.iter().all(|o| o.lights().is_some())
    }
}

/// Monte Carlo driver over a validated configuration
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Create a driver, rejecting configurations that could not terminate
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// One trial: `lights` independent samplers reveal cells, then the
    /// square is decoded. `square` and `samples` are reset here.
    pub fn run_trial<R: Rng>(
        &self,
        square: &mut DataSquare,
        samples: &mut SampleSet,
        rng: &mut R,
        lights: usize,
    ) -> SimResult<bool> {
        square.reset();
        let size = square.size();
        for _ in 0..lights {
            samples.clear();
            samples.fill_unique(rng, self.config.samples_per_iteration, size)?;
            square.add_samples(samples);
        }
        samples.clear();

        let recovered = square.recover();
        trace!(
            size,
            lights,
            known = square.total_count(),
            recovered,
            "trial finished"
        );
        Ok(recovered)
    }

    /// Run `iterations` trials at one sampler count
    pub fn estimate<R: Rng>(
        &self,
        square: &mut DataSquare,
        samples: &mut SampleSet,
        rng: &mut R,
        lights: usize,
    ) -> SimResult<PointEstimate> {
        let mut successes = 0;
        for _ in 0..self.config.iterations {
            if self.run_trial(square, samples, rng, lights)? {
                successes += 1;
            }
        }
        Ok(PointEstimate::new(
            square.size(),
            lights,
            successes,
            self.config.iterations,
        ))
    }

    /// Find the smallest sampler count on the step schedule that meets the
    /// target for one logical size
    pub fn run_size<R: Rng, S: ProgressSink>(
        &self,
        size: usize,
        rng: &mut R,
        sink: &mut S,
    ) -> SimResult<SizeOutcome> {
        let mut square = DataSquare::new(size);
        let mut samples = SampleSet::with_capacity(self.config.samples_per_iteration);

        let initial = self.config.initial_lights_for(size);
        let step = self.config.lights_step(size);
        sink.on_size_start(size, initial);
        debug!(size, initial, step, "sweeping sampler count");

        let mut lights = initial;
        let mut last_lights = None;
        let mut best_probability = 0.0f64;
        let mut rounds = 0;

        while rounds < self.config.max_rounds {
            if self.config.max_lights.is_some_and(|max| lights > max) {
                break;
            }

            let point = self.estimate(&mut square, &mut samples, rng, lights)?;
            rounds += 1;
            sink.on_point(&point);
            last_lights = Some(lights);
            best_probability = best_probability.max(point.probability);

            if point.probability >= self.config.target_probability {
                return Ok(SizeOutcome::Reached {
                    size,
                    lights,
                    rounds,
                    probability: point.probability,
                });
            }

            lights = match lights.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(SizeOutcome::Exhausted {
            size,
            rounds,
            last_lights,
            best_probability,
        })
    }

    /// Sweep every configured size
    pub fn run<R: Rng, S: ProgressSink>(
        &self,
        rng: &mut R,
        mut sink: S,
    ) -> SimResult<SimulationReport> {
        sink.on_start(&self.config);

        let mut report = SimulationReport::default();
        for size in self.config.sizes() {
            let outcome = self.run_size(size, rng, &mut sink)?;
            report.points += outcome.rounds();
            sink.on_size_done(&outcome);
            report.outcomes.push(outcome);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{MemorySink, NullSink, ProgressEvent};
    use crate::{SimError, SimRng};

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            samples_per_iteration: 4,
            iterations: 20,
            initial_lights: 1,
            lights_at_16: 0,
            size_iter_factor: 1,
            initial_size: 2,
            max_size: 4,
            target_probability: 0.9,
            max_rounds: 500,
            max_lights: None,
        }
    }

    #[test]
    fn test_new_validates() {
        let config = SimulationConfig {
            iterations: 0,
            ..small_config()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_lights_never_recovers() {
        let sim = Simulation::new(small_config()).unwrap();
        let mut square = DataSquare::new(2);
        let mut samples = SampleSet::default();
        let mut rng = SimRng::with_seed(1);
        let point = sim.estimate(&mut square, &mut samples, &mut rng, 0).unwrap();
        assert_eq!(point.successes, 0);
        assert_eq!(point.trials, 20);
        assert_eq!(point.probability, 0.0);
    }

    #[test]
    fn test_saturating_sampler_always_recovers() {
        // One sampler revealing all 16 cells of a size-2 square
        let config = SimulationConfig {
            samples_per_iteration: 16,
            ..small_config()
        };
        let sim = Simulation::new(config).unwrap();
        let mut square = DataSquare::new(2);
        let mut samples = SampleSet::default();
        let mut rng = SimRng::with_seed(3);
        assert!(sim.run_trial(&mut square, &mut samples, &mut rng, 1).unwrap());
        assert!(samples.is_empty());
    }

    #[test]
    fn test_trial_resets_square() {
        let sim = Simulation::new(small_config()).unwrap();
        let mut square = DataSquare::new(2);
        for row in 0..4 {
            for col in 0..4 {
                square.add_sample(row, col);
            }
        }
        let mut samples = SampleSet::default();
        let mut rng = SimRng::with_seed(3);
        assert!(!sim.run_trial(&mut square, &mut samples, &mut rng, 0).unwrap());
        assert_eq!(square.total_count(), 0);
    }

    #[test]
    fn test_trial_propagates_capacity_error() {
        let sim = Simulation::new(SimulationConfig {
            samples_per_iteration: 16,
            initial_size: 2,
            ..small_config()
        })
        .unwrap();
        // A size-1 square only has 4 cells
        let mut square = DataSquare::new(1);
        let mut samples = SampleSet::default();
        let mut rng = SimRng::with_seed(3);
        assert!(matches!(
            sim.run_trial(&mut square, &mut samples, &mut rng, 1),
            Err(SimError::SampleCapacity { .. })
        ));
    }

    #[test]
    fn test_run_size_reaches_target() {
        let sim = Simulation::new(small_config()).unwrap();
        let mut rng = SimRng::with_seed(42);
        let mut sink = MemorySink::new();
        let outcome = sim.run_size(2, &mut rng, &mut sink).unwrap();

        let lights = outcome.lights().expect("target should be reachable");
        let points: Vec<&PointEstimate> = sink.points().collect();
        assert_eq!(points.last().unwrap().lights, lights);
        assert!(points.last().unwrap().probability >= 0.9);
        assert_eq!(outcome.rounds(), points.len());
        // Every earlier point fell short and lights grew by 2 / 1
        for pair in points.windows(2) {
            assert!(pair[0].probability < 0.9);
            assert_eq!(pair[1].lights, pair[0].lights + 2);
        }
    }

    #[test]
    fn test_unreachable_target_is_bounded() {
        let config = SimulationConfig {
            target_probability: 1.0,
            samples_per_iteration: 1,
            max_rounds: 3,
            ..small_config()
        };
        let sim = Simulation::new(config).unwrap();
        let mut rng = SimRng::with_seed(5);
        let outcome = sim.run_size(4, &mut rng, &mut NullSink).unwrap();
        match outcome {
            SizeOutcome::Exhausted {
                size,
                rounds,
                last_lights,
                ..
            } => {
                assert_eq!(size, 4);
                assert_eq!(rounds, 3);
                assert_eq!(last_lights, Some(1 + 2 * 4));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_max_lights_bound() {
        let config = SimulationConfig {
            initial_lights: 10,
            max_lights: Some(5),
            ..small_config()
        };
        let sim = Simulation::new(config).unwrap();
        let mut rng = SimRng::with_seed(5);
        let mut sink = MemorySink::new();
        let outcome = sim.run_size(2, &mut rng, &mut sink).unwrap();
        assert_eq!(
            outcome,
            SizeOutcome::Exhausted {
                size: 2,
                rounds: 0,
                last_lights: None,
                best_probability: 0.0
            }
        );
        assert_eq!(sink.points().count(), 0);
    }

    #[test]
    fn test_zero_step_does_not_stall() {
        // size 2 / factor 16 is 0 under integer division
        let config = SimulationConfig {
            size_iter_factor: 16,
            ..small_config()
        };
        let sim = Simulation::new(config).unwrap();
        let mut rng = SimRng::with_seed(8);
        let mut sink = MemorySink::new();
        let outcome = sim.run_size(2, &mut rng, &mut sink).unwrap();
        assert!(outcome.lights().is_some());
        let lights: Vec<usize> = sink.points().map(|p| p.lights).collect();
        for pair in lights.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
    }

    #[test]
    fn test_run_sweeps_all_sizes() {
        let sim = Simulation::new(small_config()).unwrap();
        let mut rng = SimRng::with_seed(42);
        let mut sink = MemorySink::new();
        let report = sim.run(&mut rng, &mut sink).unwrap();

        let sizes: Vec<usize> = report.outcomes.iter().map(SizeOutcome::size).collect();
        assert_eq!(sizes, vec![2, 4]);
        assert!(report.all_reached());
        assert_eq!(report.points, sink.points().count());
        assert!(report.lights_for(4).is_some());
        assert_eq!(report.lights_for(8), None);

        assert!(matches!(sink.events()[0], ProgressEvent::Start { .. }));
        let done = sink
            .events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::SizeDone(_)))
            .count();
        assert_eq!(done, 2);
    }

    #[test]
    fn test_same_seed_same_report() {
        let sim = Simulation::new(small_config()).unwrap();
        let a = sim.run(&mut SimRng::with_seed(99), NullSink).unwrap();
        let b = sim.run(&mut SimRng::with_seed(99), NullSink).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_point_estimate_probability() {
        let p = PointEstimate::new(16, 10, 990, 1000);
        assert!((p.probability - 0.99).abs() < 1e-12);
        assert_eq!(PointEstimate::new(16, 10, 0, 0).probability, 0.0);
    }
}
