use crate::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Logical size at which `lights_at_16` is expressed
pub const ANCHOR_SIZE: usize = 16;

/// Largest logical size a sweep may reach (an 8192 x 8192 coded square)
pub const MAX_LOGICAL_SIZE: usize = 4096;

/// `lights_at_16 * size^2 / 16^2`, or None on overflow
fn scaled_lights(lights_at_16: usize, size: usize) -> Option<usize> {
    lights_at_16
        .checked_mul(size)?
        .checked_mul(size)
        .map(|v| v / (ANCHOR_SIZE * ANCHOR_SIZE))
}

/// Configuration for a sampler-count sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Unique coordinates each sampler draws
    pub samples_per_iteration: usize,
    /// Monte Carlo trials per (size, lights) point
    pub iterations: usize,
    /// Starting sampler count when `lights_at_16` is zero
    pub initial_lights: usize,
    /// If non-zero, the starting sampler count at size 16, scaled by `k^2`
    pub lights_at_16: usize,
    /// Sampler count grows by `size / size_iter_factor` per round
    pub size_iter_factor: usize,
    /// First logical size `k`
    pub initial_size: usize,
    /// Last logical size `k` (sizes double up to and including this)
    pub max_size: usize,
    /// Success rate that ends the sweep for a size
    pub target_probability: f64,
    /// Maximum sampler-count rounds per size before giving up
    pub max_rounds: usize,
    /// Optional ceiling on the sampler count
    pub max_lights: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples_per_iteration: 16,
            iterations: 1000,
            initial_lights: 7500,
            lights_at_16: 10,
            size_iter_factor: 16,
            initial_size: 16,
            max_size: 256,
            target_probability: 0.99,
            max_rounds: 10_000,
            max_lights: None,
        }
    }
}

impl SimulationConfig {
    /// Small sizes and few trials, finishes in seconds
    pub fn quick() -> Self {
        Self {
            samples_per_iteration: 8,
            iterations: 100,
            initial_lights: 0,
            lights_at_16: 10,
            size_iter_factor: 4,
            initial_size: 4,
            max_size: 16,
            target_probability: 0.9,
            max_rounds: 2_000,
            max_lights: None,
        }
    }

    /// Tighter estimates at the cost of runtime
    pub fn thorough() -> Self {
        Self {
            iterations: 10_000,
            target_probability: 0.999,
            ..Self::default()
        }
    }

    /// Check that the sweep is well-formed and bounded
    pub fn validate(&self) -> SimResult<()> {
        if self.iterations == 0 {
            return Err(SimError::InvalidConfig("iterations must be positive".into()));
        }
        if self.initial_size == 0 {
            return Err(SimError::InvalidConfig("initial_size must be positive".into()));
        }
        if self.max_size < self.initial_size {
            return Err(SimError::InvalidConfig(format!(
                "max_size {} is smaller than initial_size {}",
                self.max_size, self.initial_size
            )));
        }
        if self.max_size > MAX_LOGICAL_SIZE {
            return Err(SimError::InvalidConfig(format!(
                "max_size {} exceeds the largest supported size {}",
                self.max_size, MAX_LOGICAL_SIZE
            )));
        }
        if self.size_iter_factor == 0 {
            return Err(SimError::InvalidConfig("size_iter_factor must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.target_probability) {
            return Err(SimError::InvalidConfig(format!(
                "target_probability {} is outside [0, 1]",
                self.target_probability
            )));
        }
        if self.max_rounds == 0 {
            return Err(SimError::InvalidConfig("max_rounds must be positive".into()));
        }

        // The anchor scales with k^2, so the largest size is the one that can overflow
        let largest = self.sizes().last().unwrap_or(self.initial_size);
        if self.lights_at_16 != 0 && scaled_lights(self.lights_at_16, largest).is_none() {
            return Err(SimError::InvalidConfig(format!(
                "lights_at_16 {} overflows at size {}",
                self.lights_at_16, largest
            )));
        }

        // Sizes only grow, so the first one is the tightest
        let side = 2 * self.initial_size;
        let available = side * side;
        if self.samples_per_iteration > available {
            return Err(SimError::SampleCapacity {
                requested: self.samples_per_iteration,
                available,
            });
        }
        Ok(())
    }

    /// Logical sizes visited by the sweep
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        let max = self.max_size;
        let first = Some(self.initial_size).filter(|&k| k > 0);
        std::iter::successors(first, |&k| k.checked_mul(2))
            .take_while(move |&k| k <= max)
    }

    /// Starting sampler count for logical size `size`, saturating at
    /// `usize::MAX` if the anchor scaling overflows
    pub fn initial_lights_for(&self, size: usize) -> usize {
        if self.lights_at_16 != 0 {
            scaled_lights(self.lights_at_16, size).unwrap_or(usize::MAX)
        } else {
            self.initial_lights
        }
    }

    /// Sampler-count increment for logical size `size`, never zero
    pub fn lights_step(&self, size: usize) -> usize {
        (size / self.size_iter_factor.max(1)).max(1)
    }
}
