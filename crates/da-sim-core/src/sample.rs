use crate::{SimError, SimResult};
use rand::Rng;
use std::collections::HashSet;

/// A cell position in the coded square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Duplicate-free batch of coordinates drawn by one sampler.
///
/// Reused across samplers: fill, hand to the square, clear.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    samples: HashSet<Coordinate>,
}

impl SampleSet {
    /// Create an empty set with room for `capacity` coordinates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: HashSet::with_capacity(capacity),
        }
    }

    /// Add `count` new distinct coordinates, each component uniform in
    /// `[0, 2 * size)`.
    ///
    /// Uses rejection sampling. Fails up front when the square cannot hold
    /// that many more distinct cells instead of drawing forever.
    pub fn fill_unique<R: Rng>(
        &mut self,
        rng: &mut R,
        count: usize,
        size: usize,
    ) -> SimResult<()> {
        let side = size.saturating_mul(2);
        let available = side.saturating_mul(side);
        let requested = self.samples.len().saturating_add(count);
        if requested > available {
            return Err(SimError::SampleCapacity {
                requested,
                available,
            });
        }

        while self.samples.len() < requested {
            let row = rng.gen_range(0..side);
            let col = rng.gen_range(0..side);
            self.samples.insert(Coordinate { row, col });
        }
        Ok(())
    }

    /// Remove all coordinates, keeping the allocation
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.samples.contains(coord)
    }

    pub fn insert(&mut self, coord: Coordinate) -> bool {
        self.samples.insert(coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.samples.iter()
    }
}

impl FromIterator<Coordinate> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Coordinate;
    type IntoIter = std::collections::hash_set::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
