//! DataSquare: known-cell state of one 2k x 2k coded square.
//!
//! Rows and columns are the two halves of a bipartite structure: every cell
//! links one row to one column. A line with at least `k` known cells is
//! decodable, and decoding it fills cells that may push crossing lines over
//! their own threshold.

use crate::{Coordinate, SampleSet, SimError, SimResult};
use std::fmt;

/// A single row or column of the square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Col(usize),
}

/// Coded square of side `2 * size` for logical size `size`.
#[derive(Debug, Clone)]
pub struct DataSquare {
    size: usize,
    side: usize,
    /// Known flags, indexed by `row * side + col`
    cells: Vec<bool>,
    row_counts: Vec<usize>,
    col_counts: Vec<usize>,
    recovered_rows: Vec<bool>,
    recovered_cols: Vec<bool>,
    recovered_row_count: usize,
    recovered_col_count: usize,
    total_count: usize,
    /// Lines that gained a cell during a cascade and still need a threshold check
    pending: Vec<Line>,
}

impl DataSquare {
    /// Create an empty square for logical size `size`.
    ///
    /// Allocates `(2 * size)^2` cells; callers keep `size` within
    /// [`MAX_LOGICAL_SIZE`](crate::config::MAX_LOGICAL_SIZE).
    pub fn new(size: usize) -> Self {
        let side = 2 * size;
        Self {
            size,
            side,
            cells: vec![false; side * side],
            row_counts: vec![0; side],
            col_counts: vec![0; side],
            recovered_rows: vec![false; side],
            recovered_cols: vec![false; side],
            recovered_row_count: 0,
            recovered_col_count: 0,
            total_count: 0,
            pending: Vec::with_capacity(side),
        }
    }

    /// Clear all known cells and recovery marks, keeping the allocations
    pub fn reset(&mut self) {
        self.cells.fill(false);
        self.row_counts.fill(0);
        self.col_counts.fill(0);
        self.recovered_rows.fill(false);
        self.recovered_cols.fill(false);
        self.recovered_row_count = 0;
        self.recovered_col_count = 0;
        self.total_count = 0;
        self.pending.clear();
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }

    /// Logical size `k`
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of the coded square (`2k`)
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn is_known(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    pub fn row_count(&self, row: usize) -> usize {
        self.row_counts[row]
    }

    pub fn col_count(&self, col: usize) -> usize {
        self.col_counts[col]
    }

    pub fn row_counts(&self) -> &[usize] {
        &self.row_counts
    }

    pub fn col_counts(&self) -> &[usize] {
        &self.col_counts
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Recount known cells from the matrix itself
    pub fn known_cells(&self) -> usize {
        self.cells.iter().filter(|&&known| known).count()
    }

    pub fn is_row_recovered(&self, row: usize) -> bool {
        self.recovered_rows[row]
    }

    pub fn is_col_recovered(&self, col: usize) -> bool {
        self.recovered_cols[col]
    }

    pub fn recovered_row_count(&self) -> usize {
        self.recovered_row_count
    }

    pub fn recovered_col_count(&self) -> usize {
        self.recovered_col_count
    }

    /// Indices of rows that have been reconstructed
    pub fn recovered_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.recovered_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &done)| done.then_some(i))
    }

    /// Indices of columns that have been reconstructed
    pub fn recovered_cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.recovered_cols
            .iter()
            .enumerate()
            .filter_map(|(i, &done)| done.then_some(i))
    }

    // ==================== Cell mutation ====================

    /// Mark a cell known. Returns false if it was already known.
    pub fn add_sample(&mut self, row: usize, col: usize) -> bool {
        let idx = self.index(row, col);
        if self.cells[idx] {
            return false;
        }
        self.cells[idx] = true;
        self.row_counts[row] += 1;
        self.col_counts[col] += 1;
        self.total_count += 1;
        true
    }

    /// Checked variant of [`add_sample`](Self::add_sample) for untrusted coordinates
    pub fn try_add_sample(&mut self, row: usize, col: usize) -> SimResult<bool> {
        if row >= self.side || col >= self.side {
            return Err(SimError::CoordinateOutOfRange {
                row,
                col,
                side: self.side,
            });
        }
        Ok(self.add_sample(row, col))
    }

    /// Apply every coordinate of a sampler's batch. Returns how many were new.
    pub fn add_samples(&mut self, samples: &SampleSet) -> usize {
        samples
            .iter()
            .filter(|&&Coordinate { row, col }| self.add_sample(row, col))
            .count()
    }

    // ==================== Reconstruction ====================

    /// Decode `row` if it has enough known cells, cascading into any column
    /// that gains a cell. Returns false if the row was already recovered or
    /// is below threshold.
    pub fn try_recover_row(&mut self, row: usize) -> bool {
        self.try_recover(Line::Row(row))
    }

    /// Column mirror of [`try_recover_row`](Self::try_recover_row)
    pub fn try_recover_col(&mut self, col: usize) -> bool {
        self.try_recover(Line::Col(col))
    }

    fn try_recover(&mut self, line: Line) -> bool {
        if !self.mark_recovered(line) {
            return false;
        }
        self.fill_line(line);

        // Worklist instead of row/col mutual recursion. Each line passes
        // mark_recovered at most once, so this drains in O(k^2).
        while let Some(next) = self.pending.pop() {
            if self.mark_recovered(next) {
                self.fill_line(next);
            }
        }
        true
    }

    /// Flag a line as recovered if it is new and at threshold
    fn mark_recovered(&mut self, line: Line) -> bool {
        match line {
            Line::Row(row) => {
                if self.recovered_rows[row] || self.row_counts[row] < self.size {
                    return false;
                }
                self.recovered_rows[row] = true;
                self.recovered_row_count += 1;
            }
            Line::Col(col) => {
                if self.recovered_cols[col] || self.col_counts[col] < self.size {
                    return false;
                }
                self.recovered_cols[col] = true;
                self.recovered_col_count += 1;
            }
        }
        true
    }

    /// Fill every unknown cell of a decoded line and queue the crossing lines
    fn fill_line(&mut self, line: Line) {
        match line {
            Line::Row(row) => {
                for col in 0..self.side {
                    if self.add_sample(row, col) {
                        self.pending.push(Line::Col(col));
                    }
                }
            }
            Line::Col(col) => {
                for row in 0..self.side {
                    if self.add_sample(row, col) {
                        self.pending.push(Line::Row(row));
                    }
                }
            }
        }
    }

    /// True once `k` rows or `k` columns are reconstructed
    pub fn is_recovered(&self) -> bool {
        self.recovered_row_count >= self.size || self.recovered_col_count >= self.size
    }

    /// Run the decoder to a fixpoint. Returns whether the square is fully
    /// reconstructable from the cells known so far.
    pub fn recover(&mut self) -> bool {
        if self.total_count < self.size * self.size {
            return false;
        }

        loop {
            let mut row_recovered = false;
            let mut col_recovered = false;
            for i in 0..self.side {
                row_recovered |= self.try_recover_row(i);
                col_recovered |= self.try_recover_col(i);
            }

            if self.is_recovered() {
                return true;
            }
            if !row_recovered && !col_recovered {
                return false;
            }
        }
    }
}

impl fmt::Display for DataSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.side {
            for col in 0..self.side {
                let c = if self.is_known(row, col) { '#' } else { '.' };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
