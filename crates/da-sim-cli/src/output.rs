use da_sim_core::{
    PointEstimate, ProgressEvent, ProgressSink, SimulationConfig, SimulationReport, SizeOutcome,
};
use std::io::{self, Write};

/// Writes each progress event as one JSON object per line
pub struct JsonLinesSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn emit(&mut self, event: &ProgressEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = write_line(&mut self.out, event) {
            self.error = Some(e);
        }
    }

    /// Return the writer, or the first write error encountered
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

fn write_line<W: Write>(out: &mut W, event: &ProgressEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    out.flush()
}

impl<W: Write> ProgressSink for JsonLinesSink<W> {
    fn on_start(&mut self, config: &SimulationConfig) {
        self.emit(&ProgressEvent::Start {
            target_probability: config.target_probability,
        });
    }

    fn on_size_start(&mut self, size: usize, initial_lights: usize) {
        self.emit(&ProgressEvent::SizeStart {
            size,
            initial_lights,
        });
    }

    fn on_point(&mut self, point: &PointEstimate) {
        self.emit(&ProgressEvent::Point(point.clone()));
    }

    fn on_size_done(&mut self, outcome: &SizeOutcome) {
        self.emit(&ProgressEvent::SizeDone(outcome.clone()));
    }
}

/// Plain-text summary table of a finished sweep
pub fn write_summary<W: Write>(out: &mut W, report: &SimulationReport) -> io::Result<()> {
    writeln!(out, "{:>8}  {:>10}  {:>9}", "size", "lights", "rate")?;
    for outcome in &report.outcomes {
        match *outcome {
            SizeOutcome::Reached {
                size,
                lights,
                probability,
                ..
            } => writeln!(
                out,
                "{:>8}  {:>10}  {:>8.2}%",
                size,
                lights,
                probability * 100.0
            )?,
            SizeOutcome::Exhausted {
                size,
                best_probability,
                ..
            } => writeln!(
                out,
                "{:>8}  {:>10}  {:>8.2}%",
                size,
                "-",
                best_probability * 100.0
            )?,
        }
    }
    writeln!(out, "{} points estimated", report.points)
}
