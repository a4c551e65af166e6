use clap::{Parser, ValueEnum};
use da_sim_core::{SimError, SimResult, SimulationConfig};
use std::path::PathBuf;

/// Base configuration to start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Default,
    Quick,
    Thorough,
}

impl Preset {
    pub fn config(self) -> SimulationConfig {
        match self {
            Preset::Default => SimulationConfig::default(),
            Preset::Quick => SimulationConfig::quick(),
            Preset::Thorough => SimulationConfig::thorough(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "da-sim",
    version,
    about = "Estimate how many light nodes are needed to reconstruct a 2D erasure-coded square"
)]
pub struct Cli {
    /// Built-in configuration to start from
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    pub preset: Preset,

    /// JSON configuration file (missing fields fall back to defaults)
    #[arg(short, long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Seed for the random source
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Seed from OS entropy instead of --seed
    #[arg(long, conflicts_with = "seed")]
    pub entropy: bool,

    /// Emit progress as JSON lines on stdout
    #[arg(long)]
    pub json: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Unique cells each light node samples
    #[arg(long)]
    pub samples: Option<usize>,

    /// Trials per (size, lights) point
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Starting light count when --lights-at-16 is 0
    #[arg(long)]
    pub initial_lights: Option<usize>,

    /// Starting light count at size 16, scaled by size^2
    #[arg(long)]
    pub lights_at_16: Option<usize>,

    /// Light count grows by size / this per round
    #[arg(long)]
    pub size_iter_factor: Option<usize>,

    /// First logical size
    #[arg(long)]
    pub initial_size: Option<usize>,

    /// Last logical size
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Success rate that ends the sweep for a size
    #[arg(short, long)]
    pub target: Option<f64>,

    /// Rounds per size before giving up
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Light count ceiling per size
    #[arg(long)]
    pub max_lights: Option<usize>,
}

impl Cli {
    /// Resolve preset or file, then apply flag overrides and validate
    pub fn build_config(&self) -> SimResult<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => self.preset.config(),
        };

        if let Some(v) = self.samples {
            config.samples_per_iteration = v;
        }
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.initial_lights {
            config.initial_lights = v;
        }
        if let Some(v) = self.lights_at_16 {
            config.lights_at_16 = v;
        }
        if let Some(v) = self.size_iter_factor {
            config.size_iter_factor = v;
        }
        if let Some(v) = self.initial_size {
            config.initial_size = v;
        }
        if let Some(v) = self.max_size {
            config.max_size = v;
        }
        if let Some(v) = self.target {
            config.target_probability = v;
        }
        if let Some(v) = self.max_rounds {
            config.max_rounds = v;
        }
        if self.max_lights.is_some() {
            config.max_lights = self.max_lights;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Read a JSON configuration file
pub fn load_config(path: &std::path::Path) -> SimResult<SimulationConfig> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| SimError::InvalidConfig(format!("{}: {}", path.display(), e)))
}
