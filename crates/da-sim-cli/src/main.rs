mod args;
mod output;

use args::Cli;
use clap::Parser;
use da_sim_core::{SimError, SimResult, SimRng, Simulation, TracingSink};
use output::JsonLinesSink;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so --json output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> SimResult<()> {
    let config = cli.build_config()?;

    let mut stdout = io::stdout().lock();
    if cli.print_config {
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        writeln!(stdout, "{}", json)?;
        return Ok(());
    }

    let (mut rng, seed) = if cli.entropy {
        SimRng::from_os_entropy()
    } else {
        (SimRng::with_seed(cli.seed), cli.seed)
    };
    info!(seed, "random source ready");

    let simulation = Simulation::new(config)?;
    if cli.json {
        let mut sink = JsonLinesSink::new(stdout);
        simulation.run(&mut rng, &mut sink)?;
        sink.finish()?;
    } else {
        let report = simulation.run(&mut rng, TracingSink)?;
        output::write_summary(&mut stdout, &report)?;
    }
    Ok(())
}
