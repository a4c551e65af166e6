//! Basic example of using the reconstruction simulator

use da_sim_core::{DataSquare, MemorySink, SampleSet, SimRng, Simulation, SimulationConfig};

fn main() {
    let mut rng = SimRng::with_seed(1);

    // Decode a single hand-built square
    println!("Two full rows of a size-2 square:\n");
    let mut square = DataSquare::new(2);
    for row in 0..2 {
        for col in 0..square.side() {
            square.add_sample(row, col);
        }
    }
    println!("{}", square);
    println!("Recovered: {}", square.recover());
    println!("After decoding:\n{}", square);

    // Twenty light nodes, eight cells each, on a size-8 square
    println!("--- Random sampling ---\n");
    let mut square = DataSquare::new(8);
    let mut samples = SampleSet::with_capacity(8);
    for _ in 0..20 {
        samples
            .fill_unique(&mut rng, 8, square.size())
            .expect("8 cells fit in a 16x16 square");
        square.add_samples(&samples);
        samples.clear();
    }
    println!("Known cells: {}", square.total_count());
    println!("Recovered: {}\n", square.recover());

    // A short sweep. No tracing subscriber is installed here, so progress is
    // collected in memory and printed afterwards.
    println!("--- Quick sweep ---\n");
    let simulation = Simulation::new(SimulationConfig::quick()).expect("preset is valid");
    let mut sink = MemorySink::new();
    match simulation.run(&mut rng, &mut sink) {
        Ok(report) => {
            for point in sink.points() {
                println!(
                    "size {:>3}, {:>5} lights: {:.2}%",
                    point.size,
                    point.lights,
                    point.probability * 100.0
                );
            }
            println!();
            for outcome in &report.outcomes {
                match outcome.lights() {
                    Some(lights) => println!("size {:>3}: {} light nodes", outcome.size(), lights),
                    None => println!("size {:>3}: target not reached", outcome.size()),
                }
            }
        }
        Err(e) => println!("Sweep failed: {}", e),
    }
}
