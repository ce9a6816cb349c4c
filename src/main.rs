//! Dot evolution CLI - Run a scenario headless from JSON configuration.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use dot_evolution::{FrameBuffer, Population, Scenario};

/// Fixed simulation step in seconds.
const TIME_STEP: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.json> [generations] [--snapshot <frame.ppm>]", args[0]);
        eprintln!();
        eprintln!("Evolve a dot population headless from a JSON scenario.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  scenario.json  Path to scenario file");
        eprintln!("  generations    Number of generations to run (default: 10)");
        eprintln!("  --snapshot     Write the final frame as a PPM image");
        eprintln!();
        eprintln!("An example scenario is printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_scenario();
        return;
    }

    let scenario_path = PathBuf::from(&args[1]);
    let snapshot = args
        .iter()
        .position(|a| a == "--snapshot")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);
    let generations: usize = args
        .get(2)
        .filter(|a| !a.starts_with("--"))
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let scenario_str = fs::read_to_string(&scenario_path).unwrap_or_else(|e| {
        eprintln!("Error reading scenario file: {}", e);
        std::process::exit(1);
    });

    let scenario: Scenario = serde_json::from_str(&scenario_str).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = scenario.validate() {
        eprintln!("Invalid scenario: {}", e);
        std::process::exit(1);
    }

    println!("Dot Evolution");
    println!("=============");
    println!("Scenario: {}", scenario.name);
    println!("Arena: {}x{}", scenario.width, scenario.height);
    println!("Dots: {}", scenario.size);
    println!("Kill walls: {}", scenario.kill_walls().len());
    println!(
        "Kick every {}s, {}s per generation",
        scenario.kick_time, scenario.generation_time
    );
    println!("Generations: {}", generations);
    println!();

    let (width, height) = (scenario.width as usize, scenario.height as usize);
    let mut population = Population::new(scenario).unwrap_or_else(|e| {
        eprintln!("Error building population: {}", e);
        std::process::exit(1);
    });

    let start = Instant::now();
    let last = population.generation() + generations;
    let mut reported = 0;

    while population.generation() < last {
        population.step(TIME_STEP);

        for stats in &population.history()[reported..] {
            let best = stats
                .best_fitness
                .map_or_else(|| "-".to_string(), |f| format!("{:.3}", f));
            println!(
                "  Generation {}: dead {} | scored {} | active {} | avg fitness {:.3} | best {} | avg age {:.2}",
                stats.generation,
                stats.dead,
                stats.scored,
                stats.active,
                stats.avg_fitness,
                best,
                stats.avg_age
            );
        }
        reported = population.history().len();
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "Time: {:.2}s ({:.2}s per generation)",
        elapsed.as_secs_f32(),
        elapsed.as_secs_f32() / generations.max(1) as f32
    );

    if let Some(path) = snapshot {
        let mut frame = FrameBuffer::new(width, height);
        population.draw(&mut frame);
        let written = File::create(&path).and_then(|f| frame.write_ppm(BufWriter::new(f)));
        match written {
            Ok(()) => println!("Snapshot written to {}", path.display()),
            Err(e) => {
                eprintln!("Error writing snapshot: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_example_scenario() {
    let scenario = Scenario::default();
    match serde_json::to_string_pretty(&scenario) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing scenario: {}", e);
            std::process::exit(1);
        }
    }
}
