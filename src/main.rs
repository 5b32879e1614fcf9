use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SNAPSHOT: i32 = 2;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full standings: overall plus each round (default if no subcommand)
    Standings,
    /// Per-round participant counts after gender capping
    Progression,
}

#[derive(Parser, Debug)]
#[command(name = "pageant-tally")]
#[command(about = "Live tabulation for judged competitions", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the snapshot file, .json or .yaml (defaults to snapshot.json)
    #[arg(short, long, global = true)]
    snapshot: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Standings);
    let start_time = Instant::now();

    let snapshot_path = PathBuf::from(cli.snapshot.unwrap_or_else(|| "snapshot.json".to_string()));
    let snapshot = match pageant_tally::snapshot::load_snapshot(&snapshot_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Snapshot error: {}", e);
            std::process::exit(EXIT_SNAPSHOT);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} contestants, {} judges, {} categories, {} rounds, {} score records",
            snapshot.contestants.len(),
            snapshot.judges.len(),
            snapshot.categories.len(),
            snapshot.rounds.len(),
            snapshot.scores.len()
        );
    }

    // Findings are advisory: the engine degrades gracefully on all of them.
    if let Err(findings) = pageant_tally::scoring::validate_snapshot(&snapshot) {
        eprintln!("Snapshot findings:");
        for finding in &findings {
            eprintln!("  - {}", finding);
        }
    }

    let standings = pageant_tally::scoring::compute_standings(&snapshot);
    let use_colors = pageant_tally::output::should_use_colors();

    match command {
        Commands::Standings => {
            if cli.verbose && !standings.overall.rankings.is_empty() {
                // Verbose mode: per-contestant category breakdowns
                for entry in &standings.overall.rankings {
                    println!(
                        "{}",
                        pageant_tally::output::format_entry_detail(entry, use_colors)
                    );
                    println!();
                }
            }
            println!(
                "{}",
                pageant_tally::output::format_standings(&standings, use_colors)
            );
        }
        Commands::Progression => {
            println!(
                "{}",
                pageant_tally::output::format_progression(&standings.progression(), use_colors)
            );
        }
    }

    if cli.verbose {
        eprintln!();
        eprintln!(
            "Tabulated {} contestants across {} rounds in {:?}",
            standings.overall.rankings.len(),
            standings.rounds.len(),
            start_time.elapsed()
        );
    }

    std::process::exit(EXIT_SUCCESS);
}
