//! Brea Arena CLI
//!
//! Usage:
//!   brea-arena --requester me.json --candidate them.json     # Offline compatibility report
//!   brea-arena --requester me.json --candidate them.json --json
//!   brea-arena --serve                                       # HTTP API server
//!   brea-arena --serve --rng-seed 42 --config arena.json

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use brea_arena::core::{
    load_config, run_server, seed_personas, Arena, ArenaConfig, CandidateSelector,
    CompatibilityAnalyzer, InMemoryStore, ProfileStore, SharedArena,
};
use brea_arena::types::{AnalysisResult, ArenaError, ArenaResult, ConfidenceLevel, Profile};
use brea_arena::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "brea-arena",
    version = VERSION,
    about = "Brea Arena - Compatibility simulation between dating profiles",
    long_about = "Brea Arena scores how well two profiles fit together.\n\n\
                  It compares values, dealbreakers and personality tags,\n\
                  lists the evidence behind the score and the topics\n\
                  neither profile answers yet.\n\n\
                  Modes:\n  \
                  --requester/--candidate  Offline report for two profile files\n  \
                  --serve                  HTTP API server mode\n\n\
                  Confidence:\n  \
                  HIGH    - Plenty of positives, few open questions\n  \
                  MEDIUM  - Mixed evidence\n  \
                  LOW     - Many frictions or open questions"
)]
struct Args {
    /// Requester profile (JSON file)
    #[arg(short, long)]
    requester: Option<PathBuf>,

    /// Candidate profile (JSON file)
    #[arg(short, long)]
    candidate: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Arena config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Seed for candidate selection (reproducible runs)
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Start the server without the built-in personas
    #[arg(long)]
    no_seed_personas: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match &args.config {
        Some(path) => load_config(path),
        None => Ok(ArenaConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let result = if args.serve {
        run_serve(&args, &config).await
    } else {
        match (&args.requester, &args.candidate) {
            (Some(requester), Some(candidate)) => run_report(requester, candidate, &args, &config),
            _ => Err(ArenaError::Config(
                "need --requester and --candidate, or --serve".to_string(),
            )),
        }
    };

    if let Err(e) = result {
        fail(&e);
    }
}

fn fail(err: &ArenaError) -> ! {
    eprintln!("{} {} ({})", "error:".red().bold(), err, err.code());
    std::process::exit(1);
}

fn read_profile(path: &Path) -> ArenaResult<Profile> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ArenaError::Config(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map_err(|e| ArenaError::Config(format!("{}: {}", path.display(), e)))
}

/// Offline analysis of two profile files
fn run_report(
    requester_path: &Path,
    candidate_path: &Path,
    args: &Args,
    config: &ArenaConfig,
) -> ArenaResult<()> {
    let requester = read_profile(requester_path)?;
    let candidate = read_profile(candidate_path)?;
    let analyzer = CompatibilityAnalyzer::with_config(config.scoring.clone());
    let result = analyzer.analyze(&requester, &candidate);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| ArenaError::Storage(e.to_string()))?;
        println!("{}", json);
    } else {
        print_report(&requester, &candidate, &result);
    }
    Ok(())
}

fn print_report(requester: &Profile, candidate: &Profile, result: &AnalysisResult) {
    println!(
        "{}",
        format!(
            "Brea Arena v{} - {} x {}",
            VERSION,
            requester.display_name_or_anonymous(),
            candidate.display_name_or_anonymous()
        )
        .bold()
    );
    println!();

    let confidence = match result.confidence {
        ConfidenceLevel::High => result.confidence.as_str().green(),
        ConfidenceLevel::Medium => result.confidence.as_str().yellow(),
        ConfidenceLevel::Low => result.confidence.as_str().red(),
    };
    println!("  score={} | confidence={}", result.score.to_string().bold(), confidence);

    if !result.shared_values.is_empty() {
        println!("  shared: {}", result.shared_values.join(", ").cyan());
    }

    for profile in [requester, candidate] {
        if profile.personality_tags.is_empty() {
            println!(
                "  {}",
                format!("{} has no personality tags yet", profile.display_name_or_anonymous()).dimmed()
            );
        }
    }

    println!();
    for positive in &result.positives {
        println!("  {} {}", "+".green(), positive);
    }
    for friction in &result.frictions {
        println!("  {} {}", "-".red(), friction);
    }
    for unknown in &result.unknowns {
        println!("  {} {}", "?".yellow(), unknown.question);
        println!("    {}", unknown.reason.dimmed());
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: &ArenaConfig) -> ArenaResult<()> {
    let store = Arc::new(InMemoryStore::new());
    if !args.no_seed_personas {
        let added = seed_personas(store.as_ref()).await?;
        tracing::info!(added, "seed personas ready");
    }

    let selector = match args.rng_seed {
        Some(seed) => CandidateSelector::seeded(seed),
        None => CandidateSelector::from_entropy(),
    };
    let store: Arc<dyn ProfileStore> = store;
    let arena: SharedArena = Arc::new(Arena::new(store, config, selector));

    println!();
    println!("{}", format!("Brea Arena API Server v{}", VERSION).bold());
    println!("  listening on {}", args.addr.cyan());
    println!();

    run_server(&args.addr, arena)
        .await
        .map_err(|e| ArenaError::Storage(format!("server error: {}", e)))
}
