mod deck;
mod prob;
mod rng;
mod simulation;
mod strategy;

use clap::{Parser, Subcommand};
use deck::{DeckConfig, SimDeck};
use indicatif::{ProgressBar, ProgressStyle};
use prob::hypergeometric::{at_least, exactly};
use rng::SimRng;
use simulation::discover::{simulate_discover_chain, DEFAULT_DISCOVER_ITERATIONS, MAX_CHAIN_DEPTH};
use simulation::reveal::{
    simulate_permanent_streak, simulate_type_diversity, DEFAULT_REVEAL_ITERATIONS,
};
use strategy::marginal::marginal_value_for;
use strategy::mulligan::{compute_strategy, MulliganParams, Strategy};

#[derive(Parser)]
#[command(name = "mtg-odds")]
#[command(about = "Draw odds and mulligan strategy calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hypergeometric draw-odds table for a single card type
    Odds {
        /// Library size
        #[arg(short = 'd', long, default_value = "99")]
        deck_size: u32,

        /// Copies of the card type in the library
        #[arg(short, long)]
        copies: u32,

        /// Cards drawn
        #[arg(short = 'n', long, default_value = "7")]
        draws: u32,
    },

    /// Keep/mulligan strategy for a deck configuration
    Strategy {
        /// Deck configuration JSON file
        #[arg(short, long, default_value = "deck.json")]
        config: String,

        /// Fractional success cost of a mulligan
        #[arg(short, long, default_value = "0.2")]
        penalty: f64,

        /// First mulligan is free
        #[arg(short, long)]
        free_mulligan: bool,

        /// On the play (one fewer draw by the deciding turn)
        #[arg(short, long)]
        on_the_play: bool,

        /// Save a timestamped JSON report
        #[arg(short, long)]
        save: bool,
    },

    /// Marginal value of one extra copy of each tracked type
    Marginal {
        /// Deck configuration JSON file
        #[arg(short, long, default_value = "deck.json")]
        config: String,

        /// Fractional success cost of a mulligan
        #[arg(short, long, default_value = "0.2")]
        penalty: f64,

        /// First mulligan is free
        #[arg(short, long)]
        free_mulligan: bool,

        /// On the play
        #[arg(short, long)]
        on_the_play: bool,
    },

    /// Reveal simulations: permanent streaks and type diversity
    Reveal {
        /// Monte Carlo deck JSON file
        #[arg(short, long, default_value = "simdeck.json")]
        deck: String,

        /// Cards revealed for the diversity count
        #[arg(short, long, default_value = "5")]
        reveal_count: usize,

        /// Trials to run
        #[arg(short, long, default_value_t = DEFAULT_REVEAL_ITERATIONS)]
        iterations: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Discover-chain simulation
    Discover {
        /// Monte Carlo deck JSON file
        #[arg(short, long, default_value = "simdeck.json")]
        deck: String,

        /// Initial discover threshold (mana value)
        #[arg(short, long)]
        threshold: u32,

        /// Chain depth cap
        #[arg(long, default_value_t = MAX_CHAIN_DEPTH)]
        depth: usize,

        /// Trials to run
        #[arg(short, long, default_value_t = DEFAULT_DISCOVER_ITERATIONS)]
        iterations: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Odds { deck_size, copies, draws } => {
            print_odds(deck_size, copies, draws);
        }
        Commands::Strategy { config, penalty, free_mulligan, on_the_play, save } => {
            let deck = load_deck_config(&config);
            let params = MulliganParams { penalty, free_mulligan, on_the_play };
            run_strategy(&config, &deck, &params, save);
        }
        Commands::Marginal { config, penalty, free_mulligan, on_the_play } => {
            let deck = load_deck_config(&config);
            let params = MulliganParams { penalty, free_mulligan, on_the_play };
            run_marginal(&config, &deck, &params);
        }
        Commands::Reveal { deck, reveal_count, iterations, seed } => {
            let sim_deck = load_sim_deck(&deck);
            run_reveal(&deck, &sim_deck, reveal_count, iterations, seed);
        }
        Commands::Discover { deck, threshold, depth, iterations, seed } => {
            let sim_deck = load_sim_deck(&deck);
            run_discover(&deck, &sim_deck, threshold, depth, iterations, seed);
        }
    }
}

fn load_deck_config(path: &str) -> DeckConfig {
    match DeckConfig::from_file(path) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("✗ Failed to load deck config '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn load_sim_deck(path: &str) -> SimDeck {
    match SimDeck::from_file(path) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("✗ Failed to load simulation deck '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn bar(fraction: f64) -> String {
    "█".repeat((fraction * 50.0) as usize)
}

fn print_odds(deck_size: u32, copies: u32, draws: u32) {
    println!("\n=== Draw Odds ===\n");
    println!("Library: {} cards, {} copies, drawing {}", deck_size, copies, draws);
    println!();
    println!("{:>4} {:>10} {:>10}", "k", "exactly", "at least");
    println!("{}", "-".repeat(40));
    for k in 0..=draws.min(copies) {
        let pe = exactly(deck_size, copies, draws, k);
        let pa = at_least(deck_size, copies, draws, k);
        println!("{:>4} {:>9.2}% {:>9.2}% {}", k, pe * 100.0, pa * 100.0, bar(pe));
    }
}

fn run_strategy(config_file: &str, deck: &DeckConfig, params: &MulliganParams, save: bool) {
    println!("\n=== Mulligan Strategy ===\n");
    println!(
        "Deck: {} ({} cards, {} tracked types)",
        config_file,
        deck.deck_size,
        deck.types.len()
    );
    println!(
        "Penalty: {:.0}% | Free mulligan: {} | On the play: {}",
        params.penalty * 100.0,
        params.free_mulligan,
        params.on_the_play
    );
    println!();

    let strategy = match compute_strategy(deck, params) {
        Some(s) => s,
        None => {
            eprintln!("✗ Degenerate deck configuration; nothing to compute");
            std::process::exit(1);
        }
    };

    let names: Vec<&str> = deck.types.iter().map(|t| t.name.as_str()).collect();
    println!("{:24} {:>9} {:>9}  {}", names.join("/"), "hand", "success", "keep");
    println!("{}", "-".repeat(56));
    for hand in &strategy.hands {
        let counts = hand
            .counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("/");
        println!(
            "{:24} {:>8.3}% {:>8.2}%  {}",
            counts,
            hand.hand_prob * 100.0,
            hand.success_prob * 100.0,
            if hand.keep { "keep" } else { "mulligan" }
        );
    }

    println!();
    println!("Best keepable hand: {:.2}%", strategy.best_keep_prob * 100.0);
    println!("Keep threshold:     {:.2}%", strategy.threshold * 100.0);
    println!("Keep a fresh 7:     {:.2}%", strategy.keep_prob * 100.0);
    println!("Expected success:   {:.2}%", strategy.expected_success * 100.0);
    println!("Average mulligans:  {:.3}", strategy.avg_mulligans);
    println!("Expected hand size: {:.2}", strategy.expected_cards);

    if save {
        match save_strategy_report(config_file, deck, params, &strategy) {
            Ok(filename) => println!("\nReport saved to: {}", filename),
            Err(e) => eprintln!("\n✗ Failed to save report: {}", e),
        }
    }
}

#[derive(serde::Serialize)]
struct StrategyReport<'a> {
    generated_at: String,
    config_file: &'a str,
    deck: &'a DeckConfig,
    params: &'a MulliganParams,
    strategy: &'a Strategy,
}

fn save_strategy_report(
    config_file: &str,
    deck: &DeckConfig,
    params: &MulliganParams,
    strategy: &Strategy,
) -> Result<String, std::io::Error> {
    let now = chrono::Local::now();
    let filename = format!("strategy-{}.json", now.format("%Y%m%d-%H%M%S"));
    let report = StrategyReport {
        generated_at: now.to_rfc3339(),
        config_file,
        deck,
        params,
        strategy,
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&filename, json)?;
    Ok(filename)
}

fn run_marginal(config_file: &str, deck: &DeckConfig, params: &MulliganParams) {
    println!("\n=== Marginal Value of One Extra Copy ===\n");
    println!("Deck: {} ({} cards)", config_file, deck.deck_size);
    println!();

    // Each row reruns the full optimizer, so show progress
    let pb = ProgressBar::new(deck.types.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let mut rows = Vec::new();
    for (i, card_type) in deck.types.iter().enumerate() {
        pb.set_message(card_type.name.clone());
        match marginal_value_for(deck, params, i) {
            Some(value) => rows.push(value),
            None => {
                pb.finish_and_clear();
                eprintln!("✗ Degenerate deck configuration; nothing to compute");
                std::process::exit(1);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("{:24} {:>16} {:>16}", "Type", "Δ success", "Δ no-mulligan");
    println!("{}", "-".repeat(58));
    for row in &rows {
        println!(
            "{:24} {:>+15.4}% {:>+15.4}%",
            row.type_name,
            row.expected_success_delta * 100.0,
            row.no_mulligan_delta * 100.0
        );
    }
}

fn run_reveal(
    deck_file: &str,
    deck: &SimDeck,
    reveal_count: usize,
    iterations: usize,
    seed: Option<u64>,
) {
    let base_seed = seed.unwrap_or_else(|| SimRng::new(None).seed());

    println!("\n=== Reveal Simulation ===\n");
    println!("Deck: {} ({} cards, {} tags)", deck_file, deck.size(), deck.tag_count());
    println!("Trials: {} | Seed: {}", iterations, base_seed);
    println!();

    let start = std::time::Instant::now();
    let streak = simulate_permanent_streak(deck, iterations, base_seed);
    let diversity = simulate_type_diversity(deck, reveal_count, iterations, base_seed);
    let elapsed = start.elapsed();

    println!("Permanent streak before first non-permanent:");
    println!("  Expected: {:.3}", streak.expected);
    for (value, p) in streak.distribution.iter().enumerate().take(11) {
        if *p > 0.0005 {
            println!("  {:>3}: {:>5.1}% {}", value, p * 100.0, bar(*p));
        }
    }

    println!();
    println!("Tag diversity in top {} cards:", reveal_count);
    println!("  Expected: {:.3}", diversity.expected);
    for (value, p) in diversity.distribution.iter().enumerate() {
        println!("  {:>3}: {:>5.1}% {}", value, p * 100.0, bar(*p));
    }

    println!();
    println!(
        "Completed in {:.2?} ({:.0} trials/sec)",
        elapsed,
        (iterations * 2) as f64 / elapsed.as_secs_f64()
    );
}

fn run_discover(
    deck_file: &str,
    deck: &SimDeck,
    threshold: u32,
    depth: usize,
    iterations: usize,
    seed: Option<u64>,
) {
    let base_seed = seed.unwrap_or_else(|| SimRng::new(None).seed());

    println!("\n=== Discover Chain Simulation ===\n");
    println!("Deck: {} ({} cards)", deck_file, deck.size());
    println!(
        "Threshold: {} | Depth cap: {} | Trials: {} | Seed: {}",
        threshold, depth, iterations, base_seed
    );
    println!();

    let start = std::time::Instant::now();
    let results = simulate_discover_chain(deck, threshold, depth, iterations, base_seed);
    let elapsed = start.elapsed();

    println!("Mean mana value cast: {:.3}", results.mean_cost);
    println!("Mean cards cast:      {:.3}", results.mean_cast);
    println!("Chain rate (2+):      {:.1}%", results.chain_rate * 100.0);

    println!();
    println!("Hittable at threshold {}:", threshold);
    if results.eligible.is_empty() {
        println!("  (nothing)");
    } else {
        for name in &results.eligible {
            println!("  {}", name);
        }
    }

    println!();
    println!(
        "Completed in {:.2?} ({:.0} trials/sec)",
        elapsed,
        iterations as f64 / elapsed.as_secs_f64()
    );
}
