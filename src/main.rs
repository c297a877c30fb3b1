//! Monero/CryptoNote Vanity Address Generator CLI
//!
//! Usage:
//!   xmr_vanity words.txt found.log           # dictionary search
//!   xmr_vanity CAFE found.log -t 8           # literal word search
//!   xmr_vanity words.txt found.log -p AEON   # different network

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use xmr_vanity::{SearchSession, SessionConfig, StartStatus, StopStatus};

/// Monero/CryptoNote Vanity Address Generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Word-list file (one word per line), or a literal search word if the
    /// file cannot be read
    source: String,

    /// Output file for found matches
    output: String,

    /// Number of search threads (default: number of CPU cores)
    #[arg(short = 't', long)]
    threads: Option<String>,

    /// First address offset to test
    #[arg(long, default_value = "1")]
    min_start_pos: String,

    /// Last address offset to test
    #[arg(long, default_value = "2")]
    max_start_pos: String,

    /// Length of the indexed dictionary prefix
    #[arg(short = 'l', long, default_value = "6")]
    search_length: String,

    /// Address network: XMR, XMR_TEST, AEON, or a raw numeric tag
    #[arg(short, long, default_value = "XMR")]
    prefix: String,

    /// Print every match as it is found
    #[arg(short, long, default_value = "false")]
    notify: bool,

    /// Progress report interval in seconds
    #[arg(short, long, default_value = "5")]
    report_interval: u64,
}

fn main() {
    let cli = Cli::parse();

    let mut config = SessionConfig::default();
    if let Err(e) = config.set_window(&cli.min_start_pos, &cli.max_start_pos, &cli.search_length) {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }
    if let Err(e) = config.set_prefix(&cli.prefix) {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }
    if cli.notify {
        config.toggle_notify();
    }

    let mut session = SearchSession::new(config);

    println!("XMR Vanity Address Generator");
    println!("============================");
    println!("Source:  {}", cli.source);
    println!("Output:  {}", cli.output);
    println!("Network: {}", session.config().network);
    println!(
        "Window:  offsets {}..={}, prefix length {}",
        session.config().min_start_pos,
        session.config().max_start_pos,
        session.config().search_word_length
    );
    println!();

    let status = match session.start(&cli.source, &cli.output, cli.threads.as_deref()) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    match status {
        StartStatus::Started {
            threads,
            threads_defaulted,
        } => {
            if threads_defaulted && cli.threads.is_some() {
                println!("Could not parse number of threads; using default ({})", threads);
            }
            println!("Searching with {} threads... (Press Ctrl+C to stop)\n", threads);
        }
        StartStatus::AlreadyActive => {
            println!("Search is already active.  No action taken.");
        }
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    ctrlc_handler(stop_flag.clone());

    let report_interval = Duration::from_secs(cli.report_interval);
    while !stop_flag.load(Ordering::Relaxed) {
        match session.wait_for_match(report_interval) {
            Some(event) => {
                println!("Match found for \"{}\": {}", event.word, event.address);
            }
            None => print_progress(&session),
        }
    }

    println!("\nStopping vanity search...");
    match session.stop() {
        StopStatus::Stopped => println!("Vanity search stopped."),
        StopStatus::NotActive => println!("Search is not active.  No action taken."),
    }

    print_summary(&session);
}

fn print_progress(session: &SearchSession) {
    println!(
        "[{:>4}s] Checked {} addresses ({}/s), {} matches",
        session.elapsed().as_secs(),
        format_number(session.total_keys()),
        format_number(session.keys_per_second() as u64),
        session.total_matches()
    );
}

fn print_summary(session: &SearchSession) {
    println!("\n--- Found Words ---");
    let words = session.found_words(None, None);
    if words.is_empty() {
        println!("NONE FOUND");
    }
    for word in &words {
        println!("{}:", word);
        for address in session.addresses_for(word) {
            println!("  {}", address);
        }
    }

    println!("\n--- Final Statistics ---");
    println!("Total keys checked:  {}", format_number(session.total_keys()));
    println!("Total matches found: {}", session.total_matches());
    println!("Time elapsed:        {:.2}s", session.elapsed().as_secs_f64());
    println!(
        "Average speed:       {}/s",
        format_number(session.keys_per_second() as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
