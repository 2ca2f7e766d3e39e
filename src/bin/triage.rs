//! triage CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use ticket_triage::cli::args::*;
use ticket_triage::cli::commands::*;

#[tokio::main]
async fn main() {
    let args = TriageArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (-vv)
    };

    Builder::new()
        .filter_level(log_level)
        .parse_env("TRIAGE_LOG")
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
