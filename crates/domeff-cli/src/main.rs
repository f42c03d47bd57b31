//! CLI for domeff — muon-track light-yield extraction and bias-corrected
//! efficiency analysis.

mod commands;
mod plot;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "domeff")]
#[command(about = "Muon-track light-yield extraction and stochastic-loss bias correction")]
#[command(version = domeff_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tracks from simulated detector events into a track file
    Extract {
        /// Event file (newline-delimited JSON) or directory of event files
        #[arg(long)]
        events: PathBuf,

        /// Sensor geometry JSON file
        #[arg(long)]
        geometry: PathBuf,

        /// Output track file
        #[arg(long, default_value = "tracks.bin")]
        output: PathBuf,

        /// Extraction parameters as JSON (reference defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the detection-threshold sweep over an extracted track file
    Analyze {
        /// Track file produced by `extract`
        tracks: PathBuf,

        /// Analysis parameters as JSON (reference defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full sweep report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory for sweep and rate-distribution plots
        #[arg(long)]
        plots: Option<PathBuf>,
    },

    /// Summarize a track file and its run metadata
    Inspect {
        /// Track file produced by `extract`
        tracks: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            events,
            geometry,
            output,
            config,
        } => commands::extract::run(&events, &geometry, &output, config.as_deref()),
        Commands::Analyze {
            tracks,
            config,
            output,
            plots,
        } => commands::analyze::run(&tracks, config.as_deref(), output.as_deref(), plots.as_deref()),
        Commands::Inspect { tracks } => commands::inspect::run(&tracks),
    }
}
