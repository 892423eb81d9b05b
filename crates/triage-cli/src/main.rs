mod cmd_analyze;
mod cmd_classify;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "triage", version, about = "Classify agent run transcripts by outcome")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every run directory under DIR and print the report
    Analyze {
        /// Results directory, one sub-directory per run (e.g. output/result/251022_185914)
        dir: PathBuf,
        /// Log file name inside each run directory [env: TRIAGE_LOG_FILE, default: log.txt]
        #[arg(long)]
        log_file: Option<String>,
        /// Treat logs larger than this many bytes as unreadable [env: TRIAGE_MAX_BYTES]
        #[arg(long)]
        max_bytes: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify a single log file and show the signals behind the verdict
    Classify {
        /// Path to a run's log file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(config::ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.cmd {
        Command::Analyze {
            dir,
            log_file,
            max_bytes,
            json,
        } => cmd_analyze::execute(&cmd_analyze::AnalyzeParams {
            dir: &dir,
            log_file: log_file.as_deref(),
            max_bytes,
            json,
        }),
        Command::Classify { file, json } => cmd_classify::execute(&file, json),
    }
}
