use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fittartans", version, about = "Fit Tartans fitness scheduler CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, merge, free time and export
    Timeline {
        #[command(subcommand)]
        action: commands::timeline::TimelineAction,
    },
    /// Class recommendations
    Recommend {
        #[command(subcommand)]
        action: commands::recommend::RecommendAction,
    },
    /// Schedule insights
    Insights {
        #[command(subcommand)]
        action: commands::insights::InsightsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so JSON on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timeline { action } => commands::timeline::run(action),
        Commands::Recommend { action } => commands::recommend::run(action),
        Commands::Insights { action } => commands::insights::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
