use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dayplan_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dayplan", version, about = "Dayplan CLI")]
struct Cli {
    /// Day to operate on (YYYY-MM-DD, default: today)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's action chains
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Commute rule management
    Rule {
        #[command(subcommand)]
        action: commands::rule::RuleAction,
    },
    /// Commute variant (normal, rush, rain)
    Mode {
        #[command(subcommand)]
        action: commands::mode::ModeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let level = Config::load_or_default().logging.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let ctx = commands::Context::new(cli.date);
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(&ctx, action),
        Commands::Rule { action } => commands::rule::run(&ctx, action),
        Commands::Mode { action } => commands::mode::run(&ctx, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
