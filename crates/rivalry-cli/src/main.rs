use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use rivalry_infrastructure::RivalryPaths;

mod commands;

#[derive(Parser)]
#[command(name = "rivalry")]
#[command(about = "Rivalry - AI-grounded side-by-side comparisons", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Keep config, state and logs under this directory
    #[arg(long, global = true, env = "RIVALRY_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare things, e.g. `rivalry compare "Coffee vs Tea"`
    Compare {
        query: String,
        /// Bookmark the result
        #[arg(long)]
        save: bool,
        /// Analyze the winner for this persona id
        #[arg(long)]
        persona: Option<String>,
    },
    /// Reproduce a comparison from a shared link
    Open { url: String },
    /// Show or edit search history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Show search activity for the last day and week
    Trends,
    /// Manage saved comparisons
    Saved {
        #[command(subcommand)]
        action: Option<SavedAction>,
    },
    /// Vote on a row of a saved comparison
    Feedback {
        saved_id: String,
        row: usize,
        vote: VoteArg,
    },
    /// Show or change the theme
    Theme { value: Option<ThemeArg> },
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Remove { query: String },
    Clear,
}

#[derive(Subcommand)]
enum SavedAction {
    List,
    Show { id: String },
    Remove { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum VoteArg {
    Up,
    Down,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = RivalryPaths::new(cli.home.as_deref());

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = init_tracing(&cli, &paths);

    let ctx = commands::AppContext::load(paths)?;

    match cli.command {
        Commands::Compare {
            query,
            save,
            persona,
        } => commands::compare::run(&ctx, &query, save, persona.as_deref()).await?,
        Commands::Open { url } => commands::compare::open(&ctx, &url).await?,
        Commands::History { action } => match action.unwrap_or(HistoryAction::List) {
            HistoryAction::List => commands::history::list(&ctx),
            HistoryAction::Remove { query } => commands::history::remove(&ctx, &query),
            HistoryAction::Clear => commands::history::clear(&ctx),
        },
        Commands::Trends => commands::history::trends(&ctx),
        Commands::Saved { action } => match action.unwrap_or(SavedAction::List) {
            SavedAction::List => commands::saved::list(&ctx),
            SavedAction::Show { id } => commands::saved::show(&ctx, &id)?,
            SavedAction::Remove { id } => commands::saved::remove(&ctx, &id)?,
        },
        Commands::Feedback {
            saved_id,
            row,
            vote,
        } => {
            let vote = match vote {
                VoteArg::Up => rivalry_core::feedback::Vote::Up,
                VoteArg::Down => rivalry_core::feedback::Vote::Down,
            };
            commands::saved::feedback(&ctx, &saved_id, row, vote)?
        }
        Commands::Theme { value } => {
            let theme = match value {
                None => ctx.theme.get(),
                Some(ThemeArg::Toggle) => ctx.theme.toggle(),
                Some(ThemeArg::Light) => {
                    ctx.theme.set(rivalry_core::theme::Theme::Light);
                    ctx.theme.get()
                }
                Some(ThemeArg::Dark) => {
                    ctx.theme.set(rivalry_core::theme::Theme::Dark);
                    ctx.theme.get()
                }
            };
            println!("{}", theme);
        }
    }

    Ok(())
}

/// Human-readable stderr plus a daily JSON file under the data directory.
fn init_tracing(cli: &Cli, paths: &RivalryPaths) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let log_dir = paths
        .logs_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "rivalry.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));

            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(json_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}
