use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{annotate, catalog, clear, config, exclude, films};
use std::path::PathBuf;

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "oscarwatch")]
#[command(about = "Oscar annotations for Bulgarian TV schedules")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file (daily rotation) instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate one day of the program schedule
    #[command(long_about = "Load one day's schedule from the rolling program store, match every broadcast against the Oscar catalog, and print the annotated schedule. Defaults to today.")]
    Annotate {
        /// Day to annotate (YYYY-MM-DD, default today)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        /// Skip the watch-provider enrichment fetch
        #[arg(long, action = ArgAction::SetTrue)]
        no_enrich: bool,
    },
    /// List Oscar films airing in the rolling window, grouped per film
    #[command(long_about = "Scan the whole rolling program window, annotate every broadcast, and group the annotated ones by film. Airings of the same film across channels and days collapse into one row.")]
    Films {
        /// Window size in days (default from configuration)
        #[arg(long, value_name = "DAYS")]
        days: Option<u32>,

        /// Skip the watch-provider enrichment fetch
        #[arg(long, action = ArgAction::SetTrue)]
        no_enrich: bool,
    },
    /// Manage exclusion rules that suppress Oscar annotation
    #[command(long_about = "Add, remove, or list exclusion rules. A rule suppresses annotation for a title at broadcast, channel, or global scope; typically used when a series or local show shares its name with an Oscar film.")]
    Exclude {
        #[command(subcommand)]
        cmd: ExcludeCommands,
    },
    /// Browse the Oscar film catalog
    Catalog {
        #[command(subcommand)]
        cmd: CatalogCommands,
    },
    /// Configure settings and the TMDB credential
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear cached data
    #[command(long_about = "Clear the persisted enrichment cache, prune program files that slid out of the rolling window, or both with --all.")]
    Clear {
        /// Clear everything
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the watch-provider enrichment cache
        #[arg(long, action = ArgAction::SetTrue)]
        enrich_cache: bool,

        /// Delete program day files older than the rolling window
        #[arg(long, action = ArgAction::SetTrue)]
        old_programs: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    Broadcast,
    Channel,
    Global,
}

#[derive(Subcommand)]
enum ExcludeCommands {
    /// Add an exclusion rule
    Add {
        /// Title the rule applies to (compared case/punctuation-insensitively)
        #[arg(long)]
        title: String,

        /// Rule scope
        #[arg(long, value_enum)]
        scope: ScopeArg,

        /// Channel id (required for broadcast and channel scope)
        #[arg(long)]
        channel: Option<String>,

        /// Airing date (YYYY-MM-DD, required for broadcast scope)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Airing time (HH:MM, required for broadcast scope)
        #[arg(long)]
        time: Option<String>,

        /// Free-text note kept with the rule for audit
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove an exclusion rule (matched by title, scope, and scope fields)
    Remove {
        #[arg(long)]
        title: String,

        #[arg(long, value_enum)]
        scope: ScopeArg,

        #[arg(long)]
        channel: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        time: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// List all exclusion rules in insertion order
    List,
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List every film in the catalog
    List,
    /// Look up catalog entries matching a title
    Lookup {
        /// Title to look up (any script, punctuation ignored)
        title: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Write a default config file and create the data directories
    Init,
    /// Store the TMDB API key used for watch-provider enrichment
    Tmdb {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Annotate { date, no_enrich } => {
            annotate::run_annotate(date, no_enrich, &output).await
        }
        Commands::Films { days, no_enrich } => films::run_films(days, no_enrich, &output).await,
        Commands::Exclude { cmd } => exclude::run_exclude(cmd, &output).await,
        Commands::Catalog { cmd } => catalog::run_catalog(cmd, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show);
            config::run_config(cmd, &output).await
        }
        Commands::Clear {
            all,
            enrich_cache,
            old_programs,
        } => clear::run_clear(all, enrich_cache, old_programs, &output).await,
    }
}
