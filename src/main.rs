use std::{path::PathBuf, process::ExitCode};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use fanfeed::{
    cli, config,
    curation::CurationOptions,
    logging,
    report::{ConsoleReporter, Reporter},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Directory holding the per-account cache files
    #[clap(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Log file to append to
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,

    /// Write debug output to the log file
    #[clap(long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Prune old tracks and add fresh releases to the managed playlist
    Run(RunOptions),

    /// Authorize an account and store its token
    Auth(AuthOptions),

    /// Show cached accounts
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    /// Maximum number of days to look back for new releases
    #[clap(long, default_value_t = 7)]
    track_freshness: u32,

    /// Number of days after which tracks are considered old and removed from the playlist
    #[clap(long, default_value_t = 30)]
    old_track_threshold: u32,

    /// Comma-separated list of accounts to process; defaults to the account of the stored default token
    #[clap(long, value_delimiter = ',')]
    user_ids: Vec<String>,

    /// Stop at the first account that fails
    #[clap(long)]
    fail_fast: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Account label to store the token under
    #[clap(long, default_value = cli::DEFAULT_ACCOUNT)]
    user_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let reporter = ConsoleReporter::new();

    // needs no environment; set up before load_env so its failure is logged
    let log_file = cli.log_file.clone().unwrap_or_else(config::default_log_file);
    if let Err(e) = logging::init(&log_file, cli.verbose) {
        reporter.warning(&format!("Logging to {} disabled: {e}", log_file.display()));
    }

    if let Err(e) = config::load_env().await {
        reporter.critical(&format!("Cannot load environment: {e}"));
        return ExitCode::FAILURE;
    }

    let cache_dir = cli.cache_dir.clone().unwrap_or_else(config::default_cache_dir);

    if let Command::Info = cli.command {
        return match cli::info(&cache_dir, &reporter).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                reporter.error(&format!("Cannot read cached accounts: {e}"));
                ExitCode::FAILURE
            }
        };
    }

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            reporter.critical(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    if settings.redirect_uri_defaulted {
        reporter.warning(&format!(
            "SPOTIFY_REDIRECT_URI environment variable not set, using default: {} for redirect URI. Ensure this matches your Spotify app settings.",
            config::DEFAULT_REDIRECT_URI
        ));
    }

    let ok = match cli.command {
        Command::Run(opt) => {
            let request = cli::RunRequest {
                options: CurationOptions {
                    freshness_days: opt.track_freshness,
                    retention_days: opt.old_track_threshold,
                },
                user_ids: opt.user_ids,
                fail_fast: opt.fail_fast,
                cache_dir,
            };
            cli::run(&settings, request, &reporter).await
        }
        Command::Auth(opt) => match cli::auth(&settings, &opt.user_id, &reporter).await {
            Ok(()) => true,
            Err(e) => {
                reporter.critical(&format!("Authorization failed: {e}"));
                false
            }
        },
        Command::Info | Command::Completions(_) => true,
    };

    reporter.finish();
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
