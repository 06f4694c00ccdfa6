use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use gt_scraper::collect::summarize;
use gt_scraper::config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use gt_scraper::{export, users, GtClient, Pacing, RetryPolicy, ScrapeConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape Golden Tee scorecards from TeknoParrot leaderboards", long_about = None)]
struct Args {
    /// Identifier file (.json or .csv). Defaults to users.json next to the executable
    #[arg(short, long)]
    users: Option<PathBuf>,

    /// Flat CSV output
    #[arg(long, default_value = "golden_tee_leaderboard.csv")]
    csv_out: PathBuf,

    /// Structured JSON output
    #[arg(long, default_value = "golden_tee_leaderboard.json")]
    json_out: PathBuf,

    /// Delay between scorecard fetches of one user, in milliseconds
    #[arg(long, default_value_t = 1000)]
    entry_delay_ms: u64,

    /// Delay between users, in milliseconds
    #[arg(long, default_value_t = 2000)]
    user_delay_ms: u64,

    /// Attempts per page before giving up
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Delay between attempts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    retry_delay_ms: u64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Exit without waiting for Enter
    #[arg(long, default_value_t = false)]
    no_pause: bool,
}

impl Args {
    fn config(&self) -> ScrapeConfig {
        ScrapeConfig {
            base_url: self.base_url.clone(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryPolicy {
                attempts: self.retries,
                delay: Duration::from_millis(self.retry_delay_ms),
            },
            pacing: Pacing {
                between_entries: Duration::from_millis(self.entry_delay_ms),
                between_users: Duration::from_millis(self.user_delay_ms),
            },
        }
    }

    fn users_path(&self) -> PathBuf {
        self.users.clone().unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("users.json")
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let users_path = args.users_path();
    if !users_path.exists() {
        error!(path = %users_path.display(), "user file not found");
        pause(args.no_pause);
        return Ok(());
    }

    let user_ids = users::load_user_ids(&users_path);
    let client = GtClient::with_config(args.config()).context("failed to set up http client")?;
    let records = client.collect(&user_ids).await;

    if records.is_empty() {
        info!("No entries found.");
        pause(args.no_pause);
        return Ok(());
    }

    export::save_csv(&records, &args.csv_out)
        .with_context(|| format!("failed to write {}", args.csv_out.display()))?;
    export::save_json(&records, &args.json_out)
        .with_context(|| format!("failed to write {}", args.json_out.display()))?;

    info!(total = records.len(), "summary");
    for (game, count) in summarize(&records) {
        info!(game = %game, count, "entries");
    }
    Ok(())
}

fn pause(skip: bool) {
    if skip {
        return;
    }
    println!("Press Enter to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}
