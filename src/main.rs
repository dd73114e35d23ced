mod aggregate;
mod config;
mod notify;
mod output;
mod sources;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "cryptocoin-notifier",
    version,
    about = "Fetch current cryptocurrency prices and post a summary to Slack"
)]
struct Args {
    /// Path to config YAML file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Be more verbose; use -vv for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Compute and print the summary without posting to Slack
    #[arg(short, long, alias = "dryrun")]
    dry_run: bool,
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Fetch every configured price, log the summary, then show it (dry-run) or
/// post it to each channel. Fetch and post failures are logged, not returned.
async fn run(
    cfg: &config::Config,
    client: reqwest::Client,
    dry_run: bool,
) -> Result<(String, notify::FanoutReport)> {
    let channels = cfg.channels();
    let plan = cfg.source_plan();
    info!(
        "Loaded {} coin(s) across {} source(s) and {} channel(s) from config",
        plan.iter().map(|p| p.symbols.len()).sum::<usize>(),
        plan.len(),
        channels.len()
    );

    let registry = sources::SourceRegistry::new(client.clone(), &cfg.http);
    info!("Registered {} price source(s)", registry.source_count());

    let lines = aggregate::collect_prices(&registry, &plan).await;
    let failed = lines.iter().filter(|l| l.quote.is_failed()).count();
    if failed > 0 {
        warn!("{} of {} price fetch(es) failed", failed, lines.len());
    }

    let summary = types::summarize(&lines);
    info!("{}", summary);

    if dry_run {
        output::print_dry_run(&summary, &channels)?;
    }

    let webhook = notify::SlackWebhook::new(client, cfg.slack.webhook_url.clone());
    let report = notify::fanout(&webhook, &summary, &channels, dry_run).await;
    if report.failed > 0 {
        warn!(
            "Delivered to {} of {} channel(s); {} failed",
            report.delivered, report.attempted, report.failed
        );
    } else {
        info!("Delivered to {} channel(s)", report.delivered);
    }

    Ok((summary, report))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(args.verbose))),
        )
        .init();

    let webhook_override = std::env::var("SLACK_WEBHOOK_URL").ok();
    let cfg = config::Config::load(&args.config, webhook_override)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    run(&cfg, sources::build_client(&cfg.http)?, args.dry_run).await?;
    Ok(())
}
