use anyhow::{Context, Result};
use bz_client::{
    ApiCache, BugzillaClient, CacheMode, CachedBugzillaClient, RestClient, TokenResolver,
};
use bz_config::OperatorConfig;
use bz_operator::reporters::{blockers, escalation, new_bugs};
use bz_operator::slack::{ChannelClient, LogChannel, SlackClient};
use bz_operator::store::{FileStateStore, MemoryStateStore, StateStore};
use bz_operator::{logger, scheduler, ControllerContext};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const BUGZILLA_TOKEN_ENV: &str = "BUGZILLA_API_KEY";
const SLACK_TOKEN_ENV: &str = "SLACK_BOT_TOKEN";

#[derive(Parser)]
#[command(name = "bugzilla-operator", version, about = "Bugzilla triage and escalation reporter")]
struct Cli {
    /// Config file, instead of ./bugzilla-operator.toml or ~/.bugzilla-operator.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Always query Bugzilla, never answer from the response cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scheduled reporters until interrupted
    Run,
    /// Print a single report to stdout without notifying anyone
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportKind {
    New,
    Blockers,
    Escalation,
}

fn bugzilla_client(
    config: &OperatorConfig,
    tokens: &TokenResolver,
    no_cache: bool,
) -> Result<Arc<dyn BugzillaClient>> {
    let api_key = tokens
        .get_token(BUGZILLA_TOKEN_ENV, config.bugzilla.api_key.as_deref())
        .ok();
    if api_key.is_none() {
        log::warn!("No Bugzilla API key, searching anonymously");
    }

    let rest = RestClient::new(&config.bugzilla.base_url, api_key)?;
    let mode = if no_cache {
        CacheMode::None
    } else {
        CacheMode::ReadWrite
    };
    let cache = Arc::new(Mutex::new(ApiCache::default()));
    Ok(Arc::new(CachedBugzillaClient::new(rest, cache, mode)))
}

async fn run(
    config: Arc<OperatorConfig>,
    client: Arc<dyn BugzillaClient>,
    tokens: &TokenResolver,
) -> Result<()> {
    let token = tokens.get_token(SLACK_TOKEN_ENV, config.slack.token.as_deref())?;
    let slack: Arc<dyn ChannelClient> = Arc::new(SlackClient::new(token, &config.slack)?);
    let store = FileStateStore::open_default()?;
    log::info!("Reporter state in {:?}", store.path());
    let store: Arc<dyn StateStore> = Arc::new(store);

    let ctx = ControllerContext::new(client, slack, store, config.clone());
    let cancel = ctx.cancel_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, shutting down");
            cancel.cancel();
        }
    });

    scheduler::run(ctx, scheduler::scheduled_reporters(&config)).await;
    Ok(())
}

async fn report(
    config: Arc<OperatorConfig>,
    client: Arc<dyn BugzillaClient>,
    kind: ReportKind,
) -> Result<()> {
    let components = config.schedules.components.clone();
    let ctx = ControllerContext::new(
        client,
        Arc::new(LogChannel),
        Arc::new(MemoryStateStore::new()),
        config,
    );

    let text = match kind {
        ReportKind::New => new_bugs::report(&ctx, &components).await?,
        ReportKind::Blockers => blockers::report(&ctx, &components).await?.channel,
        ReportKind::Escalation => escalation::report(&ctx, &components)
            .await?
            .unwrap_or_else(|| "No escalations.".to_string()),
    };

    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    let config =
        OperatorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if config.schedules.components.is_empty() {
        log::warn!("No components configured under [schedules], searches are not narrowed");
    }
    let config = Arc::new(config);

    let tokens = TokenResolver::new();
    let client = bugzilla_client(&config, &tokens, cli.no_cache)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config, client, &tokens).await,
        Command::Report { kind } => report(config, client, kind).await,
    }
}
