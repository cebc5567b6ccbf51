use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crm_assign::adapters::inbound::InMemoryTokenStore;
use crm_assign::adapters::outbound::{
    init_domain_logger, FilesystemWorkerSource, HttpBackend, InMemoryGateway, JsonlEventLog,
};
use crm_assign::application::{AssignmentService, AssignmentSubmitter, AutoAssignRequest};
use crm_assign::domains::assignment::{
    AssignmentEvent, AssignmentEventActor, AssignmentGateway, AssignmentProjection, SubmissionOutcome,
    WorkerSource,
};
use crm_assign::domains::reminders::{ReminderPoller, ReminderSource};
use crm_assign::domains::session::{
    current_time_secs, AccessToken, SessionEvent, TokenExpiryWatcher, TokenStore,
};
use crm_assign::domains::DynLogger;
use crm_assign::Config;

#[derive(Parser, Debug)]
#[command(name = "crm-assign")]
#[command(version)]
#[command(about = "Distribute CRM users evenly across employees and create the assignments")]
struct Cli {
    /// Configuration file (TOML); CRM_ASSIGN__* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Distribute and submit assignments
    Assign {
        /// Plan file: {"entityIds": [...], "groups": [...], "exclude": [...], "priority": "...", "notes": "..."}
        #[arg(long)]
        plan: PathBuf,

        /// Read employees from this JSON file instead of the backend
        #[arg(long)]
        workers: Option<PathBuf>,

        /// Record requests in memory instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Bearer token for the backend
        #[arg(long, env = "CRM_ASSIGN_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Directory for the JSON Lines log of assignment events
        #[arg(long)]
        events_dir: Option<PathBuf>,
    },

    /// Print the distribution without submitting anything
    Plan {
        #[arg(long)]
        plan: PathBuf,

        #[arg(long)]
        workers: PathBuf,
    },

    /// Show due reminders until interrupted or the session expires
    Reminders {
        #[arg(long, env = "CRM_ASSIGN_TOKEN", hide_env_values = true)]
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Installed directly so the `log` facade stays free for fast_log
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install tracing subscriber")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let logger = init_domain_logger(config.logging.file.as_deref());

    match cli.command {
        Commands::Assign {
            plan,
            workers,
            dry_run,
            token,
            events_dir,
        } => run_assign(&config, logger, &plan, workers, dry_run, token, events_dir).await,
        Commands::Plan { plan, workers } => run_plan(&config, logger, &plan, workers).await,
        Commands::Reminders { token } => run_reminders(&config, logger, token).await,
    }
}

async fn read_plan(path: &Path, config: &Config) -> Result<AutoAssignRequest> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read plan {}", path.display()))?;
    let mut raw: serde_json::Value = serde_json::from_str(&content).context("plan is not valid JSON")?;
    if let Some(obj) = raw.as_object_mut() {
        obj.entry("priority")
            .or_insert_with(|| serde_json::json!(config.submission.default_priority));
    }
    serde_json::from_value(raw).context("plan does not match the expected shape")
}

fn session_token(raw: Option<String>, config: &Config) -> Result<Arc<InMemoryTokenStore>> {
    let Some(raw) = raw else {
        bail!("no access token: pass --token or set CRM_ASSIGN_TOKEN");
    };
    let token = AccessToken::parse(&raw)?;
    if token.is_expired(current_time_secs(), config.session.clock_skew_secs) {
        bail!("access token has expired, log in again");
    }
    Ok(Arc::new(InMemoryTokenStore::with_token(raw)))
}

async fn run_plan(config: &Config, logger: DynLogger, plan: &Path, workers: PathBuf) -> Result<()> {
    let request = read_plan(plan, config).await?;
    let source: Arc<dyn WorkerSource> = Arc::new(FilesystemWorkerSource::new(Some(workers)));
    let submitter = AssignmentSubmitter::from_config(
        Arc::new(InMemoryGateway::default()),
        logger.clone(),
        &config.submission,
    );
    let service = AssignmentService::new(source, submitter, logger);

    let records = service.plan(&request).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn run_assign(
    config: &Config,
    logger: DynLogger,
    plan: &Path,
    workers: Option<PathBuf>,
    dry_run: bool,
    token: Option<String>,
    events_dir: Option<PathBuf>,
) -> Result<()> {
    let request = read_plan(plan, config).await?;

    let needs_backend = !dry_run || workers.is_none();
    let backend = if needs_backend {
        let tokens = session_token(token, config)?;
        Some(Arc::new(HttpBackend::new(
            &config.api.base_url,
            config.api.request_timeout(),
            tokens,
        )?))
    } else {
        None
    };

    let source: Arc<dyn WorkerSource> = match (workers, &backend) {
        (Some(path), _) => Arc::new(FilesystemWorkerSource::new(Some(path))),
        (None, Some(backend)) => backend.clone(),
        (None, None) => bail!("no employee source: pass --workers or a token for the backend"),
    };
    let dry_gateway = Arc::new(InMemoryGateway::default());
    let gateway: Arc<dyn AssignmentGateway> = match (&backend, dry_run) {
        (Some(backend), false) => backend.clone(),
        _ => dry_gateway.clone(),
    };

    let (event_tx, mut event_rx) = mpsc::channel::<AssignmentEvent>(64);
    let event_log = events_dir.map(JsonlEventLog::new);
    let collector = tokio::spawn(async move {
        let mut projection = AssignmentProjection::new();
        while let Some(event) = event_rx.recv().await {
            if let Some(log) = &event_log {
                if let Err(e) = log.append(&event, None).await {
                    warn!("{}", e);
                }
            }
            projection.apply(&event);
        }
        projection
    });

    let submitter = AssignmentSubmitter::from_config(gateway, logger.clone(), &config.submission)
        .with_events(AssignmentEventActor::new(event_tx));
    let service = AssignmentService::new(source, submitter, logger);

    let summary = service.auto_assign(&request).await?;
    // Closes the event channel so the collector can finish
    drop(service);
    let projection = collector.await?;

    if dry_run {
        info!("Dry run: {} request(s) recorded, nothing was sent", dry_gateway.accepted().len());
        println!("{}", serde_json::to_string_pretty(&dry_gateway.accepted())?);
    }
    if let Some(batch) = projection.batch(&summary.batch_id) {
        for worker in &batch.failed_workers {
            warn!(worker_id = %worker, "assignment request failed");
        }
    }
    println!("{}", summary);

    match summary.outcome() {
        SubmissionOutcome::TotalFailure => bail!("every assignment request failed"),
        SubmissionOutcome::PartialFailure => {
            warn!("some assignment requests failed; re-run with the failed users to retry");
            Ok(())
        }
        SubmissionOutcome::Succeeded | SubmissionOutcome::Empty => Ok(()),
    }
}

async fn run_reminders(config: &Config, logger: DynLogger, token: String) -> Result<()> {
    let tokens = session_token(Some(token), config)?;
    let store: Arc<dyn TokenStore> = tokens.clone();
    let backend = Arc::new(HttpBackend::new(
        &config.api.base_url,
        config.api.request_timeout(),
        store.clone(),
    )?);

    let (reminder_tx, mut reminder_rx) = mpsc::channel(32);
    let poller = ReminderPoller::spawn(
        backend as Arc<dyn ReminderSource>,
        logger.clone(),
        Duration::from_secs(config.reminders.poll_interval_secs.max(1)),
        reminder_tx,
    );

    let (session_tx, mut session_rx) = mpsc::channel(1);
    let watcher = TokenExpiryWatcher::spawn(
        store,
        logger.clone(),
        Duration::from_secs(config.session.check_interval_secs.max(1)),
        config.session.clock_skew_secs,
        session_tx,
    );

    info!("Watching reminders every {}s", config.reminders.poll_interval_secs);
    loop {
        tokio::select! {
            Some(reminder) = reminder_rx.recv() => {
                println!("[{}] {}{}", reminder.remind_at.to_rfc3339(), reminder.title,
                    reminder.note.as_deref().map(|n| format!(" - {}", n)).unwrap_or_default());
            }
            Some(event) = session_rx.recv() => {
                match event {
                    SessionEvent::Expired => logger.warn("Session expired, stopping reminders"),
                    SessionEvent::Invalid(reason) => logger.error(&format!("Session invalid: {}", reason)),
                }
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    let shown = poller.stop().await;
    watcher.stop().await;
    info!("Reminder watch finished, {} reminder(s) shown", shown.len());
    Ok(())
}
