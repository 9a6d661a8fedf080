use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use content_dash::api::{ApiClient, ApiError};
use content_dash::calendar::MonthGrid;
use content_dash::config;
use content_dash::filter::{Filter, Search};
use content_dash::model::{
    AssetStatus, ContentType, DeliverableType, Platform, RecordId, SubmissionStatus, TaskStatus,
};
use content_dash::pages::{CalendarPage, DeliverablesPage, PublishingPage};
use content_dash::render;

#[derive(Debug, Parser)]
#[command(author, version, about = "Terminal views of the content production dashboard")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Month grid of submissions by release date
    Calendar {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        /// 1-12, defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        #[arg(long, default_value = "all")]
        status: Filter<SubmissionStatus>,
        #[arg(long, default_value = "all")]
        content_type: Filter<ContentType>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Deliverables table
    Deliverables {
        #[arg(long = "type", default_value = "all")]
        deliverable_type: Filter<DeliverableType>,
        #[arg(long, default_value = "all")]
        status: Filter<AssetStatus>,
        #[arg(long, default_value = "all")]
        content_type: Filter<ContentType>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Publishing tasks and stats
    Publishing {
        /// Scope to one client; defaults to `session.client_id`
        #[arg(long)]
        client_id: Option<RecordId>,
        #[arg(long, default_value = "all")]
        status: Filter<TaskStatus>,
        #[arg(long, default_value = "all")]
        platform: Filter<Platform>,
        #[arg(long, default_value = "")]
        search: String,
        /// Also list clients (admin only)
        #[arg(long)]
        clients: bool,
    },
    /// Change a submission's status
    SetSubmissionStatus { id: RecordId, status: SubmissionStatus },
    /// Move a submission to another release date (YYYY-MM-DD)
    Reschedule { id: RecordId, date: NaiveDate },
    /// Change a deliverable asset's status
    SetAssetStatus { id: RecordId, status: AssetStatus },
    /// Print an example config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if let Command::InitConfig = args.command {
        print!("{}", config::example());
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let api = ApiClient::from_config(&cfg).context("failed to build API client")?;
    info!(base_url = %api.base_url(), role = %cfg.session.role, "dashboard client ready");

    match args.command {
        Command::Calendar {
            year,
            month,
            status,
            content_type,
            search,
        } => {
            let today = Local::now().date_naive();
            let grid = MonthGrid::new(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            )?;
            let mut page = CalendarPage::new(grid);
            page.filters.status = status;
            page.filters.content_type = content_type;
            page.filters.search = Search::new(&search);
            // Fetch failures leave an empty month; already logged.
            let _ = page.refresh(&api).await;
            print!(
                "{}",
                render::month_grid(page.grid(), &page.buckets(), cfg.display.max_per_day)
            );
        }
        Command::Deliverables {
            deliverable_type,
            status,
            content_type,
            search,
        } => {
            let mut page = DeliverablesPage::new();
            page.filters.deliverable_type = deliverable_type;
            page.filters.status = status;
            page.filters.content_type = content_type;
            page.filters.search = Search::new(&search);
            let _ = page.refresh(&api).await;
            print!("{}", render::deliverables(&page.visible()));
        }
        Command::Publishing {
            client_id,
            status,
            platform,
            search,
            clients,
        } => {
            let scope = client_id.or(cfg.session.client_id);
            let mut page = PublishingPage::new(cfg.session.role.clone(), scope);
            page.filters.status = status;
            page.filters.platform = platform;
            page.filters.search = Search::new(&search);
            if let Err(err) = page.refresh(&api).await {
                eprintln!("Failed to load publishing tasks: {}", err.user_message());
            }
            if clients {
                if !cfg.is_admin() {
                    warn!("client list requires the ADMIN role");
                } else if let Err(err) = page.load_clients(&api).await {
                    eprintln!("Failed to load clients: {}", err.user_message());
                }
                print!("{}", render::clients(page.clients()));
            }
            print!("{}", render::publishing(&page.visible(), page.stats()));
        }
        Command::SetSubmissionStatus { id, status } => {
            let mut page = CalendarPage::new(MonthGrid::containing(Local::now().date_naive()));
            let _ = page.refresh(&api).await;
            page.select(id);
            let result = page.set_status(&api, id, status).await;
            return Ok(report(
                "submission",
                id,
                result.map(|s| s.map(|s| render::submission(&s))),
            ));
        }
        Command::Reschedule { id, date } => {
            let mut page = CalendarPage::new(MonthGrid::containing(date));
            let _ = page.refresh(&api).await;
            page.select(id);
            let result = page.reschedule(&api, id, date).await;
            return Ok(report(
                "submission",
                id,
                result.map(|s| s.map(|s| render::submission(&s))),
            ));
        }
        Command::SetAssetStatus { id, status } => {
            let mut page = DeliverablesPage::new();
            let _ = page.refresh(&api).await;
            page.select(id);
            let result = page.set_status(&api, id, status).await;
            return Ok(report(
                "deliverable",
                id,
                result.map(|d| d.map(|d| format!("#{} {} -> {}\n", d.id, d.name, d.status))),
            ));
        }
        Command::InitConfig => {}
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the outcome of a mutation the way the dashboard toasts it.
fn report(kind: &str, id: RecordId, result: Result<Option<String>, ApiError>) -> ExitCode {
    match result {
        Ok(summary) => {
            print!("{}", render::updated(kind, id, summary.as_deref()));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
