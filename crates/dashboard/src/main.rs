//! `sentiscope-dashboard` -- headless driver for the dashboard controllers.
//!
//! Resolves one route the way the web shell would, then logs what each tab
//! of the results page would show.
//!
//! # Environment variables
//!
//! | Variable                          | Required | Default                     | Description                              |
//! |-----------------------------------|----------|-----------------------------|------------------------------------------|
//! | `SENTISCOPE_API_URL`              | no       | `http://localhost:8000/api` | Backend base URL                         |
//! | `SENTISCOPE_REQUEST_TIMEOUT_SECS` | no       | `60`                        | Per-request timeout                      |
//! | `SENTISCOPE_ROUTE`                | no       | `/upload?autoLoadDemo=true` | Route to resolve                         |
//! | `SENTISCOPE_UPLOAD_FILE`          | no       | --                          | CSV to upload when the route is `/upload`|

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentiscope_client::{ClientConfig, SentimentApi};
use sentiscope_core::dashboard::{Dashboard, DashboardTab};
use sentiscope_core::routes::Route;
use sentiscope_core::types::TaskId;
use sentiscope_dashboard::{
    CsvUpload, DemoLauncher, FetchOutcome, LaunchOutcome, LoadOutcome, Navigator,
    ResultsOrchestrator, ReviewListState, UploadFlow,
};

const DEFAULT_ROUTE: &str = "/upload?autoLoadDemo=true";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentiscope_dashboard=info,sentiscope_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let raw_route = std::env::var("SENTISCOPE_ROUTE").unwrap_or_else(|_| DEFAULT_ROUTE.into());
    let route = Route::parse(&raw_route).unwrap_or_else(|e| {
        tracing::error!(route = %raw_route, error = %e, "SENTISCOPE_ROUTE is not a dashboard route");
        std::process::exit(1);
    });

    let api = Arc::new(SentimentApi::new(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    }));

    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout.as_secs(),
        route = %route,
        "Starting sentiscope-dashboard",
    );

    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let navigator: Arc<dyn Navigator> = Arc::new(nav_tx);
    navigator.navigate(route);

    // Each handler may navigate again; the analysis page is terminal.
    while let Ok(route) = nav_rx.try_recv() {
        let ok = match route {
            Route::Upload { auto_load_demo } => {
                run_upload_page(&api, &navigator, auto_load_demo).await
            }
            Route::Analysis(task_id) => return run_analysis_page(&api, &navigator, task_id).await,
        };
        if !ok {
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Upload page: run the demo or upload a file, either of which navigates.
async fn run_upload_page(
    api: &Arc<SentimentApi>,
    navigator: &Arc<dyn Navigator>,
    auto_load_demo: bool,
) -> bool {
    let outcome = if auto_load_demo {
        let launcher = DemoLauncher::new(api.clone(), navigator.clone());
        launcher.launch().await
    } else {
        let Ok(path) = std::env::var("SENTISCOPE_UPLOAD_FILE") else {
            tracing::info!("Upload page has nothing to do without SENTISCOPE_UPLOAD_FILE");
            return true;
        };
        let upload = match CsvUpload::from_path(&path).await {
            Ok(upload) => upload,
            Err(e) => {
                tracing::error!(error = %e, "Dataset rejected");
                return false;
            }
        };
        UploadFlow::new(api.clone(), navigator.clone())
            .submit(upload)
            .await
    };

    match outcome {
        LaunchOutcome::Started(task_id) => {
            tracing::info!(task_id = %task_id, "Analysis started");
            true
        }
        LaunchOutcome::AlreadyRunning => true,
        LaunchOutcome::Failed(message) => {
            tracing::error!(%message, "Could not start analysis");
            false
        }
    }
}

/// Analysis page: load the bundle, then the first review page.
async fn run_analysis_page(
    api: &Arc<SentimentApi>,
    navigator: &Arc<dyn Navigator>,
    task_id: TaskId,
) -> ExitCode {
    let orchestrator = ResultsOrchestrator::new(api.clone(), navigator.clone());

    match orchestrator.open(task_id.clone()).await {
        LoadOutcome::Loaded => {}
        LoadOutcome::Failed(message) => {
            tracing::error!(task_id = %task_id, %message, "Failed to load results");
            return ExitCode::FAILURE;
        }
        other => {
            tracing::warn!(task_id = %task_id, outcome = ?other, "Results were not loaded");
            return ExitCode::FAILURE;
        }
    }

    if let Some(dashboard) = orchestrator.state().dashboard() {
        log_dashboard(&task_id, dashboard);
    }

    let Some(reviews) = orchestrator.reviews() else {
        return ExitCode::FAILURE;
    };
    match reviews.refresh().await {
        FetchOutcome::Applied => log_reviews(&reviews.snapshot()),
        FetchOutcome::Failed(message) => {
            tracing::error!(task_id = %task_id, %message, "Failed to load reviews");
            return ExitCode::FAILURE;
        }
        FetchOutcome::Discarded | FetchOutcome::Unchanged => {}
    }
    ExitCode::SUCCESS
}

fn log_dashboard(task_id: &TaskId, dashboard: &Dashboard) {
    tracing::info!(
        task_id = %task_id,
        status = dashboard.status.as_str(),
        completed = dashboard.show_completion_banner(),
        ready = dashboard.ready_count(),
        "Dashboard loaded",
    );

    if let Some(stats) = &dashboard.statistics {
        for card in stats.cards() {
            tracing::info!(
                card = card.kind.label(),
                value = %card.value,
                suffix = card.suffix.as_deref().unwrap_or(""),
                "Statistic",
            );
        }
    }

    for tab in DashboardTab::ALL {
        let panels: Vec<(&str, &str)> = match tab {
            DashboardTab::WordClouds => vec![
                ("positive", dashboard.positive_cloud.state_label()),
                ("negative", dashboard.negative_cloud.state_label()),
            ],
            DashboardTab::Statistics => vec![
                ("pie", dashboard.pie.state_label()),
                ("heatmap", dashboard.heatmap.state_label()),
                ("trend", dashboard.trend.state_label()),
                ("confidence", dashboard.confidence_bars.state_label()),
            ],
            DashboardTab::Topics => vec![("topics", dashboard.topics.state_label())],
            DashboardTab::Keywords => vec![("keywords", dashboard.keywords.state_label())],
            DashboardTab::Reviews => Vec::new(),
        };
        for (panel, state) in panels {
            tracing::info!(tab = tab.label(), panel, state, "Panel");
        }
    }
}

fn log_reviews(state: &ReviewListState) {
    tracing::info!(
        page = state.query.page(),
        page_size = state.query.page_size(),
        pages = state.total_pages(),
        summary = %state.summary(),
        "Reviews loaded",
    );
    for review in &state.rows {
        tracing::info!(
            id = review.id,
            sentiment = review.sentiment.as_str(),
            confidence = %review.confidence_percent(),
            band = ?review.confidence_band(),
            "Review",
        );
    }
}
