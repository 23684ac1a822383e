//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use cosmic_crm::adapters::ai::{MockReportGenerator, OpenAiAdapter};
use cosmic_crm::adapters::persistence::{SqliteRepo, StateJson};
use cosmic_crm::adapters::ui::tui::TuiInputPort;
use cosmic_crm::ports::{
    ArchetypeRepo, ContactRepo, InputPort, JournalRepo, PreferencesPort, ReportGenerator,
};
use cosmic_crm::shared::config::AppConfig;
use cosmic_crm::usecases::{ContactService, InsightService, ReportService};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    cosmic_crm::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config invalid, using defaults");
        AppConfig::default()
    });

    let data_path = cfg.data_dir_or_default();
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir {}: {}", data_path.display(), e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Storage: one SQLite file for records, a JSON file for view state ---
    let sqlite_repo = Arc::new(
        SqliteRepo::connect(&data_path)
            .await
            .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
    );
    let contacts: Arc<dyn ContactRepo> = Arc::clone(&sqlite_repo) as Arc<dyn ContactRepo>;
    let archetypes: Arc<dyn ArchetypeRepo> = Arc::clone(&sqlite_repo) as Arc<dyn ArchetypeRepo>;
    let journal: Arc<dyn JournalRepo> = Arc::clone(&sqlite_repo) as Arc<dyn JournalRepo>;
    let prefs: Arc<dyn PreferencesPort> = Arc::new(StateJson::new(cfg.preferences_path()));

    // --- Report generator ---
    let generator: Arc<dyn ReportGenerator> = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            fast_model = %cfg.ai_fast_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "report generation enabled with OpenAI-compatible adapter"
        );
        Arc::new(
            OpenAiAdapter::new(
                cfg.ai_api_url_or_default(),
                cfg.ai_api_key().unwrap_or_default(),
                cfg.ai_model_or_default(),
                cfg.ai_fast_model_or_default(),
                Duration::from_secs(cfg.ai_timeout_secs_or_default()),
            )
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        )
    } else {
        warn!("COSMIC_CRM_AI_API_KEY not set, using mock report generator");
        Arc::new(MockReportGenerator::new())
    };

    // --- Services ---
    let contact_service = Arc::new(ContactService::new(Arc::clone(&contacts)));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&generator),
        Arc::clone(&contacts),
        archetypes,
        cfg.reports_dir_or_default(),
    ));
    let insight_service = Arc::new(InsightService::new(
        generator,
        journal,
        Arc::clone(&prefs),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        contact_service,
        report_service,
        insight_service,
        prefs,
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
