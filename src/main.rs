//! Staff Attendance Desk - today's attendance for every staff member.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use staff_attendance_desk as app;

use app::client::ApiClient;
use app::config::{AppConfig, ConfigLoadResult};
use app::ui::App;

/// Desktop view of today's staff attendance.
#[derive(Parser)]
#[command(name = "staff-attendance-desk")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Override the API base URL from the config file
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (mut config, load_note) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, "Config loaded successfully"),
        ConfigLoadResult::Missing => (AppConfig::default(), "Config missing, using defaults"),
        ConfigLoadResult::Invalid(e) => {
            return Err(e).with_context(|| format!("Invalid config at {}", config_path.display()));
        }
    };

    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate().context("Invalid --api-url")?;
    }

    // Initialize logging
    let _log_guard = app::logging::init(&config.logging);

    tracing::info!("Staff Attendance Desk starting...");
    tracing::info!("Config path: {:?}", config_path);
    tracing::info!("{load_note}");
    tracing::info!("API: {}", config.api.root());

    let api = ApiClient::new(&config.api).context("Failed to build HTTP client")?;

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.ui.title.as_str())
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([760.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.ui.title,
        options,
        Box::new(move |cc| Ok(Box::new(App::new(&cc.egui_ctx, Arc::new(api), rt)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
