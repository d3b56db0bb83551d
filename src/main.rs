use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workout_log::api::{HttpClient, WorkoutApi};
use workout_log::app::WorkoutApp;
use workout_log::config::ClientConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workout_log=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("loading configuration")?;
    tracing::info!(base_url = %config.base_url, "starting workout client");
    let api: Arc<dyn WorkoutApi> = Arc::new(HttpClient::new(&config).context("building http client")?);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("View Workouts"),
        ..Default::default()
    };

    eframe::run_native(
        "View Workouts",
        options,
        Box::new(move |cc| Ok(Box::new(WorkoutApp::new(cc, api)))),
    )
    .map_err(|e| anyhow!("window closed with error: {e}"))
}
