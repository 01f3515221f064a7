mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::{load_settings, normalize_api_url};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::{commands::BackendCommand, save_dialog::SaveRequest};
use crate::controller::events::UiEvent;
use crate::ui::UploadFormApp;

#[derive(Parser, Debug)]
struct StartupArgs {
    /// Prediction service base URL. Overrides predict.toml and PREDICT_API_URL.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = StartupArgs::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let (save_tx, save_rx) = bounded::<SaveRequest>(1);

    let settings = load_settings();
    match normalize_api_url(args.api_url.as_deref().unwrap_or(&settings.api_url)) {
        Ok(api_url) => backend_bridge::runtime::launch(cmd_rx, ui_tx, save_tx, api_url),
        Err(err) => {
            tracing::error!("refusing to start backend worker: {err:#}");
            let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                "backend worker startup failure: {err:#}"
            )));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Flight Price")
            .with_inner_size([720.0, 560.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Flight Price",
        options,
        Box::new(move |_cc| Ok(Box::new(UploadFormApp::new(cmd_tx, ui_rx, save_rx)))),
    )
}
