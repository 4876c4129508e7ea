pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod router;

use eframe::{self, egui};

pub use app::FeedApp;
pub use config::FrontendConfig;

/// Launches the egui application with default window options.
pub fn run_frontend(config: FrontendConfig) -> Result<(), eframe::Error> {
    run_frontend_with_options(config, default_native_options())
}

/// Launches the egui app with caller-provided options.
pub fn run_frontend_with_options(
    config: FrontendConfig,
    options: eframe::NativeOptions,
) -> Result<(), eframe::Error> {
    let _ = env_logger::builder().is_test(false).try_init();
    eframe::run_native(
        "Feed",
        options,
        Box::new(move |cc| Ok(Box::new(FeedApp::new(cc, config)))),
    )
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    }
}
