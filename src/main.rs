#![windows_subsystem = "windows"]

mod api;
mod chart;
mod config;
mod error;
mod fetch;
mod gauge;
mod guard;
pub mod i18n;
mod models;
mod notify;
mod preferences;
mod ringbuf;
mod samples;
mod session;
mod store;
pub mod theme;
mod ui;
mod users;

use tracing_subscriber::{fmt, EnvFilter};

use config::AppConfig;
use guard::Route;
use ui::Mobilis;

/// Log filter variable, e.g. `MOBILIS_LOG=mobilis=debug`.
const ENV_LOG: &str = "MOBILIS_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Optional start page, e.g. `mobilis /energy`.
    let start = std::env::args()
        .nth(1)
        .map(|path| Route::from_path(&path))
        .unwrap_or_default();
    let app = Mobilis::new(AppConfig::load(), start)?;

    iced::application(Mobilis::title, Mobilis::update, Mobilis::view)
        .subscription(Mobilis::subscription)
        .theme(Mobilis::theme)
        .window(iced::window::Settings {
            size: (1200.0, 780.0).into(),
            min_size: Some((760.0, 520.0).into()),
            #[cfg(target_os = "linux")]
            platform_specific: iced::window::settings::PlatformSpecific {
                application_id: String::from("mobilis"),
                ..Default::default()
            },
            ..Default::default()
        })
        .run_with(move || app.start())?;
    Ok(())
}
