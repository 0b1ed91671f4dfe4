use wasm_bindgen::prelude::*;

use crate::domain::logging::LogComponent;

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod view_state;

pub use presentation::wasm_api::mount_dashboard;

/// Start hook: panic hook, console logger and browser clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(
        infrastructure::services::BrowserTimeProvider::new(),
    ));

    crate::log_info!(LogComponent::Presentation("Initialize"), "🚀 Stock dashboard ready");
}
