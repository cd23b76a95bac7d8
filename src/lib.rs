pub mod app;
pub mod cache;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tagging;
pub mod ui;

pub use app::router;
pub use config::Settings;
pub use state::AppState;
