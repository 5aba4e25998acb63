mod app;
mod commands;
mod config;
mod dispatch;
mod events;
mod logging;

pub use app::run_app;
