pub mod app;
pub mod config;
pub mod csv_loader;
pub mod export;
pub mod history;
pub mod logging;
pub mod report;
pub mod utils;
