pub mod codes;
pub mod config;
pub mod exporter;
pub mod fetch_error;
pub mod fetcher;
pub mod ldc;
pub mod profile;
pub mod services;
pub mod utils;
