pub mod benchmarks;
pub mod browser;
pub mod config;
pub mod errors;
pub mod providers;
pub mod report;
pub mod resources;
