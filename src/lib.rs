pub mod config;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
