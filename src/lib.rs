pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod frontend;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
