pub mod api;
pub mod config;
pub mod db;
pub mod editing;
pub mod error;
pub mod genai;
pub mod messages;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
