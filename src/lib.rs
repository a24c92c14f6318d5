// Public API for integration tests and library usage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod protocol;
pub mod roster;
pub mod rounds;
pub mod scoring;
pub mod state;
pub mod store;
pub mod types;
