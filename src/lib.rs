pub mod chat;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod maze;
pub mod rng;
pub mod schedule;
pub mod server_utils;
pub mod types;
