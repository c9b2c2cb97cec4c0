//! Postgres database for the baby routine notifications service

pub mod config;
pub mod error;
pub mod pool;
pub mod schema;
pub mod user;
