//! # WPG server
//! This module hosts the server code for the wallet payment gateway. It is responsible for:
//! Accepting manual payment submissions from users.
//! Answering status polls, which lazily re-run the reconciliation cascade for pending submissions.
//! Exposing wallet balances, resets, and manual credits.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/payments`: Submission intake and status polling.
//! * `/wallet/{user_id}`: Balance queries, resets, and manual credits.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
