//! # TaskTrack API Server Library
//!
//! HTTP surface of the TaskTrack service, built on `tasktrack-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and auth layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating JSON extractor
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
