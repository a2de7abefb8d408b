//! # TaskTrack Shared Library
//!
//! This crate contains the core of the TaskTrack service: identity,
//! credentials, owner-scoped persistence and mutation rules. The HTTP
//! server in `tasktrack-api` is a thin layer on top of it.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, token issuing/resolution, request authentication
//! - `db`: Connection pool and migrations
//! - `models`: Users, projects and tasks with owner-scoped operations
//! - `validation`: Field rules applied to every create/update payload

pub mod auth;
pub mod db;
pub mod models;
pub mod validation;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
