//! # Task Manager Shared Library
//!
//! Types and building blocks shared by the task manager API server.
//!
//! ## Module Organization
//!
//! - `models`: user documents and the tasks embedded in them
//! - `auth`: token signing/verification, password hashing, auth context
//! - `store`: the `UserStore` trait with PostgreSQL and in-memory backends
//! - `db`: connection pool and schema bootstrap for the PostgreSQL backend

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
