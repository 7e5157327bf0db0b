//! # Task Manager API Server Library
//!
//! HTTP layer of the task manager: signup and login, profile edits, and CRUD
//! over each user's task list.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and auth guard
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON extractor with API-shaped rejections
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
