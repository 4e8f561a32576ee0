//! Task manager: a JSON-backed task API, a typed client for it, and
//! terminal views built on top of the client.
//!
//! - [`stats::aggregate`] turns a task snapshot into [`models::TaskStats`]
//! - [`app::router`] serves the task API under `/api`
//! - [`client::TaskApi`] calls that API
//! - [`views`] renders the home dashboard, summary and task list

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes_stats;
pub mod routes_tasks;
pub mod stats;
pub mod store;
pub mod views;
