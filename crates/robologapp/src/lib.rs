//! # Robolog
//!
//! A ledger for a fleet of service robots: which robots exist, which client each
//! one is deployed to, and what maintenance issues were logged against them. The
//! ledger is a workbook of four record sheets:
//!
//! - **Robot Log**: one row per robot, keyed by serial number
//! - **Client Log**: one row per deployment, addressed by position
//! - **Maintenance and troubleshooting log**: one row per issue
//! - **Robot Model**: the allowed robot types
//!
//! ## Architecture
//!
//! Robolog follows a layered design so the same logic can back any front end:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ UI (robolog CLI)                                 │
//! ├──────────────────────────────────────────────────┤
//! │ api::RobologApi       thin facade, row numbers   │
//! ├──────────────────────────────────────────────────┤
//! │ commands::*           business rules, sagas      │
//! ├──────────────────────────────────────────────────┤
//! │ workbook::Workbook    cached reads, invalidation │
//! ├──────────────────────────────────────────────────┤
//! │ store::SheetStore     records by key or row      │
//! ├──────────────────────────────────────────────────┤
//! │ SheetBackend          MemBackend / FsBackend     │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//!
//! Robot status and deployment rows are kept in step by the commands: deploying
//! marks a robot Active and logs a deployment, retrieving reverses both, deleting
//! a robot deactivates its deployments first. The backend has no transactions, so
//! each of these runs as a [`saga::Saga`] and reports a partial outcome when only
//! some of its writes land.
//!
//! Concurrent sessions are not coordinated: the last write wins.
//!
//! ## Start Here
//!
//! [`init::initialize`] resolves the workbook, loads [`config::RobologConfig`]
//! and authenticates, returning a context holding a ready [`api::RobologApi`].

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod nav;
pub mod record;
pub mod saga;
pub mod store;
pub mod workbook;
