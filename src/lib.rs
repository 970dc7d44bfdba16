//! taskman - Flat-file Task and User Manager Library
//!
//! This library provides the core functionality for the taskman CLI tool:
//! an interactive task/user manager persisting to plain-text flat files.
//!
//! # Core Concepts
//!
//! - **Credential Store**: identity → secret mapping, seeded with a default
//!   admin identity on first run
//! - **Task Store**: ordered task records, fully rewritten on every mutation
//! - **Session Gate**: one login per program run, terminal once authenticated
//! - **Reports**: derived task-level and identity-level overview artifacts,
//!   display gated to the admin session
//!
//! # Module Organization
//!
//! - `cli`: launch surface using clap
//! - `config`: configuration loading from `taskman.toml`
//! - `error`: error types and result aliases
//! - `storage`: data-directory paths and atomic flat-file rewrites
//! - `credential`: credential store and authentication checks
//! - `task`: task records, line format, and the task store
//! - `session`: login state machine and the authenticated session value
//! - `report`: overview statistics and report artifacts
//! - `menu`: interactive login and menu loop

pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod menu;
pub mod report;
pub mod session;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
