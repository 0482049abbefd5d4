//! mmboard - A command-line launch board for client onboarding
//!
//! This library provides the core functionality for mmboard, including:
//! - Database connection, configuration and migrations
//! - Data models for stages, client records and board snapshots
//! - The key-value persistence boundary and snapshot store
//! - The board controller (advance, edit, reset)
//! - CLI command parsing, execution and card rendering
//!
//! # Example
//!
//! ```no_run
//! use mmboard::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod db;
pub mod models;
pub mod store;
pub mod board;
pub mod cli;
