//! Core domain + application logic for the WB photo relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the catalog HTTP API
//! live behind ports (traits) implemented in adapter crates.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod identifiers;
pub mod logging;
pub mod messaging;
pub mod pipeline;

pub use errors::{Error, Result};
