//! Configuration module for the phrase clipper.
//!
//! Provides CLI argument parsing and configuration management.

#[allow(clippy::module_inception)]
mod config;
mod voices;

pub use config::{AppConfig, Provider};
