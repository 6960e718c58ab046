//! # Core Runtime Module
//!
//! Provides the runtime infrastructure shared by the OAuth client crates:
//! - Logging and tracing infrastructure
//! - Configuration management (HTTP transport, clock, request defaults)
//!
//! ## Overview
//!
//! This crate wires bridge implementations together and establishes the
//! logging conventions used throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
