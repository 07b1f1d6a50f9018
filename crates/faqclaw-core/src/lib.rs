//! # FaqClaw Core
//!
//! Shared foundation for FaqClaw: configuration, error taxonomy,
//! wire types, and the `Provider` trait every LLM backend implements.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::FaqClawConfig;
pub use error::{FaqClawError, Result};
