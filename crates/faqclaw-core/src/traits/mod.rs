//! Trait seams between FaqClaw layers.

pub mod provider;

pub use provider::{GenerateParams, Provider};
