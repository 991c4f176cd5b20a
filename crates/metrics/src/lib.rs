//! # Spendlens Metrics Engine
//!
//! This crate turns the raw procurement extracts into the derived figures
//! every view consumes: growth rates, percentage shares, top-N rankings,
//! quartile tiers and concentration ratios.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   files, rendering or caching. It depends only on `core-types` and the
//!   thresholds in `configuration`.
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless
//!   calculator. Every call takes a fresh, read-only snapshot of records
//!   and computes derived fields from scratch; nothing is retained or
//!   mutated between calls.
//!
//! ## Public API
//!
//! - `MetricsEngine`: the settings-holding facade over the calculators.
//! - The free functions in `growth`, `ranking`, `concentration` and
//!   `tiering` for callers that need a single primitive.
//! - `MetricsError`: the specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod category;
pub mod concentration;
pub mod engine;
pub mod error;
pub mod factory;
pub mod growth;
pub mod ranking;
pub mod supplier;
pub mod tiering;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use error::MetricsError;
pub use growth::Growth;
