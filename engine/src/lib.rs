//! Executive Edge Engine Library
//!
//! Assessment state machine and scoring engine. Used by the `edge` binary
//! and by integration tests.

/// Time source for response timing
pub mod clock;

/// Round 1 token budget
pub mod allocation;

/// Round 2 and 3 answers, revisions and timings
pub mod responses;

/// Pure scoring of a completed assessment
pub mod scoring;

/// Stage machine for one assessment
pub mod session;

/// Configuration management module
pub mod config;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
