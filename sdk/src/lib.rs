//! Executive Edge SDK
//!
//! Shared types for the assessment engine and anything that renders it.
//! This crate has no runtime state: it describes categories, stages, static
//! content and errors.

/// Error types and handling
pub mod errors;

/// Category, stage and choice types
pub mod types;

/// Static assessment content
pub mod catalog;

// Re-export commonly used types
pub use catalog::{
    Catalog, CategoryDefinition, ResponseOption, ScenarioDefinition, TradeoffDefinition,
};
pub use errors::{EdgeErrorExt, EngineError};
pub use types::{AxisWeights, Category, Choice, Stage};
