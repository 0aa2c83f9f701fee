//! Error types and handling
//!
//! This module provides the error types used throughout the assessment engine.
//! All errors implement the `EdgeErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! Rejected allocation changes are *not* errors: an overdraw or a negative
//! value is a silent no-op reported through a `bool`. The variants here cover
//! caller bugs (wrong stage, out-of-range index) and configuration problems.

use thiserror::Error;

use crate::types::Stage;

/// Trait for assessment error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait EdgeErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Caller precondition failures are not recoverable: the presentation
    /// layer produced a call that is inconsistent with the session state.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Precondition**: an operation invoked in the wrong stage or with an
///   index, option or choice that does not exist
/// - **Input**: unparseable category keys or trade-off choices
/// - **Catalog**: static content that fails validation
/// - **Configuration**: invalid or unreadable config files
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, EdgeErrorExt};
/// use sdk::types::Stage;
///
/// let error = EngineError::UnknownCategory("marketing".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal = EngineError::StageMismatch {
///     expected: Stage::Collide,
///     actual: Stage::Allocate,
/// };
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Precondition errors
    #[error("Operation requires stage {expected} but session is in {actual}")]
    StageMismatch { expected: Stage, actual: Stage },

    #[error("Cannot advance from stage {0}")]
    NoManualAdvance(Stage),

    #[error("Budget not fully allocated: {remaining} tokens remaining")]
    BudgetNotSpent { remaining: u32 },

    #[error("Scenario index {index} is not answerable (current: {current})")]
    ScenarioIndex { index: usize, current: usize },

    #[error("Option {option} out of range for scenario {index} ({count} options)")]
    OptionOutOfRange {
        index: usize,
        option: usize,
        count: usize,
    },

    #[error("Trade-off index {index} is not answerable (current: {current})")]
    TradeoffIndex { index: usize, current: usize },

    // Input errors
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid trade-off choice: {0}")]
    InvalidChoice(String),

    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    // Catalog errors
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether this error reports a caller bug rather than bad user input
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::StageMismatch { .. }
                | Self::NoManualAdvance(_)
                | Self::BudgetNotSpent { .. }
                | Self::ScenarioIndex { .. }
                | Self::OptionOutOfRange { .. }
                | Self::TradeoffIndex { .. }
        )
    }
}

impl EdgeErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            // Precondition errors
            Self::StageMismatch { .. } => "That action is not available at this point",
            Self::NoManualAdvance(_) => "This round continues automatically once answered",
            Self::BudgetNotSpent { .. } => "Allocate all 100 tokens before continuing",
            Self::ScenarioIndex { .. } => "Only the current scenario can be answered",
            Self::OptionOutOfRange { .. } => "Pick one of the listed responses",
            Self::TradeoffIndex { .. } => "Only the current trade-off can be answered",

            // Input errors
            Self::UnknownCategory(_) => "Use one of the listed category keys",
            Self::InvalidChoice(_) => "Choose A or B",
            Self::InvalidAllocation(_) => "Allocations must be key=value pairs summing to 100",

            // Catalog errors
            Self::InvalidCatalog(_) => "Check the assessment content file for errors",

            // Configuration errors
            Self::Config(_) => "Check your config.toml file for errors",

            // Generic IO error
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        !self.is_precondition()
    }
}
