//! Error types for the benefit consolidation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every run-level failure. Per-record conditions (a missing identifier,
//! a disqualifying role, an excluded employee) are not errors; they are
//! reported through [`crate::calculation::RejectionReason`] and never abort a run.

use thiserror::Error;

/// The main error type for the benefit consolidation engine.
///
/// # Example
///
/// ```
/// use benefit_engine::error::EngineError;
///
/// let error = EngineError::SourceNotFound {
///     name: "ATIVOS.xlsx".to_string(),
/// };
/// assert_eq!(error.to_string(), "Source not found: ATIVOS.xlsx");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A named tabular source could not be located.
    #[error("Source not found: {name}")]
    SourceNotFound {
        /// The source name or path.
        name: String,
    },

    /// A tabular source has fewer than two rows (header plus one record).
    #[error("Source '{name}' is empty")]
    EmptySource {
        /// The source name.
        name: String,
    },

    /// A tabular source exists but could not be read.
    #[error("Failed to read source '{name}': {message}")]
    SourceReadError {
        /// The source name.
        name: String,
        /// A description of the read failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No language model is configured for this engine.
    #[error("Language model is not configured")]
    AiNotConfigured,

    /// The language-model call failed before a response was received.
    #[error("Language model request failed: {message}")]
    AiTransport {
        /// A description of the transport failure.
        message: String,
    },

    /// The language-model call did not complete in time.
    #[error("Language model request timed out after {seconds}s")]
    AiTimeout {
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// The language-model response could not be parsed as a consolidation.
    #[error("Language model response is malformed: {message}")]
    AiResponseMalformed {
        /// A description of what was wrong with the payload.
        message: String,
    },

    /// The language-model response parsed but listed too few employees.
    #[error("Language model returned {count} employees, at least {minimum} required")]
    AiResponseInsufficient {
        /// The number of employees returned.
        count: usize,
        /// The minimum accepted count.
        minimum: usize,
    },

    /// The report artifact could not be written.
    #[error("Failed to write report '{path}': {message}")]
    ReportWriteError {
        /// The artifact path.
        path: String,
        /// A description of the write failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true if this error should send the orchestrator to the
    /// deterministic path rather than fail the run.
    pub fn is_ai_path_failure(&self) -> bool {
        matches!(
            self,
            EngineError::AiNotConfigured
                | EngineError::AiTransport { .. }
                | EngineError::AiTimeout { .. }
                | EngineError::AiResponseMalformed { .. }
                | EngineError::AiResponseInsufficient { .. }
        )
    }

    /// Returns true if a retry of the language-model call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::AiTransport { .. } | EngineError::AiTimeout { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
