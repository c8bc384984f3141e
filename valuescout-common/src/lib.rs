//! Common types and utilities shared across valuescout crates.
//!
//! This crate defines the shared error type, the typed element locator used by
//! configuration and drivers alike, and the observability helpers. It is
//! deliberately small so every crate in the workspace can depend on it.
//!
//! # Overview
//!
//! - [`Selector`]: typed element locator (CSS, XPath or visible text)
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ScoutError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use valuescout_common::Selector;
//!
//! let link = Selector::text("a", "Careers");
//! assert_eq!(
//!     link.to_xpath().as_deref(),
//!     Some("//a[contains(normalize-space(.), 'Careers')]")
//! );
//! ```
pub mod observability;
mod selector;

pub use selector::Selector;

/// Error types used across the valuescout workspace.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// A required navigation step failed on every attempt.
    #[error("step '{step}' failed after {attempts} attempts: {last}")]
    StepExhausted {
        step: &'static str,
        attempts: u32,
        last: String,
    },

    /// A single attempt of a step failed; usually retried by the caller.
    #[error("Step failed: {0}")]
    Step(String),

    /// The browser driver reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;
