//! Driver layer for browser automation.
//!
//! This crate exposes the browser session and the page abstraction the
//! careers scraper is written against.
//!
//! - [`scout_browser::driver::ScoutDriver`]: WebDriver session wrapper
//! - [`scout_browser::page::BrowserPage`]: the page operations the scraper needs
//! - [`scout_browser::page::ScoutPage`]: `BrowserPage` over a live WebDriver session
//! - [`scout_browser::pacing::Pacing`]: fixed pauses between actions
//! - [`scout_browser::launch`]: Chrome capabilities built from configuration
pub mod scout_browser;

pub use scout_browser::driver::ScoutDriver;
pub use scout_browser::pacing::Pacing;
pub use scout_browser::page::{BrowserPage, ScoutPage};
