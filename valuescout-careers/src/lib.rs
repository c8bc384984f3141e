//! Careers site scraping.
//!
//! - [`CareersPage`]: navigation steps over any [`valuescout_drivers::BrowserPage`]
//! - [`extract`]: core value extraction, exclamation mark count, file name slugs
//! - [`images`]: image download with element snapshot fallback
//! - [`persist`]: JSON output
//! - [`run_core_values_scenario`]: every step in order

pub mod careers_page;
pub mod extract;
pub mod images;
pub mod persist;
pub mod scenario;
pub mod types;

pub use careers_page::CareersPage;
pub use extract::{count_exclamation_marks, extract_core_values, slug};
pub use images::download_core_value_images;
pub use persist::{load_extraction, save_extraction};
pub use scenario::{ScenarioReport, run_core_values_scenario};
pub use types::{CoreValueEntry, DownloadedImage, ExtractionResult, ImageSource};
