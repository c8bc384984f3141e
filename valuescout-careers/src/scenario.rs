use crate::careers_page::CareersPage;
use crate::persist::save_extraction;
use crate::types::{DownloadedImage, ExtractionResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};
use valuescout_common::Result;
use valuescout_config::ScoutConfig;
use valuescout_drivers::BrowserPage;
use valuescout_http::HttpClient;

/// What a full core values run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub result: ExtractionResult,
    pub json_path: PathBuf,
    pub images: Vec<DownloadedImage>,
    pub final_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Navigate to the careers site, extract the core values, save them as JSON
/// and download their images.
///
/// Only careers navigation and writing the outputs can fail the run; every
/// other step degrades to a fallback and logs.
#[instrument(skip_all, target = "careers.scenario")]
pub async fn run_core_values_scenario<P>(
    page: &P,
    http: &HttpClient,
    config: &ScoutConfig,
) -> Result<ScenarioReport>
where
    P: BrowserPage + ?Sized,
{
    let started_at = Utc::now();
    let careers = CareersPage::new(page, config);

    careers.open_home().await?;
    careers.accept_cookies().await;
    careers.navigate_to_careers().await?;
    careers.scroll_to_life_at().await;
    careers.scroll_to_core_values().await;

    let entries = careers.extract_core_values().await;
    let result = ExtractionResult::from_entries(entries);
    info!(
        target: "careers.scenario",
        values = result.total_values_extracted,
        exclamation_marks = result.exclamation_marks_count,
        "extraction complete"
    );

    let json_path = config.output.json_path.clone();
    save_extraction(&result, &json_path)?;

    let images = careers.download_images(http, &result.core_values).await?;
    let final_url = page.current_url().await?;

    info!(
        target: "careers.scenario",
        images = images.len(),
        json = %json_path.display(),
        "scenario finished"
    );
    Ok(ScenarioReport {
        result,
        json_path,
        images,
        final_url,
        started_at,
        finished_at: Utc::now(),
    })
}
