use crate::cli::CoreValuesArgs;
use anyhow::{Context, Result};
use valuescout_careers::{ScenarioReport, run_core_values_scenario};
use valuescout_config::ScoutConfig;
use valuescout_drivers::{Pacing, ScoutDriver};
use valuescout_http::HttpClient;
use valuescout_testgen::generate_random_test_string;

pub async fn core_values(cfg: &ScoutConfig, args: &CoreValuesArgs) -> Result<()> {
    let http = HttpClient::new(&cfg.site.careers_origin)?
        .with_timeout(cfg.http.timeout())
        .with_retries(cfg.http.retries);

    let driver = ScoutDriver::connect(&cfg.browser, Pacing::from_config(&cfg.pacing)).await?;
    let outcome = run_core_values_scenario(&driver.page(), &http, cfg).await;
    if let Err(e) = driver.close().await {
        tracing::warn!(error = %e, "browser session did not close cleanly");
    }
    let report = outcome.context("core values run failed")?;

    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ScenarioReport) {
    println!("Careers page: {}", report.final_url);
    for (idx, value) in report.result.core_values.iter().enumerate() {
        println!("{}. {}", idx + 1, value.headline);
        println!("   {}", value.description);
    }
    println!("Core values: {}", report.result.total_values_extracted);
    println!("Exclamation marks: {}", report.result.exclamation_marks_count);
    println!("Images: {}", report.images.len());
    println!("JSON: {}", report.json_path.display());
}

pub fn random_strings(count: usize) {
    for i in 1..=count {
        println!("{i}. {}", generate_random_test_string());
    }
}
