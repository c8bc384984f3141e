mod support;

use support::{CORE_VALUES, MockElement, PNG, fast_config, trg_site};
use valuescout_careers::{
    CareersPage, ExtractionResult, ImageSource, load_extraction, run_core_values_scenario,
};
use valuescout_common::ScoutError;
use valuescout_http::HttpClient;

fn http() -> HttpClient {
    HttpClient::new("https://careers.trgint.com").unwrap()
}

#[tokio::test]
async fn full_run_extracts_four_values_in_order_and_saves_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let page = trg_site(&config);

    let report = run_core_values_scenario(&page, &http(), &config).await.unwrap();

    let headlines: Vec<&str> = report
        .result
        .core_values
        .iter()
        .map(|v| v.headline.as_str())
        .collect();
    let expected: Vec<&str> = CORE_VALUES.iter().map(|(h, _)| *h).collect();
    assert_eq!(headlines, expected);
    assert_eq!(report.result.core_values[1].description, "One team, one goal.");
    assert_eq!(report.result.total_values_extracted, 4);
    assert_eq!(report.result.exclamation_marks_count, 3);
    assert_eq!(report.final_url, "https://careers.trgint.com/");

    assert!(report.json_path.exists());
    assert_eq!(load_extraction(&report.json_path).unwrap(), report.result);

    assert_eq!(report.images.len(), 4);
    assert!(report.images.iter().all(|i| i.source == ImageSource::Snapshot));
    let first = dir.path().join("data/images/whatever-it-takes.png");
    assert_eq!(std::fs::read(first).unwrap(), PNG);
}

#[tokio::test]
async fn steps_run_in_page_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let page = trg_site(&config);

    run_core_values_scenario(&page, &http(), &config).await.unwrap();

    let calls = page.calls();
    let pos = |needle: &str| {
        calls
            .iter()
            .position(|c| c.starts_with(needle))
            .unwrap_or_else(|| panic!("missing call {needle}: {calls:?}"))
    };
    assert!(pos("goto https://www.trgint.com") < pos("click button:has-text('Accept')"));
    assert!(pos("hover a:has-text('Who we are')") < pos("click a:has-text('Careers')"));
    assert!(pos("click a:has-text('Careers')") < pos("click css:a[href*='#Life at TRG']"));
    assert!(pos("click css:a[href*='#Life at TRG']") < pos("scroll_into_view"));
    assert!(pos("scroll_into_view") < pos("scroll_by -150"));
    assert!(pos("scroll_by -150") < pos("screenshot"));
}

#[tokio::test]
async fn missing_text_falls_back_per_field() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let specs = &config.site.core_values;
    let page = trg_site(&config)
        .without(&specs[0].headline)
        .without(&specs[2].description)
        .with(&specs[3].headline, MockElement::text(""));
    let careers = CareersPage::new(&page, &config);

    let entries = careers.extract_core_values().await;

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].headline, specs[0].fallback_headline);
    assert_eq!(entries[0].description, CORE_VALUES[0].1);
    assert_eq!(entries[2].headline, "We make an impact.");
    assert_eq!(entries[2].description, specs[2].fallback_description);
    assert_eq!(entries[3].headline, "");
}

#[tokio::test]
async fn empty_page_still_yields_every_configured_value() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let page = support::MockPage::new();

    let entries = CareersPage::new(&page, &config).extract_core_values().await;
    let result = ExtractionResult::from_entries(entries);

    assert_eq!(result.total_values_extracted, 4);
    assert_eq!(result.core_values[0].headline, "Whatever it takes!");
    assert_eq!(result.exclamation_marks_count, 1);
}

#[tokio::test]
async fn same_tab_navigation_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let page = trg_site(&config).with(
        &config.site.careers_links[0],
        MockElement::link_to("https://careers.trgint.com/jobs", false),
    );

    let url = CareersPage::new(&page, &config)
        .navigate_to_careers()
        .await
        .unwrap();

    assert_eq!(url, "https://careers.trgint.com/jobs");
}

#[tokio::test]
async fn hidden_candidates_are_skipped_for_the_next_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let links = &config.site.careers_links;
    let page = trg_site(&config)
        .with(&links[0], MockElement::default())
        .with(&links[1], MockElement::link_to("https://careers.trgint.com/", true));

    CareersPage::new(&page, &config)
        .navigate_to_careers()
        .await
        .unwrap();

    assert_eq!(page.count_calls("click a:has-text('Careers')"), 0);
    assert_eq!(page.count_calls("click a:has-text('Career')"), 1);
}

#[tokio::test]
async fn hidden_menu_copy_falls_through_to_the_next_hover_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let menu = &config.site.who_we_are;
    let page = trg_site(&config)
        .with(&menu[0], MockElement::default())
        .with(&menu[1], MockElement::visible());

    let url = CareersPage::new(&page, &config)
        .navigate_to_careers()
        .await
        .unwrap();

    assert_eq!(url, "https://careers.trgint.com/");
    assert_eq!(page.count_calls("hover a:has-text('Who we are')"), 0);
    assert_eq!(page.count_calls("hover a:has-text('Who We Are')"), 1);
    assert_eq!(page.count_calls("goto"), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_attempt_reloads_home_before_retrying() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config(dir.path());
    config.retry.delay_ms = 3_000;
    let page = trg_site(&config).with(
        &config.site.careers_links[0],
        MockElement::link_to("https://careers.trgint.com/", true).failing_clicks(1),
    );
    let started = tokio::time::Instant::now();

    let url = CareersPage::new(&page, &config)
        .navigate_to_careers()
        .await
        .unwrap();

    assert_eq!(url, "https://careers.trgint.com/");
    assert_eq!(page.count_calls("goto https://www.trgint.com"), 1);
    assert_eq!(page.count_calls("hover"), 2);
    assert!(started.elapsed() >= std::time::Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn missing_menu_exhausts_every_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let mut page = trg_site(&config);
    for candidate in &config.site.who_we_are {
        page = page.without(candidate);
    }

    let err = CareersPage::new(&page, &config)
        .navigate_to_careers()
        .await
        .unwrap_err();

    match err {
        ScoutError::StepExhausted {
            step,
            attempts,
            last,
        } => {
            assert_eq!(step, "navigate_to_careers");
            assert_eq!(attempts, 3);
            assert!(last.contains("Who we are"), "{last}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(page.count_calls("goto"), 2);
    assert_eq!(page.count_calls("click a:has-text('Careers')"), 0);
}

#[tokio::test(start_paused = true)]
async fn off_site_landing_is_a_failed_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let page = trg_site(&config).with(
        &config.site.careers_links[0],
        MockElement::link_to("https://www.trgint.com/who-we-are", false),
    );

    let err = CareersPage::new(&page, &config)
        .navigate_to_careers()
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::StepExhausted { attempts: 3, .. }));
    assert!(err.to_string().contains("not the careers site"));
}

#[tokio::test]
async fn scrolling_falls_back_to_page_fractions() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let page = support::MockPage::new();
    let careers = CareersPage::new(&page, &config);

    assert!(!careers.scroll_to_life_at().await);
    assert!(!careers.scroll_to_core_values().await);
    assert!(!careers.accept_cookies().await);

    assert_eq!(page.calls(), vec!["scroll_to 0.4", "scroll_to 0.5"]);
}
