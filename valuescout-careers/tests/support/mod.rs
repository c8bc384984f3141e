//! Scripted in-memory page shared by the integration tests.
#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use valuescout_common::Selector;
use valuescout_config::{PacingConfig, ScoutConfig};
use valuescout_drivers::BrowserPage;

#[derive(Debug, Clone, Default)]
pub struct MockElement {
    pub text: Option<String>,
    pub attrs: HashMap<String, String>,
    pub visible: bool,
    pub snapshot: Option<Vec<u8>>,
    pub navigates_to: Option<String>,
    pub opens_tab: bool,
    pub failing_clicks: u32,
}

impl MockElement {
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::visible()
        }
    }

    pub fn link_to(url: &str, new_tab: bool) -> Self {
        Self {
            navigates_to: Some(url.to_string()),
            opens_tab: new_tab,
            ..Self::visible()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn snapshot(mut self, png: &[u8]) -> Self {
        self.snapshot = Some(png.to_vec());
        self
    }

    pub fn failing_clicks(mut self, n: u32) -> Self {
        self.failing_clicks = n;
        self
    }
}

#[derive(Debug, Default)]
struct State {
    url: String,
    elements: HashMap<String, MockElement>,
    calls: Vec<String>,
}

/// A page whose elements are declared up front, keyed by selector.
#[derive(Debug, Default)]
pub struct MockPage {
    state: Mutex<State>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, selector: &Selector, element: MockElement) -> Self {
        self.state
            .lock()
            .unwrap()
            .elements
            .insert(selector.to_string(), element);
        self
    }

    pub fn without(self, selector: &Selector) -> Self {
        self.state.lock().unwrap().elements.remove(&selector.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn element(&self, selector: &Selector) -> Result<MockElement> {
        self.state
            .lock()
            .unwrap()
            .elements
            .get(&selector.to_string())
            .cloned()
            .ok_or_else(|| anyhow!("no element for {selector}"))
    }

    fn visible_element(&self, selector: &Selector) -> Result<MockElement> {
        let element = self.element(selector)?;
        if !element.visible {
            bail!("{selector} is hidden");
        }
        Ok(element)
    }
}

#[async_trait]
impl BrowserPage for MockPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {url}"));
        self.state.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn wait_for_load(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn hover(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        self.visible_element(selector)?;
        self.record(format!("hover {selector}"));
        Ok(())
    }

    async fn click(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        self.visible_element(selector)?;
        let mut state = self.state.lock().unwrap();
        let key = selector.to_string();
        let element = state
            .elements
            .get_mut(&key)
            .ok_or_else(|| anyhow!("no element for {selector}"))?;
        if element.failing_clicks > 0 {
            element.failing_clicks -= 1;
            bail!("click on {selector} intercepted");
        }
        let target = element.navigates_to.clone();
        state.calls.push(format!("click {selector}"));
        if let Some(url) = target {
            state.url = url;
        }
        Ok(())
    }

    async fn wait_visible(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        self.visible_element(selector).map(|_| ())
    }

    async fn is_visible(&self, selector: &Selector, _timeout: Duration) -> Result<bool> {
        Ok(self.element(selector).map(|e| e.visible).unwrap_or(false))
    }

    async fn scroll_into_view(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        self.element(selector)?;
        self.record(format!("scroll_into_view {selector}"));
        Ok(())
    }

    async fn scroll_by(&self, dy: i64) -> Result<()> {
        self.record(format!("scroll_by {dy}"));
        Ok(())
    }

    async fn scroll_to_fraction(&self, fraction: f64) -> Result<()> {
        self.record(format!("scroll_to {fraction}"));
        Ok(())
    }

    async fn inner_text(&self, selector: &Selector, _timeout: Duration) -> Result<String> {
        self.element(selector)?
            .text
            .ok_or_else(|| anyhow!("{selector} has no text"))
    }

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
        _timeout: Duration,
    ) -> Result<Option<String>> {
        Ok(self.element(selector)?.attrs.get(name).cloned())
    }

    async fn screenshot_element(&self, selector: &Selector, _timeout: Duration) -> Result<Vec<u8>> {
        self.record(format!("screenshot {selector}"));
        self.element(selector)?
            .snapshot
            .ok_or_else(|| anyhow!("{selector} cannot be captured"))
    }

    async fn click_into_new_tab(
        &self,
        selector: &Selector,
        click_timeout: Duration,
        _tab_timeout: Duration,
    ) -> Result<bool> {
        self.click(selector, click_timeout).await?;
        Ok(self.element(selector)?.opens_tab)
    }
}

pub const CORE_VALUES: [(&str, &str); 4] = [
    (
        "Whatever it takes!",
        "We go above and beyond for our clients!",
    ),
    ("We work together.", "One team, one goal."),
    ("We make an impact.", "Our work changes things!"),
    ("Passion is our fuel.", "We love what we do."),
];

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

/// Configuration with no pauses, writing under `out`.
pub fn fast_config(out: &Path) -> ScoutConfig {
    let mut config = ScoutConfig::default();
    config.pacing = PacingConfig::none();
    config.retry.delay_ms = 0;
    config.retry.ready_check_delay_ms = 0;
    config.output.json_path = out.join("data/core_values.json");
    config.output.images_dir = out.join("data/images");
    config
}

/// The company site as the default configuration expects it, with the
/// careers link opening the careers subdomain in a new tab.
pub fn trg_site(config: &ScoutConfig) -> MockPage {
    let site = &config.site;
    let mut page = MockPage::new()
        .with(&site.cookie_buttons[0], MockElement::visible())
        .with(&site.who_we_are[0], MockElement::visible())
        .with(
            &site.careers_links[0],
            MockElement::link_to("https://careers.trgint.com/", true),
        )
        .with(&site.life_at_links[0], MockElement::visible())
        .with(&site.core_values_anchors[0], MockElement::visible());
    for (spec, (headline, description)) in site.core_values.iter().zip(CORE_VALUES) {
        page = page
            .with(&spec.headline, MockElement::text(&format!("  {headline}\n")))
            .with(&spec.description, MockElement::text(description))
            .with(&spec.image, MockElement::visible().snapshot(PNG));
    }
    page
}
