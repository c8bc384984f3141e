use crate::extract;
use crate::images::{self, ImageJob};
use crate::types::{CoreValueEntry, DownloadedImage};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;
use valuescout_common::{Result, ScoutError};
use valuescout_config::{ScoutConfig, SiteConfig, TimeoutConfig};
use valuescout_drivers::{BrowserPage, Pacing};
use valuescout_http::HttpClient;
use valuescout_runtime::{Exhausted, Fallback, RetryPolicy, first_success, retry};

const NAVIGATE_STEP: &str = "navigate_to_careers";

/// Page object for the company site and its careers subdomain.
pub struct CareersPage<'a, P: ?Sized> {
    page: &'a P,
    config: &'a ScoutConfig,
    pacing: Pacing,
}

impl<'a, P> CareersPage<'a, P>
where
    P: BrowserPage + ?Sized,
{
    pub fn new(page: &'a P, config: &'a ScoutConfig) -> Self {
        Self {
            page,
            config,
            pacing: Pacing::from_config(&config.pacing),
        }
    }

    fn site(&self) -> &'a SiteConfig {
        &self.config.site
    }

    fn timeouts(&self) -> &'a TimeoutConfig {
        &self.config.timeouts
    }

    /// Load the company home page and wait for it to settle.
    pub async fn open_home(&self) -> Result<()> {
        let url = &self.site().base_url;
        self.page.goto(url).await?;
        self.page.wait_for_load(self.timeouts().page_load()).await?;
        self.pacing.settle().await;
        info!(target: "careers.nav", %url, "home page loaded");
        Ok(())
    }

    /// Dismiss the cookie banner if there is one. Returns whether a button
    /// was clicked.
    pub async fn accept_cookies(&self) -> bool {
        let page = self.page;
        let lookup = self.timeouts().lookup();
        match first_success(&self.site().cookie_buttons, move |_, sel| {
            page.click(sel, lookup)
        })
        .await
        {
            Fallback::Found { index, .. } => {
                info!(target: "careers.nav", candidate = index, "accepted cookies");
                self.pacing.short_settle().await;
                true
            }
            Fallback::Exhausted { .. } => {
                debug!(target: "careers.nav", "no cookie banner");
                false
            }
        }
    }

    /// Reach the careers site through the "Who we are" menu.
    ///
    /// Retried per the configured policy, reloading the home page before
    /// every attempt after the first. Returns the careers URL.
    pub async fn navigate_to_careers(&self) -> Result<String> {
        let policy = RetryPolicy::new(
            self.config.retry.max_attempts,
            Duration::from_millis(self.config.retry.delay_ms),
        );
        match retry(&policy, move |attempt| self.careers_attempt(attempt)).await {
            Ok(url) => {
                info!(target: "careers.nav", %url, "on careers page");
                Ok(url)
            }
            Err(Exhausted { attempts, last }) => {
                error!(target: "careers.nav", attempts, error = %last, "careers navigation failed");
                Err(ScoutError::StepExhausted {
                    step: NAVIGATE_STEP,
                    attempts,
                    last: last.to_string(),
                })
            }
        }
    }

    async fn careers_attempt(&self, attempt: u32) -> Result<String> {
        let site = self.site();
        let t = self.timeouts();
        let page = self.page;
        info!(
            target: "careers.nav",
            attempt,
            max_attempts = self.config.retry.max_attempts,
            "navigating to careers"
        );

        if attempt > 1 {
            page.goto(&site.base_url).await?;
            page.wait_for_load(t.page_load()).await?;
            self.pacing.settle().await;
        }

        let hover = t.hover();
        first_success(&site.who_we_are, move |_, sel| page.hover(sel, hover))
            .await
            .ok_or_else(|errors| candidates_failed("hover 'Who we are' menu", errors))?;

        if !self.careers_link_ready().await {
            warn!(target: "careers.nav", attempt, "careers link never settled; trying candidates anyway");
        }

        let (lookup, click, tab_wait) = (t.lookup(), t.click(), t.new_tab());
        let followed = first_success(&site.careers_links, move |_, sel| async move {
            if !page.is_visible(sel, lookup).await? {
                anyhow::bail!("{sel} not visible");
            }
            page.click_into_new_tab(sel, click, tab_wait).await
        })
        .await;
        let new_tab = match followed {
            Fallback::Found { index, value } => {
                debug!(target: "careers.nav", candidate = index, new_tab = value, "clicked careers link");
                value
            }
            Fallback::Exhausted { errors } => {
                return Err(candidates_failed("click careers link", errors));
            }
        };

        if let Err(e) = page.wait_for_load(t.page_load()).await {
            warn!(target: "careers.nav", error = %e, "careers page still loading");
        }
        self.pacing.settle().await;

        let url = page.current_url().await?;
        if url.contains(&site.careers_url_marker) || url.to_lowercase().contains("careers") {
            info!(target: "careers.nav", %url, new_tab, "landed on careers site");
            Ok(url)
        } else {
            Err(ScoutError::Step(format!("landed on {url}, not the careers site")))
        }
    }

    /// Wait until the careers link in the open menu is visible and stays
    /// visible through a stabilisation pause.
    async fn careers_link_ready(&self) -> bool {
        let sel = &self.site().careers_link_ready;
        let visible = self.timeouts().visible();
        let checks = self.config.retry.ready_checks.max(1);
        for check in 1..=checks {
            match self.page.wait_visible(sel, visible).await {
                Ok(()) => {
                    self.pacing.stabilize().await;
                    if self.page.is_visible(sel, Duration::ZERO).await.unwrap_or(false) {
                        debug!(target: "careers.nav", check, "careers link stable");
                        return true;
                    }
                }
                Err(e) => {
                    debug!(target: "careers.nav", check, checks, error = %e, "careers link not visible yet");
                    sleep(Duration::from_millis(self.config.retry.ready_check_delay_ms)).await;
                }
            }
        }
        false
    }

    /// Jump to the "Life at TRG" section, by link or by scrolling to 40% of
    /// the page. Returns whether the link was used.
    pub async fn scroll_to_life_at(&self) -> bool {
        let page = self.page;
        let click = self.timeouts().click();
        let outcome = first_success(&self.site().life_at_links, move |_, sel| {
            page.click(sel, click)
        })
        .await;
        if let Fallback::Found { index, .. } = outcome {
            info!(target: "careers.nav", candidate = index, "opened 'Life at' section");
            self.pacing.settle().await;
            return true;
        }

        info!(target: "careers.nav", "no 'Life at' link, scrolling instead");
        if let Err(e) = page.scroll_to_fraction(0.4).await {
            warn!(target: "careers.nav", error = %e, "scroll failed");
        }
        self.pacing.settle().await;
        false
    }

    /// Bring the core values block into view, by anchor or by scrolling to
    /// half the page. Returns whether an anchor was found.
    pub async fn scroll_to_core_values(&self) -> bool {
        let page = self.page;
        let lookup = self.timeouts().lookup();
        let outcome = first_success(&self.site().core_values_anchors, move |_, sel| {
            page.scroll_into_view(sel, lookup)
        })
        .await;
        if let Fallback::Found { index, .. } = outcome {
            self.pacing.settle().await;
            info!(target: "careers.nav", candidate = index, "scrolled to core values");
            if let Err(e) = page.scroll_by(-150).await {
                warn!(target: "careers.nav", error = %e, "scroll adjustment failed");
            }
            self.pacing.short_settle().await;
            return true;
        }

        info!(target: "careers.nav", "no core values anchor, using fallback scroll position");
        if let Err(e) = page.scroll_to_fraction(0.5).await {
            warn!(target: "careers.nav", error = %e, "scroll failed");
        }
        self.pacing.settle().await;
        false
    }

    /// One entry per configured core value, in configuration order.
    pub async fn extract_core_values(&self) -> Vec<CoreValueEntry> {
        extract::extract_core_values(self.page, &self.site().core_values, self.timeouts().lookup())
            .await
    }

    /// Save the image for each extracted entry under the configured images
    /// directory.
    pub async fn download_images(
        &self,
        http: &HttpClient,
        entries: &[CoreValueEntry],
    ) -> Result<Vec<DownloadedImage>> {
        let origin = Url::parse(&self.site().careers_origin)
            .map_err(|e| ScoutError::Config(format!("site.careers_origin: {e}")))?;
        let job = ImageJob {
            http,
            origin: &origin,
            images_dir: &self.config.output.images_dir,
            lookup: self.timeouts().lookup(),
        };
        images::download_core_value_images(self.page, entries, &self.site().core_values, &job).await
    }
}

fn candidates_failed(what: &str, errors: Vec<anyhow::Error>) -> ScoutError {
    let tried = errors.len();
    match errors.last() {
        Some(last) => ScoutError::Step(format!("could not {what} ({tried} candidates): {last}")),
        None => ScoutError::Step(format!("could not {what}: no candidates configured")),
    }
}
