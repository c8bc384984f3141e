use crate::scout_browser::pacing::Pacing;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use fantoccini::{elements::Element, wd::WindowHandle, Client, Locator};
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};
use valuescout_common::Selector;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The page operations the careers scraper is written against.
///
/// Every lookup carries its own timeout; a call that runs out of time fails
/// and leaves recovery to the caller. Implementations drive a single browser
/// session; when [`BrowserPage::click_into_new_tab`] follows a new tab, all
/// later calls target that tab.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Wait until `document.readyState` is `complete`.
    async fn wait_for_load(&self, timeout: Duration) -> Result<()>;

    /// Fails unless a displayed match appears before `timeout`.
    async fn hover(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    async fn click(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Fail unless the element exists and is displayed before `timeout`.
    async fn wait_visible(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Whether the element is displayed within `timeout`; absence is `false`.
    async fn is_visible(&self, selector: &Selector, timeout: Duration) -> Result<bool>;

    async fn scroll_into_view(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Scroll the window vertically by `dy` pixels.
    async fn scroll_by(&self, dy: i64) -> Result<()>;

    /// Scroll to `fraction` of the document height.
    async fn scroll_to_fraction(&self, fraction: f64) -> Result<()>;

    async fn inner_text(&self, selector: &Selector, timeout: Duration) -> Result<String>;

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>>;

    /// PNG snapshot of the element's rendered region.
    async fn screenshot_element(&self, selector: &Selector, timeout: Duration) -> Result<Vec<u8>>;

    /// Click the element and, if a new tab opens within `tab_timeout`, switch
    /// the session to it. Returns whether a new tab was followed.
    async fn click_into_new_tab(
        &self,
        selector: &Selector,
        click_timeout: Duration,
        tab_timeout: Duration,
    ) -> Result<bool>;
}

enum OwnedLocator {
    Css(String),
    XPath(String),
}

impl OwnedLocator {
    fn from_selector(selector: &Selector) -> Self {
        match selector.to_xpath() {
            Some(xpath) => Self::XPath(xpath),
            None => Self::Css(selector.as_css().unwrap_or_default().to_string()),
        }
    }

    fn as_locator(&self) -> Locator<'_> {
        match self {
            Self::Css(css) => Locator::Css(css),
            Self::XPath(xpath) => Locator::XPath(xpath),
        }
    }
}

/// Poll `check` until it yields `Some` or `timeout` elapses.
async fn poll_until<T, F, Fut>(timeout: Duration, mut check: F) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = check().await? {
            return Ok(Some(found));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// [`BrowserPage`] over a live WebDriver session.
#[derive(Clone)]
pub struct ScoutPage {
    pub(crate) client: Client,
    pub(crate) pacing: Pacing,
}

impl ScoutPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client, pacing: Pacing) -> Self {
        Self { client, pacing }
    }

    async fn find(&self, selector: &Selector, timeout: Duration) -> Result<Element> {
        let locator = OwnedLocator::from_selector(selector);
        self.client
            .wait()
            .at_most(timeout)
            .every(POLL_INTERVAL)
            .for_element(locator.as_locator())
            .await
            .with_context(|| format!("no element for {selector} within {timeout:?}"))
    }

    async fn find_displayed(&self, selector: &Selector, timeout: Duration) -> Result<Option<Element>> {
        let locator = &OwnedLocator::from_selector(selector);
        let client = &self.client;
        poll_until(timeout, || async move {
            let candidates = client.find_all(locator.as_locator()).await?;
            for element in candidates {
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(Some(element));
                }
            }
            Ok::<_, anyhow::Error>(None)
        })
        .await
    }

    async fn run_on(&self, element: &Element, script: &str) -> Result<serde_json::Value> {
        let arg = serde_json::to_value(element)?;
        self.client
            .execute(script, vec![arg])
            .await
            .map_err(anyhow::Error::from)
    }
}

#[async_trait]
impl BrowserPage for ScoutPage {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!(target: "browser.page", %url, "goto");
        self.client
            .goto(url)
            .await
            .with_context(|| format!("navigate to {url}"))?;
        self.pacing.after_action().await;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)
    }

    async fn wait_for_load(&self, timeout: Duration) -> Result<()> {
        let client = &self.client;
        let ready = poll_until(timeout, || async move {
            let state = client
                .execute("return document.readyState;", vec![])
                .await?;
            Ok::<_, anyhow::Error>((state.as_str() == Some("complete")).then_some(()))
        })
        .await?;
        ready.ok_or_else(|| anyhow!("page did not finish loading within {timeout:?}"))
    }

    async fn hover(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        let element = self
            .find_displayed(selector, timeout)
            .await?
            .ok_or_else(|| anyhow!("no visible element for {selector} within {timeout:?}"))?;
        // Menus on the target site open on pointer events, not CSS :hover.
        self.run_on(
            &element,
            r#"
            const el = arguments[0];
            el.scrollIntoView({block: 'nearest'});
            for (const type of ['pointerover', 'pointerenter', 'mouseover', 'mouseenter', 'mousemove']) {
                el.dispatchEvent(new MouseEvent(type, {bubbles: true, cancelable: true, view: window}));
            }
            "#,
        )
        .await
        .with_context(|| format!("hover {selector}"))?;
        debug!(target: "browser.page", %selector, "hovered");
        self.pacing.after_action().await;
        Ok(())
    }

    async fn click(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        let element = self
            .find_displayed(selector, timeout)
            .await?
            .ok_or_else(|| anyhow!("no visible element for {selector} within {timeout:?}"))?;
        element
            .click()
            .await
            .with_context(|| format!("click {selector}"))?;
        debug!(target: "browser.page", %selector, "clicked");
        self.pacing.after_action().await;
        Ok(())
    }

    async fn wait_visible(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        self.find_displayed(selector, timeout)
            .await?
            .map(|_| ())
            .ok_or_else(|| anyhow!("{selector} not visible within {timeout:?}"))
    }

    async fn is_visible(&self, selector: &Selector, timeout: Duration) -> Result<bool> {
        Ok(self.find_displayed(selector, timeout).await?.is_some())
    }

    async fn scroll_into_view(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        let element = self.find(selector, timeout).await?;
        self.run_on(
            &element,
            "arguments[0].scrollIntoView({block: 'center', inline: 'nearest'});",
        )
        .await
        .with_context(|| format!("scroll to {selector}"))?;
        self.pacing.after_action().await;
        Ok(())
    }

    async fn scroll_by(&self, dy: i64) -> Result<()> {
        self.client
            .execute("window.scrollBy(0, arguments[0]);", vec![json!(dy)])
            .await?;
        self.pacing.after_action().await;
        Ok(())
    }

    async fn scroll_to_fraction(&self, fraction: f64) -> Result<()> {
        self.client
            .execute(
                "window.scrollTo(0, document.body.scrollHeight * arguments[0]);",
                vec![json!(fraction)],
            )
            .await?;
        self.pacing.after_action().await;
        Ok(())
    }

    async fn inner_text(&self, selector: &Selector, timeout: Duration) -> Result<String> {
        let element = self.find(selector, timeout).await?;
        element.text().await.map_err(anyhow::Error::from)
    }

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>> {
        let element = self.find(selector, timeout).await?;
        element.attr(name).await.map_err(anyhow::Error::from)
    }

    async fn screenshot_element(&self, selector: &Selector, timeout: Duration) -> Result<Vec<u8>> {
        let element = self.find(selector, timeout).await?;
        self.run_on(&element, "arguments[0].scrollIntoView({block: 'center'});")
            .await?;
        element
            .screenshot()
            .await
            .with_context(|| format!("screenshot {selector}"))
    }

    async fn click_into_new_tab(
        &self,
        selector: &Selector,
        click_timeout: Duration,
        tab_timeout: Duration,
    ) -> Result<bool> {
        let before: &Vec<WindowHandle> = &self.client.windows().await?;
        self.click(selector, click_timeout).await?;

        let client = &self.client;
        let opened = poll_until(tab_timeout, || async move {
            let now = client.windows().await?;
            Ok::<_, anyhow::Error>(now.into_iter().find(|h| !before.contains(h)))
        })
        .await?;

        match opened {
            Some(handle) => {
                self.client
                    .switch_to_window(handle)
                    .await
                    .context("switch to new tab")?;
                info!(target: "browser.page", %selector, "followed link into new tab");
                Ok(true)
            }
            None => {
                debug!(target: "browser.page", %selector, "link opened in the same tab");
                Ok(false)
            }
        }
    }
}
