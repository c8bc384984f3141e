use crate::scout_browser::{launch::chrome_capabilities, pacing::Pacing, page::ScoutPage};
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use tracing::info;
use valuescout_config::BrowserConfig;

/// Thin wrapper around a `fantoccini` WebDriver session.
pub struct ScoutDriver {
    pub client: Client,
    pub pacing: Pacing,
}

impl ScoutDriver {
    /// Open a browser session on the WebDriver service at
    /// `cfg.webdriver_url` (Chromedriver on `http://localhost:9515` by default).
    pub async fn connect(cfg: &BrowserConfig, pacing: Pacing) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(cfg))
            .connect(&cfg.webdriver_url)
            .await
            .with_context(|| format!("connect to webdriver at {}", cfg.webdriver_url))?;

        info!(
            target: "browser.driver",
            url = %cfg.webdriver_url,
            headless = cfg.headless,
            width = cfg.viewport.width,
            height = cfg.viewport.height,
            "browser session opened"
        );

        Ok(Self { client, pacing })
    }

    /// A [`ScoutPage`] bound to this session.
    pub fn page(&self) -> ScoutPage {
        ScoutPage::new(self.client.clone(), self.pacing)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!(target: "browser.driver", "browser session closed");
        Ok(())
    }
}
