//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (the live careers site contract),
//! 2. YAML files and inline snippets, in the order they were attached,
//! 3. `VALUESCOUT__`-prefixed environment variables (`__` separates levels,
//!    e.g. `VALUESCOUT__BROWSER__HEADLESS=true`).
//!
//! String values may reference `${VAR}` placeholders; they are expanded after
//! merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use valuescout_common::Selector;
use valuescout_common::observability::{LogConfig, LogFormat};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "VALUESCOUT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub version: Option<String>,
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub timeouts: TimeoutConfig,
    pub retry: RetryConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Everything the scraper knows about the target site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Marketing home page the run starts from.
    pub base_url: String,
    /// Origin used to resolve root-relative image addresses.
    pub careers_origin: String,
    /// Substring expected in the URL once the careers page is open.
    pub careers_url_marker: String,
    pub cookie_buttons: Vec<Selector>,
    pub who_we_are: Vec<Selector>,
    /// Link whose visibility signals that the dropdown finished animating.
    pub careers_link_ready: Selector,
    pub careers_links: Vec<Selector>,
    pub life_at_links: Vec<Selector>,
    pub core_values_anchors: Vec<Selector>,
    pub core_values: Vec<CoreValueSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoreValueSpec {
    pub image: Selector,
    pub headline: Selector,
    pub description: Selector,
    pub fallback_headline: String,
    pub fallback_description: String,
}

impl CoreValueSpec {
    fn new(image: &str, headline: &str, description: &str, fallback: (&str, &str)) -> Self {
        Self {
            image: Selector::css(image),
            headline: Selector::css(headline),
            description: Selector::css(description),
            fallback_headline: fallback.0.into(),
            fallback_description: fallback.1.into(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.trgint.com".into(),
            careers_origin: "https://careers.trgint.com".into(),
            careers_url_marker: "careers.trgint.com".into(),
            cookie_buttons: vec![
                Selector::text("button", "Accept"),
                Selector::text("button", "I Accept"),
            ],
            who_we_are: vec![
                Selector::text("a", "Who we are"),
                Selector::text("a", "Who We Are"),
                Selector::css("[href*='who-we-are']"),
            ],
            careers_link_ready: Selector::text("a", "Careers"),
            careers_links: vec![
                Selector::text("a", "Careers"),
                Selector::text("a", "Career"),
                Selector::css("[href*='careers.trgint.com']"),
                Selector::css("[href*='career']"),
            ],
            life_at_links: vec![
                Selector::css("a[href*='#Life at TRG']"),
                Selector::text("a", "Life at TRG"),
            ],
            core_values_anchors: vec![
                Selector::text("*", "Our passion drives us"),
                Selector::text("*", "Whatever it takes!"),
                Selector::text("h2", "Core Values"),
                Selector::text("h3", "Core Values"),
            ],
            core_values: vec![
                CoreValueSpec::new(
                    "#img_comp-lopjihj5",
                    "#comp-lopj2yq19 h5",
                    "#comp-lopj2yq24 p",
                    (
                        "Whatever it takes!",
                        "We are committed to going above and beyond to deliver exceptional results.",
                    ),
                ),
                CoreValueSpec::new(
                    "#img_comp-lopjqpzg",
                    "#comp-lopjqpzr h5",
                    "#comp-lopjqq02 p",
                    (
                        "We work together.",
                        "Collaboration and teamwork are at the heart of everything we do.",
                    ),
                ),
                CoreValueSpec::new(
                    "#img_comp-lopjqjx9",
                    "#comp-lopjqjxj h5",
                    "#comp-lopjqjxr p",
                    (
                        "We make an impact.",
                        "Our work creates meaningful change and drives real results.",
                    ),
                ),
                CoreValueSpec::new(
                    "#img_comp-lopjlapk",
                    "#comp-lopjlap1 h5",
                    "#comp-lopjlapb p",
                    (
                        "Passion is our fuel.",
                        "Our passion drives us to excel and innovate every day.",
                    ),
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub viewport: Viewport,
    /// Extra Chrome command-line switches appended verbatim.
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            viewport: Viewport {
                width: 1920,
                height: 1080,
            },
            extra_args: Vec::new(),
        }
    }
}

/// Per-call browser timeouts, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub hover_ms: u64,
    pub click_ms: u64,
    pub visible_ms: u64,
    /// Short bound for probing candidates and reading text/attributes.
    pub lookup_ms: u64,
    pub new_tab_ms: u64,
    pub page_load_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            hover_ms: 5_000,
            click_ms: 5_000,
            visible_ms: 5_000,
            lookup_ms: 2_000,
            new_tab_ms: 10_000,
            page_load_ms: 15_000,
        }
    }
}

impl TimeoutConfig {
    pub fn hover(&self) -> Duration {
        Duration::from_millis(self.hover_ms)
    }
    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click_ms)
    }
    pub fn visible(&self) -> Duration {
        Duration::from_millis(self.visible_ms)
    }
    pub fn lookup(&self) -> Duration {
        Duration::from_millis(self.lookup_ms)
    }
    pub fn new_tab(&self) -> Duration {
        Duration::from_millis(self.new_tab_ms)
    }
    pub fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts for a required navigation step.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay_ms: u64,
    /// Visibility checks made while waiting for the dropdown to settle.
    pub ready_checks: u32,
    pub ready_check_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 3_000,
            ready_checks: 3,
            ready_check_delay_ms: 1_000,
        }
    }
}

/// Fixed pauses, in milliseconds, that let animations and loads finish.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after every browser action.
    pub slow_mo_ms: u64,
    pub settle_ms: u64,
    pub short_settle_ms: u64,
    /// Extra wait once the careers link is visible, before trusting it.
    pub stabilize_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            slow_mo_ms: 500,
            settle_ms: 2_000,
            short_settle_ms: 1_000,
            stabilize_ms: 1_500,
        }
    }
}

impl PacingConfig {
    /// No pauses at all; used by tests and scripted pages.
    pub fn none() -> Self {
        Self {
            slow_mo_ms: 0,
            settle_ms: 0,
            short_settle_ms: 0,
            stabilize_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub images_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("data/core_values.json"),
            images_dir: PathBuf::from("data/images"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub retries: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            retries: 0,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub app_name: String,
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let base = LogConfig::default();
        Self {
            app_name: base.app_name,
            dir: base.log_dir,
            format: base.format,
            emit_stderr: base.emit_stderr,
            filter: base.default_filter,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            app_name: self.app_name.clone(),
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

impl ScoutConfig {
    /// Reject configurations the scraper cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Message(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.site.core_values.is_empty() {
            return Err(ConfigError::Message(
                "site.core_values must list at least one entry".into(),
            ));
        }
        for (key, url) in [
            ("site.base_url", &self.site.base_url),
            ("site.careers_origin", &self.site.careers_origin),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Message(format!(
                    "{key} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ScoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start from built-in defaults; `VALUESCOUT__` env overrides are applied
    /// last by [`ScoutConfigLoader::load`].
    ///
    /// ```
    /// use valuescout_config::ScoutConfigLoader;
    ///
    /// let config = ScoutConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.site.core_values.len(), 4);
    /// assert_eq!(config.retry.max_attempts, 3);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the format is inferred
    /// from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use valuescout_config::ScoutConfigLoader;
    ///
    /// let cfg = ScoutConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// browser:
    ///   headless: true
    /// output:
    ///   json_path: "out/values.json"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.browser.headless);
    /// assert_eq!(cfg.output.json_path.to_str(), Some("out/values.json"));
    /// assert_eq!(cfg.browser.webdriver_url, "http://localhost:9515");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly
    /// typed config, then validate it.
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScoutConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}
