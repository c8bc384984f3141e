use serde_json::json;
use valuescout_config::BrowserConfig;
use webdriver::capabilities::Capabilities;

/// Construct Chrome command-line arguments for a browser configuration.
pub fn build_chrome_arguments(cfg: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        format!(
            "--window-size={},{}",
            cfg.viewport.width, cfg.viewport.height
        ),
        "--lang=en-US".to_string(),
    ];
    if cfg.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(cfg.extra_args.iter().cloned());
    args
}

/// WebDriver capabilities requesting Chrome with [`build_chrome_arguments`].
pub fn chrome_capabilities(cfg: &BrowserConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": build_chrome_arguments(cfg) }),
    );
    caps
}
