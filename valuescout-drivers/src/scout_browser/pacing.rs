use std::time::Duration;
use tokio::time::sleep;
use valuescout_config::PacingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Fixed pauses that give menus, animations and page loads time to finish.
pub struct Pacing {
    pub slow_mo: Duration,
    pub settle: Duration,
    pub short_settle: Duration,
    pub stabilize: Duration,
}

impl Pacing {
    pub fn from_config(cfg: &PacingConfig) -> Self {
        Self {
            slow_mo: Duration::from_millis(cfg.slow_mo_ms),
            settle: Duration::from_millis(cfg.settle_ms),
            short_settle: Duration::from_millis(cfg.short_settle_ms),
            stabilize: Duration::from_millis(cfg.stabilize_ms),
        }
    }

    /// No pauses; scripted pages and tests.
    pub fn none() -> Self {
        Self::from_config(&PacingConfig::none())
    }

    /// Pause applied after every browser action.
    pub async fn after_action(&self) {
        pause(self.slow_mo).await;
    }

    pub async fn settle(&self) {
        pause(self.settle).await;
    }

    pub async fn short_settle(&self) {
        pause(self.short_settle).await;
    }

    pub async fn stabilize(&self) {
        pause(self.stabilize).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        sleep(d).await;
    }
}
