use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    /// Both the team listing and the schedule pages live under this URL.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://sandlotsports.biz/teams/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimits {
    /// Pause between two schedule requests.
    pub delay_secs: u64,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self { delay_secs: 15 }
    }
}

impl RateLimits {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; SandlotScraper/0.1)".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    pub games_path: PathBuf,
    pub errors_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            games_path: PathBuf::from("mufa_test.txt"),
            errors_path: PathBuf::from("mufa_errors.txt"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub site: SiteConfig,
    pub rate_limits: RateLimits,
    pub scraping: ScrapingConfig,
    pub output: OutputConfig,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("SANDLOT_BASE_URL") {
            config.site.base_url = base_url;
        }
        if let Ok(Some(delay)) = env::var("SCRAPER_DELAY_SECS").map_or(Ok(None), |d| d.parse::<u64>().map(Some)) {
            config.rate_limits.delay_secs = delay;
        }
        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Ok(Some(timeout)) = env::var("SCRAPER_TIMEOUT_SECS").map_or(Ok(None), |t| t.parse::<u64>().map(Some)) {
            config.scraping.request_timeout_secs = timeout;
        }
        if let Ok(path) = env::var("SCRAPER_OUTPUT_FILE") {
            config.output.games_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("SCRAPER_ERROR_FILE") {
            config.output.errors_path = PathBuf::from(path);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_conventions() {
        let config = ScraperConfig::default();
        assert_eq!(config.site.base_url, "http://sandlotsports.biz/teams/");
        assert_eq!(config.rate_limits.delay(), Duration::from_secs(15));
        assert_eq!(config.output.games_path, PathBuf::from("mufa_test.txt"));
        assert_eq!(config.output.errors_path, PathBuf::from("mufa_errors.txt"));
    }
}
