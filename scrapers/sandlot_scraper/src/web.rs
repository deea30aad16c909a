use std::time::Duration;
use tracing::{debug, info};

use crate::{
    config::ScraperConfig,
    error::{Result, ScrapeError},
};

/// Source of raw page HTML. Both the listing and the schedule pages are the
/// same endpoint with different query parameters.
pub trait HtmlFetcher {
    fn fetch_html(&self, params: &[(&str, &str)]) -> Result<String>;

    fn fetch_team_listing(&self, parent_league_id: &str) -> Result<String> {
        self.fetch_html(&[("leagueid", parent_league_id)])
    }

    fn fetch_schedule(&self, team_id: &str, league_id: &str) -> Result<String> {
        self.fetch_html(&[("teamid", team_id), ("leagueid", league_id)])
    }
}

pub struct WebHtmlFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WebHtmlFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.scraping.user_agent)
            .timeout(Duration::from_secs(config.scraping.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.site.base_url.clone(),
        })
    }
}

impl HtmlFetcher for WebHtmlFetcher {
    fn fetch_html(&self, params: &[(&str, &str)]) -> Result<String> {
        info!("Fetching {} {:?}", self.base_url, params);
        let response = self.client.get(&self.base_url).query(params).send()?;
        debug!("Response headers: {:?}", response.headers());

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Fetch {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text()?;
        debug!("Downloaded {} bytes", html.len());
        Ok(html)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Serves canned pages keyed by their query string, e.g. `teamid=1&leagueid=2`.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    impl StaticFetcher {
        pub fn with_page(mut self, query: &str, html: &str) -> Self {
            self.pages.insert(query.to_string(), html.to_string());
            self
        }
    }

    impl HtmlFetcher for StaticFetcher {
        fn fetch_html(&self, params: &[(&str, &str)]) -> Result<String> {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            self.pages.get(&query).cloned().ok_or(ScrapeError::Fetch {
                url: format!("static://?{}", query),
                status: 404,
            })
        }
    }
}
