use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use thiserror::Error;

use super::types::Target;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieval is the only failable, blocking boundary of a scrape task;
/// extraction downstream is pure. Everything that can go wrong fetching one
/// target's line text lands here and is absorbed as data by the
/// orchestrator, never propagated.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Http(reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("page returned HTTP {0}")]
    BadStatus(u16),
    #[error("no visible text matching \"in line\" found")]
    MissingLineText,
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RetrievalError::Timeout
        } else {
            RetrievalError::Http(err)
        }
    }
}

/// Source of one target's rendered line-status text. Behind a trait so the
/// orchestrator and the HTTP handlers can be exercised with deterministic
/// fakes instead of live requests.
#[async_trait]
pub trait LineSource: Send + Sync {
    async fn fetch_line_text(&self, target: &Target) -> Result<String, RetrievalError>;
}

pub fn lineup_url(store_id: u32) -> String {
    format!("https://gosnappy.io/lineup/?force=true&storeId={store_id}")
}

/// Default adapter: plain HTTP fetch of the lineup page, then a scan of the
/// returned markup for the line-status element.
pub struct HttpLineSource {
    client: Client,
}

impl HttpLineSource {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpLineSource { client })
    }
}

#[async_trait]
impl LineSource for HttpLineSource {
    async fn fetch_line_text(&self, target: &Target) -> Result<String, RetrievalError> {
        let url = lineup_url(target.store_id);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RetrievalError::BadStatus(status.as_u16()));
        }
        let html = resp.text().await?;
        find_line_text(&html).ok_or(RetrievalError::MissingLineText)
    }
}

/// Find the innermost element owning a text node that matches /in line/i and
/// return that element's full visible text. Returning the whole element keeps
/// a count attached even when the page splits "There are <b>3</b> parties in
/// line" across sibling nodes.
pub(crate) fn find_line_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    for node in doc.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !text.to_lowercase().contains("in line") {
            continue;
        }
        let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        // scripts can mention "in line" without it being visible text
        if matches!(parent.value().name(), "script" | "style") {
            continue;
        }
        let owned = parent.text().collect::<String>();
        let owned = owned.trim();
        if !owned.is_empty() {
            return Some(owned.to_string());
        }
    }
    None
}
