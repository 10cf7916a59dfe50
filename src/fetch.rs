use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::warn;

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;
/// Fixed pause between year fetches; the almanac rate-limits aggressively.
const POLITE_DELAY: Duration = Duration::from_secs(2);

pub fn client() -> Result<Spider> {
    let api_key = std::env::var("SPIDER_API_KEY")
        .map_err(|_| anyhow!("SPIDER_API_KEY environment variable must be set"))?;
    Spider::new(Some(api_key)).map_err(|e| anyhow!("Failed to create Spider client: {}", e))
}

pub async fn polite_pause() {
    tokio::time::sleep(POLITE_DELAY).await;
}

/// Fetch one URL as rendered HTML, retrying transient upstream failures
/// (429/5xx) with exponential backoff. A final error means "no document
/// for this year" to the caller.
pub async fn fetch_rendered(spider: &Spider, url: &str) -> Result<String> {
    let mut attempt = 0u32;
    loop {
        match fetch_once(spider, url).await {
            Ok(html) => return Ok(html),
            Err(e) if attempt < MAX_RETRIES && is_transient(&e) => {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                warn!(
                    "Transient fetch error for {} (attempt {}/{}), backing off {:.1}s: {}",
                    url,
                    attempt + 1,
                    MAX_RETRIES,
                    backoff.as_secs_f64(),
                    e
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_once(spider: &Spider, url: &str) -> Result<String> {
    let params = RequestParams {
        return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
        ..Default::default()
    };

    let response = spider
        .scrape_url(url, Some(params), "application/json")
        .await
        .map_err(|e| anyhow!("Spider scrape failed for {}: {}", url, e))?;

    let parsed: serde_json::Value = match response.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
        None => response,
    };
    let first = parsed.as_array().and_then(|arr| arr.first());

    if let Some(status) = first
        .and_then(|obj| obj.get("status"))
        .and_then(|s| s.as_i64())
    {
        if status == 429 || status >= 500 {
            bail!("Upstream status {} for {}", status, url);
        }
    }

    first
        .and_then(|obj| obj.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No content in spider response for {}", url))
}

// 429 or any 5xx, whether reported as an upstream status or embedded in a
// transport error message.
static TRANSIENT_STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:429|5\d\d)\b").unwrap());

fn is_transient(err: &anyhow::Error) -> bool {
    let msg = err.to_string();
    msg.contains("rate") || TRANSIENT_STATUS_RE.is_match(&msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(is_transient(&anyhow!("Upstream status 429 for x")));
        assert!(is_transient(&anyhow!("Upstream status 503 for x")));
        assert!(is_transient(&anyhow!("rate limited")));
        assert!(!is_transient(&anyhow!("No content in spider response for x")));
        assert!(!is_transient(&anyhow!("Upstream status 404 for x")));
    }

    #[test]
    fn any_5xx_status_is_transient() {
        assert!(is_transient(&anyhow!("Upstream status 504 for x")));
        assert!(is_transient(&anyhow!("Upstream status 521 for x")));
        assert!(is_transient(&anyhow!("Spider scrape failed for x: 502 Bad Gateway")));
        // Digits inside URLs never look like a bare status code.
        assert!(!is_transient(&anyhow!(
            "No content in spider response for https://example.com/yearly/yr2018a.shtml"
        )));
    }
}
