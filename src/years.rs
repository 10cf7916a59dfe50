use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

const YEAR_MENU_URL: &str = "https://www.baseball-almanac.com/yearmenu.shtml";

static YEAR_LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table a").unwrap());
static YEAR_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+/.+\.shtml$").unwrap());

/// Fetch the year-menu page and return (year, url) pairs for every anchor
/// whose text is a bare year.
pub async fn fetch_year_urls() -> Result<Vec<(i32, String)>> {
    info!("Fetching year menu: {}", YEAR_MENU_URL);
    let html = reqwest::Client::new()
        .get(YEAR_MENU_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .context("Failed to fetch year menu")?;
    parse_year_menu(&html, YEAR_MENU_URL)
}

fn parse_year_menu(html: &str, base: &str) -> Result<Vec<(i32, String)>> {
    let base = Url::parse(base).context("Invalid year menu URL")?;
    let doc = Html::parse_document(html);

    let mut pairs = Vec::new();
    for anchor in doc.select(&YEAR_LINK_SEL) {
        let text: String = anchor.text().collect::<String>().trim().to_string();
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let Ok(year) = text.parse::<i32>() else { continue };
        let Some(href) = anchor.value().attr("href") else { continue };
        let Ok(resolved) = base.join(href) else { continue };
        if !YEAR_PAGE_RE.is_match(resolved.as_str()) {
            continue;
        }
        pairs.push((year, resolved.to_string()));
    }

    info!("Year links found: {}", pairs.len());
    Ok(pairs)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"
        <html><body><table><tbody>
          <tr>
            <td><a href="yearly/yr2021a.shtml">2021</a></td>
            <td><a href="yearly/yr2022a.shtml"> 2022 </a></td>
            <td><a href="/yearly/yr2023a.shtml">2023</a></td>
          </tr>
          <tr>
            <td><a href="teamstats.shtml">Team Stats</a></td>
            <td><a href="yearly/index.php">1871</a></td>
            <td><a>1900</a></td>
          </tr>
        </tbody></table></body></html>
    "#;

    #[test]
    fn keeps_digit_anchors_and_resolves_hrefs() {
        let pairs =
            parse_year_menu(MENU, "https://www.baseball-almanac.com/yearmenu.shtml").unwrap();
        assert_eq!(
            pairs,
            vec![
                (2021, "https://www.baseball-almanac.com/yearly/yr2021a.shtml".to_string()),
                (2022, "https://www.baseball-almanac.com/yearly/yr2022a.shtml".to_string()),
                (2023, "https://www.baseball-almanac.com/yearly/yr2023a.shtml".to_string()),
            ]
        );
    }
}
