//! The master calendar page.
//!
//! We keep the listing block's markup as is (it becomes the email body) and
//! collect the feed link of each event from it.

use crate::components::Fetcher;
use crate::error::{scrape_error, BotResult};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

/// The block holding every event of the period
const LISTING_BLOCK: &str = r#"div[class="event-listing-block__events"]"#;

/// Site stylesheets
const STYLESHEETS: &str = r#"head > link[rel="stylesheet"]"#;

/// "Add to Cal" anchors next to each event date
const FEED_LINKS: &str = r#"div[class*="time-box"] > a[href]"#;

/// What the listing page yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedListing {
    /// Outer HTML of the listing block, links absolutized
    pub html: String,
    /// `<link rel="stylesheet">` tags, links absolutized
    pub stylesheets: Vec<String>,
    /// Feed URLs in page order, absolutized like `html` but not entity-escaped
    pub feed_links: Vec<String>,
}

/// Scrapes the listing page
pub struct ListingScraper<F> {
    fetcher: F,
    listing_url: String,
    base_url: String,
}

impl<F: Fetcher> ListingScraper<F> {
    pub fn new(fetcher: F, listing_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            listing_url: listing_url.into(),
            base_url: base_url.into(),
        }
    }

    /// Fetch and parse the listing page
    pub async fn scrape(&self) -> BotResult<ScrapedListing> {
        info!("Fetching listing page {}", self.listing_url);
        let page = self.fetcher.fetch_text(&self.listing_url).await?;
        parse_listing(&page, &self.base_url)
    }

}

/// Parse a listing page fetched from the site at `base_url`
pub fn parse_listing(page: &str, base_url: &str) -> BotResult<ScrapedListing> {
    let document = Html::parse_document(page);

    let block = document
        .select(&selector(LISTING_BLOCK)?)
        .next()
        .ok_or_else(|| scrape_error("No event listing block on the page"))?;

    let stylesheets = document
        .select(&selector(STYLESHEETS)?)
        .map(|link| absolutize_links(&link.html(), base_url))
        .collect();

    let feed_links = feed_links(block, base_url)?;
    if feed_links.is_empty() {
        return Err(scrape_error("Listing block has no event feed links"));
    }
    debug!("Found {} event feeds", feed_links.len());

    Ok(ScrapedListing {
        html: absolutize_links(&block.html(), base_url),
        stylesheets,
        feed_links,
    })
}

fn feed_links(block: ElementRef<'_>, base_url: &str) -> BotResult<Vec<String>> {
    let mut links: Vec<String> = Vec::new();
    for anchor in block.select(&selector(FEED_LINKS)?) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let link = absolutize_href(href, base_url);
        if !links.contains(&link) {
            links.push(link);
        }
    }
    Ok(links)
}

fn selector(css: &str) -> BotResult<Selector> {
    Selector::parse(css).map_err(|e| scrape_error(&format!("Bad selector {}: {:?}", css, e)))
}

/// Rewrite every `href="/...` to point at `base_url`
pub fn absolutize_links(html: &str, base_url: &str) -> String {
    html.replace(
        "href=\"/",
        &format!("href=\"{}/", base_url.trim_end_matches('/')),
    )
}

/// Same rewrite for a single attribute value
fn absolutize_href(href: &str, base_url: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize_links() {
        let html = r#"<a href="/events/1">x</a><a href="https://other.example/">y</a>"#;
        assert_eq!(
            absolutize_links(html, "http://www.caltech.edu"),
            r#"<a href="http://www.caltech.edu/events/1">x</a><a href="https://other.example/">y</a>"#
        );
        assert_eq!(
            absolutize_links(html, "http://www.caltech.edu/"),
            absolutize_links(html, "http://www.caltech.edu")
        );
    }

    #[test]
    fn test_absolutize_href_matches_html() {
        let base = "http://www.caltech.edu";
        let href = "/events/feed.ics";
        let html = format!("<a href=\"{}\">", href);
        assert!(absolutize_links(&html, base).contains(&absolutize_href(href, base)));
    }
}
