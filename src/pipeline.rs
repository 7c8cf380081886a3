use crate::components::feed::FeedReader;
use crate::components::google_calendar::CalendarPublisher;
use crate::components::listing::ListingScraper;
use crate::components::mailchimp::{CampaignProfile, CampaignPublisher};
use crate::components::rewriter::{
    HtmlRewriter, LinkSubstitution, RewrittenEmail, ScrapedDocument,
};
use crate::components::{CalendarService, CampaignService, Fetcher};
use crate::config::Config;
use crate::error::BotResult;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The scraped document and the email rendered from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltEmail {
    pub document: ScrapedDocument,
    pub email: RewrittenEmail,
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub events_published: usize,
    pub campaign_id: String,
}

/// One scrape-publish-mail pass
pub struct Newsletter<F, C, M> {
    scraper: ListingScraper<F>,
    feeds: FeedReader<F>,
    calendar: CalendarPublisher<C>,
    campaign: CampaignPublisher<M>,
    rewriter: HtmlRewriter,
    list_name: String,
    timezone: Tz,
    html_output: Option<PathBuf>,
}

impl<F, C, M> Newsletter<F, C, M>
where
    F: Fetcher + Clone,
    C: CalendarService,
    M: CampaignService,
{
    /// Wire the pipeline to its services using `config`
    pub fn new(fetcher: F, calendar: C, campaign: M, config: &Config) -> BotResult<Self> {
        let timezone = config.timezone()?;
        Ok(Self {
            scraper: ListingScraper::new(
                fetcher.clone(),
                config.listing_url.clone(),
                config.base_url.clone(),
            ),
            feeds: FeedReader::new(fetcher, timezone),
            calendar: CalendarPublisher::new(calendar, config.calendar_id.clone()),
            campaign: CampaignPublisher::new(
                campaign,
                CampaignProfile {
                    application_name: config.application_name.clone(),
                    reply_to: config.reply_email.clone(),
                    listing_url: config.listing_url.clone(),
                },
            ),
            rewriter: HtmlRewriter::canonical()?,
            list_name: config.email_list_name.clone(),
            timezone,
            html_output: config.email_html_output.clone(),
        })
    }

    /// Scrape the listing, publish every event and render the email.
    ///
    /// Stops at the first failure; entries created before it stay in the calendar.
    pub async fn build_email(&self) -> BotResult<BuiltEmail> {
        let listing = self.scraper.scrape().await?;
        debug!("Listing page links {} stylesheets", listing.stylesheets.len());

        let mut document = ScrapedDocument {
            html: listing.html,
            links: Vec::with_capacity(listing.feed_links.len()),
        };

        for feed_url in listing.feed_links {
            let event = self.feeds.read(&feed_url).await?;
            let calendar_link = self.calendar.publish(&event).await?;
            document.links.push(LinkSubstitution {
                feed_url,
                calendar_link,
            });
        }

        let email = self.rewriter.rewrite(&document);
        for hit in &email.rule_hits {
            debug!("Rewrite rule {} matched {} times", hit.rule, hit.hits);
        }
        for rule in email.unused_rules() {
            warn!("Rewrite rule {} matched nothing, the page markup may have changed", rule);
        }

        info!("Wrote HTML successfully.");
        Ok(BuiltEmail { document, email })
    }

    /// Full run: build the email and send it to the configured list
    pub async fn run(&self) -> BotResult<RunSummary> {
        self.run_on(self.today()).await
    }

    /// [`Newsletter::run`] with the campaign dated `today`
    pub async fn run_on(&self, today: NaiveDate) -> BotResult<RunSummary> {
        let BuiltEmail { document, email } = self.build_email().await?;

        if let Some(path) = &self.html_output {
            fs::write(path, &email.html)?;
            info!("Wrote email HTML to {}", path.display());
        }

        let campaign_id = self
            .campaign
            .publish(&self.list_name, &email.html, today)
            .await?;

        Ok(RunSummary {
            events_published: document.links.len(),
            campaign_id,
        })
    }

    /// Current date in the event timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
