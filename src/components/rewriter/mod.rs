//! Turns the scraped listing block into the newsletter body.

mod rules;

pub use rules::{RewriteRule, CANONICAL_RULES, HTML_FOOTER, HTML_HEADER};

use crate::error::{config_error, BotResult};

/// A feed link and the calendar entry that replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSubstitution {
    pub feed_url: String,
    pub calendar_link: String,
}

/// Listing block HTML plus the links to swap into it, in publish order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedDocument {
    pub html: String,
    pub links: Vec<LinkSubstitution>,
}

/// How often a rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHits {
    pub rule: &'static str,
    pub hits: usize,
}

/// Rewriter output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenEmail {
    /// Complete email body
    pub html: String,
    pub rule_hits: Vec<RuleHits>,
}

impl RewrittenEmail {
    /// Rules that matched nothing
    pub fn unused_rules(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rule_hits
            .iter()
            .filter(|h| h.hits == 0)
            .map(|h| h.rule)
    }
}

/// Applies an ordered list of literal rewrite rules
#[derive(Debug, Clone)]
pub struct HtmlRewriter {
    rules: Vec<RewriteRule>,
}

impl HtmlRewriter {
    /// Build a rewriter, rejecting lists where a rule comes before one it depends on
    pub fn new(rules: Vec<RewriteRule>) -> BotResult<Self> {
        for (index, rule) in rules.iter().enumerate() {
            for dependency in rule.after {
                if !rules[..index].iter().any(|r| r.name == *dependency) {
                    return Err(config_error(&format!(
                        "Rewrite rule {} must come after {}",
                        rule.name, dependency
                    )));
                }
            }
        }
        Ok(Self { rules })
    }

    /// The rewriter for the campus listing page
    pub fn canonical() -> BotResult<Self> {
        Self::new(CANONICAL_RULES.to_vec())
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Produce the email body for `document`
    pub fn rewrite(&self, document: &ScrapedDocument) -> RewrittenEmail {
        let mut html = substitute_links(&document.html, &document.links);

        let mut rule_hits = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let hits = html.matches(rule.find).count();
            if hits > 0 {
                html = html.replace(rule.find, rule.replace);
            }
            rule_hits.push(RuleHits {
                rule: rule.name,
                hits,
            });
        }

        RewrittenEmail {
            html: format!("{}{}{}", HTML_HEADER, html, HTML_FOOTER),
            rule_hits,
        }
    }
}

/// Swap feed URLs for calendar links, in order.
///
/// Only whole quoted attribute values are replaced, so a feed URL that is a
/// prefix of another one leaves the longer link alone.
pub fn substitute_links(html: &str, links: &[LinkSubstitution]) -> String {
    let mut html = html.to_string();
    for link in links {
        let calendar_link = format!("\"{}\"", link.calendar_link);
        html = html.replace(&format!("\"{}\"", link.feed_url), &calendar_link);

        // attribute values come back from the serializer with `&` escaped
        let escaped = link.feed_url.replace('&', "&amp;");
        if escaped != link.feed_url {
            html = html.replace(&format!("\"{}\"", escaped), &calendar_link);
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_rules_are_ordered() {
        assert!(HtmlRewriter::canonical().is_ok());
    }

    #[test]
    fn test_rule_before_dependency_is_rejected() {
        let rules = vec![CANONICAL_RULES[6], CANONICAL_RULES[5]];
        assert!(HtmlRewriter::new(rules).is_err());
    }

    #[test]
    fn test_substitute_escaped_link() {
        let html = r#"<a href="https://cal.example.edu/feed?id=1&amp;fmt=ics">"#;
        let links = vec![LinkSubstitution {
            feed_url: "https://cal.example.edu/feed?id=1&fmt=ics".to_string(),
            calendar_link: "https://calendar.google.com/event?eid=xyz".to_string(),
        }];
        assert_eq!(
            substitute_links(html, &links),
            r#"<a href="https://calendar.google.com/event?eid=xyz">"#
        );
    }
}
