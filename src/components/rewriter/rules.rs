/// One literal find/replace step over the email HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub name: &'static str,
    pub find: &'static str,
    pub replace: &'static str,
    /// Rules that must already have run, by name
    pub after: &'static [&'static str],
}

/// The canonical rule list, in application order.
///
/// Every `find` is the exact markup of the listing page as serialized by the
/// scraper; if the site changes its markup the matching rule stops firing.
pub const CANONICAL_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "time_separator_to_break",
        find: "<span class=\"time-box__times__line\">\u{2013}</span>",
        replace: "<br>",
        after: &[],
    },
    RewriteRule {
        name: "strip_learn_more",
        find: "Learn More &gt;",
        replace: "",
        after: &[],
    },
    RewriteRule {
        name: "strip_category_bullet",
        find: "<li class=\"event-listing-block__event__categories__oval mb-4\">",
        replace: "",
        after: &[],
    },
    RewriteRule {
        name: "wrap_date_cell",
        find: "<div class=\"time-box__times p-3 d-md-flex flex-md-column justify-content-md-around p-md-4\">",
        replace: concat!(
            "\n<td class=\"event-date\" style=\"background-color:#FFFFFF;border:1px solid #EB7035;",
            "border-radius:3px;color:#000000;text-align:center;text-decoration:none;font-size:11;width:6em;\">\n",
            "<div class=\"time-box__times p-3 d-md-flex flex-md-column justify-content-md-around p-md-4\">\n",
        ),
        after: &[],
    },
    // the anchor's whitespace is part of the match, it closes the date cell
    RewriteRule {
        name: "shorten_add_to_calendar",
        find: "<i class=\"icon icon-fa-calendar\"></i> Add to Cal\n  </a>",
        replace: "<br> \u{1F4C5} add </a> </td>",
        after: &["wrap_date_cell"],
    },
    RewriteRule {
        name: "open_event_row",
        find: "<div class=\"time-box d-flex justify-content-between flex-md-column justify-content-md-start\">",
        replace: concat!(
            "\n</td>\n</tr>\n<tr>\n",
            "<div class=\"time-box d-flex justify-content-between flex-md-column justify-content-md-start\">\n",
        ),
        after: &["wrap_date_cell"],
    },
    RewriteRule {
        name: "wrap_info_cell",
        find: "<div class=\"event-listing-block__event__info\">",
        replace: concat!(
            "\n<td class=\"event-date\" style=\"background-color:#FFFFFF;border:0em solid rgb(255, 255, 255);",
            "border-radius:3px;color:#000000;text-align:left;text-decoration:none;font-size:12;width:100%;\">\n",
            "<div class=\"event-listing-block__event__info\">\n",
        ),
        after: &["open_event_row"],
    },
];

/// Opens the table the event rows go into
pub const HTML_HEADER: &str = "
<span style=\"font-family: Arial, Helvetica, sans-serif; font-size: 12px; color: #000000;\">
<table class=\"events day\">
<tbody>
";

/// Closes the last row and the table, then credits
pub const HTML_FOOTER: &str = "
</td>
</tr>
</tbody>
</table>
<br><a href=\"http://gcaltech.netlify.com/\">gCALtech</a> is made with \u{1F496} by the
<a href=\"https://gsc.caltech.edu/communications/\">GSC</a> and
<a href=\"https://github.com/willgraf\"> Will Graf </a>
";
