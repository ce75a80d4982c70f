//! Recent-post extraction from phpBB search result pages.
//!
//! Handles both result layouts: posts (`sr=posts`, one `div.search.post`
//! block per post) and topics (`sr=topics`, one `li.row` per topic).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};

use crate::parse_helpers::parse_forum_datetime;

static RESULT_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.search.post, div.post, li.row").expect("valid result block selector")
});
static TOPIC_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.topictitle, dd a[href*='viewtopic.php'], h3 a[href*='viewtopic.php']")
        .expect("valid topic link selector")
});
static RESULT_DATE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".search-result-date, time, .lastpost, .author, .responsive-hide")
        .expect("valid result date selector")
});

/// One post by the tracked member as listed on a search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumPost {
    pub topic_title: String,
    pub topic_url: Option<String>,
    /// Post time converted from board-local time.
    pub posted_at: Option<DateTime<Utc>>,
}

/// Parses every post block on a search result page.
///
/// `page_url` resolves relative topic links. Times on the page are read in
/// `board_tz`, and relative dates such as `Vandaag, 13:06` are anchored on
/// the board's calendar day at `now`. Blocks without a topic link are
/// skipped.
#[must_use]
pub fn parse_search_results(
    markup: &str,
    page_url: &str,
    board_tz: Tz,
    now: DateTime<Utc>,
) -> Vec<ForumPost> {
    let html = Html::parse_document(markup);
    let base = reqwest::Url::parse(page_url).ok();
    let today = now.with_timezone(&board_tz).date_naive();

    html.select(&RESULT_BLOCK)
        .filter(|block| !has_result_ancestor(*block))
        .filter_map(|block| parse_block(block, base.as_ref(), board_tz, today))
        .collect()
}

/// `div.post` can be nested inside `li.row` on some styles; only the
/// outermost block counts.
fn has_result_ancestor(block: ElementRef<'_>) -> bool {
    block
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| RESULT_BLOCK.matches(&el))
}

fn parse_block(
    block: ElementRef<'_>,
    base: Option<&reqwest::Url>,
    board_tz: Tz,
    today: NaiveDate,
) -> Option<ForumPost> {
    let link = block.select(&TOPIC_LINK).next()?;
    let title = clean_title(&link.text().collect::<String>());
    if title.is_empty() {
        return None;
    }

    let topic_url = link
        .value()
        .attr("href")
        .and_then(|href| resolve_topic_url(href, base));

    let posted_at = block
        .select(&RESULT_DATE)
        .find_map(|el| parse_forum_datetime(&el.text().collect::<Vec<_>>().join(" "), Some(today)))
        .or_else(|| {
            parse_forum_datetime(&block.text().collect::<Vec<_>>().join(" "), Some(today))
        })
        .and_then(|local| board_to_utc(local, board_tz));

    Some(ForumPost {
        topic_title: title,
        topic_url,
        posted_at,
    })
}

/// Resolves a board-local wall time. On the autumn DST overlap the earlier
/// instant wins; times inside the spring gap do not exist and are dropped.
fn board_to_utc(local: NaiveDateTime, board_tz: Tz) -> Option<DateTime<Utc>> {
    board_tz
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Collapses whitespace and strips reply prefixes (`Re: `).
fn clean_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut title = collapsed.as_str();
    while title.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("re:")) {
        title = title[3..].trim_start();
    }
    title.to_string()
}

/// Resolves a topic link against the page URL and canonicalises it to
/// `viewtopic.php?t=<id>` when a topic id is present, dropping session ids
/// and post anchors so links to different posts in one topic group together.
fn resolve_topic_url(href: &str, base: Option<&reqwest::Url>) -> Option<String> {
    let mut url = match base {
        Some(base) => base.join(href).ok()?,
        None => reqwest::Url::parse(href).ok()?,
    };

    let topic_id = url
        .query_pairs()
        .find(|(k, _)| k == "t")
        .map(|(_, v)| v.into_owned());

    url.set_fragment(None);
    match topic_id {
        Some(t) => {
            url.set_query(None);
            url.query_pairs_mut().append_pair("t", &t);
        }
        None => {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(k, _)| k != "sid")
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            url.set_query(None);
            if !kept.is_empty() {
                url.query_pairs_mut().extend_pairs(kept);
            }
        }
    }
    Some(url.to_string())
}

#[cfg(test)]
#[path = "activity_test.rs"]
mod tests;
