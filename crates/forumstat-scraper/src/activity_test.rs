use chrono::{TimeZone, Utc};
use chrono_tz::{Europe::Brussels, UTC};

use super::*;

const PAGE_URL: &str = "https://forum.example.be/search.php?author_id=77&sr=posts";

const POSTS_PAGE: &str = r#"
<html><body>
<div class="search post bg2">
  <div class="inner">
    <dl class="postprofile">
      <dt class="author">Door <a href="./memberlist.php?mode=viewprofile&amp;u=77">Renny</a></dt>
      <dd class="search-result-date">za 17 okt 2026, 13:06</dd>
      <dd>Forum: <a href="./viewforum.php?f=2">Algemeen</a></dd>
      <dd>Onderwerp: <a href="./viewtopic.php?f=2&amp;t=123&amp;sid=abc">Stamnummer 3 forever</a></dd>
    </dl>
    <div class="postbody">
      <h3><a href="./viewtopic.php?f=2&amp;t=123&amp;p=456&amp;sid=abc#p456">Re: Stamnummer 3 forever</a></h3>
      <div class="content">Mooie match gisteren.</div>
    </div>
  </div>
</div>
<div class="search post bg1">
  <div class="inner">
    <dl class="postprofile">
      <dt class="author">Door <a>Renny</a></dt>
      <dd class="search-result-date">Vandaag, 09:30</dd>
      <dd>Onderwerp: <a href="./viewtopic.php?f=4&amp;t=77">Transfers</a></dd>
    </dl>
  </div>
</div>
<div class="search post bg2">
  <div class="inner">
    <p>Geen onderwerp hier.</p>
  </div>
</div>
</body></html>
"#;

const TOPICS_PAGE: &str = r#"
<html><body>
<ul class="topiclist topics">
  <li class="row bg1">
    <dl class="row-item">
      <dt><div class="list-inner">
        <a href="./viewtopic.php?t=99" class="topictitle">Wedstrijdverslagen</a>
        <div class="responsive-hide">door <a>Renny</a> &raquo; ma 12 okt 2026, 20:15</div>
        <div class="post">nested block</div>
      </div></dt>
    </dl>
  </li>
</ul>
</body></html>
"#;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

#[test]
fn posts_layout_yields_one_post_per_block() {
    let posts = parse_search_results(POSTS_PAGE, PAGE_URL, UTC, now());
    assert_eq!(posts.len(), 2);

    assert_eq!(posts[0].topic_title, "Stamnummer 3 forever");
    assert_eq!(
        posts[0].topic_url.as_deref(),
        Some("https://forum.example.be/viewtopic.php?t=123")
    );
    assert_eq!(
        posts[0].posted_at,
        Some(Utc.with_ymd_and_hms(2026, 10, 17, 13, 6, 0).unwrap())
    );
}

#[test]
fn relative_date_is_anchored_on_today() {
    let posts = parse_search_results(POSTS_PAGE, PAGE_URL, UTC, now());
    assert_eq!(posts[1].topic_title, "Transfers");
    assert_eq!(
        posts[1].posted_at,
        Some(Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap())
    );
}

#[test]
fn topics_layout_counts_nested_block_once() {
    let posts = parse_search_results(TOPICS_PAGE, PAGE_URL, UTC, now());
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].topic_title, "Wedstrijdverslagen");
    assert_eq!(
        posts[0].topic_url.as_deref(),
        Some("https://forum.example.be/viewtopic.php?t=99")
    );
    assert_eq!(
        posts[0].posted_at,
        Some(Utc.with_ymd_and_hms(2026, 10, 12, 20, 15, 0).unwrap())
    );
}

#[test]
fn undated_post_keeps_topic() {
    let markup = r#"<div class="post"><h3><a href="viewtopic.php?t=5">Zonder datum</a></h3></div>"#;
    let posts = parse_search_results(markup, PAGE_URL, UTC, now());
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].posted_at, None);
}

#[test]
fn empty_page_yields_no_posts() {
    let markup = "<html><body><p>Er werden geen zoekresultaten gevonden.</p></body></html>";
    assert!(parse_search_results(markup, PAGE_URL, UTC, now()).is_empty());
}

#[test]
fn reply_prefixes_are_stripped() {
    assert_eq!(clean_title("Re: Re:  Derby   day"), "Derby day");
    assert_eq!(clean_title("RE:Uitslag"), "Uitslag");
    assert_eq!(clean_title("Reeks 3"), "Reeks 3");
}

#[test]
fn topic_url_without_id_drops_session() {
    let base = reqwest::Url::parse(PAGE_URL).unwrap();
    assert_eq!(
        resolve_topic_url("./viewtopic.php?p=456&sid=abc#p456", Some(&base)).as_deref(),
        Some("https://forum.example.be/viewtopic.php?p=456")
    );
}

#[test]
fn relative_topic_url_without_base_is_dropped() {
    assert_eq!(resolve_topic_url("./viewtopic.php?t=1", None), None);
}

#[test]
fn board_local_times_are_converted_to_utc() {
    let markup = r#"<div class="search post"><dl class="postprofile">
        <dd class="search-result-date">za 17 okt 2026, 13:06</dd>
        <dd>Onderwerp: <a href="./viewtopic.php?t=8">Derby</a></dd>
    </dl></div>"#;
    let posts = parse_search_results(markup, PAGE_URL, Brussels, now());
    assert_eq!(
        posts[0].posted_at,
        Some(Utc.with_ymd_and_hms(2026, 10, 17, 11, 6, 0).unwrap())
    );
}

#[test]
fn relative_date_uses_board_calendar_day() {
    // 22:30 UTC is already 18 October in Brussels.
    let late = Utc.with_ymd_and_hms(2026, 10, 17, 22, 30, 0).unwrap();
    let markup = r#"<div class="post"><h3><a href="viewtopic.php?t=5">Nachtwerk</a></h3>
        <p class="author">Vandaag, 00:10</p></div>"#;
    let posts = parse_search_results(markup, PAGE_URL, Brussels, late);
    assert_eq!(
        posts[0].posted_at,
        Some(Utc.with_ymd_and_hms(2026, 10, 17, 22, 10, 0).unwrap())
    );
}

#[test]
fn ambiguous_autumn_time_takes_summer_offset() {
    let local = NaiveDate::from_ymd_opt(2026, 10, 25)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    assert_eq!(
        board_to_utc(local, Brussels),
        Some(Utc.with_ymd_and_hms(2026, 10, 25, 0, 30, 0).unwrap())
    );
}

#[test]
fn spring_gap_time_is_dropped() {
    let local = NaiveDate::from_ymd_opt(2026, 3, 29)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    assert_eq!(board_to_utc(local, Brussels), None);
}
