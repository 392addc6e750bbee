use std::sync::LazyLock;

use chrono::Datelike as _;
use regex::Regex;
use url::Url;

use crate::formats::ScreeningRecord;
use crate::page::PageDom;

/// Hard-coded venue fallback. The tool watches exactly one cinema, so a
/// page that stops naming the venue still gets the right one; this masks
/// a missing "Plats:" label rather than surfacing it, which is accepted
/// for the single-site scope.
pub const DEFAULT_LOCATION: &str = "Borås Bio Röda Kvarn";

const TITLE_SELECTORS: &[&str] = &[
    "h1",
    ".sidrubrik",
    r#"[class*="title"]"#,
    r#"[class*="heading"]"#,
];

static QUOTED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("valid regex"));
static LABELED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Throwback Thursday:\s*(.+?)\s*\(\d{4}\)").expect("valid regex"));
static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*").expect("valid regex"));
static ISO_DOT_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})\s+(\d{1,2})\.(\d{2})").expect("valid regex"));
static SWEDISH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2})\s+(januari|februari|mars|april|maj|juni|juli|augusti|september|oktober|november|december)\s+(\d{1,2})\.(\d{2})",
    )
    .expect("valid regex")
});
static PLATS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Plats:\s*([^<\n]+)").expect("valid regex"));

const SWEDISH_MONTHS: &[(&str, &str)] = &[
    ("januari", "01"),
    ("februari", "02"),
    ("mars", "03"),
    ("april", "04"),
    ("maj", "05"),
    ("juni", "06"),
    ("juli", "07"),
    ("augusti", "08"),
    ("september", "09"),
    ("oktober", "10"),
    ("november", "11"),
    ("december", "12"),
];

/// ISO-8601 "last updated" marker the site renders into its footer.
pub fn site_last_changed(page: &impl PageDom) -> Option<String> {
    page.attribute(".sv-font-uppdaterad-info-ny time[datetime]", "datetime")
}

/// Absolute URL of the current announcement's detail page, linked from
/// the listing page.
pub fn movie_link(page: &impl PageDom) -> Option<String> {
    let href = page.attribute(".sv-channel-item a[href]", "href")?;
    resolve_href(page.url(), &href)
}

/// Extract all fields from a detail page. Every field runs its own
/// fallback chain and is independently allowed to come up empty; this
/// never fails as a whole.
pub fn extract_record(page: &impl PageDom) -> ScreeningRecord {
    let record = ScreeningRecord {
        title: movie_title(page),
        screening_datetime: screening_datetime(page),
        location: Some(location(page)),
        booking_url: booking_url(page),
        movie_url: Some(page.url().to_string()),
    };
    tracing::debug!(?record, "extracted screening record");
    record
}

fn movie_title(page: &impl PageDom) -> Option<String> {
    TITLE_SELECTORS
        .iter()
        .filter_map(|selector| page.text(selector))
        .find_map(|raw| clean_title(&raw))
}

/// Strip announcement framing from a raw heading.
///
/// Handles `"Casablanca"` (quoted), `Throwback Thursday: Casablanca (1942)`
/// and the label without a year; anything else passes through trimmed.
pub fn clean_title(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(captures) = QUOTED_TITLE.captures(raw) {
        return Some(captures[1].to_owned());
    }

    if let Some(captures) = LABELED_TITLE.captures(raw) {
        return Some(captures[1].trim().to_owned());
    }

    if let Some((_, rest)) = raw.split_once("Throwback Thursday:") {
        let title = TRAILING_YEAR.replace_all(rest, "");
        let title = title.trim();
        return (!title.is_empty()).then(|| title.to_owned());
    }

    Some(raw.to_owned())
}

fn screening_datetime(page: &impl PageDom) -> Option<String> {
    if let Some(formatted) = page
        .attribute("time[datetime]", "datetime")
        .and_then(|attr| parse_iso_datetime(&attr))
    {
        return Some(formatted);
    }

    if let Some(formatted) = page
        .label_sibling_text("Tid:")
        .and_then(|text| datetime_from_text(&text))
    {
        return Some(formatted);
    }

    datetime_from_text(&page.full_text())
}

/// Pull a `YYYY-MM-DD HH:MM` out of free text.
///
/// Recognizes `2026-02-26 19.00` (dot as minute separator) and the
/// Swedish long form `26 februari 19.00`, which has no year and is
/// assumed to mean the current one.
pub fn datetime_from_text(text: &str) -> Option<String> {
    datetime_from_text_in_year(text, chrono::Local::now().year())
}

fn datetime_from_text_in_year(text: &str, current_year: i32) -> Option<String> {
    if let Some(captures) = ISO_DOT_TIME.captures(text) {
        let (date, hour, minute) = (&captures[1], &captures[2], &captures[3]);
        return Some(format!("{date} {hour:0>2}:{minute}"));
    }

    let lowered = text.to_lowercase();
    if let Some(captures) = SWEDISH_DATE.captures(&lowered) {
        let (day, month_name, hour, minute) =
            (&captures[1], &captures[2], &captures[3], &captures[4]);
        // The pattern only admits lexicon months, so the "01" default is
        // a documented dead fallback, kept in case the two drift apart.
        let month = SWEDISH_MONTHS
            .iter()
            .find(|(name, _)| *name == month_name)
            .map(|(_, number)| *number)
            .unwrap_or("01");
        return Some(format!("{current_year}-{month}-{day:0>2} {hour:0>2}:{minute}"));
    }

    None
}

fn parse_iso_datetime(attr: &str) -> Option<String> {
    const FORMAT: &str = "%Y-%m-%d %H:%M";

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(attr) {
        return Some(datetime.format(FORMAT).to_string());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(attr, pattern) {
            return Some(datetime.format(FORMAT).to_string());
        }
    }
    None
}

fn location(page: &impl PageDom) -> String {
    // Scan the markup rather than the text so "up to the next tag" is a
    // real boundary.
    if let Some(captures) = PLATS_LABEL.captures(page.full_html()) {
        let found = captures[1].trim();
        if !found.is_empty() {
            return found.to_owned();
        }
    }

    tracing::debug!("no Plats: label found, using default location");
    DEFAULT_LOCATION.to_owned()
}

fn booking_url(page: &impl PageDom) -> Option<String> {
    let href = page
        .label_parent_href("Köp biljett")
        .or_else(|| page.link_href_with_text("Köp biljett"))
        .or_else(|| page.link_href_with_text("Book"))
        .or_else(|| page.attribute(r#"[class*="booking"]"#, "href"))
        .or_else(|| page.attribute(r#"a[href*="bio.se"]"#, "href"))?;
    resolve_href(page.url(), &href)
}

/// Make an href absolute against the page it appeared on. A leading `/`
/// resolves against the origin, other relative paths against the page's
/// directory.
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(err) => {
            tracing::debug!(%err, href, "could not resolve href");
            href.starts_with("http").then(|| href.to_owned())
        }
    }
}
