use super::join::JoinedNews;
use super::JoinedRow;
use askama::Template;
use tracing::warn;
use url::Url;

/// Anchor for a headline with a usable web url; askama escapes both fields.
#[derive(Template)]
#[template(
    source = r#"<a href="{{ href }}" target="_blank" rel="noopener noreferrer">{{ title }}</a>"#,
    ext = "html"
)]
struct AnchorLink<'a> {
    href: &'a str,
    title: &'a str,
}

/// Escaped plain text, used when no anchor can be built.
#[derive(Template)]
#[template(source = "{{ text }}", ext = "html")]
struct PlainLink<'a> {
    text: &'a str,
}

fn render_or_empty<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|e| {
        warn!("link render error: {}", e);
        String::new()
    })
}

/// `close - open`, or missing when either side is missing or the result is not finite.
pub fn price_change(open: Option<f64>, close: Option<f64>) -> Option<f64> {
    Some(close? - open?).filter(|change| change.is_finite())
}

fn web_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Builds the display link for a headline.
///
/// Both the title and the url come from scraped pages, so both are escaped
/// before they reach markup. Only urls that parse with an `http`/`https` scheme
/// become anchors; any other combination degrades to plain escaped text
/// (title first, then url).
pub fn build_link(title: Option<&str>, url: Option<&str>) -> String {
    match (title, url.and_then(web_url)) {
        (Some(title), Some(href)) => render_or_empty(&AnchorLink {
            href: href.as_str(),
            title,
        }),
        (Some(title), None) => render_or_empty(&PlainLink { text: title }),
        (None, _) => url.map_or_else(String::new, |text| render_or_empty(&PlainLink { text })),
    }
}

pub fn derive(joined: JoinedNews) -> JoinedRow {
    let JoinedNews { news, open, close } = joined;
    let link = build_link(news.title.as_deref(), news.url.as_deref());

    JoinedRow {
        date: news.date,
        title: news.title,
        url: news.url,
        open,
        close,
        price_change: price_change(open, close),
        link,
    }
}
