use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Capability surface the extraction and consent logic is written against.
///
/// Two generations of this tool existed: one parsing static markup, one
/// driving a rendered browser DOM. Both fit behind this trait; the pipeline
/// only ever sees the trait. The static backend is the one shipped here,
/// a rendered backend would implement the same methods over a live page.
pub trait PageDom {
    /// Final URL of the page after redirects. Relative hrefs resolve
    /// against this.
    fn url(&self) -> &Url;

    /// Raw markup of the page.
    fn full_html(&self) -> &str;

    /// Concatenated text content of the whole page.
    fn full_text(&self) -> String;

    /// Trimmed text of the first element matching `selector`, if any.
    /// An invalid selector behaves like a miss.
    fn text(&self, selector: &str) -> Option<String>;

    /// Attribute value of the first element matching `selector`.
    fn attribute(&self, selector: &str, name: &str) -> Option<String>;

    /// Whether `selector` matches a visible element. The static backend
    /// cannot observe rendering, so presence counts as visible.
    fn is_visible(&self, selector: &str) -> bool;

    /// Click the first element matching `selector`. `Ok(false)` means the
    /// backend cannot interact (static markup) or nothing matched.
    fn click(&self, selector: &str) -> anyhow::Result<bool>;

    /// Click the first `button` whose text contains `needle`.
    fn click_button_with_text(&self, needle: &str) -> anyhow::Result<bool>;

    /// Text immediately following a `<strong>LABEL</strong>` marker, the
    /// label-adjacent layout the monitored site uses for "Tid:"/"Plats:".
    fn label_sibling_text(&self, label: &str) -> Option<String>;

    /// Href of the closest enclosing anchor of a `<strong>LABEL</strong>`
    /// marker ("Köp biljett" sits inside its booking link).
    fn label_parent_href(&self, label: &str) -> Option<String>;

    /// Href of the first anchor whose text contains `needle`.
    fn link_href_with_text(&self, needle: &str) -> Option<String>;
}

/// A fetched page held as markup plus its resolved URL.
///
/// `scraper::Html` is not `Send`, so the document is parsed per query
/// instead of being stored; one page and a handful of lookups per run
/// makes that a non-issue.
#[derive(Debug, Clone)]
pub struct StaticPage {
    url: Url,
    html: String,
}

impl StaticPage {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    fn with_first_match<T>(
        &self,
        selector: &str,
        f: impl FnOnce(ElementRef<'_>) -> Option<T>,
    ) -> Option<T> {
        let selector = Selector::parse(selector).ok()?;
        let document = Html::parse_document(&self.html);
        let element = document.select(&selector).next()?;
        f(element)
    }

    fn strong_with_label<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
        let strong = Selector::parse("strong").ok()?;
        document
            .select(&strong)
            .find(|el| el.text().collect::<String>().trim() == label)
    }
}

impl PageDom for StaticPage {
    fn url(&self) -> &Url {
        &self.url
    }

    fn full_html(&self) -> &str {
        &self.html
    }

    fn full_text(&self) -> String {
        Html::parse_document(&self.html)
            .root_element()
            .text()
            .collect()
    }

    fn text(&self, selector: &str) -> Option<String> {
        self.with_first_match(selector, |el| {
            let text = el.text().collect::<String>().trim().to_owned();
            (!text.is_empty()).then_some(text)
        })
    }

    fn attribute(&self, selector: &str, name: &str) -> Option<String> {
        self.with_first_match(selector, |el| el.value().attr(name).map(str::to_owned))
    }

    fn is_visible(&self, selector: &str) -> bool {
        self.with_first_match(selector, |_| Some(())).is_some()
    }

    fn click(&self, _selector: &str) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn click_button_with_text(&self, _needle: &str) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn label_sibling_text(&self, label: &str) -> Option<String> {
        let document = Html::parse_document(&self.html);
        let strong = Self::strong_with_label(&document, label)?;

        for sibling in strong.next_siblings() {
            if let Some(text) = sibling.value().as_text() {
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_owned());
                }
            }
            if let Some(element) = ElementRef::wrap(sibling) {
                let text = element.text().collect::<String>().trim().to_owned();
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }

        // No usable sibling: fall back to the parent's text, the label's
        // value usually sits in the same container.
        let parent = strong.parent().and_then(ElementRef::wrap)?;
        let text = parent.text().collect::<String>().trim().to_owned();
        (!text.is_empty()).then_some(text)
    }

    fn label_parent_href(&self, label: &str) -> Option<String> {
        let document = Html::parse_document(&self.html);
        let strong = Self::strong_with_label(&document, label)?;

        strong.ancestors().find_map(|node| {
            let element = node.value().as_element()?;
            if element.name() == "a" {
                element.attr("href").map(str::to_owned)
            } else {
                None
            }
        })
    }

    fn link_href_with_text(&self, needle: &str) -> Option<String> {
        let selector = Selector::parse("a[href]").ok()?;
        let document = Html::parse_document(&self.html);
        document
            .select(&selector)
            .find(|el| el.text().collect::<String>().contains(needle))
            .and_then(|el| el.value().attr("href").map(str::to_owned))
    }
}
