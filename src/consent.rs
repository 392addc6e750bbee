use std::path::Path;

use anyhow::Context as _;

use crate::formats::ConsentOutcome;
use crate::page::PageDom;

/// Selectors that indicate a cookie/privacy overlay is present.
const DIALOG_SELECTORS: &[&str] = &[
    r#"[role="dialog"]"#,
    "dialog",
    ".cookie-banner",
    ".consent-banner",
    ".cookie-notice",
    "#cookie-consent",
    ".gdpr-banner",
    r#"[class*="cookie"]"#,
    r#"[class*="consent"]"#,
    r#"[id*="cookie"]"#,
    r#"[id*="consent"]"#,
];

#[derive(Debug)]
enum Accept {
    Css(&'static str),
    ButtonText(&'static str),
}

/// Accept-button attempts in priority order: known consent-platform IDs
/// first, then Swedish and English button labels, then generic
/// attribute patterns.
const ACCEPT_STRATEGIES: &[Accept] = &[
    // CookieBot
    Accept::Css("#CybotCookiebotDialogBodyLevelButtonLevelOptinAllowAll"),
    // OneTrust
    Accept::Css("#onetrust-accept-btn-handler"),
    // CookieYes
    Accept::Css(".cky-btn-accept"),
    Accept::ButtonText("Godkänn alla kakor"),
    Accept::ButtonText("Acceptera alla kakor"),
    Accept::ButtonText("Godkänn alla"),
    Accept::ButtonText("Accept all"),
    Accept::ButtonText("Acceptera alla"),
    Accept::ButtonText("Accept"),
    Accept::ButtonText("Acceptera"),
    Accept::Css(r#"[data-testid*="accept"]"#),
    Accept::Css(r#"[id*="accept"]"#),
    Accept::Css(r#"[class*="accept"]"#),
    Accept::Css(".cookie-accept"),
    Accept::Css(".consent-accept"),
    Accept::Css(".accept-all"),
    Accept::Css(".btn-accept"),
];

/// Try to dismiss a consent overlay before extraction.
///
/// No dialog at all is a successful no-op. A dialog without a clickable
/// accept button is a non-fatal failure: the page markup is dumped for
/// diagnosis when `debug_dir` is set and the run continues, since some
/// fields may still be reachable.
pub fn dismiss_consent(page: &impl PageDom, debug_dir: Option<&Path>) -> ConsentOutcome {
    let dialog_detected = DIALOG_SELECTORS
        .iter()
        .any(|selector| page.is_visible(selector));
    if !dialog_detected {
        tracing::debug!("no consent dialog detected");
        return ConsentOutcome {
            success: true,
            method_used: Some("no_dialog_detected".to_owned()),
            ..ConsentOutcome::default()
        };
    }

    let mut outcome = ConsentOutcome {
        dialog_detected: true,
        ..ConsentOutcome::default()
    };

    for strategy in ACCEPT_STRATEGIES {
        let (label, clicked) = match strategy {
            Accept::Css(selector) => {
                if !page.is_visible(selector) {
                    continue;
                }
                (*selector, page.click(selector))
            }
            Accept::ButtonText(text) => (*text, page.click_button_with_text(text)),
        };

        match clicked {
            Ok(true) => {
                tracing::info!(method = label, "consent dialog accepted");
                if DIALOG_SELECTORS.iter().any(|s| page.is_visible(s)) {
                    tracing::debug!("consent dialog may still be visible after click");
                }
                outcome.success = true;
                outcome.method_used = Some(label.to_owned());
                return outcome;
            }
            Ok(false) => continue,
            Err(err) => {
                tracing::debug!(method = label, %err, "consent click failed");
                continue;
            }
        }
    }

    tracing::warn!("consent dialog detected but no clickable accept button found");
    outcome.error_message = Some("no clickable consent button found".to_owned());
    if let Some(dir) = debug_dir {
        match dump_page(page, dir) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "consent failure page dump written");
                outcome.debug_dump = Some(path);
            }
            Err(err) => tracing::error!(%err, "could not write consent failure dump"),
        }
    }
    outcome
}

fn dump_page(page: &impl PageDom, dir: &Path) -> anyhow::Result<std::path::PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create debug dir: {}", dir.display()))?;

    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
    let path = dir.join(format!("consent_failure_{stamp}.html"));
    std::fs::write(&path, page.full_html())
        .with_context(|| format!("write page dump: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    struct MockPage {
        url: Url,
        html: String,
        dialog: bool,
        clickable_css: Vec<&'static str>,
        clickable_text: Vec<&'static str>,
        clicks: std::cell::RefCell<Vec<String>>,
    }

    impl MockPage {
        fn new(dialog: bool) -> Self {
            Self {
                url: Url::parse("https://example.com/").unwrap(),
                html: "<html></html>".to_owned(),
                dialog,
                clickable_css: Vec::new(),
                clickable_text: Vec::new(),
                clicks: std::cell::RefCell::new(Vec::new()),
            }
        }
    }

    impl PageDom for MockPage {
        fn url(&self) -> &Url {
            &self.url
        }
        fn full_html(&self) -> &str {
            &self.html
        }
        fn full_text(&self) -> String {
            String::new()
        }
        fn text(&self, _selector: &str) -> Option<String> {
            None
        }
        fn attribute(&self, _selector: &str, _name: &str) -> Option<String> {
            None
        }
        fn is_visible(&self, selector: &str) -> bool {
            (self.dialog && selector == r#"[role="dialog"]"#)
                || self.clickable_css.iter().any(|s| *s == selector)
        }
        fn click(&self, selector: &str) -> anyhow::Result<bool> {
            if self.clickable_css.iter().any(|s| *s == selector) {
                self.clicks.borrow_mut().push(selector.to_owned());
                Ok(true)
            } else {
                Ok(false)
            }
        }
        fn click_button_with_text(&self, needle: &str) -> anyhow::Result<bool> {
            if self.clickable_text.iter().any(|s| *s == needle) {
                self.clicks.borrow_mut().push(needle.to_owned());
                Ok(true)
            } else {
                Ok(false)
            }
        }
        fn label_sibling_text(&self, _label: &str) -> Option<String> {
            None
        }
        fn label_parent_href(&self, _label: &str) -> Option<String> {
            None
        }
        fn link_href_with_text(&self, _needle: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn no_dialog_is_a_successful_no_op() {
        let page = MockPage::new(false);
        let outcome = dismiss_consent(&page, None);
        assert!(outcome.success);
        assert!(!outcome.dialog_detected);
        assert_eq!(outcome.method_used.as_deref(), Some("no_dialog_detected"));
        assert!(page.clicks.borrow().is_empty());
    }

    #[test]
    fn platform_selector_wins_over_text_buttons() {
        let mut page = MockPage::new(true);
        page.clickable_css = vec!["#onetrust-accept-btn-handler"];
        page.clickable_text = vec!["Accept all"];

        let outcome = dismiss_consent(&page, None);
        assert!(outcome.success);
        assert_eq!(
            outcome.method_used.as_deref(),
            Some("#onetrust-accept-btn-handler")
        );
        assert_eq!(page.clicks.borrow().len(), 1);
    }

    #[test]
    fn swedish_button_text_is_tried_before_generic_patterns() {
        let mut page = MockPage::new(true);
        page.clickable_text = vec!["Godkänn alla kakor", "Accept"];

        let outcome = dismiss_consent(&page, None);
        assert_eq!(outcome.method_used.as_deref(), Some("Godkänn alla kakor"));
    }

    #[test]
    fn dialog_without_button_fails_non_fatally_and_dumps_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = MockPage::new(true);

        let outcome = dismiss_consent(&page, Some(dir.path()));
        assert!(!outcome.success);
        assert!(outcome.dialog_detected);
        assert!(outcome.error_message.is_some());
        let dump = outcome.debug_dump.expect("dump written");
        assert!(dump.exists());
    }

    #[test]
    fn static_page_cannot_click_so_detection_alone_fails_softly() {
        use crate::page::StaticPage;
        let page = StaticPage::new(
            Url::parse("https://example.com/").unwrap(),
            r#"<div role="dialog" class="cookie-banner">Vi använder kakor</div>"#.to_owned(),
        );
        let outcome = dismiss_consent(&page, None);
        assert!(outcome.dialog_detected);
        assert!(!outcome.success);
    }
}
