use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::page::StaticPage;

const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub fn client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(PAGE_LOAD_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("build http client")
}

/// Fetch one page and hold it as a queryable snapshot. Any failure here
/// (transport error, timeout, non-2xx) is fatal to the run.
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> anyhow::Result<StaticPage> {
    let response = client
        .get(url.clone())
        .header(USER_AGENT, "throwback-watch/0.1")
        .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("GET {url} returned {status}");
    }

    // Keep the post-redirect URL; relative hrefs resolve against it.
    let final_url = response.url().clone();
    let html = response
        .text()
        .await
        .with_context(|| format!("read body of {url}"))?;

    tracing::debug!(url = %final_url, bytes = html.len(), "fetched page");
    Ok(StaticPage::new(final_url, html))
}
