use anyhow::Context as _;
use serde_json::json;
use url::Url;

use crate::formats::ScreeningRecord;

const EMBED_COLOR: u32 = 0x00FF00;

/// Posts run results to a Discord webhook. The webhook URL is handed in
/// at construction; nothing here reads the environment.
#[derive(Debug, Clone)]
pub struct Notifier {
    webhook_url: Url,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(webhook_url: Url, client: reqwest::Client) -> Self {
        Self {
            webhook_url,
            client,
        }
    }

    /// Announce a new screening. Callers gate this on a complete record;
    /// a partial one is rejected here as well.
    pub async fn send_screening(&self, record: &ScreeningRecord) -> anyhow::Result<()> {
        let embed = screening_embed(record)
            .ok_or_else(|| anyhow::anyhow!("refusing to announce an incomplete record"))?;
        self.execute(json!({ "embeds": [embed] })).await
    }

    /// Plain-text error report for run-level failures.
    pub async fn send_error(&self, message: &str) -> anyhow::Result<()> {
        self.execute(json!({ "content": message })).await
    }

    async fn execute(&self, body: serde_json::Value) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&body)
            .send()
            .await
            .context("POST webhook")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("webhook returned {status}: {text}");
        }

        tracing::info!("notification sent");
        Ok(())
    }
}

/// Discord embed for a complete screening record, `None` otherwise.
fn screening_embed(record: &ScreeningRecord) -> Option<serde_json::Value> {
    let (title, when, place, booking_url) = record.complete_fields()?;
    let movie_url = record.movie_url.as_deref().unwrap_or(booking_url);

    Some(json!({
        "title": format!("New Screening: {title}"),
        "description": format!(
            "**When:** {when}\n\
             **Where:** {place}\n\
             **Details:** [View More]({movie_url})\n\
             **Book here:** [Click to Book]({booking_url})"
        ),
        "color": EMBED_COLOR,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> ScreeningRecord {
        ScreeningRecord {
            title: Some("Casablanca".to_owned()),
            screening_datetime: Some("2026-02-26 19:00".to_owned()),
            location: Some("Borås Bio Röda Kvarn".to_owned()),
            booking_url: Some("https://bio.se/boka/123".to_owned()),
            movie_url: Some("https://example.com/film.html".to_owned()),
        }
    }

    #[test]
    fn embed_carries_all_five_links_and_fields() {
        let embed = screening_embed(&complete_record()).unwrap();
        assert_eq!(embed["title"], "New Screening: Casablanca");
        let description = embed["description"].as_str().unwrap();
        assert!(description.contains("**When:** 2026-02-26 19:00"));
        assert!(description.contains("**Where:** Borås Bio Röda Kvarn"));
        assert!(description.contains("(https://example.com/film.html)"));
        assert!(description.contains("(https://bio.se/boka/123)"));
        assert_eq!(embed["color"], 0x00FF00);
    }

    #[test]
    fn incomplete_record_yields_no_embed() {
        let record = ScreeningRecord {
            booking_url: None,
            ..complete_record()
        };
        assert!(screening_embed(&record).is_none());
    }
}
