use anyhow::Context as _;
use url::Url;

use crate::config::Config;
use crate::formats::{PersistedState, ScreeningRecord};
use crate::notify::Notifier;
use crate::state::StateStore;
use crate::{consent, detect, extract, fetch, validate};

#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub changed: bool,
    pub notified: bool,
    pub record: Option<ScreeningRecord>,
}

/// One full check: fetch the listing, compare the site's last-changed
/// marker against stored state, and on a change extract the screening
/// details, persist them and notify.
pub async fn run(config: &Config) -> anyhow::Result<CheckOutcome> {
    let client = fetch::client()?;
    let store = StateStore::new(&config.state_path);
    let notifier = config
        .webhook_url
        .clone()
        .map(|url| Notifier::new(url, client.clone()));

    let listing = fetch::fetch_page(&client, &config.url)
        .await
        .context("fetch listing page")?;
    let consent_outcome = consent::dismiss_consent(&listing, config.debug_dir.as_deref());
    tracing::debug!(success = consent_outcome.success, "listing consent handling");

    let site_marker = extract::site_last_changed(&listing);
    let stored = store.load().context("load state")?;

    if !detect::should_extract(site_marker.as_deref(), stored.last_changed_date.as_deref()) {
        println!("Site has not changed");
        return Ok(CheckOutcome::default());
    }

    tracing::info!("site changed, extracting screening details");

    let Some(movie_link) = extract::movie_link(&listing) else {
        // Nothing persisted, so the next run retries from scratch.
        tracing::warn!("no movie detail link on listing page");
        return Ok(CheckOutcome {
            changed: true,
            ..CheckOutcome::default()
        });
    };

    let movie_url = Url::parse(&movie_link).context("parse movie detail url")?;
    let movie_page = fetch::fetch_page(&client, &movie_url)
        .await
        .context("fetch movie detail page")?;
    let consent_outcome = consent::dismiss_consent(&movie_page, config.debug_dir.as_deref());
    tracing::debug!(success = consent_outcome.success, "detail consent handling");

    let record = extract::extract_record(&movie_page);
    print_record(&record);

    // Partial records are persisted too; completeness only gates the
    // notification below.
    store
        .save(&PersistedState {
            last_changed_date: site_marker,
            latest_movie_data: Some(record.clone()),
        })
        .context("save state")?;

    let validation = validate::validate(&record);
    for warning in &validation.warnings {
        tracing::warn!(warning = %warning, "data quality");
    }

    let mut notified = false;
    if !validation.is_valid {
        tracing::warn!(
            missing = ?validation.missing_fields,
            "incomplete movie data, skipping notification"
        );
    } else if config.dry_run {
        tracing::info!("dry run, skipping notification");
    } else if let Some(notifier) = &notifier {
        notifier
            .send_screening(&record)
            .await
            .context("send screening notification")?;
        notified = true;
    } else {
        tracing::warn!("no webhook configured, skipping notification");
    }

    Ok(CheckOutcome {
        changed: true,
        notified,
        record: Some(record),
    })
}

fn print_record(record: &ScreeningRecord) {
    if let Some(title) = &record.title {
        println!("Movie title: {title}");
    }
    if let Some(when) = &record.screening_datetime {
        println!("Screening time: {when}");
    }
    if let Some(place) = &record.location {
        println!("Location: {place}");
    }
    if let Some(booking_url) = &record.booking_url {
        println!("Booking URL: {booking_url}");
    }
}

/// Best-effort report of a failed run through the webhook. The process
/// still exits 0; a scheduled checker should not page the scheduler.
pub async fn report_run_failure(config: &Config, err: &anyhow::Error) {
    let Some(webhook_url) = config.webhook_url.clone() else {
        tracing::warn!("no webhook configured, run failure not reported");
        return;
    };

    let client = match fetch::client() {
        Ok(client) => client,
        Err(client_err) => {
            tracing::error!(%client_err, "could not build client for failure report");
            return;
        }
    };

    let message = format!(
        "An error occurred in {}/check:\n**Error**: {err:#}",
        env!("CARGO_PKG_NAME")
    );
    if let Err(send_err) = Notifier::new(webhook_url, client).send_error(&message).await {
        tracing::error!(%send_err, "could not report run failure");
    }
}
