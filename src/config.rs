use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::cli::CheckArgs;

/// The one page this tool monitors.
pub const DEFAULT_URL: &str = "https://www.boras.se/upplevaochgora/kulturochnoje/borasbiorodakvarn/throwbackthursday.4.706b03641584ebf5394d6c1a.html";

pub const DEFAULT_STATE_FILE: &str = "db.json";

/// Environment variable carrying the Discord webhook URL. Read once in
/// configuration; the notifier itself never touches the environment.
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub url: Url,
    pub state_path: PathBuf,
    pub webhook_url: Option<Url>,
    pub debug_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl Config {
    pub fn from_check_args(args: &CheckArgs) -> anyhow::Result<Self> {
        // Optional .env file, same as the deployment this replaces.
        let _ = dotenvy::dotenv();

        let url = Url::parse(&args.url).context("parse --url")?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("--url must be http/https: {url}");
        }

        let webhook_url = match std::env::var(WEBHOOK_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim()).with_context(|| format!("parse {WEBHOOK_ENV}"))?,
            ),
            _ => None,
        };

        Ok(Self {
            url,
            state_path: PathBuf::from(&args.state),
            webhook_url,
            debug_dir: args.debug_dir.as_ref().map(PathBuf::from),
            dry_run: args.dry_run,
        })
    }
}
