use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::StateArgs;
use crate::formats::PersistedState;

/// Last-seen state kept in one small JSON file. Read once at the start
/// of a run, written at most once at the end; invocations are assumed
/// non-overlapping so no locking is needed.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty state, so the first run always
    /// triggers extraction.
    pub fn load(&self) -> anyhow::Result<PersistedState> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedState::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read state file: {}", self.path.display()));
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("parse state file: {}", self.path.display()))
    }

    /// Replace the state atomically: write a sibling temp file, then
    /// rename it into place, so a crash never leaves a torn file.
    pub fn save(&self, state: &PersistedState) -> anyhow::Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut file = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("create temp state file in: {}", parent.display()))?;
        serde_json::to_writer_pretty(&mut file, state).context("serialize state")?;
        file.persist(&self.path)
            .with_context(|| format!("replace state file: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}

/// `state` subcommand: print the stored state human-readably.
pub fn print(args: &StateArgs) -> anyhow::Result<()> {
    let store = StateStore::new(&args.state);
    let state = store.load()?;

    match &state.last_changed_date {
        Some(marker) => println!("Last changed: {marker}"),
        None => println!("No stored state at {}", store.path().display()),
    }

    if let Some(record) = &state.latest_movie_data {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_owned());
        println!("Title:        {}", show(&record.title));
        println!("When:         {}", show(&record.screening_datetime));
        println!("Where:        {}", show(&record.location));
        println!("Details:      {}", show(&record.movie_url));
        println!("Booking:      {}", show(&record.booking_url));
    }

    Ok(())
}
