use crate::error::{CreaseError, Result};
use crate::types::config::CreaseConfig;
use crate::types::record::MatchRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_STORE_FILE: &str = ".crease/matches.json";

/// Where finished matches are kept. Read once before a match, written once after it.
pub trait MatchStore {
    fn load_prior_matches(&self) -> Result<Vec<MatchRecord>>;
    fn save_match(&mut self, record: &MatchRecord) -> Result<()>;
}

/// All records in one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_match_dir(root: &Path, cfg: Option<&CreaseConfig>) -> Self {
        let rel = cfg
            .and_then(|cfg| cfg.store.as_ref())
            .and_then(|store| store.file.as_deref())
            .unwrap_or(DEFAULT_STORE_FILE);
        let candidate = PathBuf::from(rel);
        if candidate.is_absolute() {
            Self::new(candidate)
        } else {
            Self::new(root.join(candidate))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchStore for JsonFileStore {
    fn load_prior_matches(&self) -> Result<Vec<MatchRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(CreaseError::Io(error)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<MatchRecord> = serde_json::from_str(&content)?;
        debug!(count = records.len(), path = %self.path.display(), "loaded prior matches");
        Ok(records)
    }

    fn save_match(&mut self, record: &MatchRecord) -> Result<()> {
        let mut records = self.load_prior_matches()?;
        if records.iter().any(|existing| existing.id == record.id) {
            debug!(id = %record.id, "match already stored");
            return Ok(());
        }
        records.push(record.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(CreaseError::Io)?;
        }
        let json = serde_json::to_string_pretty(&records)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(CreaseError::Io)?;
        fs::rename(&staging, &self.path).map_err(CreaseError::Io)?;
        info!(id = %record.id, path = %self.path.display(), "match saved");
        Ok(())
    }
}
