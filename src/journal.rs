use crate::error::CreaseError;
use crate::types::config::{CreaseConfig, JournalSampling};
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SamplingMode {
    Milestones,
    All,
    None,
}

#[derive(Debug, Clone)]
struct JournalSettings {
    journal_file: PathBuf,
    sampling_mode: SamplingMode,
    batch_interval_secs: u32,
    max_log_size_kb: u64,
    retained_logs: usize,
}

#[derive(Debug, Clone)]
struct JournalEntry {
    timestamp: String,
    innings: u8,
    score: String,
    event: String,
    detail: String,
}

/// Append-only match journal. Milestones (wickets, overs, innings, result) are
/// always written; individual deliveries only when sampling is `all`.
pub struct MatchJournal {
    settings: JournalSettings,
    pending: Vec<JournalEntry>,
    last_flush: chrono::DateTime<chrono::Utc>,
}

impl MatchJournal {
    pub fn new(root: &Path, cfg: Option<&CreaseConfig>) -> Self {
        let settings = resolve_settings(root, cfg);
        Self {
            settings,
            pending: Vec::new(),
            last_flush: Utc::now(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings.journal_file
    }

    pub fn record_milestone(
        &mut self,
        innings: u8,
        score: &str,
        event: &str,
        detail: &str,
    ) -> Result<(), CreaseError> {
        self.push_entry(innings, score, event, detail);
        self.flush()
    }

    pub fn record_delivery(
        &mut self,
        innings: u8,
        score: &str,
        event: &str,
        detail: &str,
    ) -> Result<(), CreaseError> {
        if !matches!(self.settings.sampling_mode, SamplingMode::All) {
            return Ok(());
        }
        self.push_entry(innings, score, event, detail);
        if Utc::now()
            .signed_duration_since(self.last_flush)
            .num_seconds()
            >= i64::from(self.settings.batch_interval_secs)
        {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CreaseError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.settings.journal_file.parent() {
            std::fs::create_dir_all(parent).map_err(CreaseError::Io)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.settings.journal_file)
            .map_err(CreaseError::Io)?;

        for entry in &self.pending {
            let detail = if entry.detail.is_empty() {
                "-"
            } else {
                entry.detail.as_str()
            };
            writeln!(
                file,
                "- timestamp: {} | innings: {} | score: {} | event: {} | detail: {}",
                entry.timestamp, entry.innings, entry.score, entry.event, detail
            )
            .map_err(CreaseError::Io)?;
        }
        file.flush().map_err(CreaseError::Io)?;

        self.pending.clear();
        self.last_flush = Utc::now();
        self.rotate_if_needed()
    }

    fn push_entry(&mut self, innings: u8, score: &str, event: &str, detail: &str) {
        self.pending.push(JournalEntry {
            timestamp: Utc::now().to_rfc3339(),
            innings,
            score: score.to_string(),
            event: event.to_string(),
            detail: detail.to_string(),
        });
    }

    /// Shifts `journal.md` to `journal.1.md`, `journal.1.md` to `journal.2.md`
    /// and so on, dropping anything past the retained count.
    fn rotate_if_needed(&self) -> Result<(), CreaseError> {
        let journal_path = &self.settings.journal_file;
        let size = match std::fs::metadata(journal_path) {
            Ok(metadata) => metadata.len(),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(CreaseError::Io(error)),
        };
        if size <= self.settings.max_log_size_kb * 1024 {
            return Ok(());
        }

        let retained = self.settings.retained_logs;
        let oldest = self.backup_path(retained);
        if oldest.exists() {
            std::fs::remove_file(&oldest).map_err(CreaseError::Io)?;
        }
        for generation in (1..retained).rev() {
            let from = self.backup_path(generation);
            if from.exists() {
                std::fs::rename(&from, self.backup_path(generation + 1))
                    .map_err(CreaseError::Io)?;
            }
        }
        std::fs::rename(journal_path, self.backup_path(1)).map_err(CreaseError::Io)?;
        std::fs::write(journal_path, "").map_err(CreaseError::Io)
    }

    fn backup_path(&self, generation: usize) -> PathBuf {
        let journal_path = &self.settings.journal_file;
        let stem = journal_path
            .file_stem()
            .and_then(|value| value.to_str())
            .unwrap_or("journal");
        let extension = journal_path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or("md");
        journal_path.with_file_name(format!("{stem}.{generation}.{extension}"))
    }
}

fn resolve_settings(root: &Path, cfg: Option<&CreaseConfig>) -> JournalSettings {
    let journal = cfg.and_then(|value| value.journal.as_ref());
    let journal_rel = journal
        .and_then(|value| value.file.as_ref())
        .map_or(".crease/journal.md", String::as_str);
    let journal_file = resolve_path(root, journal_rel);
    let sampling_mode = match journal.and_then(|value| value.sampling.as_ref()) {
        Some(JournalSampling::All) => SamplingMode::All,
        Some(JournalSampling::None) => SamplingMode::None,
        _ => SamplingMode::Milestones,
    };
    let batch_interval_secs = journal
        .and_then(|value| value.batch_interval_secs)
        .unwrap_or(60)
        .max(1);
    let max_log_size_kb = journal
        .and_then(|value| value.max_log_size_kb)
        .unwrap_or(100)
        .max(1) as u64;
    let retained_logs = journal
        .and_then(|value| value.retained_logs)
        .unwrap_or(3)
        .max(1) as usize;

    JournalSettings {
        journal_file,
        sampling_mode,
        batch_interval_secs,
        max_log_size_kb,
        retained_logs,
    }
}

fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        candidate
    } else {
        root.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_config(journal: &str) -> CreaseConfig {
        let toml_str = format!(
            r#"
[teams.home]
name = "Falcons"
players = ["Asha", "Ben"]

[teams.away]
name = "Owls"
players = ["Dev", "Eli"]

[journal]
{journal}
"#
        );
        toml::from_str(&toml_str).expect("config should parse")
    }

    #[test]
    fn milestone_logs_even_when_sampling_none() {
        let dir = tempfile::TempDir::new().expect("temp dir should be created");
        let config = parse_config(r#"sampling = "none""#);
        let mut journal = MatchJournal::new(dir.path(), Some(&config));
        journal
            .record_milestone(1, "12/1 (2.0)", "wicket", "Asha b Eli")
            .expect("milestone should be logged");

        let content = std::fs::read_to_string(dir.path().join(".crease/journal.md"))
            .expect("journal should be readable");
        assert!(content.contains("event: wicket"));
        assert!(content.contains("detail: Asha b Eli"));
    }

    #[test]
    fn deliveries_are_skipped_when_sampling_milestones() {
        let dir = tempfile::TempDir::new().expect("temp dir should be created");
        let config = parse_config(r#"sampling = "milestones""#);
        let mut journal = MatchJournal::new(dir.path(), Some(&config));
        journal
            .record_delivery(1, "4/0 (0.1)", "runs", "4")
            .expect("delivery record should not fail");
        journal.flush().expect("flush should succeed");

        assert!(
            !journal.path().exists(),
            "delivery-only event should not create a file in milestones mode"
        );
    }

    #[test]
    fn deliveries_are_logged_when_sampling_all() {
        let dir = tempfile::TempDir::new().expect("temp dir should be created");
        let config = parse_config(r#"sampling = "all""#);
        let mut journal = MatchJournal::new(dir.path(), Some(&config));
        journal
            .record_delivery(2, "1/0 (0.1)", "runs", "1")
            .expect("delivery record should succeed");
        journal.flush().expect("flush should succeed");

        let content = std::fs::read_to_string(journal.path()).expect("journal should be readable");
        assert!(content.contains("innings: 2"));
        assert!(content.contains("event: runs"));
    }

    #[test]
    fn rotation_keeps_only_retained_backups() {
        let dir = tempfile::TempDir::new().expect("temp dir should be created");
        let config = parse_config("max_log_size_kb = 1\nretained_logs = 2");
        let mut journal = MatchJournal::new(dir.path(), Some(&config));
        let payload = "x".repeat(1600);
        for _ in 0..4 {
            journal
                .record_milestone(1, "0/0 (0.0)", "over", &payload)
                .expect("milestone log should succeed");
        }

        let journal_dir = dir.path().join(".crease");
        assert!(journal_dir.join("journal.1.md").exists());
        assert!(journal_dir.join("journal.2.md").exists());
        assert!(!journal_dir.join("journal.3.md").exists());
        let current = std::fs::read_to_string(journal.path()).expect("journal should exist");
        assert!(current.is_empty(), "each oversized write rotates the live file");
    }
}
