//! High score persistence.
//!
//! The score log is append-only: one `level_key,score` record per line,
//! never rewritten in place. The high score for a level is derived as the
//! maximum over all of its records, recomputed from the full log each time a
//! level starts. Persistence failures are never fatal to gameplay; a log
//! that can't be read just means a high score of 0.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::GameError;

/// Default log file, created next to the binary's working directory.
pub const DEFAULT_LOG_FILE: &str = "star_barrage_scores.txt";

/// The persistence collaborator seen by the tick orchestrator.
pub trait ScoreStore {
    /// Append one `(level, score)` record.
    fn append(&mut self, level: &str, score: u64) -> Result<(), GameError>;

    /// All records in append order.
    fn read_all(&self) -> Result<Vec<(String, u64)>, GameError>;

    /// Best recorded score for a level; an unreadable log counts as 0.
    fn high_score(&self, level: &str) -> u64 {
        match self.read_all() {
            Ok(records) => records
                .iter()
                .filter(|(key, _)| key == level)
                .map(|(_, score)| *score)
                .max()
                .unwrap_or(0),
            Err(e) => {
                log::warn!("score log unreadable, treating high score as 0: {e}");
                0
            }
        }
    }
}

/// File-backed append-only score log.
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for ScoreLog {
    fn append(&mut self, level: &str, score: u64) -> Result<(), GameError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{level},{score}")?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<(String, u64)>, GameError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(',') {
                Some((key, score)) => match score.trim().parse::<u64>() {
                    Ok(score) => records.push((key.trim().to_string(), score)),
                    Err(_) => log::warn!("skipping malformed score record: {line:?}"),
                },
                None => log::warn!("skipping malformed score record: {line:?}"),
            }
        }
        Ok(records)
    }
}

/// In-memory store for tests and headless collaborators.
#[derive(Debug, Clone, Default)]
pub struct MemScoreLog {
    pub records: Vec<(String, u64)>,
}

impl ScoreStore for MemScoreLog {
    fn append(&mut self, level: &str, score: u64) -> Result<(), GameError> {
        self.records.push((level.to_string(), score));
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<(String, u64)>, GameError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> (tempfile::TempDir, ScoreLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = ScoreLog::new(dir.path().join("scores.txt"));
        (dir, log)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, log) = temp_log();
        assert_eq!(log.read_all().unwrap(), vec![]);
        assert_eq!(log.high_score("1"), 0);
    }

    #[test]
    fn test_append_then_read_round_trip() {
        let (_dir, mut log) = temp_log();
        log.append("1", 120).unwrap();
        log.append("2", 55).unwrap();
        log.append("1", 340).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(
            records,
            vec![
                ("1".to_string(), 120),
                ("2".to_string(), 55),
                ("1".to_string(), 340),
            ]
        );
    }

    #[test]
    fn test_high_score_is_max_per_level() {
        let (_dir, mut log) = temp_log();
        log.append("1", 120).unwrap();
        log.append("1", 340).unwrap();
        log.append("2", 55).unwrap();

        assert_eq!(log.high_score("1"), 340);
        assert_eq!(log.high_score("2"), 55);
        assert_eq!(log.high_score("TEST"), 0);
    }

    #[test]
    fn test_lower_append_never_lowers_high_score() {
        let (_dir, mut log) = temp_log();
        log.append("1", 340).unwrap();
        log.append("1", 10).unwrap();
        assert_eq!(log.high_score("1"), 340);

        log.append("1", 999).unwrap();
        assert_eq!(log.high_score("1"), 999);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (_dir, mut log) = temp_log();
        log.append("1", 120).unwrap();
        fs::write(
            log.path(),
            "1,120\ngarbage line\n2,not-a-number\n\n2,75\n",
        )
        .unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records, vec![("1".to_string(), 120), ("2".to_string(), 75)]);
    }

    #[test]
    fn test_mem_store_matches_contract() {
        let mut log = MemScoreLog::default();
        log.append("1", 10).unwrap();
        log.append("1", 30).unwrap();
        log.append("1", 20).unwrap();
        assert_eq!(log.high_score("1"), 30);
    }
}
