use crate::tally::Tally;
use serde::Serialize;
use std::path::Path;
use triage_transcript::{
    classify_text, discover_runs, read_transcript, Category, RunEntry, TranscriptError,
    DEFAULT_LOG_FILE,
};

/// Runs that could not be read land here.
const FALLBACK: Category = Category::MissingFunctionCallInfo;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Log file expected inside each run directory.
    pub log_file_name: String,
    /// Reject logs larger than this many bytes.
    pub max_bytes: Option<u64>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            log_file_name: DEFAULT_LOG_FILE.to_string(),
            max_bytes: None,
        }
    }
}

/// A run whose log could not be read or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadFailure {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub tally: Tally,
    pub failures: Vec<ReadFailure>,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }
}

/// Read and classify one run.
pub fn classify_run(entry: &RunEntry, max_bytes: Option<u64>) -> Result<Category, TranscriptError> {
    let transcript = read_transcript(entry, max_bytes)?;
    Ok(classify_text(&transcript.text))
}

/// Classify already discovered runs. A run that fails to read is logged,
/// listed in `failures`, and counted under the fallback category; the rest of
/// the batch carries on.
pub fn classify_runs(runs: &[RunEntry], max_bytes: Option<u64>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for entry in runs {
        match classify_run(entry, max_bytes) {
            Ok(category) => {
                tracing::debug!(run = %entry.id, category = category.key(), "classified");
                outcome.tally.record(category, entry.id.clone());
            }
            Err(e) => {
                tracing::warn!(run = %entry.id, error = %e, "failed to process run");
                outcome.failures.push(ReadFailure {
                    id: entry.id.clone(),
                    error: e.to_string(),
                });
                outcome.tally.record(FALLBACK, entry.id.clone());
            }
        }
    }

    outcome
}

/// Discover every run under `dir` and classify it.
///
/// Only failing to list `dir` itself is an error.
pub fn classify_batch(dir: &Path, options: &BatchOptions) -> std::io::Result<BatchOutcome> {
    let runs = discover_runs(dir, &options.log_file_name)?;
    tracing::info!(dir = %dir.display(), runs = runs.len(), "discovered runs");
    let outcome = classify_runs(&runs, options.max_bytes);
    if !outcome.failures.is_empty() {
        tracing::info!(failed = outcome.failures.len(), "some runs fell back to {}", FALLBACK.key());
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use triage_transcript::marker::{FINAL_REPLY, MODEL_ANSWER};

    fn write_run(base: &Path, id: &str, content: &[u8]) {
        let dir = base.join(id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("log.txt"), content).unwrap();
    }

    fn correct_log() -> String {
        format!("{MODEL_ANSWER}\na\n{MODEL_ANSWER}\nb\n{FINAL_REPLY}\n23岁男性，23岁女性\n")
    }

    #[test]
    fn batch_classifies_each_run() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), "1", correct_log().as_bytes());
        write_run(tmp.path(), "2", format!("{MODEL_ANSWER}\n抱歉，无法完成").as_bytes());
        write_run(tmp.path(), "3", b"functionCall {}");
        write_run(
            tmp.path(),
            "4",
            format!("functionCall\n{FINAL_REPLY}\n我无法查询").as_bytes(),
        );
        std::fs::create_dir_all(tmp.path().join("5")).unwrap();

        let outcome = classify_batch(tmp.path(), &BatchOptions::default()).unwrap();
        let tally = &outcome.tally;
        assert_eq!(tally.total_processed(), 4);
        assert_eq!(tally.members(Category::TrulyCorrect), vec!["1"]);
        assert_eq!(tally.members(Category::RefusalToReason), vec!["2"]);
        assert_eq!(tally.members(Category::EmptyReplyAfterToolCall), vec!["3"]);
        assert_eq!(tally.members(Category::ReasonedImpossible), vec!["4"]);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn unreadable_run_falls_back_without_aborting() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), "1", &[0xff, 0xfe, 0xfd]);
        write_run(tmp.path(), "2", correct_log().as_bytes());

        let outcome = classify_batch(tmp.path(), &BatchOptions::default()).unwrap();
        assert_eq!(outcome.tally.members(Category::MissingFunctionCallInfo), vec!["1"]);
        assert_eq!(outcome.tally.members(Category::TrulyCorrect), vec!["2"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, "1");
        assert!(outcome.failures[0].error.contains("UTF-8"));
    }

    #[test]
    fn log_that_is_a_directory_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("3").join("log.txt")).unwrap();
        write_run(tmp.path(), "4", correct_log().as_bytes());

        let outcome = classify_batch(tmp.path(), &BatchOptions::default()).unwrap();
        assert_eq!(outcome.tally.total_processed(), 2);
        assert_eq!(outcome.tally.members(FALLBACK), vec!["3"]);
        assert_eq!(outcome.failures[0].id, "3");
    }

    #[test]
    fn vanished_log_is_recovered() {
        let runs = vec![RunEntry {
            id: "7".into(),
            log_path: PathBuf::from("/nonexistent/7/log.txt"),
        }];
        let outcome = classify_runs(&runs, None);
        assert_eq!(outcome.tally.count(FALLBACK), 1);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn oversized_log_is_a_read_failure() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), "1", correct_log().as_bytes());
        let options = BatchOptions {
            max_bytes: Some(8),
            ..BatchOptions::default()
        };
        let outcome = classify_batch(tmp.path(), &options).unwrap();
        assert_eq!(outcome.tally.count(FALLBACK), 1);
        assert!(outcome.failures[0].error.contains("limit"));
    }

    #[test]
    fn empty_directory_is_empty_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = classify_batch(tmp.path(), &BatchOptions::default()).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn missing_directory_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(classify_batch(&tmp.path().join("gone"), &BatchOptions::default()).is_err());
    }
}
