use std::path::{Path, PathBuf};

/// Default name of the log file inside each run directory.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// A run directory that holds a transcript log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEntry {
    /// Run directory name, usually numeric.
    pub id: String,
    pub log_path: PathBuf,
}

/// The decoded text of one run.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub id: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("{} is {size} bytes, over the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Sort key for run identifiers: numeric ids ascending first, then the rest
/// lexicographically.
pub fn run_sort_key(id: &str) -> (bool, u64, &str) {
    let numeric = if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        id.parse::<u64>().ok()
    } else {
        None
    };
    match numeric {
        Some(n) => (false, n, id),
        None => (true, 0, id),
    }
}

/// List the immediate sub-directories of `dir` that contain `log_file_name`,
/// in display order. Plain files and directories without a log are skipped.
///
/// Symlinked run directories are followed. A log path that exists but is not
/// a readable file still counts as a run; reading it fails later.
pub fn discover_runs(dir: &Path, log_file_name: &str) -> std::io::Result<Vec<RunEntry>> {
    let mut runs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let run_dir = entry.path();
        if !run_dir.is_dir() {
            continue;
        }
        let log_path = run_dir.join(log_file_name);
        if !log_path.exists() {
            tracing::debug!(dir = %run_dir.display(), "no log file, skipping");
            continue;
        }
        runs.push(RunEntry {
            id: entry.file_name().to_string_lossy().into_owned(),
            log_path,
        });
    }
    runs.sort_by(|a, b| run_sort_key(&a.id).cmp(&run_sort_key(&b.id)));
    Ok(runs)
}

/// Read and strictly decode one run's log.
///
/// `max_bytes` rejects oversized logs before reading them.
pub fn read_transcript(
    entry: &RunEntry,
    max_bytes: Option<u64>,
) -> Result<Transcript, TranscriptError> {
    let io_err = |source| TranscriptError::Io {
        path: entry.log_path.clone(),
        source,
    };

    if let Some(limit) = max_bytes {
        let size = std::fs::metadata(&entry.log_path).map_err(io_err)?.len();
        if size > limit {
            return Err(TranscriptError::TooLarge {
                path: entry.log_path.clone(),
                size,
                limit,
            });
        }
    }

    let bytes = std::fs::read(&entry.log_path).map_err(io_err)?;
    let text = String::from_utf8(bytes).map_err(|source| TranscriptError::Decode {
        path: entry.log_path.clone(),
        source,
    })?;

    Ok(Transcript {
        id: entry.id.clone(),
        text,
    })
}
