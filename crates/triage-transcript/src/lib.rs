mod classify;
mod read;
mod signals;

pub use classify::{classify, classify_text, Category, ErrorGroup, Outcome};
pub use read::{
    discover_runs, read_transcript, run_sort_key, RunEntry, Transcript, TranscriptError,
    DEFAULT_LOG_FILE,
};
pub use signals::{marker, Signals};
