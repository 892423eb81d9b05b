mod batch;
pub mod render;
mod tally;

pub use batch::{
    classify_batch, classify_run, classify_runs, BatchOptions, BatchOutcome, ReadFailure,
};
pub use tally::{CategorySummary, RollUp, Tally, TallySummary};
