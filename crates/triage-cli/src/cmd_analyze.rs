use anyhow::Context;
use std::path::Path;
use triage_aggregate::render::{render_json, render_text};
use triage_aggregate::{classify_batch, BatchOptions, BatchOutcome};

pub struct AnalyzeParams<'a> {
    pub dir: &'a Path,
    pub log_file: Option<&'a str>,
    pub max_bytes: Option<u64>,
    pub json: bool,
}

/// `triage analyze <dir>`
pub fn execute(params: &AnalyzeParams<'_>) -> anyhow::Result<()> {
    let options = crate::config::batch_options(params.log_file, params.max_bytes);

    let Some(outcome) = analyze(params.dir, &options)? else {
        println!(
            "在目录 '{}' 中未找到任何包含 {} 的子目录进行分析。",
            params.dir.display(),
            options.log_file_name
        );
        return Ok(());
    };

    if params.json {
        let report = render_json(&outcome, &now_rfc3339()?);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&outcome.tally));
    }
    Ok(())
}

/// Classify every run under `dir`. `None` means there was nothing to analyze.
pub fn analyze(dir: &Path, options: &BatchOptions) -> anyhow::Result<Option<BatchOutcome>> {
    if !dir.is_dir() {
        anyhow::bail!(
            "directory does not exist or is not a directory: '{}'",
            dir.display()
        );
    }
    let outcome = classify_batch(dir, options)
        .with_context(|| format!("failed to list runs in {}", dir.display()))?;
    if outcome.is_empty() {
        return Ok(None);
    }
    Ok(Some(outcome))
}

fn now_rfc3339() -> anyhow::Result<String> {
    let now = time::OffsetDateTime::now_utc();
    Ok(now.format(&time::format_description::well_known::Rfc3339)?)
}
