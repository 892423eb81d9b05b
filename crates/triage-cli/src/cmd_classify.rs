use std::path::Path;
use triage_transcript::{classify, read_transcript, Category, RunEntry, Signals};

/// Result of classifying a single log file.
pub struct SingleResult {
    pub id: String,
    pub category: Category,
    /// `None` when the log could not be read.
    pub signals: Option<Signals>,
}

/// `triage classify <file>`
pub fn execute(file: &Path, json: bool) -> anyhow::Result<()> {
    let result = classify_file(file);

    if json {
        let value = serde_json::json!({
            "id": result.id,
            "category": result.category,
            "signals": result.signals,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{}: {} {} ({})",
        result.id,
        result.category.emoji(),
        result.category.label(),
        result.category.key()
    );
    match &result.signals {
        Some(s) => {
            println!("  tool answers:       {}", s.tool_answer_count);
            println!("  final reply valid:  {}", s.final_reply_valid);
            println!("  success tokens:     {}", s.success_token_count());
            println!("  malformed call:     {}", s.has_malformed_call_marker);
            println!("  model call failure: {}", s.has_model_call_failure_marker);
            println!("  function call:      {}", s.has_function_call_marker);
            println!("  refusal:            {}", s.has_refusal_markers);
            println!("  impossible:         {}", s.has_impossible_marker);
        }
        None => println!("  (log unreadable, see warning above)"),
    }
    Ok(())
}

/// Classify one log file. The run id is the parent directory name, matching
/// how `analyze` names runs. Unreadable logs take the batch fallback.
pub fn classify_file(file: &Path) -> SingleResult {
    let id = file
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let entry = RunEntry {
        id: id.clone(),
        log_path: file.to_path_buf(),
    };

    match read_transcript(&entry, None) {
        Ok(transcript) => {
            let signals = Signals::extract(&transcript.text);
            SingleResult {
                id,
                category: classify(&signals),
                signals: Some(signals),
            }
        }
        Err(e) => {
            tracing::warn!(run = %id, error = %e, "failed to read log");
            SingleResult {
                id,
                category: Category::MissingFunctionCallInfo,
                signals: None,
            }
        }
    }
}
