use serde::Serialize;

/// Literal markers written into run logs by the agent harness.
///
/// These must match legacy transcripts byte-for-byte.
pub mod marker {
    /// Opens each model answer segment.
    pub const MODEL_ANSWER: &str = "--- google模型回答 ---";
    /// Precedes the run's terminal answer. Only the last occurrence counts.
    pub const FINAL_REPLY: &str = "--- 最终答复 ---";
    pub const MALE: &str = "男性";
    pub const FEMALE: &str = "女性";
    pub const MALFORMED_CALL: &str = "MALFORMED_FUNCTION_CALL";
    pub const MODEL_CALL_FAILURE: &str = "N/A (调用失败)";
    pub const FUNCTION_CALL: &str = "functionCall";
    pub const SORRY: &str = "抱歉";
    pub const UNABLE: &str = "无法";
    pub const IMPOSSIBLE: &str = "我无法";
    /// Expected numeric answer; must appear at least twice in the final reply.
    pub const SUCCESS_TOKEN: &str = "23";
}

/// Everything the classifier needs to know about one transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub tool_answer_count: usize,
    pub final_section: String,
    pub final_reply_valid: bool,
    pub has_malformed_call_marker: bool,
    pub has_model_call_failure_marker: bool,
    pub has_function_call_marker: bool,
    pub has_refusal_markers: bool,
    pub has_impossible_marker: bool,
}

impl Signals {
    /// Scan the raw transcript text. Never fails: a missing marker is just a
    /// false/empty signal.
    pub fn extract(text: &str) -> Self {
        let final_section = final_section(text);
        let final_reply_valid = !final_section.is_empty()
            && final_section.contains(marker::MALE)
            && final_section.contains(marker::FEMALE);

        Self {
            tool_answer_count: text.matches(marker::MODEL_ANSWER).count(),
            final_reply_valid,
            has_malformed_call_marker: text.contains(marker::MALFORMED_CALL),
            has_model_call_failure_marker: text.contains(marker::MODEL_CALL_FAILURE),
            has_function_call_marker: text.contains(marker::FUNCTION_CALL),
            has_refusal_markers: text.contains(marker::SORRY) && text.contains(marker::UNABLE),
            has_impossible_marker: text.contains(marker::IMPOSSIBLE),
            final_section,
        }
    }

    /// Non-overlapping occurrences of the success token in the final reply.
    pub fn success_token_count(&self) -> usize {
        self.final_section.matches(marker::SUCCESS_TOKEN).count()
    }
}

/// Text after the last final-reply delimiter, trimmed. Empty when the
/// delimiter never appears.
fn final_section(text: &str) -> String {
    match text.rsplit_once(marker::FINAL_REPLY) {
        Some((_, tail)) => tail.trim().to_string(),
        None => String::new(),
    }
}
