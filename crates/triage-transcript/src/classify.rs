use crate::signals::Signals;
use serde::Serialize;

/// Outcome bucket for a single run. Every transcript maps to exactly one.
///
/// Serialized names match [`Category::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Final answer present and numerically right.
    #[serde(rename = "truly_correct")]
    TrulyCorrect,
    /// Final answer present but the numbers are off.
    #[serde(rename = "mcp_error")]
    McpError,
    #[serde(rename = "malformed")]
    MalformedCall,
    #[serde(rename = "model_failure")]
    ModelCallFailure,
    #[serde(rename = "refusal")]
    RefusalToReason,
    #[serde(rename = "plan_as_answer")]
    PlanAsAnswer,
    #[serde(rename = "empty_reply")]
    EmptyReplyAfterToolCall,
    #[serde(rename = "reasoned_impossible")]
    ReasonedImpossible,
    /// Also the fallback bucket for transcripts that could not be read.
    #[serde(rename = "missing_info")]
    MissingFunctionCallInfo,
}

/// Top-level split of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Error,
}

/// Error families used to group failure categories in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorGroup {
    /// The model emitted a malformed tool call.
    Type1,
    /// The model call itself failed.
    Type2,
    /// The model answered without ever calling a tool.
    Type3,
    /// A tool was called but the run ended without a usable answer.
    Type4,
}

impl Category {
    /// Report order.
    pub const ALL: [Category; 9] = [
        Category::TrulyCorrect,
        Category::McpError,
        Category::MalformedCall,
        Category::ModelCallFailure,
        Category::RefusalToReason,
        Category::PlanAsAnswer,
        Category::EmptyReplyAfterToolCall,
        Category::ReasonedImpossible,
        Category::MissingFunctionCallInfo,
    ];

    pub fn outcome(self) -> Outcome {
        match self {
            Category::TrulyCorrect | Category::McpError => Outcome::Correct,
            _ => Outcome::Error,
        }
    }

    pub fn error_group(self) -> Option<ErrorGroup> {
        match self {
            Category::TrulyCorrect | Category::McpError => None,
            Category::MalformedCall => Some(ErrorGroup::Type1),
            Category::ModelCallFailure => Some(ErrorGroup::Type2),
            Category::RefusalToReason | Category::PlanAsAnswer => Some(ErrorGroup::Type3),
            Category::EmptyReplyAfterToolCall
            | Category::ReasonedImpossible
            | Category::MissingFunctionCallInfo => Some(ErrorGroup::Type4),
        }
    }

    /// Stable key used in JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Category::TrulyCorrect => "truly_correct",
            Category::McpError => "mcp_error",
            Category::MalformedCall => "malformed",
            Category::ModelCallFailure => "model_failure",
            Category::RefusalToReason => "refusal",
            Category::PlanAsAnswer => "plan_as_answer",
            Category::EmptyReplyAfterToolCall => "empty_reply",
            Category::ReasonedImpossible => "reasoned_impossible",
            Category::MissingFunctionCallInfo => "missing_info",
        }
    }

    /// Sub-type tag inside a split error group (`3a`, `4c`, ...).
    pub fn subtype(self) -> Option<&'static str> {
        match self {
            Category::RefusalToReason => Some("3a"),
            Category::PlanAsAnswer => Some("3b"),
            Category::EmptyReplyAfterToolCall => Some("4a"),
            Category::ReasonedImpossible => Some("4b"),
            Category::MissingFunctionCallInfo => Some("4c"),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Category::TrulyCorrect => "🟢",
            Category::McpError => "🟡",
            Category::MalformedCall => "🔴",
            Category::ModelCallFailure => "🟤",
            Category::RefusalToReason => "🙅",
            Category::PlanAsAnswer => "📝",
            Category::EmptyReplyAfterToolCall => "🕳️",
            Category::ReasonedImpossible => "🤷",
            Category::MissingFunctionCallInfo => "🧩",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::TrulyCorrect => "最终结果计算正确",
            Category::McpError => "最终结果计算错误",
            Category::MalformedCall => "大模型返回错误的工具调用信息",
            Category::ModelCallFailure => "调用大模型失败",
            Category::RefusalToReason => "大模型拒绝推理",
            Category::PlanAsAnswer => "将工具调用规划步骤作为最终答案",
            Category::EmptyReplyAfterToolCall => "调用工具后返回空值",
            Category::ReasonedImpossible => "推理后判断无法查询",
            Category::MissingFunctionCallInfo => "返回内容缺少function call",
        }
    }
}

impl ErrorGroup {
    pub const ALL: [ErrorGroup; 4] = [
        ErrorGroup::Type1,
        ErrorGroup::Type2,
        ErrorGroup::Type3,
        ErrorGroup::Type4,
    ];

    pub fn number(self) -> u8 {
        match self {
            ErrorGroup::Type1 => 1,
            ErrorGroup::Type2 => 2,
            ErrorGroup::Type3 => 3,
            ErrorGroup::Type4 => 4,
        }
    }

    pub fn members(self) -> &'static [Category] {
        match self {
            ErrorGroup::Type1 => &[Category::MalformedCall],
            ErrorGroup::Type2 => &[Category::ModelCallFailure],
            ErrorGroup::Type3 => &[Category::RefusalToReason, Category::PlanAsAnswer],
            ErrorGroup::Type4 => &[
                Category::EmptyReplyAfterToolCall,
                Category::ReasonedImpossible,
                Category::MissingFunctionCallInfo,
            ],
        }
    }

    /// Heading for groups that contain several sub-types.
    pub fn heading(self) -> Option<(&'static str, &'static str)> {
        match self {
            ErrorGroup::Type3 => Some(("🟠", "直接回复最终答案")),
            ErrorGroup::Type4 => Some(("⚪️", "大模型意外终止")),
            _ => None,
        }
    }
}

/// Decide the category for one transcript.
///
/// This is a priority list: the first matching branch wins, so the order of
/// the guards matters as much as the guards themselves.
pub fn classify(signals: &Signals) -> Category {
    if signals.tool_answer_count >= 2 && signals.final_reply_valid {
        if signals.success_token_count() >= 2 {
            return Category::TrulyCorrect;
        }
        return Category::McpError;
    }

    if signals.has_malformed_call_marker {
        return Category::MalformedCall;
    }
    if signals.has_model_call_failure_marker {
        return Category::ModelCallFailure;
    }

    // Never attempted a tool call.
    if !signals.has_function_call_marker {
        if signals.has_refusal_markers {
            return Category::RefusalToReason;
        }
        return Category::PlanAsAnswer;
    }

    // Tool call attempted, but no valid final answer.
    if signals.final_section.is_empty() {
        Category::EmptyReplyAfterToolCall
    } else if signals.has_impossible_marker {
        Category::ReasonedImpossible
    } else {
        Category::MissingFunctionCallInfo
    }
}

/// Extract signals from raw text and classify them.
pub fn classify_text(text: &str) -> Category {
    classify(&Signals::extract(text))
}
