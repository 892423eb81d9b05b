//! Report rendering: the hierarchical text report and its JSON counterpart.

use crate::batch::BatchOutcome;
use crate::tally::Tally;
use std::fmt::Write;
use triage_transcript::{Category, ErrorGroup};

const RULE_WIDTH: usize = 40;

/// Render the hierarchical text report.
///
/// Categories with no members are left out; an empty top-level section is
/// shown as `(无)`.
pub fn render_text(tally: &Tally) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, tally);
    out
}

fn write_report(out: &mut String, tally: &Tally) -> std::fmt::Result {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    writeln!(out, "\n{heavy}")?;
    writeln!(out, "           日 志 分 析 结 果")?;
    writeln!(out, "{heavy}")?;
    writeln!(out, "总共分析的子目录数: {}", tally.total_processed())?;
    writeln!(out, "{light}")?;

    let correct = tally.total_correct();
    writeln!(
        out,
        "\n✅ 得到最终回复子目录 (总计) ({correct}个, 占比: {:.2}%):",
        tally.rate(correct)
    )?;
    if correct > 0 {
        for category in [Category::TrulyCorrect, Category::McpError] {
            write_category(out, tally, category, "", 4)?;
        }
    } else {
        writeln!(out, "  (无)")?;
    }

    let errors = tally.total_error();
    writeln!(
        out,
        "\n❌ 没有最终回复子目录 (总计) ({errors}个, 占比: {:.2}%):",
        tally.rate(errors)
    )?;
    if errors > 0 {
        for group in ErrorGroup::ALL {
            write_group(out, tally, group)?;
        }
    } else {
        writeln!(out, "  (无)")?;
    }

    writeln!(out, "\n{heavy}")?;
    Ok(())
}

fn write_group(out: &mut String, tally: &Tally, group: ErrorGroup) -> std::fmt::Result {
    let n = group.number();
    match group.heading() {
        None => {
            for &category in group.members() {
                write_category(out, tally, category, &format!("[类型{n}] "), 4)?;
            }
        }
        Some((emoji, label)) => {
            let total = tally.group_count(group);
            if total == 0 {
                return Ok(());
            }
            writeln!(out, "    - {emoji} [类型{n}] {label} (总计: {total}个)")?;
            for &category in group.members() {
                let tag = category
                    .subtype()
                    .map(|s| format!("[{s}] "))
                    .unwrap_or_default();
                write_category(out, tally, category, &tag, 6)?;
            }
        }
    }
    Ok(())
}

fn write_category(
    out: &mut String,
    tally: &Tally,
    category: Category,
    tag: &str,
    indent: usize,
) -> std::fmt::Result {
    let count = tally.count(category);
    if count == 0 {
        return Ok(());
    }
    writeln!(
        out,
        "{:indent$}- {} {tag}{} ({count}个, 占比: {:.2}%)",
        "",
        category.emoji(),
        category.label(),
        tally.rate(count),
    )?;
    writeln!(
        out,
        "{:width$}{}",
        "",
        tally.members(category).join(" "),
        width = indent + 2
    )
}

/// JSON report: the tally summary plus any runs that failed to read.
pub fn render_json(outcome: &BatchOutcome, generated_at: &str) -> serde_json::Value {
    serde_json::json!({
        "generated_at": generated_at,
        "summary": outcome.tally.summary(),
        "read_failures": outcome.failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ReadFailure;

    #[test]
    fn text_report_layout() {
        let mut tally = Tally::new();
        tally.record(Category::TrulyCorrect, "10");
        tally.record(Category::TrulyCorrect, "2");
        tally.record(Category::MalformedCall, "3");
        tally.record(Category::PlanAsAnswer, "4");

        let text = render_text(&tally);
        let expected = "
========================================
           日 志 分 析 结 果
========================================
总共分析的子目录数: 4
----------------------------------------

✅ 得到最终回复子目录 (总计) (2个, 占比: 50.00%):
    - 🟢 最终结果计算正确 (2个, 占比: 50.00%)
      2 10

❌ 没有最终回复子目录 (总计) (2个, 占比: 50.00%):
    - 🔴 [类型1] 大模型返回错误的工具调用信息 (1个, 占比: 25.00%)
      3
    - 🟠 [类型3] 直接回复最终答案 (总计: 1个)
      - 📝 [3b] 将工具调用规划步骤作为最终答案 (1个, 占比: 25.00%)
        4

========================================
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_sections_show_none_marker() {
        let mut tally = Tally::new();
        tally.record(Category::EmptyReplyAfterToolCall, "1");
        tally.record(Category::MissingFunctionCallInfo, "2");
        tally.record(Category::MissingFunctionCallInfo, "3");

        let text = render_text(&tally);
        assert!(text.contains("(0个, 占比: 0.00%):\n  (无)\n"));
        assert!(text.contains("    - ⚪️ [类型4] 大模型意外终止 (总计: 3个)\n"));
        assert!(text.contains("      - 🧩 [4c] 返回内容缺少function call (2个, 占比: 66.67%)\n        2 3\n"));
        assert!(!text.contains("[类型3]"));
    }

    #[test]
    fn json_report_carries_summary_and_failures() {
        let mut outcome = BatchOutcome::default();
        outcome.tally.record(Category::McpError, "1");
        outcome.tally.record(Category::MissingFunctionCallInfo, "2");
        outcome.failures.push(ReadFailure {
            id: "2".into(),
            error: "bad bytes".into(),
        });

        let json = render_json(&outcome, "2026-01-01T00:00:00Z");
        assert_eq!(json["generated_at"], "2026-01-01T00:00:00Z");
        assert_eq!(json["summary"]["total_processed"], 2);
        assert_eq!(json["summary"]["total_correct"]["count"], 1);
        assert_eq!(json["summary"]["categories"][1]["category"], "mcp_error");
        assert_eq!(json["summary"]["categories"][8]["category"], "missing_info");
        assert_eq!(json["summary"]["categories"][8]["members"][0], "2");
        assert!(json["summary"]["categories"][8].get("key").is_none());
        assert_eq!(json["read_failures"][0]["error"], "bad bytes");
    }
}
