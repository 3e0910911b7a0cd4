use mvjudge_core::types::{ReviewResult, DIMENSIONS};

use crate::csv_export::format_timestamp;

/// Format a review report as Markdown.
pub fn format_report(result: &ReviewResult) -> String {
    let mut out = String::new();

    out.push_str("# 评审报告\n\n");
    out.push_str(&format!(
        "- **作品:** {}\n- **时间:** {}\n- **ID:** `{}`\n\n",
        escape_cell(&result.file_name),
        format_timestamp(result.timestamp),
        result.id
    ));

    // Score summary
    out.push_str("## 评分\n\n");
    out.push_str("| 维度 | 权重 | 得分 |\n");
    out.push_str("|------|------|------|\n");
    for dim in &DIMENSIONS {
        out.push_str(&format!(
            "| {} | {:.0}% | {} |\n",
            dim.label,
            dim.weight * 100.0,
            result.scores.get(dim.key)
        ));
    }
    out.push_str(&format!(
        "| **综合评分** | | **{:.2}/100** |\n",
        result.total_score
    ));

    out.push_str("\n## 维度评价\n");
    for dim in &DIMENSIONS {
        out.push_str(&format!(
            "\n### {}\n\n{}\n",
            dim.label,
            result.details.description(dim.key)
        ));
    }

    out.push_str(&format!(
        "\n## 专家级综合评审建议\n\n{}\n",
        result.details.overall_suggestion
    ));

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
