use colored::{ColoredString, Colorize};

use mvjudge_core::types::{ReviewResult, DIMENSIONS};

use crate::csv_export::format_timestamp;

/// Format a full review report for terminal output.
pub fn format_report(result: &ReviewResult) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{}\n", "mvjudge - 评审报告".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    out.push_str(&format!("{}: {}\n", "作品".bold(), result.file_name));
    out.push_str(&format!(
        "{}: {}\n",
        "时间".bold(),
        format_timestamp(result.timestamp)
    ));
    out.push_str(&format!("{}: {}\n\n", "ID".bold(), result.id.dimmed()));

    out.push_str(&format!(
        "{}: {}/100\n",
        "综合评分".bold(),
        score_color(result.total_score, format!("{:.2}", result.total_score))
    ));
    for dim in &DIMENSIONS {
        out.push_str(&format!(
            "  {} ({:.0}%): {}\n",
            dim.label,
            dim.weight * 100.0,
            score_color(result.scores.get(dim.key), result.scores.get(dim.key).to_string()),
        ));
    }

    // Per-dimension commentary
    out.push_str(&format!("\n{}\n{}\n", "维度评价".bold(), "-".repeat(40)));
    for dim in &DIMENSIONS {
        out.push_str(&format!(
            "\n  {}\n    {}\n",
            dim.label.cyan(),
            result.details.description(dim.key)
        ));
    }

    out.push_str(&format!(
        "\n{}\n{}\n{}\n",
        "专家级综合评审建议".bold(),
        "-".repeat(40),
        result.details.overall_suggestion
    ));

    out.push('\n');
    out
}

/// Format the history as a table, newest first.
pub fn format_history(records: &[ReviewResult]) -> String {
    if records.is_empty() {
        return format!("{}\n", "No reviews in history.".dimmed());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "\n{} ({} records)\n{}\n",
        "评审历史记录".bold(),
        records.len(),
        "-".repeat(40)
    ));

    for r in records {
        let breakdown: Vec<String> = DIMENSIONS
            .iter()
            .map(|d| r.scores.get(d.key).to_string())
            .collect();
        out.push_str(&format!(
            "  {}  {}  {}  {}  {}\n",
            r.id.dimmed(),
            score_color(r.total_score, format!("{:>6.2}", r.total_score)),
            breakdown.join("/"),
            format_timestamp(r.timestamp),
            r.file_name,
        ));
    }

    out
}

fn score_color(score: f64, text: String) -> ColoredString {
    if score >= 80.0 {
        text.green()
    } else if score >= 60.0 {
        text.yellow()
    } else {
        text.red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvjudge_core::types::{ReviewDetails, ReviewScores};

    fn sample(id: &str) -> ReviewResult {
        ReviewResult {
            id: id.to_string(),
            file_name: format!("{id}.mp4"),
            scores: ReviewScores::new(90.0, 80.0, 70.0, 60.0),
            total_score: 77.0,
            details: ReviewDetails {
                music_desc: "旋律记忆点突出".to_string(),
                tech_desc: "角色一致".to_string(),
                fusion_desc: "鼓点对齐".to_string(),
                creative_desc: "叙事完整".to_string(),
                overall_suggestion: "建议增加长镜头".to_string(),
            },
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_report_contains_scores_and_text() {
        let report = format_report(&sample("r1"));
        assert!(report.contains("r1.mp4"));
        assert!(report.contains("77.00"));
        assert!(report.contains("音乐与文本创作"));
        assert!(report.contains("旋律记忆点突出"));
        assert!(report.contains("建议增加长镜头"));
        assert!(report.contains("(30%)"));
    }

    #[test]
    fn test_history_table() {
        let table = format_history(&[sample("b"), sample("a")]);
        assert!(table.contains("2 records"));
        assert!(table.contains("90/80/70/60"));
        let b = table.find("b.mp4").unwrap();
        let a = table.find("a.mp4").unwrap();
        assert!(b < a, "newest record first");
    }

    #[test]
    fn test_empty_history_table() {
        assert!(format_history(&[]).contains("No reviews"));
    }
}
