//! Text (terminal) reporter with colors and formatting

use super::ScoredPost;
use crate::models::QaReport;
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render posts as formatted terminal output
pub fn render(posts: &[ScoredPost]) -> Result<String> {
    let mut out = String::new();
    for post in posts {
        render_post(&mut out, post);
    }
    if posts.len() > 1 {
        let total: u32 = posts.iter().map(|p| p.report.geo_aeo_score).sum();
        let mean = total as f64 / posts.len() as f64;
        out.push_str(&format!(
            "{BOLD}{} posts{RESET}  average {:.1}/100\n",
            posts.len(),
            mean
        ));
    }
    Ok(out)
}

fn render_post(out: &mut String, post: &ScoredPost) {
    let report = &post.report;
    let grade = report.grade();
    let grade_c = grade_color(grade);

    out.push_str(&format!("\n{BOLD}{}{RESET}\n", post.source));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n\n",
        report.geo_aeo_score, grade
    ));

    out.push_str(&format!("{BOLD}CATEGORIES{RESET}\n"));
    for (name, points, max) in report.category_points() {
        out.push_str(&format!(
            "  {:<24} {}\n",
            name,
            format_points(points, max)
        ));
    }
    out.push('\n');

    render_coverage(out, report);

    if report.warnings.is_empty() {
        out.push_str(&format!("{DIM}No warnings.{RESET}\n\n"));
        return;
    }
    out.push_str(&format!(
        "{BOLD}WARNINGS{RESET} ({})\n",
        report.warnings.len()
    ));
    for warning in &report.warnings {
        out.push_str(&format!("  - {}\n", warning));
    }
    out.push('\n');
}

fn render_coverage(out: &mut String, report: &QaReport) {
    let qc = &report.checks.question_coverage;
    if qc.questions_requested > 0 {
        out.push_str(&format!(
            "Questions answered: {}/{}\n\n",
            qc.questions_answered, qc.questions_requested
        ));
    }
}

fn format_points(points: u32, max: u32) -> String {
    let ratio = if max == 0 { 0.0 } else { points as f64 / max as f64 };
    let color = if ratio >= 0.8 {
        "\x1b[32m"
    } else if ratio >= 0.5 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:>2}{RESET}/{}", points, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_posts;

    #[test]
    fn test_text_render_lists_categories_and_warnings() {
        let out = render(&test_posts()[..1]).expect("render text");
        assert!(out.contains("posts/empty.json"));
        assert!(out.contains("35/100"));
        assert!(out.contains("Answer packaging"));
        assert!(out.contains("LLM extraction pack"));
        assert!(out.contains("WARNINGS"));
        assert!(out.contains("Missing meta_title."));
        assert!(!out.contains("average"));
    }

    #[test]
    fn test_text_render_summarises_many_posts() {
        let out = render(&test_posts()).expect("render text");
        assert!(out.contains("2 posts"));
        assert!(out.contains("average 44.0/100"));
    }

    #[test]
    fn test_question_coverage_line() {
        let report = crate::scoring::score(
            &serde_json::json!({"content": {"faq": [{"question": "What is Rust?"}]}}),
            &serde_json::json!({"search_targets": {"questions_to_win": ["what is rust", "Why Go?"]}}),
        );
        let out = render(&[ScoredPost::new("p.json", report)]).expect("render text");
        assert!(out.contains("Questions answered: 1/2"));
    }
}
