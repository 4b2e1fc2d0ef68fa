//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for pull request comments on content repos and editorial
//! review notes.

use super::ScoredPost;
use crate::models::QaReport;
use anyhow::Result;
use chrono::Local;

/// Render posts as GitHub-flavored Markdown
pub fn render(posts: &[ScoredPost]) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header());
    md.push('\n');

    if posts.len() > 1 {
        md.push_str(&render_overview(posts));
        md.push('\n');
    }

    for post in posts {
        md.push_str(&render_post(post));
        md.push('\n');
    }

    md.push_str(&render_footer());
    Ok(md)
}

fn render_header() -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("# GEO/AEO Readiness Report\n\nGenerated: {}\n", timestamp)
}

fn render_overview(posts: &[ScoredPost]) -> String {
    let mut md = String::from("## Overview\n\n| Post | Score | Grade | Warnings |\n|------|-------|-------|----------|\n");
    for post in posts {
        md.push_str(&format!(
            "| `{}` | {}/100 | {} | {} |\n",
            post.source,
            post.report.geo_aeo_score,
            post.report.grade(),
            post.report.warnings.len()
        ));
    }
    md
}

fn render_post(post: &ScoredPost) -> String {
    let report = &post.report;
    let mut md = format!(
        "## `{}`\n\n**Grade: {}** | **Score: {}/100**\n\n",
        post.source,
        report.grade(),
        report.geo_aeo_score
    );

    md.push_str("| Category | Points | Status |\n|----------|--------|--------|\n");
    for (name, points, max) in report.category_points() {
        md.push_str(&format!(
            "| {} | {}/{} | {} |\n",
            name,
            points,
            max,
            status_indicator(points, max)
        ));
    }
    md.push('\n');

    md.push_str(&render_question_coverage(report));
    md.push_str(&render_warnings(report));
    md
}

fn render_question_coverage(report: &QaReport) -> String {
    let qc = &report.checks.question_coverage;
    if qc.questions_requested == 0 {
        return String::new();
    }
    format!(
        "Requested questions answered in the FAQ: **{}/{}**\n\n",
        qc.questions_answered, qc.questions_requested
    )
}

fn render_warnings(report: &QaReport) -> String {
    if report.warnings.is_empty() {
        return "✅ No warnings.\n".to_string();
    }
    let mut md = String::from("### Warnings\n\n");
    for warning in &report.warnings {
        md.push_str(&format!("- {}\n", warning));
    }
    md
}

fn status_indicator(points: u32, max: u32) -> &'static str {
    if points >= max {
        "✅"
    } else if points * 2 >= max {
        "⚠️"
    } else {
        "❌"
    }
}

fn render_footer() -> String {
    format!(
        "---\n\n*Scored by blogforge {} (report v{})*\n",
        env!("CARGO_PKG_VERSION"),
        crate::models::QA_VERSION
    )
}
