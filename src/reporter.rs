//! Rendering an `AnalysisResult` for the terminal or for scripts.

use std::fmt::Write;

use crate::domain::models::AnalysisResult;

pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let counts = result.counts();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "SEO health check for {}", result.url);
    let _ = writeln!(out, "Score:        {}/100", result.score);
    let _ = writeln!(out, "Load time:    {}", result.stats.load_time);
    let _ = writeln!(out, "Page size:    {}", result.stats.page_size_kb);
    let _ = writeln!(
        out,
        "Issues found: {} ({} critical, {} warning, {} info)",
        result.stats.issues_found, counts.critical, counts.warning, counts.info
    );
    if result.fallback_content {
        let _ = writeln!(
            out,
            "Note: the page could not be retrieved; placeholder content was analyzed."
        );
    }
    out.push('\n');

    if result.issues.is_empty() {
        let _ = writeln!(out, "[good] Excellent SEO Health!");
        let _ = writeln!(
            out,
            "  No major SEO issues found on this page. Your website appears to be well-optimized!"
        );
        let _ = writeln!(
            out,
            "  Recommendation: Continue monitoring your site regularly and keep content fresh and relevant."
        );
        return out;
    }

    for issue in &result.issues {
        let _ = writeln!(out, "[{}] {}", issue.severity.as_str(), issue.title);
        let _ = writeln!(out, "  {}", issue.description);
        if let Some(details) = &issue.details {
            let _ = writeln!(out, "  Details: {}", details);
        }
        let _ = writeln!(out, "  Recommendation: {}", issue.guidance);
        out.push('\n');
    }
    out
}

pub fn render_json(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
