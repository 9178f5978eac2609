use crate::types::{Coverage, UsageStats, VibeReport};

/// USD per million prompt tokens.
pub const INPUT_COST_PER_MILLION: f64 = 0.075;
/// USD per million output tokens.
pub const OUTPUT_COST_PER_MILLION: f64 = 0.30;

/// Format seconds as MM:SS, or H:MM:SS from one hour up
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

pub fn estimate_cost(usage: &UsageStats) -> f64 {
    (usage.prompt_tokens as f64 / 1_000_000.0) * INPUT_COST_PER_MILLION
        + (usage.output_tokens as f64 / 1_000_000.0) * OUTPUT_COST_PER_MILLION
}

pub fn format_usage(usage: &UsageStats) -> String {
    format!(
        "Tokens: {} in / {} out / {} total | Estimated cost: ${:.6}",
        usage.prompt_tokens,
        usage.output_tokens,
        usage.total_tokens,
        estimate_cost(usage)
    )
}

fn coverage_label(coverage: Coverage) -> &'static str {
    match coverage {
        Coverage::Full => "transcript and comments",
        Coverage::TranscriptOnly => "transcript only",
        Coverage::CommentsOnly => "comments only",
    }
}

pub fn format_report_readable(report: &VibeReport) -> String {
    let meta = &report.metadata;
    let mut output = String::new();

    output.push_str(&format!(
        "# {}\n\n",
        meta.title.as_deref().unwrap_or("Unknown Title")
    ));

    let mut facts = vec![format!(
        "**Channel:** {}",
        meta.channel.as_deref().unwrap_or("Unknown Channel")
    )];
    if let Some(seconds) = meta.duration_seconds {
        facts.push(format!("**Duration:** {}", format_duration(seconds)));
    }
    facts.push(format!("**Based on:** {}", coverage_label(report.coverage)));
    output.push_str(&facts.join(" | "));
    output.push_str("\n\n");

    if let Some(thumbnail) = &meta.thumbnail_url {
        output.push_str(&format!("[Thumbnail]({})\n\n", thumbnail));
    }

    for notice in &report.notices {
        output.push_str(&format!("> **Warning:** {}\n", notice));
    }
    if !report.notices.is_empty() {
        output.push('\n');
    }

    output.push_str(report.analysis.text.trim());
    output.push_str("\n\n");

    output.push_str("---\n\n");
    output.push_str(&format!("Model: {}\n", report.model));
    output.push_str(&format_usage(&report.analysis.usage));
    output.push('\n');

    output
}
