//! Plain-text summary of a broadcast result

use git_broadcast::types::BroadcastResult;

/// Summary lines for `--print-summary`
pub fn summary_lines(result: &BroadcastResult) -> Vec<String> {
    let mut lines = vec![
        format!("source: {}", result.from),
        format!("targets: {}", result.to.join(", ")),
    ];

    if result.merged.is_empty() {
        lines.push("merged: (none)".to_string());
    } else {
        lines.push("merged:".to_string());
        for merged in &result.merged {
            let pushed = if merged.pushed { "pushed" } else { "not pushed" };
            lines.push(format!(
                "  {} ({pushed}) by {} <{}>",
                merged.target, merged.author_name, merged.author_email
            ));
        }
    }

    if result.unmerged.is_empty() {
        lines.push("unmerged: (none)".to_string());
    } else {
        lines.push("unmerged:".to_string());
        for failed in &result.unmerged {
            lines.push(format!(
                "  {} by {} <{}>",
                failed.target, failed.author_name, failed.author_email
            ));
        }
    }

    lines.push(format!("pushed all: {}", result.pushed_all));
    lines
}
