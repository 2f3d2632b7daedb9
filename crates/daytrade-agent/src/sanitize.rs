//! Cleanup of agent output before display
//!
//! Agent frameworks leak tool-call chatter into their text output:
//! multi-line "Running:" blocks, single "Running ..." lines, and internal
//! task-transfer markers. None of it belongs in the dashboard.

use regex::Regex;
use std::sync::OnceLock;

fn running_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?ms)^Running:.*?\n\n").expect("valid regex"))
}

/// Strip tool-call chatter from agent output.
///
/// Removes "Running:" blocks (up to the next blank line), any remaining
/// lines that start with "Running", and internal task-transfer lines.
pub fn strip_tool_chatter(text: &str) -> String {
    let without_blocks = running_block_re().replace_all(text, "");

    without_blocks
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("Running") && !line.contains("transfer_task_to")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let text = "AAPL is rated a **Buy** by most analysts.";
        assert_eq!(strip_tool_chatter(text), text);
    }

    #[test]
    fn test_removes_running_block() {
        let text = "Running:\n - get_stock_price(AAPL)\n - get_news(AAPL)\n\nAAPL summary here.";
        assert_eq!(strip_tool_chatter(text), "AAPL summary here.");
    }

    #[test]
    fn test_removes_running_lines() {
        let text = "Summary start.\nRunning get_analyst_recommendations\nSummary end.";
        assert_eq!(strip_tool_chatter(text), "Summary start.\nSummary end.");
    }

    #[test]
    fn test_removes_transfer_lines() {
        let text = "Header\ntransfer_task_to_finance_agent\nBody";
        assert_eq!(strip_tool_chatter(text), "Header\nBody");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let text = "\n\nRunning: tools\n\nActual content\n\n";
        assert_eq!(strip_tool_chatter(text), "Actual content");
    }
}
