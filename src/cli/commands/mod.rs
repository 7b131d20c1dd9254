//! CLI command handlers for `gradeplan`.
//!
//! Each command is implemented in its own submodule. Handlers print their
//! own messages and return `false` on failure so `main` can set the exit code.

pub mod config;
pub mod courses;
pub mod progress;
pub mod report;
pub mod selection;
pub mod show;
pub mod validate;

use gradeplan::config::Config;
use gradeplan::core::PlanSession;
use gradeplan::{error, verbose};
use std::fmt::Write;

/// Open the plan document, reporting failures to the user
pub fn open_session(config: &Config) -> Option<PlanSession> {
    let path = config.plan_path();
    match PlanSession::open(&path) {
        Ok(session) => {
            verbose!("Plan document: {}", path.display());
            Some(session)
        }
        Err(e) => {
            error!("Failed to load plan {}: {e}", path.display());
            eprintln!("✗ Failed to load {}: {e}", path.display());
            None
        }
    }
}

/// Save the session back to its document, reporting failures to the user
pub fn save_session(session: &PlanSession) -> bool {
    match session.save() {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save plan: {e}");
            eprintln!("✗ Failed to save plan: {e}");
            false
        }
    }
}

/// Terminal width of a cell; CJK and other non-ASCII glyphs count double
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

/// Render a left-aligned text table
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, headers.iter().copied());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &widths, rule.iter().map(String::as_str));
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(display_width(cell));
        let _ = write!(line, "{cell}{}  ", " ".repeat(pad));
    }
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_aligns_wide_glyphs() {
        let rows = vec![
            vec!["A1".to_string(), "数据结构".to_string()],
            vec!["B".to_string(), "OS".to_string()],
        ];
        let table = render_table(&["ID", "Name"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "--  --------");
        assert_eq!(lines[2], "A1  数据结构");
        assert_eq!(lines[3], "B   OS");
    }
}
