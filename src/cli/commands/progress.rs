//! Progress command handler

use super::{open_session, render_table};
use crate::args::SortArgs;
use gradeplan::config::Config;
use gradeplan::core::sorting::sort_rows;
use gradeplan::core::summary::format_credits;

/// Print credit progress by category
pub fn run(config: &Config, sort: SortArgs) -> bool {
    let Some(session) = open_session(config) else {
        return false;
    };

    let mut progress = session.progress();
    if let Some(column) = sort.sort {
        sort_rows(&mut progress.rows, column, sort.direction());
    }

    let cells: Vec<Vec<String>> = progress
        .rows
        .iter()
        .map(|row| {
            vec![
                row.category.clone(),
                format_credits(row.required),
                format_credits(row.selected),
                format_credits(row.completed),
                format_credits(row.remaining),
                if row.is_satisfied() { "✓" } else { "" }.to_string(),
            ]
        })
        .collect();

    println!("\n=== Credit progress ===\n");
    print!(
        "{}",
        render_table(
            &["Category", "Required", "Selected", "Completed", "Remaining", ""],
            &cells
        )
    );
    println!(
        "\nTotal: {} selected, {} completed, {} remaining",
        format_credits(progress.total_selected()),
        format_credits(progress.total_completed()),
        format_credits(progress.total_remaining())
    );
    true
}
