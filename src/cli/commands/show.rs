//! Show command handler: the selection table and GPA summary

use super::{open_session, render_table};
use crate::args::SortArgs;
use gradeplan::config::Config;
use gradeplan::core::models::ActualSemester;
use gradeplan::core::sorting::{sort_rows, SelectionRow};
use gradeplan::core::summary::{format_credits, semester_summary, Summary};

const HEADERS: [&str; 7] = ["Semester", "ID", "Name", "Type", "Credits", "Category", "GPA"];

fn row_cells(row: &SelectionRow) -> Vec<String> {
    let gpa = row.entry.gpa.map_or_else(|| "-".to_string(), |g| format!("{g:.2}"));
    match row.course {
        Some(course) => vec![
            row.entry.actual_semester.to_string(),
            course.course_id.clone(),
            course.name.clone(),
            course.kind.label().to_string(),
            format_credits(course.credits),
            course.category_label().to_string(),
            gpa,
        ],
        None => vec![
            row.entry.actual_semester.to_string(),
            row.entry.course_id.clone(),
            "(not in catalog)".to_string(),
            String::new(),
            String::new(),
            String::new(),
            gpa,
        ],
    }
}

/// Print the selection, optionally limited to one slot
pub fn run(config: &Config, semester: Option<ActualSemester>, sort: SortArgs) -> bool {
    let Some(session) = open_session(config) else {
        return false;
    };

    let mut rows = session.selection_rows();
    if let Some(slot) = semester {
        rows.retain(|r| r.entry.actual_semester == slot);
    }
    if let Some(column) = sort.sort {
        sort_rows(&mut rows, column, sort.direction());
    }

    let title = semester.map_or_else(|| "Selection".to_string(), |s| format!("Selection in {s}"));
    println!("\n=== {title} ({} courses) ===\n", rows.len());
    if rows.is_empty() {
        println!("(no courses selected)");
    } else {
        let cells: Vec<Vec<String>> = rows.iter().map(row_cells).collect();
        print!("{}", render_table(&HEADERS, &cells));
    }
    println!();

    match semester {
        Some(slot) => println!("{}", semester_summary(&session, slot)),
        None => println!("{}", Summary::from_session(&session)),
    }
    true
}
