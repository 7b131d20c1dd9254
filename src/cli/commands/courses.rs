//! Courses command handler: browse the catalog or the offering for a slot

use super::{open_session, render_table};
use crate::args::SortArgs;
use gradeplan::config::Config;
use gradeplan::core::models::{ActualSemester, CourseDef, Season};
use gradeplan::core::sorting::sort_rows;
use gradeplan::core::summary::format_credits;

fn course_rows(courses: &[&CourseDef], selected: impl Fn(&str) -> bool) -> Vec<Vec<String>> {
    courses
        .iter()
        .map(|c| {
            vec![
                if selected(&c.course_id) { "*" } else { "" }.to_string(),
                c.course_id.clone(),
                c.name.clone(),
                c.kind.label().to_string(),
                format_credits(c.credits),
                c.planned_semester.clone(),
                c.hours.clone().unwrap_or_default(),
                c.category_label().to_string(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 8] = ["", "ID", "Name", "Type", "Credits", "Plan", "Hours", "Category"];

/// List catalog courses; `*` marks selected ones
pub fn run(
    config: &Config,
    slot: Option<ActualSemester>,
    season: Option<Season>,
    sort: SortArgs,
) -> bool {
    let Some(session) = open_session(config) else {
        return false;
    };
    let selected = |id: &str| session.selection().contains(id);

    let offering = match (slot, season) {
        (Some(slot), _) => Some((slot.to_string(), session.offered_in(slot))),
        (None, Some(season)) => Some((
            season.to_string(),
            session.catalog().offered_in_season(season),
        )),
        (None, None) => None,
    };

    match offering {
        Some((label, offering)) => {
            let groups = [
                ("Required", offering.required),
                ("Elective", offering.elective),
            ];
            for (title, mut courses) in groups {
                if let Some(column) = sort.sort {
                    sort_rows(&mut courses, column, sort.direction());
                }
                println!("\n=== {title} courses offered in {label} ({}) ===\n", courses.len());
                print!("{}", render_table(&HEADERS, &course_rows(&courses, selected)));
            }
        }
        None => {
            let mut courses: Vec<&CourseDef> = session.catalog().courses().iter().collect();
            if let Some(column) = sort.sort {
                sort_rows(&mut courses, column, sort.direction());
            }
            println!("\n=== Catalog ({} courses) ===\n", courses.len());
            print!("{}", render_table(&HEADERS, &course_rows(&courses, selected)));
        }
    }

    for warning in session.catalog().warnings() {
        eprintln!("⚠ {warning}");
    }
    true
}
