//! Selection command handlers: add, remove, move, grade, auto-required
//!
//! Every handler loads the plan document, applies one change and saves the
//! document back. A rejected change leaves the file untouched.

use super::{open_session, save_session};
use gradeplan::config::Config;
use gradeplan::core::models::ActualSemester;
use gradeplan::core::summary::format_credits;
use gradeplan::core::PlanSession;
use gradeplan::{info, warn};

/// Parse a grade argument; `clear`, `none` and `-` clear the grade
fn parse_gpa(value: &str) -> Result<Option<f64>, String> {
    let value = value.trim();
    if value.is_empty() || ["clear", "none", "-"].iter().any(|w| value.eq_ignore_ascii_case(w)) {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| {
        format!("Invalid grade point '{value}': expected a number from 0 to 4.0 or 'clear'")
    })
}

fn report_limit(session: &PlanSession, slot: ActualSemester) {
    if session.is_over_limit(slot) {
        println!(
            "⚠ {slot} now has {} credits, over the limit of {}",
            format_credits(session.semester_credits(slot)),
            format_credits(session.plan().term_credit_limit)
        );
    }
}

/// Select `course_id` in `slot`
pub fn add(config: &Config, course_id: &str, slot: ActualSemester) -> bool {
    let Some(mut session) = open_session(config) else {
        return false;
    };
    if let Err(e) = session.add_course(course_id, slot) {
        eprintln!("✗ {e}");
        return false;
    }
    if !save_session(&session) {
        return false;
    }
    info!("Added {course_id} in {slot}");
    println!("✓ Added {course_id} in {slot}");
    report_limit(&session, slot);
    true
}

/// Remove `course_id` from the selection
pub fn remove(config: &Config, course_id: &str) -> bool {
    let Some(mut session) = open_session(config) else {
        return false;
    };
    let removed = match session.remove_course(course_id) {
        Ok(entry) => entry,
        Err(e) => {
            eprintln!("✗ {e}");
            return false;
        }
    };
    if !save_session(&session) {
        return false;
    }
    info!("Removed {course_id} from {}", removed.actual_semester);
    println!("✓ Removed {course_id} from {}", removed.actual_semester);
    true
}

/// Move `course_id` to another slot, keeping its grade
pub fn move_course(config: &Config, course_id: &str, slot: ActualSemester) -> bool {
    let Some(mut session) = open_session(config) else {
        return false;
    };
    let previous = match session.move_course(course_id, slot) {
        Ok(previous) => previous,
        Err(e) => {
            eprintln!("✗ {e}");
            return false;
        }
    };
    if !save_session(&session) {
        return false;
    }
    info!("Moved {course_id} from {previous} to {slot}");
    println!("✓ Moved {course_id}: {previous} -> {slot}");
    report_limit(&session, slot);
    true
}

/// Record or clear the grade point of a selected course
pub fn gpa(config: &Config, course_id: &str, value: &str) -> bool {
    let gpa = match parse_gpa(value) {
        Ok(gpa) => gpa,
        Err(e) => {
            eprintln!("✗ {e}");
            return false;
        }
    };
    let Some(mut session) = open_session(config) else {
        return false;
    };
    if let Err(e) = session.set_gpa(course_id, gpa) {
        eprintln!("✗ {e}");
        return false;
    }
    if !save_session(&session) {
        return false;
    }
    match gpa {
        Some(value) => println!("✓ {course_id} grade point set to {value:.2}"),
        None => println!("✓ {course_id} grade point cleared"),
    }
    true
}

/// Select every required course that is not selected yet
pub fn auto_required(config: &Config) -> bool {
    let Some(mut session) = open_session(config) else {
        return false;
    };
    let added = session.auto_add_required();
    if !added.is_empty() {
        if !save_session(&session) {
            return false;
        }
        println!("✓ Added {} required courses:", added.len());
        for id in &added {
            if let Some(entry) = session.selection().get(id) {
                println!("  {} {id}", entry.actual_semester);
            }
        }
    }

    let skipped = session.required_missing();
    for course in &skipped {
        println!(
            "⚠ {} ({}) was not added: planned semester '{}' is not usable",
            course.course_id, course.name, course.planned_semester
        );
    }
    println!("{}", auto_required_outcome(added.len(), skipped.len()));
    if !skipped.is_empty() {
        warn!("{} required courses have no usable planned semester", skipped.len());
    }
    true
}

/// Closing line of `auto-required`
fn auto_required_outcome(added: usize, skipped: usize) -> String {
    match (added, skipped) {
        (0, 0) => "✓ All required courses are already selected".to_string(),
        (_, 0) => "✓ Every required course is now selected".to_string(),
        (_, n) => format!("⚠ {n} required courses are still unselected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gpa_values() {
        assert_eq!(parse_gpa("3.7"), Ok(Some(3.7)));
        assert_eq!(parse_gpa(" 4 "), Ok(Some(4.0)));
        assert_eq!(parse_gpa("clear"), Ok(None));
        assert_eq!(parse_gpa("NONE"), Ok(None));
        assert_eq!(parse_gpa("-"), Ok(None));
        assert!(parse_gpa("A+").is_err());
    }

    #[test]
    fn test_parse_gpa_leaves_range_check_to_session() {
        // Range is enforced by the selection record
        assert_eq!(parse_gpa("4.5"), Ok(Some(4.5)));
        assert_eq!(parse_gpa("-1"), Ok(Some(-1.0)));
    }

    #[test]
    fn test_auto_required_outcome_reports_skipped() {
        assert_eq!(
            auto_required_outcome(0, 0),
            "✓ All required courses are already selected"
        );
        assert_eq!(auto_required_outcome(3, 0), "✓ Every required course is now selected");
        assert_eq!(
            auto_required_outcome(0, 2),
            "⚠ 2 required courses are still unselected"
        );
        assert_eq!(
            auto_required_outcome(1, 1),
            "⚠ 1 required courses are still unselected"
        );
    }
}
