//! Validate command handler

use super::open_session;
use gradeplan::config::Config;

/// Print plan rule violations; fails when any are found
pub fn run(config: &Config) -> bool {
    let Some(session) = open_session(config) else {
        return false;
    };

    let issues = session.validate();
    if issues.is_empty() {
        println!("✓ All plan rules are satisfied");
        return true;
    }

    println!("✗ {} issues found:", issues.len());
    for issue in &issues {
        println!("  - {issue}");
    }
    false
}
