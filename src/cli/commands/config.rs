//! Config command handler
//!
//! Works on the stored config file, never on the per-run overrides. A new
//! `plan_file` must point at a loadable plan document or at a path that does
//! not exist yet (it is created on first use).

use crate::args::ConfigSubcommand;
use gradeplan::config::{Config, KEYS};
use gradeplan::core::PlanDocument;
use gradeplan::info;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> bool {
    match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => {
            show_all(config);
            true
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => show_key(config, &key),
        Some(ConfigSubcommand::Set { key, value }) => set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset(&mut io::stdin().lock()),
    }
}

fn unknown_key(key: &str) -> String {
    format!("✗ Unknown config key: '{key}' (known keys: {})", KEYS.join(", "))
}

fn is_plan_key(key: &str) -> bool {
    matches!(key, "plan_file" | "plan-file")
}

fn describe_plan(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (created on first use)", path.display())
    }
}

fn show_all(config: &Config) {
    println!("\n=== Configuration ===\n");
    print!("{config}");
    println!("\n  plan document: {}", describe_plan(&config.plan_path()));
    println!("  reports:       {}", config.reports_path().display());
    println!("  config file:   {}", Config::get_config_file_path().display());
}

/// Print one value; path keys print the location actually used
fn show_key(config: &Config, key: &str) -> bool {
    if config.get(key).is_none() {
        eprintln!("{}", unknown_key(key));
        return false;
    }
    match key {
        "plan_file" | "plan-file" => println!("{}", config.plan_path().display()),
        "reports_dir" | "reports-dir" => println!("{}", config.reports_path().display()),
        _ => println!("{}", config.get(key).unwrap_or_default()),
    }
    true
}

/// A plan file must be missing or hold a loadable plan document
fn check_plan_file(path: &Path) -> Result<(), String> {
    if path.is_dir() {
        return Err(format!("{} is a directory", path.display()));
    }
    if !path.exists() {
        return Ok(());
    }
    PlanDocument::check(path)
        .map_err(|e| format!("{} is not a usable plan document: {e}", path.display()))
}

fn save(config: &Config) -> bool {
    match config.save() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("✗ Failed to save config: {e}");
            false
        }
    }
}

fn set(config: &mut Config, key: &str, value: &str) -> bool {
    if config.get(key).is_none() {
        eprintln!("{}", unknown_key(key));
        return false;
    }
    if is_plan_key(key) {
        let path = PathBuf::from(Config::expand_variables(value));
        if let Err(e) = check_plan_file(&path) {
            eprintln!("✗ {e}");
            return false;
        }
    }
    if let Err(e) = config.set(key, value) {
        eprintln!("✗ {e}");
        return false;
    }
    if !save(config) {
        return false;
    }

    let stored = config.get(key).unwrap_or_default();
    info!("Config {key} set to {stored}");
    println!("✓ Set {key} = {stored}");
    if is_plan_key(key) {
        println!("  plan document: {}", describe_plan(&config.plan_path()));
    }
    true
}

fn unset(config: &mut Config, defaults: &Config, key: &str) -> bool {
    if config.unset(key, defaults).is_err() {
        eprintln!("{}", unknown_key(key));
        return false;
    }
    if !save(config) {
        return false;
    }
    println!(
        "✓ Reset {key} to default ({})",
        config.get(key).unwrap_or_default()
    );
    true
}

/// `y` or `yes`, case-insensitive
fn confirmed(input: &mut impl BufRead) -> bool {
    let mut response = String::new();
    if input.read_line(&mut response).is_err() {
        return false;
    }
    matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn reset(input: &mut impl BufRead) -> bool {
    let path = Config::get_config_file_path();
    if !path.exists() {
        println!("✓ Config is already at defaults");
        return true;
    }

    print!("Delete {} and return to defaults? (y/n): ", path.display());
    io::stdout().flush().ok();
    if !confirmed(input) {
        println!("✗ Reset cancelled");
        return true;
    }
    match Config::reset() {
        Ok(()) => {
            println!("✓ Config reset to defaults");
            true
        }
        Err(e) => {
            eprintln!("✗ Failed to remove config file: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeplan::core::models::{ActualSemester, SelectionEntry};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_check_plan_file_accepts_missing_and_valid() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("new.json");
        assert!(check_plan_file(&missing).is_ok());
        assert!(!missing.exists());

        let valid = dir.path().join("plan.json");
        PlanDocument::builtin().unwrap().write(&valid).unwrap();
        assert!(check_plan_file(&valid).is_ok());
    }

    #[test]
    fn test_check_plan_file_rejects_unusable() {
        let dir = TempDir::new().unwrap();
        assert!(check_plan_file(dir.path()).is_err());

        let garbage = dir.path().join("notes.json");
        fs::write(&garbage, "not json").unwrap();
        let err = check_plan_file(&garbage).unwrap_err();
        assert!(err.contains("not a usable plan document"));

        let slot: ActualSemester = "1秋".parse().unwrap();
        let mut doc = PlanDocument::builtin().unwrap();
        doc.plan.items = vec![SelectionEntry::new("A", slot), SelectionEntry::new("A", slot)];
        let duplicated = dir.path().join("dup.json");
        doc.write(&duplicated).unwrap();
        assert!(check_plan_file(&duplicated).is_err());
    }

    #[test]
    fn test_plan_key_aliases() {
        assert!(is_plan_key("plan_file"));
        assert!(is_plan_key("plan-file"));
        assert!(!is_plan_key("reports_dir"));
        assert!(unknown_key("colour").contains("plan_file"));
    }

    #[test]
    fn test_confirmation_answers() {
        assert!(confirmed(&mut Cursor::new("y\n")));
        assert!(confirmed(&mut Cursor::new(" YES \n")));
        assert!(!confirmed(&mut Cursor::new("n\n")));
        assert!(!confirmed(&mut Cursor::new("")));
    }
}
