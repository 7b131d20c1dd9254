//! Command-line interface entry point for `gradeplan`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use gradeplan::config::Config;
use gradeplan::info;
use gradeplan::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup; overrides apply to this run only
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let mut config = stored.clone();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; unparsable config falls back to warn
    let effective_level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let ok = match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut stored, &defaults)
        }
        Command::Courses { slot, season, sort } => {
            commands::courses::run(&config, slot, season, sort)
        }
        Command::Add {
            course_id,
            semester,
        } => commands::selection::add(&config, &course_id, semester),
        Command::Remove { course_id } => commands::selection::remove(&config, &course_id),
        Command::Move {
            course_id,
            semester,
        } => commands::selection::move_course(&config, &course_id, semester),
        Command::Gpa { course_id, value } => commands::selection::gpa(&config, &course_id, &value),
        Command::AutoRequired => commands::selection::auto_required(&config),
        Command::Show { semester, sort } => commands::show::run(&config, semester, sort),
        Command::Progress { sort } => commands::progress::run(&config, sort),
        Command::Validate => commands::validate::run(&config),
        Command::Report { output, format } => {
            commands::report::run(&config, output.as_deref(), format)
        }
    };

    if !ok {
        std::process::exit(1);
    }
}
