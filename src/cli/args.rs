//! CLI argument definitions for `gradeplan`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gradeplan::config::ConfigOverrides;
use gradeplan::core::models::{ActualSemester, Season};
use gradeplan::core::report::ReportFormat;
use gradeplan::core::sorting::{SortColumn, SortDirection};
use gradeplan::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// Table sort options shared by the listing commands
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct SortArgs {
    /// Column to sort by (id, name, type, credits, plan_sem, semester, hours,
    /// category, gpa, required, selected, completed, remaining)
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<SortColumn>,

    /// Sort descending; missing values stay last
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl SortArgs {
    /// Direction selected by `--desc`
    pub const fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `plan_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Browse the catalog.
    ///
    /// With --slot or --season, lists only the courses that may be taken
    /// then (matched by season; the planned grade is advisory).
    Courses {
        /// Actual semester slot, e.g. 1秋
        #[arg(long, value_name = "SEMESTER", conflicts_with = "season")]
        slot: Option<ActualSemester>,

        /// Season only: 秋/春/夏 (or F/S/U)
        #[arg(long, value_name = "SEASON")]
        season: Option<Season>,

        #[command(flatten)]
        sort: SortArgs,
    },
    /// Select a course in a semester slot.
    Add {
        /// Catalog course id
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
        /// Actual semester, e.g. 2春
        #[arg(value_name = "SEMESTER")]
        semester: ActualSemester,
    },
    /// Remove a course from the selection.
    Remove {
        /// Catalog course id
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
    },
    /// Move a selected course to another semester slot.
    Move {
        /// Catalog course id
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
        /// New actual semester, e.g. 3秋
        #[arg(value_name = "SEMESTER")]
        semester: ActualSemester,
    },
    /// Record a grade point (0 to 4.0), or `clear` it.
    Gpa {
        /// Catalog course id
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
        /// Grade point, or `clear`
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },
    /// Select every required course not yet selected.
    ///
    /// Courses planned for an exact slot go there; season-only courses go
    /// to grade 4 of their season.
    AutoRequired,
    /// Show the selection with GPA summary.
    Show {
        /// Only this semester slot
        #[arg(long, value_name = "SEMESTER")]
        semester: Option<ActualSemester>,

        #[command(flatten)]
        sort: SortArgs,
    },
    /// Show credit progress by category.
    Progress {
        #[command(flatten)]
        sort: SortArgs,
    },
    /// Check the plan rules (required courses, elective credits, credit limits).
    Validate,
    /// Generate a plan report.
    Report {
        /// Output file path (optional; defaults to the reports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or json
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: ReportFormat,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradeplan",
    about = "Track courses against a degree plan: GPA aggregates and credit progress",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Plan document to use instead of the configured one
    #[arg(long = "file", value_name = "PLAN")]
    pub file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            plan_file: self.file.as_ref().map(path_string),
            reports_dir: self.reports_dir.as_ref().map(path_string),
        }
    }
}
