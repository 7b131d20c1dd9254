//! Report command handler
//!
//! Generates a plan report in Markdown or JSON from the current plan
//! document.

use super::open_session;
use gradeplan::config::Config;
use gradeplan::core::report::{
    JsonReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use gradeplan::core::summary::Summary;
use gradeplan::core::PlanSession;
use gradeplan::{error, info};
use std::path::{Path, PathBuf};

/// Run the report command; `output` defaults to the reports directory
pub fn run(config: &Config, output: Option<&Path>, format: ReportFormat) -> bool {
    let Some(session) = open_session(config) else {
        return false;
    };
    match generate_report(&session, config, output, format) {
        Ok(path) => {
            println!("✓ Report generated: {}", path.display());
            info!("Report exported to: {}", path.display());
            print_summary(&session);
            true
        }
        Err(err) => {
            error!("Report generation failed: {err}");
            eprintln!("{err}");
            false
        }
    }
}

/// Default report location: `<reports_dir>/<plan stem>_report.<ext>`
fn default_output(config: &Config, format: ReportFormat) -> Result<PathBuf, String> {
    let reports_dir = config.reports_path();
    std::fs::create_dir_all(&reports_dir).map_err(|e| {
        format!(
            "✗ Failed to create reports directory {}: {e}",
            reports_dir.display()
        )
    })?;

    let stem = config
        .plan_path()
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("plan")
        .to_string();
    Ok(reports_dir.join(format!("{stem}_report.{}", format.extension())))
}

fn generate_report(
    session: &PlanSession,
    config: &Config,
    output: Option<&Path>,
    format: ReportFormat,
) -> Result<PathBuf, String> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(config, format)?,
    };

    let summary = Summary::from_session(session);
    let progress = session.progress();
    let issues = session.validate();
    let ctx = ReportContext::new(session, &summary, &progress, &issues);

    let result = match format {
        ReportFormat::Markdown => MarkdownReporter::new().generate(&ctx, &output_path),
        ReportFormat::Json => JsonReporter::new().generate(&ctx, &output_path),
    };
    result.map_err(|e| format!("✗ Failed to generate {format} report: {e}"))?;
    Ok(output_path)
}

fn print_summary(session: &PlanSession) {
    let summary = Summary::from_session(session);
    println!("\n=== Summary ===");
    println!("Courses selected: {}", session.selection().len());
    println!("{summary}");
}
