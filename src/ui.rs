//! Formatting functions for human-readable output.
//!
//! Progress goes to stdout next to the pipeline commands; errors and
//! warnings go to stderr.

use console::style;

use crate::cli::orchestration::GatherReport;
use crate::pipeline::PipelineCommand;
use crate::resolver::{ArtifactOutcome, ArtifactStatus};
use crate::warning::ResolveWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_warning(warning: &ResolveWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Describe what happens to one artifact.
pub fn outcome_message(outcome: &ArtifactOutcome) -> String {
    let name = &outcome.artifact.package_name;
    match outcome.status {
        ArtifactStatus::NotYetPublished => format!(
            "The package does not yet exist. Copying {} to staging area.",
            name
        ),
        ArtifactStatus::NewerThanRegistry => format!(
            "Local version is newer than on the server. Copying package {} to staging area.",
            name
        ),
        ArtifactStatus::AlreadyPublished => "The version already exists. Skipping...".to_string(),
    }
}

pub fn display_outcome(outcome: &ArtifactOutcome) {
    println!(
        "\n{} '{}'...",
        style("Checking package:").bold(),
        outcome.artifact.file_name
    );
    if outcome.status.needs_publish() {
        display_success(&outcome_message(outcome));
    } else {
        display_status(&outcome_message(outcome));
    }
    for warning in &outcome.warnings {
        display_warning(warning);
    }
}

/// Print the per-artifact outcomes, warnings, and final summary of a run.
///
/// Warnings about an artifact follow its outcome; unparsable archive names
/// come first since they have no outcome.
///
/// Pipeline commands are printed verbatim unless `dry_run` is set, in which
/// case they are only described.
pub fn display_report(report: &GatherReport, dry_run: bool) {
    for warning in &report.resolution.warnings {
        display_warning(warning);
    }

    for outcome in &report.resolution.outcomes {
        display_outcome(outcome);
    }

    println!();

    if !report.packages_to_publish() {
        display_success("All packages are up-to-date.");
        return;
    }

    if let Some(branch) = &report.branch {
        let versions = &report.resolution.versions;
        display_status(&format!("Branch name: {}", branch.name));
        display_status(&format!("Current version: {}", versions.current));
        display_status(&format!("Latest version: {}", versions.latest));
        display_status(&format!("Previous version: {}", versions.previous));
    }

    if let Some(tag) = report.dist_tag {
        display_status(&format!("Setting dist tag {}", tag));
    }

    display_success("There are packages to publish.");
    display_commands(&report.commands, dry_run);
}

fn display_commands(commands: &[PipelineCommand], dry_run: bool) {
    for command in commands {
        if dry_run {
            display_status(&format!("Dry run, would emit: {}", command));
        } else {
            println!("{}", command);
        }
    }
}
