//! Pure formatting functions for UI output.
//!
//! Everything here writes to stderr except [display_version], so that the
//! resolved version is the only thing on stdout in resolve mode.

use std::path::Path;

use console::style;

use crate::cli::ReleasePlan;
use crate::resolver::ResolvedVersion;
use crate::warning::ResolutionWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Print a resolution warning.
pub fn display_warning(warning: &ResolutionWarning) {
    eprintln!("{} {}", style("⚠").yellow().bold(), warning);
}

/// Print the resolved version, the only line on stdout.
pub fn display_version(resolved: &ResolvedVersion) {
    println!("{}", resolved);
}

/// Lines explaining where each part of the version came from
pub fn format_provenance(resolved: &ResolvedVersion) -> Vec<String> {
    let base = match &resolved.base {
        Some(marker) => marker.to_string(),
        None => "none (counted from the root)".to_string(),
    };

    vec![
        format!("version: {}", resolved),
        format!("MAJOR {} from {}", resolved.version.major, resolved.major_source),
        format!("MINOR {} from {}", resolved.version.minor, resolved.minor_source),
        format!("base:  {}", base),
        format!(
            "PATCH {} ({} commits since base)",
            resolved.version.patch, resolved.distance
        ),
        format!("head:  {}", short(&resolved.head.to_string())),
    ]
}

/// Print provenance for `--explain`.
pub fn display_provenance(resolved: &ResolvedVersion) {
    eprintln!("\n{}", style("Version provenance").bold());
    for line in format_provenance(resolved) {
        eprintln!("  {}", line);
    }
}

/// Show what a release would do.
pub fn display_release_plan(plan: &ReleasePlan) {
    eprintln!("\n{}", style("Release plan (dry run)").bold());
    eprintln!(
        "  Version: {} -> {}",
        style(&plan.previous).red(),
        style(plan.version).green()
    );
    eprintln!("  Tag:     {}", plan.tag);
    eprintln!("  Commit:  {}", plan.commit_message);
    eprintln!("  Changelog entries: {}", plan.commits.len());
}

/// Tell the user how to repair a changelog that could not be written.
pub fn display_changelog_recovery(tag: &str, path: &Path) {
    eprintln!(
        "\n{}",
        style("The release tag was created but the changelog was not updated.")
            .red()
            .bold()
    );
    eprintln!("  Tag '{}' now exists in the repository.", style(tag).cyan());
    eprintln!(
        "  Add the entry for {} to {} by hand, or delete the tag with:",
        tag,
        path.display()
    );
    eprintln!("    {}", style(format!("git tag -d {}", tag)).cyan());
}

fn short(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
