//! User interface module - terminal output.
//!
//! grelly never prompts; all output helpers live in `formatter`.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_changelog_recovery, display_error, display_provenance, display_release_plan,
    display_status, display_success, display_version, display_warning, format_provenance,
};
