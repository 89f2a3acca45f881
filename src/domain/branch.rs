use semver::Prerelease;

use super::pattern::{Captured, VersionPattern};
use super::signal::Signal;

/// How the current branch name is interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// main, master or release
    Mainline,
    /// Matches the configured branch pattern, e.g. release/17.0
    Release(Captured),
    /// feature/<name>
    Feature(String),
    /// fix/<name>
    Fix(String),
    Other(String),
    /// HEAD is not on a branch
    Detached,
}

/// Represents the checked-out branch with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: Option<String>,
    pub kind: BranchKind,
}

impl BranchContext {
    /// Classify a branch name against the release branch pattern
    pub fn classify(name: Option<&str>, pattern: &VersionPattern) -> Self {
        let kind = match name {
            None => BranchKind::Detached,
            Some(name) => {
                if let Some(captured) = pattern.parse(name) {
                    BranchKind::Release(captured)
                } else {
                    let lower = name.to_lowercase();
                    if matches!(lower.as_str(), "main" | "master" | "release") {
                        BranchKind::Mainline
                    } else if let Some(rest) = lower.strip_prefix("feature/") {
                        BranchKind::Feature(rest.to_string())
                    } else if let Some(rest) = lower.strip_prefix("fix/") {
                        BranchKind::Fix(rest.to_string())
                    } else {
                        BranchKind::Other(lower)
                    }
                }
            }
        };

        BranchContext {
            name: name.map(str::to_string),
            kind,
        }
    }

    /// Check if this is a release-shaped branch
    pub fn is_release_branch(&self) -> bool {
        matches!(self.kind, BranchKind::Release(_))
    }

    /// MAJOR/MINOR declared by the branch name; PATCH is never taken from it
    pub fn signal(&self) -> Signal {
        match &self.kind {
            BranchKind::Release(captured) => Signal::from(*captured),
            _ => Signal::Absent,
        }
    }

    /// Pre-release identifier for work branches (`feature/login` -> `login`)
    pub fn prerelease(&self) -> Option<Prerelease> {
        let ident = match &self.kind {
            BranchKind::Feature(name) | BranchKind::Fix(name) => sanitize(name),
            BranchKind::Other(_) => "other".to_string(),
            BranchKind::Mainline | BranchKind::Release(_) | BranchKind::Detached => {
                return None
            }
        };
        if ident.is_empty() {
            return None;
        }
        Prerelease::new(&ident).ok()
    }
}

fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    replaced.trim_matches('-').to_string()
}
