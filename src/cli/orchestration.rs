//! Main workflow orchestration logic
//!
//! Holds the resolve and release workflows so that `main.rs` only parses
//! arguments and prints. Both workflows are generic over the git traits and
//! run against [crate::git::MockRepository] in tests.

use std::path::PathBuf;

use git2::Oid;
use tracing::info;

use crate::changelog::ChangelogWriter;
use crate::domain::{Commit, Version, VersionBump};
use crate::error::{GrellyError, Result};
use crate::git::{RefReader, ReleaseWriter};
use crate::resolver::{distance, ResolvedVersion, Snapshot, VersionResolver};

/// Arguments for the release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    /// Which component to increment
    pub bump: VersionBump,

    /// Create a release commit and tag it instead of tagging HEAD
    pub commit: bool,

    /// Preview mode - compute everything, write nothing
    pub dry_run: bool,

    /// Changelog file to append to
    pub changelog: PathBuf,
}

/// Everything a release decided, whether or not it was written
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    /// Resolution of HEAD before the release
    pub previous: ResolvedVersion,
    /// The released version, PATCH always 0
    pub version: Version,
    pub tag: String,
    pub commit_message: String,
    /// Commits going into the changelog, oldest first
    pub commits: Vec<Commit>,
}

/// Result of a release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub plan: ReleasePlan,
    /// Commit the tag points at; `None` on a dry run
    pub tagged: Option<Oid>,
    /// Release commit, when one was created
    pub release_commit: Option<Oid>,
}

/// Resolve the version of HEAD
pub fn run_resolve<R: RefReader>(resolver: &VersionResolver, reader: &R) -> Result<ResolvedVersion> {
    resolver.resolve(reader)
}

/// Work out what a release would do without touching the repository
///
/// # Returns
/// * `Ok(ReleasePlan)` - The release to perform
/// * `Err(GrellyError::ReleaseConflict)` - HEAD is already released or the tag exists
/// * `Err(GrellyError::Config)` - A pattern cannot render a release name
pub fn plan_release<R>(resolver: &VersionResolver, repo: &R, bump: VersionBump) -> Result<ReleasePlan>
where
    R: RefReader + ReleaseWriter,
{
    let snapshot = Snapshot::capture(repo)?;
    let previous = resolver.resolve_snapshot(&snapshot);

    if previous.distance == 0 {
        return Err(GrellyError::release_conflict(format!(
            "HEAD is already released as {}; no commits since {}",
            previous,
            previous
                .base
                .as_ref()
                .map(|m| m.label.as_str())
                .unwrap_or("the base marker")
        )));
    }

    let version = previous.version.bump(bump);
    let tag = resolver
        .tag_pattern()
        .render(version.major, Some(version.minor), None)?;
    let commit_message =
        resolver
            .release_pattern()
            .render(version.major, Some(version.minor), Some(0))?;

    if repo.tag_exists(&tag)? {
        return Err(GrellyError::release_conflict(format!(
            "Tag '{}' already exists",
            tag
        )));
    }

    let commits = distance::commits_since(&snapshot, previous.base_commit())
        .into_iter()
        .map(|idx| snapshot.commit(idx).clone())
        .collect();

    Ok(ReleasePlan {
        previous,
        version,
        tag,
        commit_message,
        commits,
    })
}

/// Main release workflow
///
/// 1. Resolve HEAD and compute the next MAJOR.MINOR
/// 2. Render tag name and release commit message
/// 3. Optionally create the release commit
/// 4. Create the tag
/// 5. Append the changelog entry
///
/// A failure in steps 1-4 leaves the changelog untouched. A changelog
/// failure after the tag exists is reported as
/// [GrellyError::ChangelogIo]; the tag is not rolled back.
pub fn run_release<R, C>(
    resolver: &VersionResolver,
    repo: &R,
    changelog: &C,
    options: &ReleaseOptions,
) -> Result<ReleaseOutcome>
where
    R: RefReader + ReleaseWriter,
    C: ChangelogWriter,
{
    let plan = plan_release(resolver, repo, options.bump)?;
    info!(
        from = %plan.previous,
        to = %plan.version,
        tag = %plan.tag,
        commits = plan.commits.len(),
        "Planned release"
    );

    if options.dry_run {
        return Ok(ReleaseOutcome {
            plan,
            tagged: None,
            release_commit: None,
        });
    }

    // HEAD only moves once the tag is in place
    let release_commit = if options.commit {
        let id = repo.create_commit(&plan.commit_message)?;
        info!(commit = %id, message = %plan.commit_message, "Wrote release commit");
        Some(id)
    } else {
        None
    };

    let target = release_commit.unwrap_or(plan.previous.head);
    repo.create_tag(&plan.tag, target)?;
    info!(tag = %plan.tag, target = %target, "Created tag");

    if let Some(id) = release_commit {
        repo.advance_head(id)?;
        info!(commit = %id, "Moved HEAD to the release commit");
    }

    changelog
        .append(&plan.version, &plan.commits, &options.changelog)
        .map_err(|source| GrellyError::ChangelogIo {
            path: options.changelog.clone(),
            tag: plan.tag.clone(),
            source,
        })?;
    info!(path = %options.changelog.display(), "Updated changelog");

    Ok(ReleaseOutcome {
        plan,
        tagged: Some(target),
        release_commit,
    })
}
