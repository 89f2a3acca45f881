//! Version resolution
//!
//! Merges the branch, tag and release-commit signals into MAJOR.MINOR and
//! derives PATCH from the commit distance to a base marker.
//!
//! Precedence per field: branch name, then nearest version tag, then
//! nearest release commit, then 0.

pub mod distance;
pub mod extract;
pub mod snapshot;

pub use snapshot::Snapshot;

use std::fmt;

use git2::Oid;
use semver::Prerelease;
use tracing::debug;

use crate::config::{BasePolicy, Config};
use crate::domain::{BranchContext, Field, Marker, Source, Version, VersionPattern};
use crate::error::Result;
use crate::git::RefReader;
use crate::warning::ResolutionWarning;

/// A resolved version plus where each part of it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    pub version: Version,
    /// Branch pre-release suffix, only when enabled
    pub prerelease: Option<Prerelease>,
    pub major_source: Source,
    pub minor_source: Source,
    /// Marker PATCH was counted from; `None` means from the root
    pub base: Option<Marker>,
    pub head: Oid,
    /// Commits reachable from HEAD but not from the base
    pub distance: u64,
    pub warnings: Vec<ResolutionWarning>,
}

impl ResolvedVersion {
    pub fn base_commit(&self) -> Option<Oid> {
        self.base.as_ref().map(|m| m.commit)
    }

    pub fn to_semver(&self) -> semver::Version {
        self.version.to_semver(self.prerelease.as_ref())
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_semver())
    }
}

/// Turns a repository snapshot into a [ResolvedVersion]
#[derive(Debug, Clone)]
pub struct VersionResolver {
    branch_pattern: VersionPattern,
    tag_pattern: VersionPattern,
    release_pattern: VersionPattern,
    base_policy: BasePolicy,
    branch_suffix: bool,
    add_marker_patch: bool,
}

impl VersionResolver {
    /// Create a resolver with the default policy
    pub fn new(
        branch_pattern: VersionPattern,
        tag_pattern: VersionPattern,
        release_pattern: VersionPattern,
    ) -> Self {
        VersionResolver {
            branch_pattern,
            tag_pattern,
            release_pattern,
            base_policy: BasePolicy::default(),
            branch_suffix: false,
            add_marker_patch: false,
        }
    }

    /// Compile the configured patterns
    ///
    /// # Returns
    /// * `Err(GrellyError::Config)` - If any pattern is malformed
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            VersionPattern::new(&config.patterns.branch)?,
            VersionPattern::new(&config.patterns.tag)?,
            VersionPattern::new(&config.patterns.release_commit)?,
        )
        .with_base_policy(config.resolution.base_policy)
        .with_branch_suffix(config.resolution.branch_suffix)
        .with_marker_patch(config.resolution.add_marker_patch))
    }

    pub fn with_base_policy(mut self, policy: BasePolicy) -> Self {
        self.base_policy = policy;
        self
    }

    pub fn with_branch_suffix(mut self, enabled: bool) -> Self {
        self.branch_suffix = enabled;
        self
    }

    pub fn with_marker_patch(mut self, enabled: bool) -> Self {
        self.add_marker_patch = enabled;
        self
    }

    pub fn tag_pattern(&self) -> &VersionPattern {
        &self.tag_pattern
    }

    pub fn release_pattern(&self) -> &VersionPattern {
        &self.release_pattern
    }

    /// Read the repository and resolve the version of HEAD
    pub fn resolve<R: RefReader>(&self, reader: &R) -> Result<ResolvedVersion> {
        let snapshot = Snapshot::capture(reader)?;
        Ok(self.resolve_snapshot(&snapshot))
    }

    /// Resolve against an already captured snapshot; never fails
    pub fn resolve_snapshot(&self, snapshot: &Snapshot) -> ResolvedVersion {
        let branch = extract::branch_signal(snapshot, &self.branch_pattern);
        let tag = extract::nearest_tag(snapshot, &self.tag_pattern);
        let release = extract::nearest_release_commit(snapshot, &self.release_pattern);

        let mut warnings = Vec::new();
        let (major, major_source) = pick_field(
            Field::Major,
            branch.major(),
            tag.as_ref(),
            release.as_ref(),
            &mut warnings,
        );
        let (minor, minor_source) = pick_field(
            Field::Minor,
            branch.minor(),
            tag.as_ref(),
            release.as_ref(),
            &mut warnings,
        );

        if let Some(marker) = supplier(minor_source, tag.as_ref(), release.as_ref()) {
            if marker.major != major {
                warnings.push(ResolutionWarning::MinorFromOtherMajor {
                    major,
                    major_from: major_source,
                    minor,
                    minor_from: minor_source,
                    marker_major: marker.major,
                });
            }
        }

        let base = if major_source == Source::Branch {
            let base = self.branch_base(snapshot, (major, minor));
            if base.is_none() && self.base_policy != BasePolicy::Root {
                warnings.push(ResolutionWarning::NoBaseMarker { major, minor });
            }
            base
        } else {
            supplier(minor_source, tag.as_ref(), release.as_ref())
                .or_else(|| supplier(major_source, tag.as_ref(), release.as_ref()))
                .cloned()
        };

        let distance = distance::distance(snapshot, base.as_ref().map(|m| m.commit));
        let offset = match (&base, self.add_marker_patch) {
            (Some(marker), true) => marker.patch.unwrap_or(0),
            _ => 0,
        };

        let prerelease = if self.branch_suffix {
            BranchContext::classify(snapshot.branch(), &self.branch_pattern).prerelease()
        } else {
            None
        };

        let resolved = ResolvedVersion {
            version: Version::new(major, minor, distance + offset),
            prerelease,
            major_source,
            minor_source,
            base,
            head: snapshot.head().id,
            distance,
            warnings,
        };

        debug!(
            version = %resolved,
            major_from = %resolved.major_source,
            minor_from = %resolved.minor_source,
            base = ?resolved.base.as_ref().map(|m| &m.label),
            "Resolved version"
        );
        resolved
    }

    /// Base marker when the branch name supplied the version
    fn branch_base(&self, snapshot: &Snapshot, resolved: (u64, u64)) -> Option<Marker> {
        if self.base_policy == BasePolicy::Root {
            return None;
        }
        let markers = extract::markers(snapshot, &self.tag_pattern, &self.release_pattern);
        match self.base_policy {
            BasePolicy::NearestAtOrBelow => extract::closest(
                snapshot,
                markers.into_iter().filter(|m| m.major_minor() <= resolved),
            ),
            BasePolicy::Nearest => extract::closest(snapshot, markers),
            BasePolicy::Root => None,
        }
    }
}

fn field_of(marker: &Marker, field: Field) -> Option<u64> {
    match field {
        Field::Major => Some(marker.major),
        Field::Minor => marker.minor,
    }
}

fn supplier<'m>(
    source: Source,
    tag: Option<&'m Marker>,
    release: Option<&'m Marker>,
) -> Option<&'m Marker> {
    match source {
        Source::Tag => tag,
        Source::ReleaseCommit => release,
        Source::Branch | Source::Default => None,
    }
}

/// Apply precedence for one field, recording tag/release disagreement
fn pick_field(
    field: Field,
    branch: Option<u64>,
    tag: Option<&Marker>,
    release: Option<&Marker>,
    warnings: &mut Vec<ResolutionWarning>,
) -> (u64, Source) {
    if let Some(value) = branch {
        return (value, Source::Branch);
    }

    let from_tag = tag.and_then(|m| field_of(m, field));
    let from_release = release.and_then(|m| field_of(m, field));

    match (from_tag, from_release) {
        (Some(t), Some(r)) => {
            if t != r {
                warnings.push(ResolutionWarning::SignalDisagreement {
                    field,
                    chosen: t,
                    chosen_from: Source::Tag,
                    ignored: r,
                    ignored_from: Source::ReleaseCommit,
                });
            }
            (t, Source::Tag)
        }
        (Some(t), None) => (t, Source::Tag),
        (None, Some(r)) => (r, Source::ReleaseCommit),
        (None, None) => (0, Source::Default),
    }
}
