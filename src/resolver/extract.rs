//! The three independent version signal extractors
//!
//! Each extractor reports absence as a normal outcome; none of them fail.

use std::collections::HashMap;

use git2::Oid;
use tracing::debug;

use super::distance::distance;
use super::snapshot::Snapshot;
use crate::domain::{BranchContext, Marker, MarkerKind, Signal, VersionPattern};

/// MAJOR/MINOR declared by the current branch name
pub fn branch_signal(snapshot: &Snapshot, pattern: &VersionPattern) -> Signal {
    let signal = BranchContext::classify(snapshot.branch(), pattern).signal();
    debug!(branch = ?snapshot.branch(), ?signal, "Branch signal");
    signal
}

/// Version tags on one commit, highest version first
fn tag_markers_at(snapshot: &Snapshot, idx: usize, pattern: &VersionPattern) -> Vec<Marker> {
    let commit = snapshot.commit(idx);
    let mut markers: Vec<Marker> = snapshot
        .tags(idx)
        .iter()
        .filter_map(|name| match pattern.parse(name) {
            Some(captured) => Some(Marker::new(MarkerKind::Tag, name, commit.id, captured)),
            None => {
                debug!(tag = %name, "Tag does not match the version pattern");
                None
            }
        })
        .collect();

    // name as secondary key keeps the choice stable for v2.3 vs 2.3
    markers.sort_by(|a, b| b.key().cmp(&a.key()).then_with(|| a.label.cmp(&b.label)));
    markers
}

fn release_marker_at(snapshot: &Snapshot, idx: usize, pattern: &VersionPattern) -> Option<Marker> {
    let commit = snapshot.commit(idx);
    let summary = commit.summary();
    pattern
        .parse(summary)
        .map(|captured| Marker::new(MarkerKind::ReleaseCommit, summary, commit.id, captured))
}

/// Marker with the fewest commits since it, as `git describe` picks
///
/// Distance is the ancestor-set difference from HEAD, so an old marker can
/// only move further away on descendant commits. Ties go to the higher
/// version, then to the earlier candidate in walk order.
pub fn closest<I>(snapshot: &Snapshot, candidates: I) -> Option<Marker>
where
    I: IntoIterator<Item = Marker>,
{
    let mut distances: HashMap<Oid, u64> = HashMap::new();
    let mut best: Option<(u64, Marker)> = None;

    for marker in candidates {
        let d = *distances
            .entry(marker.commit)
            .or_insert_with(|| distance(snapshot, Some(marker.commit)));

        let better = match &best {
            None => true,
            Some((best_d, best_m)) => d < *best_d || (d == *best_d && marker.key() > best_m.key()),
        };
        if better {
            best = Some((d, marker));
        }
    }

    best.map(|(_, marker)| marker)
}

/// Every version tag in walk order, higher tags first on one commit
pub fn tag_markers(snapshot: &Snapshot, pattern: &VersionPattern) -> Vec<Marker> {
    (0..snapshot.len())
        .flat_map(|idx| tag_markers_at(snapshot, idx, pattern))
        .collect()
}

/// Every release commit in walk order
pub fn release_markers(snapshot: &Snapshot, pattern: &VersionPattern) -> Vec<Marker> {
    (0..snapshot.len())
        .filter_map(|idx| release_marker_at(snapshot, idx, pattern))
        .collect()
}

/// Nearest version tag among all ancestors
///
/// All parents are followed, so tags reachable only through a merge are
/// found. Several version tags on one commit resolve to the highest.
pub fn nearest_tag(snapshot: &Snapshot, pattern: &VersionPattern) -> Option<Marker> {
    let found = closest(snapshot, tag_markers(snapshot, pattern));
    debug!(marker = ?found.as_ref().map(|m| &m.label), "Nearest version tag");
    found
}

/// Nearest ancestor whose message matches the release pattern
pub fn nearest_release_commit(snapshot: &Snapshot, pattern: &VersionPattern) -> Option<Marker> {
    let found = closest(snapshot, release_markers(snapshot, pattern));
    debug!(marker = ?found.as_ref().map(|m| &m.label), "Nearest release commit");
    found
}

/// Every release marker in walk order
///
/// On one commit, tags come before the release commit and higher tags before
/// lower ones.
pub fn markers(
    snapshot: &Snapshot,
    tag_pattern: &VersionPattern,
    release_pattern: &VersionPattern,
) -> Vec<Marker> {
    let mut out = Vec::new();
    for idx in 0..snapshot.len() {
        out.extend(tag_markers_at(snapshot, idx, tag_pattern));
        out.extend(release_marker_at(snapshot, idx, release_pattern));
    }
    out
}
