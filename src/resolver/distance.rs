//! Commit distance between HEAD and a base commit
//!
//! Distance is the size of the ancestor-set difference: commits reachable
//! from HEAD that are not reachable from the base. Merged-in commits count
//! once, like `git rev-list base..HEAD --count`.

use git2::Oid;

use super::snapshot::Snapshot;

/// Mark every commit reachable from `start`, `start` included
fn reachable_from(snapshot: &Snapshot, start: usize) -> Vec<bool> {
    let mut seen = vec![false; snapshot.len()];
    let mut worklist = vec![start];
    seen[start] = true;

    while let Some(idx) = worklist.pop() {
        for &parent in snapshot.parents(idx) {
            if !seen[parent] {
                seen[parent] = true;
                worklist.push(parent);
            }
        }
    }
    seen
}

fn excluded_by(snapshot: &Snapshot, base: Option<Oid>) -> Vec<bool> {
    match base.and_then(|id| snapshot.index_of(id)) {
        Some(idx) => reachable_from(snapshot, idx),
        None => vec![false; snapshot.len()],
    }
}

/// Number of commits reachable from HEAD but not from `base`.
///
/// With no base this is the total number of commits reachable from HEAD,
/// HEAD included.
pub fn distance(snapshot: &Snapshot, base: Option<Oid>) -> u64 {
    let excluded = excluded_by(snapshot, base);
    excluded.iter().filter(|e| !**e).count() as u64
}

/// The same commits [distance] counts, as arena indices, oldest first.
///
/// Parents always precede their children.
pub fn commits_since(snapshot: &Snapshot, base: Option<Oid>) -> Vec<usize> {
    let mut skip = excluded_by(snapshot, base);
    let mut order = Vec::new();
    if snapshot.is_empty() || skip[0] {
        return order;
    }

    // iterative post-order DFS from HEAD: (node, next parent position)
    let mut stack = vec![(0usize, 0usize)];
    skip[0] = true;

    while let Some(top) = stack.len().checked_sub(1) {
        let (node, next) = stack[top];
        match snapshot.parents(node).get(next) {
            Some(&parent) => {
                stack[top].1 += 1;
                if !skip[parent] {
                    skip[parent] = true;
                    stack.push((parent, 0));
                }
            }
            None => {
                order.push(node);
                stack.pop();
            }
        }
    }
    order
}
