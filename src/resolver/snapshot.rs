use std::collections::HashMap;

use git2::Oid;
use tracing::debug;

use crate::domain::Commit;
use crate::error::{GrellyError, Result};
use crate::git::RefReader;

/// Everything resolution needs from the repository, read once
///
/// Commits reachable from HEAD are stored in an arena in walk order
/// (index 0 is HEAD, then breadth-first by parent hops). Parent links are
/// arena indices, so graph algorithms never touch the repository again.
#[derive(Debug, Clone)]
pub struct Snapshot {
    branch: Option<String>,
    commits: Vec<Commit>,
    tags: Vec<Vec<String>>,
    parents: Vec<Vec<usize>>,
    index: HashMap<Oid, usize>,
}

impl Snapshot {
    /// Read the current branch, HEAD and every commit reachable from it
    pub fn capture<R: RefReader>(reader: &R) -> Result<Self> {
        let head = reader.current_commit()?;
        let branch = reader.current_branch()?;

        let mut commits = Vec::new();
        let mut tags = Vec::new();
        let mut index = HashMap::new();

        for commit in reader.ancestors(head) {
            let commit = commit?;
            tags.push(reader.tags_at(commit.id)?);
            index.insert(commit.id, commits.len());
            commits.push(commit);
        }

        let mut parents = Vec::with_capacity(commits.len());
        for commit in &commits {
            let mut ids = Vec::with_capacity(commit.parents.len());
            for parent in &commit.parents {
                let idx = index.get(parent).copied().ok_or_else(|| {
                    GrellyError::repository(format!(
                        "Parent {} of commit {} is missing",
                        parent, commit.id
                    ))
                })?;
                ids.push(idx);
            }
            parents.push(ids);
        }

        debug!(
            branch = ?branch,
            head = %head,
            commits = commits.len(),
            "Captured repository snapshot"
        );

        Ok(Snapshot {
            branch,
            commits,
            tags,
            parents,
            index,
        })
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// The current commit
    pub fn head(&self) -> &Commit {
        &self.commits[0]
    }

    /// Number of commits reachable from HEAD, HEAD included
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn commit(&self, idx: usize) -> &Commit {
        &self.commits[idx]
    }

    pub fn tags(&self, idx: usize) -> &[String] {
        &self.tags[idx]
    }

    pub fn parents(&self, idx: usize) -> &[usize] {
        &self.parents[idx]
    }

    pub fn index_of(&self, id: Oid) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Commits in walk order, nearest first
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Commit)> {
        self.commits.iter().enumerate()
    }
}
