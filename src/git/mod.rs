//! Git access abstraction layer
//!
//! This module provides a trait-based abstraction over the repository so the
//! version resolver can run against a real repository or an in-memory graph.
//!
//! # Overview
//!
//! - [RefReader]: read-only queries (current branch, current commit, commits, tags)
//! - [ReleaseWriter]: creation of release tags and release commits
//!
//! The concrete implementations are:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! # Usage
//!
//! Code should depend on the traits rather than concrete implementations.
//!
//! ```rust
//! # use grelly::git::RefReader;
//! # fn example<R: RefReader>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.current_commit()?;
//! for commit in repo.ancestors(head) {
//!     let commit = commit?;
//!     println!("{} {}", commit.short_id(), commit.summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod walk;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use walk::Ancestors;

use crate::domain::Commit;
use crate::error::Result;
use git2::Oid;

/// Read-only view of a repository
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map failures
/// to read the repository to the repository-access variants of
/// [crate::error::GrellyError].
pub trait RefReader {
    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(Some(name))` - Short branch name, e.g. "release/5.0"
    /// * `Ok(None)` - HEAD is detached
    /// * `Err` - If HEAD cannot be read
    fn current_branch(&self) -> Result<Option<String>>;

    /// The commit HEAD points at
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the current commit
    /// * `Err` - If HEAD is unborn or cannot be resolved
    fn current_commit(&self) -> Result<Oid>;

    /// Look up a single commit
    fn find_commit(&self, id: Oid) -> Result<Commit>;

    /// Names of all tags that point at the commit (annotated tags peeled)
    fn tags_at(&self, id: Oid) -> Result<Vec<String>>;

    /// Lazily walk every commit reachable from `start`, `start` included
    ///
    /// The walk is breadth-first over all parents (first parent explored
    /// first) and visits each commit once. Each call starts a fresh walk.
    fn ancestors(&self, start: Oid) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors::new(self, start)
    }
}

/// Creates the refs that mark a release
pub trait ReleaseWriter {
    /// Check whether a tag with this name already exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create a tag pointing at `target`
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err(GrellyError::ReleaseConflict)` - The tag already exists
    /// * `Err` - Any other failure to write the ref
    fn create_tag(&self, name: &str, target: Oid) -> Result<()>;

    /// Write a commit on top of HEAD with HEAD's tree
    ///
    /// HEAD stays where it is until [ReleaseWriter::advance_head].
    fn create_commit(&self, message: &str) -> Result<Oid>;

    /// Move HEAD (through the checked-out branch, if any) to `commit`
    fn advance_head(&self, commit: Oid) -> Result<()>;
}
