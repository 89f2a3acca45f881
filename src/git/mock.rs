use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use git2::Oid;

use crate::domain::Commit;
use crate::error::{GrellyError, Result};
use crate::git::{RefReader, ReleaseWriter};

/// In-memory repository for testing without actual git operations
///
/// Commit ids are generated from a counter, so building the same graph twice
/// yields the same ids.
pub struct MockRepository {
    commits: RefCell<HashMap<Oid, Commit>>,
    tags: RefCell<Vec<(String, Oid)>>,
    head: Cell<Option<Oid>>,
    branch: Option<String>,
    next_id: Cell<u32>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch "main"
    pub fn new() -> Self {
        MockRepository {
            commits: RefCell::new(HashMap::new()),
            tags: RefCell::new(Vec::new()),
            head: Cell::new(None),
            branch: Some("main".to_string()),
            next_id: Cell::new(1),
        }
    }

    fn allocate_id(&self) -> Oid {
        let n = self.next_id.get();
        self.next_id.set(n + 1);

        let mut bytes = [0x5au8; 20];
        bytes[..4].copy_from_slice(&n.to_be_bytes());
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }

    fn insert_commit(&self, message: &str, parents: &[Oid]) -> Oid {
        let id = self.allocate_id();
        self.commits.borrow_mut().insert(
            id,
            Commit::new(id, parents.to_vec(), message, "Mock Author"),
        );
        self.head.set(Some(id));
        id
    }

    /// Add a commit and move HEAD to it
    pub fn commit(&mut self, message: &str, parents: &[Oid]) -> Oid {
        self.insert_commit(message, parents)
    }

    /// Add `count` commits on top of `parent` (or a new root) and return the last
    pub fn linear(&mut self, parent: Option<Oid>, count: usize) -> Oid {
        let mut tip = parent;
        for i in 0..count {
            let parents: Vec<Oid> = tip.into_iter().collect();
            tip = Some(self.insert_commit(&format!("commit {}", i + 1), &parents));
        }
        tip.or(parent).unwrap_or_else(Oid::zero)
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.get_mut().push((name.into(), oid));
    }

    /// Point HEAD at a commit
    pub fn set_head(&mut self, oid: Oid) {
        self.head.set(Some(oid));
    }

    /// Set the checked-out branch; `None` means detached HEAD
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(str::to_string);
    }

    /// All tags, in creation order
    pub fn tags(&self) -> Vec<(String, Oid)> {
        self.tags.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RefReader for MockRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn current_commit(&self) -> Result<Oid> {
        self.head
            .get()
            .ok_or_else(|| GrellyError::repository("HEAD does not point at a commit"))
    }

    fn find_commit(&self, id: Oid) -> Result<Commit> {
        self.commits
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| GrellyError::repository(format!("Commit not found: {}", id)))
    }

    fn tags_at(&self, id: Oid) -> Result<Vec<String>> {
        Ok(self
            .tags
            .borrow()
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(name, _)| name.clone())
            .collect())
    }
}

impl ReleaseWriter for MockRepository {
    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().iter().any(|(n, _)| n == name))
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(GrellyError::release_conflict(format!(
                "Tag '{}' already exists",
                name
            )));
        }
        self.tags.borrow_mut().push((name.to_string(), target));
        Ok(())
    }

    fn create_commit(&self, message: &str) -> Result<Oid> {
        let head = self.head.get();
        let parent = self.current_commit()?;
        let id = self.insert_commit(message, &[parent]);
        self.head.set(head);
        Ok(id)
    }

    fn advance_head(&self, commit: Oid) -> Result<()> {
        if !self.commits.borrow().contains_key(&commit) {
            return Err(GrellyError::repository(format!("Unknown commit {}", commit)));
        }
        self.head.set(Some(commit));
        Ok(())
    }
}
