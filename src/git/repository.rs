use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use git2::{ErrorCode, Oid, Repository as Git2Repo};
use tracing::debug;

use crate::domain::Commit;
use crate::error::{GrellyError, Result};
use crate::git::{RefReader, ReleaseWriter};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    tag_index: RefCell<Option<HashMap<Oid, Vec<String>>>>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            GrellyError::repository(format!(
                "Not a git repository ({}): {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            tag_index: RefCell::new(None),
        }
    }

    /// Working directory of the repository, if it is not bare
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Map every tagged commit to its tag names, peeling annotated tags
    fn build_tag_index(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut index: HashMap<Oid, Vec<String>> = HashMap::new();
        let names = self.repo.tag_names(None)?;

        for name in names.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(r) => r,
                Err(e) => {
                    debug!(tag = %name, error = %e, "Skipping unreadable tag");
                    continue;
                }
            };
            match reference.peel_to_commit() {
                Ok(commit) => index.entry(commit.id()).or_default().push(name.to_string()),
                Err(e) => debug!(tag = %name, error = %e, "Tag does not point at a commit"),
            }
        }

        debug!(tagged_commits = index.len(), "Built tag index");
        Ok(index)
    }
}

impl RefReader for Git2Repository {
    fn current_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }
        let head = self.repo.head()?;
        Ok(head.shorthand().map(str::to_string))
    }

    fn current_commit(&self) -> Result<Oid> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch | ErrorCode::NotFound => {
                GrellyError::repository("HEAD does not point at a commit (empty repository?)")
            }
            _ => GrellyError::Git(e),
        })?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id())
    }

    fn find_commit(&self, id: Oid) -> Result<Commit> {
        let commit = self.repo.find_commit(id)?;
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let author = commit.author().name().unwrap_or("unknown").to_string();

        Ok(Commit::new(id, commit.parent_ids().collect(), message, author))
    }

    fn tags_at(&self, id: Oid) -> Result<Vec<String>> {
        let mut cache = self.tag_index.borrow_mut();
        if cache.is_none() {
            *cache = Some(self.build_tag_index()?);
        }
        Ok(cache
            .as_ref()
            .and_then(|index| index.get(&id))
            .cloned()
            .unwrap_or_default())
    }
}

impl ReleaseWriter for Git2Repository {
    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GrellyError::Git(e)),
        }
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<()> {
        let object = self.repo.find_object(target, None)?;

        // force=false: libgit2 takes the ref lock and refuses an existing name
        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| match e.code() {
                ErrorCode::Exists => {
                    GrellyError::release_conflict(format!("Tag '{}' already exists", name))
                }
                _ => GrellyError::Git(e),
            })?;

        self.tag_index.borrow_mut().take();
        Ok(())
    }

    fn create_commit(&self, message: &str) -> Result<Oid> {
        let parent = self.repo.head()?.peel_to_commit()?;
        let tree = parent.tree()?;
        let signature = self.repo.signature().map_err(|e| {
            GrellyError::repository(format!(
                "Cannot create release commit without user.name/user.email: {}",
                e.message()
            ))
        })?;

        let oid = self
            .repo
            .commit(None, &signature, &signature, message, &tree, &[&parent])?;

        debug!(commit = %oid, "Wrote release commit object");
        Ok(oid)
    }

    fn advance_head(&self, commit: Oid) -> Result<()> {
        let head = self.repo.find_reference("HEAD")?;
        match head.symbolic_target() {
            Some(branch) => {
                self.repo
                    .reference(branch, commit, true, "grelly: release commit")?;
            }
            None => self.repo.set_head_detached(commit)?,
        }
        Ok(())
    }
}
