use git2::Oid;

/// A commit as read from the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: Oid,
    /// Parent ids in order; first parent first
    pub parents: Vec<Oid>,
    pub message: String,
    pub author: String,
}

impl Commit {
    /// Create a new commit record
    pub fn new(
        id: Oid,
        parents: Vec<Oid>,
        message: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Commit {
            id,
            parents,
            message: message.into(),
            author: author.into(),
        }
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Abbreviated hash (7 characters)
    pub fn short_id(&self) -> String {
        let mut id = self.id.to_string();
        id.truncate(7);
        id
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
