//! Version signals and release markers

use std::fmt;

use git2::Oid;

use super::pattern::Captured;

/// What one source says about MAJOR and MINOR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Absent,
    Major(u64),
    MajorMinor(u64, u64),
}

impl Signal {
    pub fn major(&self) -> Option<u64> {
        match self {
            Signal::Absent => None,
            Signal::Major(m) | Signal::MajorMinor(m, _) => Some(*m),
        }
    }

    pub fn minor(&self) -> Option<u64> {
        match self {
            Signal::MajorMinor(_, n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Signal::Absent)
    }
}

impl From<Captured> for Signal {
    fn from(captured: Captured) -> Self {
        match captured.minor {
            Some(minor) => Signal::MajorMinor(captured.major, minor),
            None => Signal::Major(captured.major),
        }
    }
}

/// Where a version field came from, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Branch,
    Tag,
    ReleaseCommit,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Branch => write!(f, "branch name"),
            Source::Tag => write!(f, "version tag"),
            Source::ReleaseCommit => write!(f, "release commit"),
            Source::Default => write!(f, "default"),
        }
    }
}

/// A version component that signals compete for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Major,
    Minor,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Major => write!(f, "MAJOR"),
            Field::Minor => write!(f, "MINOR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Tag,
    ReleaseCommit,
}

impl MarkerKind {
    pub fn source(self) -> Source {
        match self {
            MarkerKind::Tag => Source::Tag,
            MarkerKind::ReleaseCommit => Source::ReleaseCommit,
        }
    }
}

/// A version tag or release commit found in history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Tag name, or the commit's summary line
    pub label: String,
    pub commit: Oid,
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

impl Marker {
    pub fn new(kind: MarkerKind, label: impl Into<String>, commit: Oid, captured: Captured) -> Self {
        Marker {
            kind,
            label: label.into(),
            commit,
            major: captured.major,
            minor: captured.minor,
            patch: captured.patch,
        }
    }

    pub fn signal(&self) -> Signal {
        match self.minor {
            Some(minor) => Signal::MajorMinor(self.major, minor),
            None => Signal::Major(self.major),
        }
    }

    /// Ordering key; a missing component counts as 0
    pub fn key(&self) -> (u64, u64, u64) {
        (
            self.major,
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        )
    }

    pub fn major_minor(&self) -> (u64, u64) {
        (self.major, self.minor.unwrap_or(0))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.commit.to_string();
        let short = id.get(..7).unwrap_or(&id);
        write!(f, "{} '{}' at {}", self.kind.source(), self.label, short)
    }
}
