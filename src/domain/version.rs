use std::fmt;

/// Semantic version representation
///
/// Every value produced by resolution carries all three fields; PATCH is a
/// commit count, never copied from a branch name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// The `(major, minor)` pair used when comparing against release markers
    pub fn major_minor(&self) -> (u64, u64) {
        (self.major, self.minor)
    }

    /// Next release version; PATCH always restarts at 0
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version::new(self.major + 1, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor + 1, 0),
        }
    }

    /// Convert to a `semver::Version`, attaching an optional pre-release
    pub fn to_semver(&self, pre: Option<&semver::Prerelease>) -> semver::Version {
        let mut version = semver::Version::new(self.major, self.minor, self.patch);
        if let Some(pre) = pre {
            version.pre = pre.clone();
        }
        version
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which component a release increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionBump {
    Major,
    #[default]
    Minor,
}
