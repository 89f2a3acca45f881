//! Domain logic - pure version rules independent of git access

pub mod branch;
pub mod commit;
pub mod pattern;
pub mod signal;
pub mod version;

pub use branch::{BranchContext, BranchKind};
pub use commit::Commit;
pub use pattern::{Captured, VersionPattern};
pub use signal::{Field, Marker, MarkerKind, Signal, Source};
pub use version::{Version, VersionBump};
