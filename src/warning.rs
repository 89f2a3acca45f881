use std::fmt;

use crate::domain::{Field, Source};

/// Non-fatal findings from version resolution.
/// The version is still produced; these are shown so the user can audit it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionWarning {
    /// Tag and release commit disagree on a field the branch did not supply
    SignalDisagreement {
        field: Field,
        chosen: u64,
        chosen_from: Source,
        ignored: u64,
        ignored_from: Source,
    },
    /// MINOR came from a marker that belongs to a different MAJOR
    MinorFromOtherMajor {
        major: u64,
        major_from: Source,
        minor: u64,
        minor_from: Source,
        marker_major: u64,
    },
    /// No release marker qualifies as base; PATCH counts from the root
    NoBaseMarker { major: u64, minor: u64 },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::SignalDisagreement {
                field,
                chosen,
                chosen_from,
                ignored,
                ignored_from,
            } => write!(
                f,
                "Ambiguous {}: {} says {} but {} says {}; using {}",
                field, chosen_from, chosen, ignored_from, ignored, chosen
            ),
            ResolutionWarning::MinorFromOtherMajor {
                major,
                major_from,
                minor,
                minor_from,
                marker_major,
            } => write!(
                f,
                "Ambiguous MINOR: major {} comes from the {}, but minor {} was taken from a {} for major {}",
                major, major_from, minor, minor_from, marker_major
            ),
            ResolutionWarning::NoBaseMarker { major, minor } => write!(
                f,
                "No release marker at or below {}.{} in history; PATCH counts every commit",
                major, minor
            ),
        }
    }
}
