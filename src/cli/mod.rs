//! Command workflows behind the `grelly` binary

pub mod orchestration;

pub use orchestration::{
    plan_release, run_release, run_resolve, ReleaseOptions, ReleaseOutcome, ReleasePlan,
};
