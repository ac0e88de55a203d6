//! Domain logic - pure release rules independent of the registry and filesystem

pub mod artifact;
pub mod branch;
pub mod dist_tag;
pub mod version;

pub use artifact::PackageArtifact;
pub use branch::{BranchContext, BranchKind};
pub use dist_tag::{determine_dist_tag, DistTag, ReleaseVersions};
pub use version::SemVer;
