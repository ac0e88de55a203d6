//! Package registry abstraction layer
//!
//! The resolver only needs two questions answered by the registry: does an
//! exact version exist, and which version does a dist-tag point at. The
//! [Registry] trait captures those so the real process-backed implementation
//! can be swapped for an in-memory fake.
//!
//! - [npm::NpmRegistry]: queries the registry through the `npm view` command
//! - [mock::MockRegistry]: a mock implementation for testing
//!
//! ```rust
//! # use gather_packages::registry::{MockRegistry, Registry, VersionLookup};
//! let mut registry = MockRegistry::new();
//! registry.publish("@imodeljs/core", "2.14.3");
//! assert_eq!(
//!     registry.lookup_version("@imodeljs/core", "2.14.3"),
//!     VersionLookup::Published("2.14.3".to_string())
//! );
//! ```

pub mod mock;
pub mod npm;

pub use mock::MockRegistry;
pub use npm::NpmRegistry;

/// Outcome of asking the registry for an exact `package@version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    /// The query failed; the package (or version) is not published yet
    Missing,
    /// The query succeeded and echoed the version back
    Published(String),
    /// The query succeeded with no output: the package exists without this version
    Unlisted,
}

impl VersionLookup {
    /// Classify a successful query by its trimmed output
    pub fn from_output(output: &str) -> Self {
        let output = output.trim();
        if output.is_empty() {
            VersionLookup::Unlisted
        } else {
            VersionLookup::Published(output.to_string())
        }
    }
}

/// Registry queries needed to decide what to publish.
///
/// Query failures are not errors: a failed lookup means the package does not
/// exist yet, and a failed dist-tag query means the tag is unset.
pub trait Registry {
    /// Look up an exact version of a package
    fn lookup_version(&self, package: &str, version: &str) -> VersionLookup;

    /// Get the version a dist-tag (e.g. "latest") points at, if any
    fn dist_tag_version(&self, package: &str, tag: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_output() {
        assert_eq!(VersionLookup::from_output(""), VersionLookup::Unlisted);
        assert_eq!(VersionLookup::from_output("  \n"), VersionLookup::Unlisted);
        assert_eq!(
            VersionLookup::from_output("1.2.3\n"),
            VersionLookup::Published("1.2.3".to_string())
        );
    }
}
