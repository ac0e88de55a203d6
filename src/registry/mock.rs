use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::registry::{Registry, VersionLookup};

/// Mock registry for testing without running registry queries
#[derive(Default)]
pub struct MockRegistry {
    versions: HashSet<(String, String)>,
    known_packages: HashSet<String>,
    dist_tags: HashMap<(String, String), String>,
    queries: Mutex<Vec<String>>,
}

impl MockRegistry {
    /// Create a new empty mock registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a version as published
    pub fn publish(&mut self, package: impl Into<String>, version: impl Into<String>) {
        let package = package.into();
        self.known_packages.insert(package.clone());
        self.versions.insert((package, version.into()));
    }

    /// Register a package without any matching version, so exact lookups
    /// succeed with empty output
    pub fn add_package(&mut self, package: impl Into<String>) {
        self.known_packages.insert(package.into());
    }

    /// Point a dist-tag at a version
    pub fn set_dist_tag(
        &mut self,
        package: impl Into<String>,
        tag: impl Into<String>,
        version: impl Into<String>,
    ) {
        let package = package.into();
        self.known_packages.insert(package.clone());
        self.dist_tags.insert((package, tag.into()), version.into());
    }

    /// Queries received so far, formatted as `version <pkg>@<ver>` or `tag <pkg> <tag>`
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn record(&self, query: String) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query);
        }
    }
}

impl Registry for MockRegistry {
    fn lookup_version(&self, package: &str, version: &str) -> VersionLookup {
        self.record(format!("version {}@{}", package, version));

        if self
            .versions
            .contains(&(package.to_string(), version.to_string()))
        {
            VersionLookup::Published(version.to_string())
        } else if self.known_packages.contains(package) {
            VersionLookup::Unlisted
        } else {
            VersionLookup::Missing
        }
    }

    fn dist_tag_version(&self, package: &str, tag: &str) -> Option<String> {
        self.record(format!("tag {} {}", package, tag));
        self.dist_tags
            .get(&(package.to_string(), tag.to_string()))
            .cloned()
    }
}
