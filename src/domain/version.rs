use crate::error::{GatherError, Result};
use std::fmt;
use std::str::FromStr;

/// Release version as published to the registry.
///
/// Either `MAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH-dev.N`. A version without
/// a dev number is a stable release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub dev_version: Option<u64>,
}

impl SemVer {
    /// Create a stable version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemVer {
            major,
            minor,
            patch,
            dev_version: None,
        }
    }

    /// Create a dev (release candidate) version
    pub fn dev(major: u64, minor: u64, patch: u64, dev: u64) -> Self {
        SemVer {
            dev_version: Some(dev),
            ..SemVer::new(major, minor, patch)
        }
    }

    /// Parse a registry version string (e.g., "2.14.3" or "3.0.0-dev.12")
    pub fn parse(version: &str) -> Result<Self> {
        let parsed = semver::Version::parse(version.trim()).map_err(|e| {
            GatherError::version(format!("Invalid version '{}': {}", version, e))
        })?;

        let dev_version = if parsed.pre.is_empty() {
            None
        } else {
            // Only the numeric segment after the label matters ("dev.3" -> 3)
            let number = parsed
                .pre
                .as_str()
                .split('.')
                .nth(1)
                .and_then(|n| n.parse::<u64>().ok())
                .ok_or_else(|| {
                    GatherError::version(format!(
                        "Invalid dev version in '{}': expected X.Y.Z-dev.N",
                        version
                    ))
                })?;
            Some(number)
        };

        Ok(SemVer {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            dev_version,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.dev_version.is_some()
    }
}

impl FromStr for SemVer {
    type Err = GatherError;

    fn from_str(s: &str) -> Result<Self> {
        SemVer::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(dev) = self.dev_version {
            write!(f, "-dev.{}", dev)?;
        }
        Ok(())
    }
}
