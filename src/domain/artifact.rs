use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Archive file names look like `<name>-<version>.tgz`, where the version is
/// `X.Y.Z` with an optional pre-release suffix (`-dev.N`).
fn archive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<name>.+?)-(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)\.tgz$")
            .expect("archive pattern is a valid regex")
    })
}

/// A locally built package archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    pub path: PathBuf,
    pub file_name: String,
    /// Registry name, e.g. `@imodeljs/core`
    pub package_name: String,
    pub version: String,
}

impl PackageArtifact {
    /// Parse an archive path.
    ///
    /// Returns `None` when the file name does not match `<name>-<version>.tgz`.
    ///
    /// # Example
    /// ```
    /// # use gather_packages::domain::PackageArtifact;
    /// let artifact = PackageArtifact::from_path("out/imodeljs-core-2.14.3.tgz", "@").unwrap();
    /// assert_eq!(artifact.package_name, "@imodeljs/core");
    /// assert_eq!(artifact.version, "2.14.3");
    /// ```
    pub fn from_path(path: impl AsRef<Path>, scope_marker: &str) -> Option<Self> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        let captures = archive_pattern().captures(file_name)?;

        let stem = &captures["name"];
        let package_name = format!("{}{}", scope_marker, stem.replacen('-', "/", 1));

        Some(PackageArtifact {
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
            package_name,
            version: captures["version"].to_string(),
        })
    }

    /// `<package>@<version>` as understood by the registry
    pub fn spec(&self) -> String {
        format!("{}@{}", self.package_name, self.version)
    }
}
