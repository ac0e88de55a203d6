//! Decides which local package archives need publishing and stages them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{PackageArtifact, ReleaseVersions};
use crate::error::{GatherError, Result};
use crate::registry::{Registry, VersionLookup};
use crate::warning::ResolveWarning;

const ARCHIVE_EXTENSION: &str = "tgz";
const LATEST_TAG: &str = "latest";
const PREVIOUS_TAG: &str = "previous";

/// Where to read archives from and where to stage them
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub package_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub scope_marker: String,
    /// Decide without creating the staging directory or copying
    pub dry_run: bool,
}

/// What the registry said about one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// The registry does not know the package yet
    NotYetPublished,
    /// The package exists but not at this version
    NewerThanRegistry,
    AlreadyPublished,
}

impl ArtifactStatus {
    pub fn needs_publish(&self) -> bool {
        !matches!(self, ArtifactStatus::AlreadyPublished)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub artifact: PackageArtifact,
    pub status: ArtifactStatus,
    /// Conditions found while checking this artifact, e.g. unset dist-tags
    pub warnings: Vec<ResolveWarning>,
}

/// Accumulated result of a resolver pass.
///
/// `versions.current` follows the last processed artifact, while `latest`
/// and `previous` are only refreshed for artifacts newer than the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub outcomes: Vec<ArtifactOutcome>,
    /// Archives that could not be parsed and have no outcome
    pub warnings: Vec<ResolveWarning>,
    pub packages_to_publish: bool,
    pub versions: ReleaseVersions,
}

impl Resolution {
    /// Artifacts that were (or in a dry run would be) copied to staging
    pub fn staged(&self) -> impl Iterator<Item = &PackageArtifact> {
        self.outcomes
            .iter()
            .filter(|o| o.status.needs_publish())
            .map(|o| &o.artifact)
    }

    fn record(
        mut self,
        artifact: PackageArtifact,
        status: ArtifactStatus,
        warnings: Vec<ResolveWarning>,
    ) -> Self {
        self.versions.current = artifact.version.clone();
        self.packages_to_publish |= status.needs_publish();
        self.outcomes.push(ArtifactOutcome {
            artifact,
            status,
            warnings,
        });
        self
    }
}

/// Check every archive in `options.package_dir` against the registry.
///
/// Archives are visited in file-name order. Registry failures count as
/// "not published"; filesystem failures are returned as errors.
pub fn resolve<R: Registry>(registry: &R, options: &ResolveOptions) -> Result<Resolution> {
    let archives = list_archives(&options.package_dir)?;

    if !options.dry_run {
        fs::create_dir_all(&options.staging_dir)
            .map_err(|e| GatherError::stage(&options.staging_dir, e))?;
    }

    archives
        .iter()
        .try_fold(Resolution::default(), |resolution, path| {
            resolve_one(registry, options, resolution, path)
        })
}

fn resolve_one<R: Registry>(
    registry: &R,
    options: &ResolveOptions,
    mut resolution: Resolution,
    path: &Path,
) -> Result<Resolution> {
    let Some(artifact) = PackageArtifact::from_path(path, &options.scope_marker) else {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        resolution
            .warnings
            .push(ResolveWarning::MalformedArtifactName { file_name });
        return Ok(resolution);
    };

    info!(artifact = %artifact.spec(), "checking package");

    match registry.lookup_version(&artifact.package_name, &artifact.version) {
        VersionLookup::Missing => {
            stage(&artifact, options)?;
            Ok(resolution.record(artifact, ArtifactStatus::NotYetPublished, Vec::new()))
        }
        VersionLookup::Published(server_version) => {
            debug!(%server_version, "version already published");
            Ok(resolution.record(artifact, ArtifactStatus::AlreadyPublished, Vec::new()))
        }
        VersionLookup::Unlisted => {
            stage(&artifact, options)?;

            let mut warnings = Vec::new();
            resolution.versions.latest =
                dist_tag_or_warn(registry, &artifact, LATEST_TAG, &mut warnings);
            resolution.versions.previous =
                dist_tag_or_warn(registry, &artifact, PREVIOUS_TAG, &mut warnings);

            Ok(resolution.record(artifact, ArtifactStatus::NewerThanRegistry, warnings))
        }
    }
}

fn dist_tag_or_warn<R: Registry>(
    registry: &R,
    artifact: &PackageArtifact,
    tag: &str,
    warnings: &mut Vec<ResolveWarning>,
) -> String {
    registry
        .dist_tag_version(&artifact.package_name, tag)
        .unwrap_or_else(|| {
            warnings.push(ResolveWarning::DistTagNotSet {
                package: artifact.package_name.clone(),
                tag: tag.to_string(),
            });
            String::new()
        })
}

fn stage(artifact: &PackageArtifact, options: &ResolveOptions) -> Result<()> {
    if options.dry_run {
        return Ok(());
    }

    let target = options.staging_dir.join(&artifact.file_name);
    fs::copy(&artifact.path, &target).map_err(|e| GatherError::stage(&target, e))?;
    debug!(target = %target.display(), "staged package");
    Ok(())
}

/// List `*.tgz` files in `dir`, sorted by file name.
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        GatherError::artifact(format!(
            "Cannot read package directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut archives = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_archive = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == ARCHIVE_EXTENSION);
        if is_archive {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MockRegistry;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> (TempDir, ResolveOptions) {
        let tmp = TempDir::new().unwrap();
        let package_dir = tmp.path().join("packages");
        fs::create_dir_all(&package_dir).unwrap();
        for file in files {
            fs::write(package_dir.join(file), file.as_bytes()).unwrap();
        }
        let options = ResolveOptions {
            package_dir,
            staging_dir: tmp.path().join("staging"),
            scope_marker: "@".to_string(),
            dry_run: false,
        };
        (tmp, options)
    }

    #[test]
    fn test_list_archives_filters_and_sorts() {
        let (_tmp, options) = setup(&["b-pkg-1.0.0.tgz", "a-pkg-1.0.0.tgz", "notes.txt"]);
        fs::create_dir(options.package_dir.join("nested.tgz")).unwrap();

        let names: Vec<String> = list_archives(&options.package_dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a-pkg-1.0.0.tgz", "b-pkg-1.0.0.tgz"]);
    }

    #[test]
    fn test_missing_package_dir_is_error() {
        let (_tmp, mut options) = setup(&[]);
        options.package_dir = options.package_dir.join("absent");
        let err = resolve(&MockRegistry::new(), &options).unwrap_err();
        assert!(err.to_string().contains("Cannot read package directory"));
    }

    #[test]
    fn test_missing_package_is_staged_without_tag_queries() {
        let (_tmp, options) = setup(&["imodeljs-core-1.0.0.tgz"]);
        let registry = MockRegistry::new();

        let resolution = resolve(&registry, &options).unwrap();

        assert!(resolution.packages_to_publish);
        assert!(options.staging_dir.join("imodeljs-core-1.0.0.tgz").is_file());
        assert_eq!(registry.queries(), vec!["version @imodeljs/core@1.0.0"]);
        assert_eq!(resolution.versions, ReleaseVersions::new("1.0.0", "", ""));
    }

    #[test]
    fn test_unlisted_version_queries_dist_tags() {
        let (_tmp, options) = setup(&["imodeljs-core-2.1.0.tgz"]);
        let mut registry = MockRegistry::new();
        registry.publish("@imodeljs/core", "2.0.5");
        registry.set_dist_tag("@imodeljs/core", "latest", "2.0.5");
        registry.set_dist_tag("@imodeljs/core", "previous", "1.9.0");

        let resolution = resolve(&registry, &options).unwrap();

        assert_eq!(resolution.outcomes[0].status, ArtifactStatus::NewerThanRegistry);
        assert_eq!(resolution.versions, ReleaseVersions::new("2.1.0", "2.0.5", "1.9.0"));
        assert!(resolution.outcomes[0].warnings.is_empty());
        assert_eq!(
            registry.queries(),
            vec![
                "version @imodeljs/core@2.1.0",
                "tag @imodeljs/core latest",
                "tag @imodeljs/core previous"
            ]
        );
    }

    #[test]
    fn test_unset_dist_tag_warns_and_stays_empty() {
        let (_tmp, options) = setup(&["imodeljs-core-2.1.0.tgz"]);
        let mut registry = MockRegistry::new();
        registry.set_dist_tag("@imodeljs/core", "latest", "2.0.0");

        let resolution = resolve(&registry, &options).unwrap();

        assert_eq!(resolution.versions.previous, "");
        assert!(resolution.warnings.is_empty());
        assert_eq!(
            resolution.outcomes[0].warnings,
            vec![ResolveWarning::DistTagNotSet {
                package: "@imodeljs/core".to_string(),
                tag: "previous".to_string(),
            }]
        );
    }

    #[test]
    fn test_dist_tag_warnings_stay_with_their_artifact() {
        let (_tmp, options) = setup(&["a-one-1.0.0.tgz", "b-two-2.0.0.tgz"]);
        let mut registry = MockRegistry::new();
        registry.set_dist_tag("@a/one", "latest", "0.9.0");
        registry.set_dist_tag("@a/one", "previous", "0.8.0");
        registry.add_package("@b/two");

        let resolution = resolve(&registry, &options).unwrap();

        assert!(resolution.outcomes[0].warnings.is_empty());
        let tags: Vec<String> = resolution.outcomes[1]
            .warnings
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(
            tags,
            vec![
                "No version found for dist-tag 'latest' of @b/two",
                "No version found for dist-tag 'previous' of @b/two"
            ]
        );
    }

    #[test]
    fn test_published_version_is_skipped() {
        let (_tmp, options) = setup(&["imodeljs-core-1.0.0.tgz"]);
        let mut registry = MockRegistry::new();
        registry.publish("@imodeljs/core", "1.0.0");

        let resolution = resolve(&registry, &options).unwrap();

        assert!(!resolution.packages_to_publish);
        assert_eq!(resolution.staged().count(), 0);
        assert!(options.staging_dir.is_dir());
        assert_eq!(fs::read_dir(&options.staging_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_current_version_tracks_last_artifact() {
        let (_tmp, options) = setup(&["a-one-1.0.0.tgz", "b-two-2.0.0.tgz"]);
        let mut registry = MockRegistry::new();
        registry.add_package("@a/one");
        registry.set_dist_tag("@a/one", "latest", "0.9.0");
        registry.set_dist_tag("@a/one", "previous", "0.8.0");
        registry.publish("@b/two", "2.0.0");

        let resolution = resolve(&registry, &options).unwrap();

        assert!(resolution.packages_to_publish);
        assert_eq!(resolution.versions, ReleaseVersions::new("2.0.0", "0.9.0", "0.8.0"));
        let staged: Vec<&str> = resolution.staged().map(|a| a.file_name.as_str()).collect();
        assert_eq!(staged, vec!["a-one-1.0.0.tgz"]);
    }

    #[test]
    fn test_malformed_name_is_skipped_with_warning() {
        let (_tmp, options) = setup(&["bundle.tgz"]);
        let registry = MockRegistry::new();

        let resolution = resolve(&registry, &options).unwrap();

        assert!(resolution.outcomes.is_empty());
        assert!(registry.queries().is_empty());
        assert_eq!(
            resolution.warnings,
            vec![ResolveWarning::MalformedArtifactName {
                file_name: "bundle.tgz".to_string()
            }]
        );
    }

    #[test]
    fn test_dry_run_does_not_touch_staging() {
        let (_tmp, mut options) = setup(&["imodeljs-core-1.0.0.tgz"]);
        options.dry_run = true;

        let resolution = resolve(&MockRegistry::new(), &options).unwrap();

        assert!(resolution.packages_to_publish);
        assert_eq!(resolution.staged().count(), 1);
        assert!(!options.staging_dir.exists());
    }

    #[test]
    fn test_copy_failure_is_fatal() {
        let (_tmp, options) = setup(&["a-one-1.0.0.tgz"]);
        // A directory in the way of the staged archive makes the copy fail
        fs::create_dir_all(options.staging_dir.join("a-one-1.0.0.tgz")).unwrap();

        let err = resolve(&MockRegistry::new(), &options).unwrap_err();

        match err {
            GatherError::Stage { path, .. } => {
                assert_eq!(path, options.staging_dir.join("a-one-1.0.0.tgz"));
            }
            other => panic!("expected a staging error, got {:?}", other),
        }
    }

    #[test]
    fn test_staging_dir_creation_failure_is_fatal() {
        let (_tmp, options) = setup(&["a-one-1.0.0.tgz"]);
        fs::write(&options.staging_dir, b"not a directory").unwrap();
        let registry = MockRegistry::new();

        let err = resolve(&registry, &options).unwrap_err();

        assert!(matches!(
            err,
            GatherError::Stage { ref path, .. } if *path == options.staging_dir
        ));
        assert!(registry.queries().is_empty());
    }

    #[test]
    fn test_staging_dir_may_already_exist() {
        let (_tmp, options) = setup(&["imodeljs-core-1.0.0.tgz"]);
        fs::create_dir_all(&options.staging_dir).unwrap();
        assert!(resolve(&MockRegistry::new(), &options).is_ok());
    }
}
