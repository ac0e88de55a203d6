use std::fmt;

/// Non-fatal conditions found while resolving artifacts.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// Archive name does not match `<name>-<version>.tgz`; the file is skipped
    MalformedArtifactName { file_name: String },
    /// The registry has no version for a dist-tag
    DistTagNotSet { package: String, tag: String },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::MalformedArtifactName { file_name } => {
                write!(
                    f,
                    "Skipping '{}': file name does not match <name>-<version>.tgz",
                    file_name
                )
            }
            ResolveWarning::DistTagNotSet { package, tag } => {
                write!(f, "No version found for dist-tag '{}' of {}", tag, package)
            }
        }
    }
}
