use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::registry::{Registry, VersionLookup};

/// Registry backed by the `npm view` command
pub struct NpmRegistry {
    program: String,
    working_dir: Option<PathBuf>,
}

impl NpmRegistry {
    /// Create a registry that invokes `program` (normally "npm")
    pub fn new(program: impl Into<String>) -> Self {
        NpmRegistry {
            program: program.into(),
            working_dir: None,
        }
    }

    /// Run queries from `dir` so project-level `.npmrc` settings apply
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Run `<program> view <args...>`, returning stdout on a zero exit code
    fn view(&self, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("view")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        debug!(program = %self.program, ?args, "querying registry");

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                warn!(program = %self.program, error = %e, "failed to run registry query");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                code = output.status.code().unwrap_or(-1),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "registry query failed"
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl Registry for NpmRegistry {
    fn lookup_version(&self, package: &str, version: &str) -> VersionLookup {
        let spec = format!("{}@{}", package, version);
        match self.view(&[&spec, "version"]) {
            Some(stdout) => VersionLookup::from_output(&stdout),
            None => VersionLookup::Missing,
        }
    }

    fn dist_tag_version(&self, package: &str, tag: &str) -> Option<String> {
        let field = format!("dist-tags.{}", tag);
        let stdout = self.view(&[package, &field])?;
        let version = stdout.trim();
        (!version.is_empty()).then(|| version.to_string())
    }
}
