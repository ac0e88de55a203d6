//! Main workflow orchestration logic
//!
//! Ties the resolver and the dist-tag decider together. Output is returned
//! as a report so the binary decides how to print it.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::domain::{determine_dist_tag, BranchContext, DistTag};
use crate::error::{GatherError, Result};
use crate::pipeline::{self, PipelineCommand};
use crate::registry::Registry;
use crate::resolver::{self, ResolveOptions, Resolution};

/// Arguments for the gather workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct GatherArgs {
    /// Root of the pipeline's artifact staging area
    pub artifact_staging_dir: PathBuf,

    /// Checkout containing the built archives
    pub sources_directory: PathBuf,

    /// Branch being built; without it no dist-tag is decided
    pub branch: Option<String>,

    pub dry_run: bool,
}

/// Result of a gather run
#[derive(Debug, Clone, PartialEq)]
pub struct GatherReport {
    pub staging_dir: PathBuf,
    pub resolution: Resolution,
    pub branch: Option<BranchContext>,
    pub dist_tag: Option<DistTag>,
    /// Pipeline commands to emit, in order
    pub commands: Vec<PipelineCommand>,
}

impl GatherReport {
    pub fn packages_to_publish(&self) -> bool {
        self.resolution.packages_to_publish
    }
}

/// Resolve the local archives and decide the release's dist-tag.
///
/// The dist-tag is decided once for the whole batch, from the versions the
/// resolver accumulated, and only when something needs publishing.
pub fn run_gather<R: Registry>(
    args: &GatherArgs,
    config: &Config,
    registry: &R,
) -> Result<GatherReport> {
    let sources = fs::canonicalize(&args.sources_directory).map_err(|e| {
        GatherError::artifact(format!(
            "Sources directory '{}' is not accessible: {}",
            args.sources_directory.display(),
            e
        ))
    })?;

    let staging_dir = args
        .artifact_staging_dir
        .join(&config.paths.staging_subdir);

    let options = ResolveOptions {
        package_dir: sources.join(&config.paths.package_dir),
        staging_dir: staging_dir.clone(),
        scope_marker: config.registry.scope_marker.clone(),
        dry_run: args.dry_run,
    };

    let resolution = resolver::resolve(registry, &options)?;

    let branch = args
        .branch
        .as_deref()
        .map(|name| BranchContext::new(name, &config.branches));

    let (dist_tag, commands) = if resolution.packages_to_publish {
        let dist_tag = determine_dist_tag(&resolution.versions, branch.as_ref())?;
        (dist_tag, pipeline::release_commands(dist_tag))
    } else {
        (None, Vec::new())
    };

    info!(
        staged = resolution.staged().count(),
        dist_tag = dist_tag.map(|t| t.name()).unwrap_or("none"),
        "gather finished"
    );

    Ok(GatherReport {
        staging_dir,
        resolution,
        branch,
        dist_tag,
        commands,
    })
}
