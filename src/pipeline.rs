//! Pipeline logging commands.
//!
//! The surrounding pipeline reads specially prefixed stdout lines to attach
//! build tags and output variables to the run.

use std::fmt;

use crate::domain::DistTag;

/// Build tag added whenever any package is staged
pub const PACKAGE_RELEASE_TAG: &str = "package-release";

/// Output variable telling later jobs that this run publishes
pub const RELEASE_VARIABLE: &str = "isRelease";

/// A single pipeline logging command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineCommand {
    AddBuildTag(String),
    SetOutputVariable { name: String, value: String },
}

impl PipelineCommand {
    /// `dist-tag <tag>` build tag
    pub fn dist_tag(tag: DistTag) -> Self {
        PipelineCommand::AddBuildTag(format!("dist-tag {}", tag))
    }

    pub fn package_release() -> Self {
        PipelineCommand::AddBuildTag(PACKAGE_RELEASE_TAG.to_string())
    }

    /// `isRelease=true` output variable
    pub fn mark_release() -> Self {
        PipelineCommand::SetOutputVariable {
            name: RELEASE_VARIABLE.to_string(),
            value: "true".to_string(),
        }
    }
}

impl fmt::Display for PipelineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineCommand::AddBuildTag(tag) => write!(f, "##vso[build.addbuildtag]{}", tag),
            PipelineCommand::SetOutputVariable { name, value } => write!(
                f,
                "##vso[task.setvariable variable={};isSecret=false;isOutput=true;]{}",
                name, value
            ),
        }
    }
}

/// Commands for a run that stages packages, in emission order.
///
/// A decided dist-tag comes first with its own release marker, followed by
/// the package-release tag and the release marker again.
pub fn release_commands(dist_tag: Option<DistTag>) -> Vec<PipelineCommand> {
    let mut commands = Vec::new();
    if let Some(tag) = dist_tag {
        commands.push(PipelineCommand::dist_tag(tag));
        commands.push(PipelineCommand::mark_release());
    }
    commands.push(PipelineCommand::package_release());
    commands.push(PipelineCommand::mark_release());
    commands
}
