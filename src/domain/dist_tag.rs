use std::cmp::Ordering;
use std::fmt;

use crate::domain::branch::{BranchContext, BranchKind};
use crate::domain::version::SemVer;
use crate::error::Result;

/// Distribution tag applied to a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistTag {
    Nightly,
    /// Release candidate for a future `latest`
    Rc,
    Latest,
    /// Newest release of an older major line
    Previous,
}

impl DistTag {
    pub fn name(&self) -> &'static str {
        match self {
            DistTag::Nightly => "nightly",
            DistTag::Rc => "rc",
            DistTag::Latest => "latest",
            DistTag::Previous => "previous",
        }
    }
}

impl fmt::Display for DistTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Versions feeding the dist-tag decision.
///
/// `latest` and `previous` are the registry's dist-tagged versions; an empty
/// string means the tag is not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseVersions {
    pub current: String,
    pub latest: String,
    pub previous: String,
}

impl ReleaseVersions {
    pub fn new(
        current: impl Into<String>,
        latest: impl Into<String>,
        previous: impl Into<String>,
    ) -> Self {
        ReleaseVersions {
            current: current.into(),
            latest: latest.into(),
            previous: previous.into(),
        }
    }
}

/// Decide which dist-tag, if any, the release receives.
///
/// Only the main branch (`nightly`) and release branches can produce a tag.
/// Without a branch there is never a tag.
///
/// # Errors
/// Returns a version error when a version needed for the decision cannot be parsed.
pub fn determine_dist_tag(
    versions: &ReleaseVersions,
    branch: Option<&BranchContext>,
) -> Result<Option<DistTag>> {
    let Some(branch) = branch else {
        return Ok(None);
    };

    match branch.kind {
        BranchKind::Main => Ok(Some(DistTag::Nightly)),
        BranchKind::Release => release_branch_tag(versions),
        BranchKind::Other => Ok(None),
    }
}

fn release_branch_tag(versions: &ReleaseVersions) -> Result<Option<DistTag>> {
    let current = SemVer::parse(&versions.current)?;

    // First release of a new package
    if versions.latest.is_empty() {
        return Ok(Some(if current.is_dev() {
            DistTag::Rc
        } else {
            DistTag::Latest
        }));
    }

    let latest = SemVer::parse(&versions.latest)?;

    if versions.previous.is_empty() {
        // Nothing tagged `previous` yet: an older major line claims it
        return Ok((current.major < latest.major).then_some(DistTag::Previous));
    }

    let previous = SemVer::parse(&versions.previous)?;

    // Dev versions only ever ship as candidates for the next latest
    if current.is_dev() {
        return Ok(Some(DistTag::Rc));
    }

    let tag = match current.major.cmp(&latest.major) {
        Ordering::Greater => Some(DistTag::Latest),
        Ordering::Less => {
            let newer_old_line = current.major > previous.major
                || (current.major == previous.major && current.minor >= previous.minor);
            newer_old_line.then_some(DistTag::Previous)
        }
        Ordering::Equal => match current.minor.cmp(&latest.minor) {
            Ordering::Greater => Some(DistTag::Latest),
            Ordering::Less => None,
            Ordering::Equal => {
                // Promoting a release candidate counts as a new latest
                let promotes_rc = current.patch == latest.patch && latest.is_dev();
                (current.patch > latest.patch || promotes_rc).then_some(DistTag::Latest)
            }
        },
    };

    Ok(tag)
}
