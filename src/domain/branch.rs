use crate::config::BranchRules;

/// How a branch participates in releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// Main integration branch, published as `nightly`
    Main,
    Release,
    Other,
}

/// Represents the branch being built with its release context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub kind: BranchKind,
}

impl BranchContext {
    /// Classify a branch name.
    ///
    /// Both rules are substring matches, so `refs/heads/master` and
    /// `feature/master-fix` are both the main branch. Main is checked first.
    pub fn new(name: impl Into<String>, rules: &BranchRules) -> Self {
        let name = name.into();
        let kind = if name.contains(rules.main.as_str()) {
            BranchKind::Main
        } else if name.contains(rules.release_marker.as_str()) {
            BranchKind::Release
        } else {
            BranchKind::Other
        };

        BranchContext { name, kind }
    }

    pub fn is_main(&self) -> bool {
        self.kind == BranchKind::Main
    }

    pub fn is_release_branch(&self) -> bool {
        self.kind == BranchKind::Release
    }
}
