use git2::{ErrorCode, Repository, RepositoryOpenFlags};
use std::ffi::OsStr;
use std::path::Path;

use crate::error::Result;

/// Name of the branch checked out in the repository containing `path`.
///
/// Returns `None` for a detached or unborn HEAD, which is how pipeline
/// checkouts of a specific commit usually look.
pub fn current_branch(path: impl AsRef<Path>) -> Result<Option<String>> {
    branch_below(path.as_ref(), std::iter::empty::<&OsStr>())
}

/// Like [current_branch], but discovery never walks into `ceiling_dirs`.
fn branch_below<I, O>(path: &Path, ceiling_dirs: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = O>,
    O: AsRef<OsStr>,
{
    let repo = Repository::open_ext(path, RepositoryOpenFlags::CROSS_FS, ceiling_dirs)?;

    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if !head.is_branch() {
        return Ok(None);
    }

    Ok(head.shorthand().map(|name| name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_not_a_repository_is_error() {
        let tmp = TempDir::new().unwrap();
        let sources = tmp.path().join("sources");
        std::fs::create_dir(&sources).unwrap();

        // Stop discovery at the temp dir so an enclosing checkout is never found
        let err = branch_below(&sources, [tmp.path()]).unwrap_err();
        assert!(err.to_string().starts_with("Git operation failed"));
    }

    #[test]
    fn test_discovery_walks_up_to_repository_root() {
        let tmp = TempDir::new().unwrap();
        Repository::init(tmp.path()).unwrap();
        let nested = tmp.path().join("common/temp");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(branch_below(&nested, [tmp.path().parent().unwrap()]).unwrap(), None);
    }

    #[test]
    fn test_unborn_branch_is_none() {
        let tmp = TempDir::new().unwrap();
        Repository::init(tmp.path()).unwrap();
        assert_eq!(current_branch(tmp.path()).unwrap(), None);
    }

    #[test]
    fn test_branch_after_first_commit() {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::init(tmp.path()).unwrap();

        let signature = git2::Signature::now("Release Bot", "release@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let commit = repo
            .commit(None, &signature, &signature, "initial", &tree, &[])
            .unwrap();
        let commit = repo.find_commit(commit).unwrap();
        repo.branch("release/1.x", &commit, false).unwrap();
        repo.set_head("refs/heads/release/1.x").unwrap();

        assert_eq!(
            current_branch(tmp.path()).unwrap(),
            Some("release/1.x".to_string())
        );

        repo.set_head_detached(commit.id()).unwrap();
        assert_eq!(current_branch(tmp.path()).unwrap(), None);
    }
}
