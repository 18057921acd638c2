use crate::error::{DocsSyncError, Result};
use crate::git::CommitInfo;
use git2::{ObjectType, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    fn find_tag_reference(&self, name: &str) -> Result<git2::Reference<'_>> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => Ok(reference),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Err(DocsSyncError::tag(format!(
                "Tag '{}' does not exist",
                name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Credential callbacks shared by fetch and push.
    ///
    /// Tries SSH keys from `~/.ssh/`, then the SSH agent, then whatever
    /// default credentials libgit2 can come up with.
    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'static> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });
        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn tag_time(&self, name: &str) -> Result<i64> {
        let reference = self.find_tag_reference(name)?;

        // Annotated tags carry their own tagged time
        if let Ok(obj) = reference.peel(ObjectType::Tag) {
            if let Some(tag) = obj.as_tag() {
                if let Some(tagger) = tag.tagger() {
                    return Ok(tagger.when().seconds());
                }
            }
        }

        // Lightweight tag: use the tagged commit's committed time
        let commit = reference
            .peel_to_commit()
            .map_err(|e| DocsSyncError::tag(format!("Cannot peel tag '{}': {}", name, e)))?;
        Ok(commit.time().seconds())
    }

    fn branch_commits(&self, remote: &str, branch: &str) -> Result<Vec<CommitInfo>> {
        let candidates = [
            format!("refs/remotes/{}/{}", remote, branch),
            format!("refs/heads/{}", branch),
        ];
        let reference = candidates
            .iter()
            .find_map(|name| self.repo.find_reference(name).ok())
            .ok_or_else(|| {
                DocsSyncError::branch(format!(
                    "Branch '{}' not found (looked for {}/{} and a local branch)",
                    branch, remote, branch
                ))
            })?;

        let head = reference.target().ok_or_else(|| {
            DocsSyncError::branch(format!("Branch '{}' has no target", branch))
        })?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head)?;
        revwalk.simplify_first_parent()?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            commits.push(CommitInfo {
                id: oid.to_string(),
                summary: commit.summary().unwrap_or("").to_string(),
                time: commit.time().seconds(),
            });
        }

        Ok(commits)
    }

    fn resolve_commit(&self, refname: &str) -> Result<String> {
        let object = self
            .repo
            .revparse_single(refname)
            .map_err(|e| DocsSyncError::branch(format!("Cannot resolve '{}': {}", refname, e)))?;

        let commit = object.peel(ObjectType::Commit).map_err(|e| {
            DocsSyncError::branch(format!("'{}' does not point to a commit: {}", refname, e))
        })?;

        Ok(commit.id().to_string())
    }

    fn create_annotated_tag(&self, name: &str, target: &str, message: &str) -> Result<()> {
        let object = self
            .repo
            .revparse_single(target)
            .map_err(|e| DocsSyncError::tag(format!("Cannot find object '{}': {}", target, e)))?;

        let signature = self.repo.signature()?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| DocsSyncError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| DocsSyncError::remote(format!("Cannot find remote: {}", e)))?;

        let mut push_options = git2::PushOptions::new();
        let mut callbacks = self.remote_callbacks();

        // Catch per-reference rejections the server reports during push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });
        push_options.remote_callbacks(callbacks);

        remote
            .push(
                &[&format!("refs/tags/{}", name)],
                Some(&mut push_options),
            )
            .map_err(|e| DocsSyncError::remote(format!("Failed to push tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        let remote_name = remote;
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| DocsSyncError::remote(format!("Remote '{}' not found", remote_name)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());

        // Fetch all branches into remote-tracking refs, plus all tags
        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        let refspecs = &[refspec_heads.as_str(), "+refs/tags/*:refs/tags/*"];
        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                DocsSyncError::remote(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        Ok(())
    }
}

// SAFETY: Git2Repository is only handed out behind shared references for
// read and tag-creation operations; libgit2 is compiled with threading
// support and its object database access is internally synchronized.
unsafe impl Sync for Git2Repository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git2_repository_open_outside_repo() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Git2Repository::open(tmp.path()).is_err());
    }
}
