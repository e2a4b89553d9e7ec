//! GitHub-backed store sync.
//!
//! Pull downloads the file through the raw-content host. Push moves the
//! index onto the remote branch tip, commits only the store file on top of
//! it, and force-pushes, so other files on the branch keep their history.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;
use url::Url;

use super::RemoteStore;
use crate::config::{Config, Secret};
use crate::error_handling::{InitializationError, SyncError};

/// Basic-auth user sent with a token when no user is configured.
const TOKEN_AUTH_USER: &str = "x-access-token";

/// Output of one git invocation.
#[derive(Debug, Clone, Default)]
struct GitOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

/// Store synced through a GitHub repository.
pub struct GitHubRemote {
    http: Arc<reqwest::Client>,
    raw_url: Url,
    user: Option<String>,
    token: Option<Secret>,
    repo_dir: PathBuf,
    git_remote: String,
    branch: String,
}

impl std::fmt::Debug for GitHubRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubRemote")
            .field("raw_url", &self.raw_url.as_str())
            .field("user", &self.user)
            .field("token", &self.token)
            .field("repo_dir", &self.repo_dir)
            .field("git_remote", &self.git_remote)
            .field("branch", &self.branch)
            .finish()
    }
}

impl GitHubRemote {
    /// Builds the remote from the owner/repository/path coordinates in `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ConfigError` if owner or repository is
    /// unset, or the raw-content URL cannot be built.
    pub fn new(http: Arc<reqwest::Client>, config: &Config) -> Result<Self, InitializationError> {
        if config.repo_owner.trim().is_empty() || config.repo_name.trim().is_empty() {
            return Err(InitializationError::ConfigError(
                "remote repository is not set (use --repo-owner/--repo-name or --no-sync)"
                    .to_string(),
            ));
        }
        let raw_url = raw_content_url(
            &config.raw_base_url,
            &config.repo_owner,
            &config.repo_name,
            &config.repo_branch,
            &config.repo_path,
        )?;

        Ok(Self {
            http,
            raw_url,
            user: config.remote_user.clone(),
            token: config.remote_token.clone().filter(|t| !t.is_empty()),
            repo_dir: config.repo_dir(),
            git_remote: config.git_remote.clone(),
            branch: config.repo_branch.clone(),
        })
    }

    /// URL the store is pulled from.
    pub fn raw_url(&self) -> &Url {
        &self.raw_url
    }

    async fn git(&self, step: &'static str, args: &[&str]) -> Result<GitOutput, SyncError> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SyncError::Git {
                step,
                message: e.to_string(),
            })?;

        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }

    /// Points the branch and index at the remote tip, leaving the working tree alone.
    ///
    /// The next commit then contains the remote's files plus whatever gets
    /// staged afterwards. A branch that does not exist on the remote yet is
    /// not an error.
    async fn sync_index_with_remote(&self) -> Result<(), SyncError> {
        let fetch = self
            .git("fetch", &["fetch", &self.git_remote, &self.branch])
            .await?;
        if !fetch.success {
            if fetch.stderr.contains("couldn't find remote ref") {
                debug!(
                    "Branch {} not on {} yet, committing on local history",
                    self.branch, self.git_remote
                );
                return Ok(());
            }
            return Err(SyncError::Git {
                step: "fetch",
                message: fetch.stderr.trim().to_string(),
            });
        }
        self.git_checked("reset", &["reset", "--mixed", "--quiet", "FETCH_HEAD"])
            .await?;
        Ok(())
    }

    async fn git_checked(&self, step: &'static str, args: &[&str]) -> Result<GitOutput, SyncError> {
        let output = self.git(step, args).await?;
        if !output.success {
            return Err(SyncError::Git {
                step,
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl RemoteStore for GitHubRemote {
    async fn pull(&self, local_path: &Path) -> Result<PathBuf, SyncError> {
        let pull_error = |message: String| SyncError::Pull {
            url: self.raw_url.to_string(),
            message,
        };

        let mut request = self.http.get(self.raw_url.clone());
        if let Some(token) = &self.token {
            let user = self.user.as_deref().unwrap_or(TOKEN_AUTH_USER);
            request = request.basic_auth(user, Some(token.expose()));
        }

        let body = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| pull_error(e.to_string()))?
            .text()
            .await
            .map_err(|e| pull_error(e.to_string()))?;

        let save_error = |source: std::io::Error| SyncError::Save {
            path: local_path.to_path_buf(),
            source,
        };
        match tokio::fs::remove_file(local_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(save_error(e)),
        }
        tokio::fs::write(local_path, body.as_bytes())
            .await
            .map_err(save_error)?;

        info!("Store downloaded successfully from {}", self.raw_url);
        info!(
            "Saved to: {}",
            std::fs::canonicalize(local_path)
                .unwrap_or_else(|_| local_path.to_path_buf())
                .display()
        );
        Ok(local_path.to_path_buf())
    }

    async fn push(&self, local_path: &Path) -> Result<(), SyncError> {
        let absolute = std::fs::canonicalize(local_path).map_err(|e| SyncError::Git {
            step: "add",
            message: format!("{}: {e}", local_path.display()),
        })?;
        let file = absolute.to_string_lossy().to_string();
        let name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.clone());

        self.sync_index_with_remote().await?;
        self.git_checked("add", &["add", &file]).await?;

        let message = format!("Update text file: {name}");
        let commit = self.git("commit", &["commit", "-m", &message]).await?;
        if !commit.success {
            let combined = format!("{}{}", commit.stdout, commit.stderr);
            if combined.contains("nothing to commit") || combined.contains("no changes added") {
                info!("No store changes to commit");
            } else {
                return Err(SyncError::Git {
                    step: "commit",
                    message: commit.stderr.trim().to_string(),
                });
            }
        }

        let refspec = format!("HEAD:refs/heads/{}", self.branch);
        self.git_checked("push", &["push", &self.git_remote, &refspec, "--force"])
            .await?;

        info!("Store pushed successfully to {}/{}", self.git_remote, self.branch);
        Ok(())
    }
}

fn raw_content_url(
    base: &str,
    owner: &str,
    repo: &str,
    branch: &str,
    path: &str,
) -> Result<Url, InitializationError> {
    let mut url = Url::parse(base)
        .map_err(|e| InitializationError::ConfigError(format!("invalid raw URL {base:?}: {e}")))?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            InitializationError::ConfigError(format!("raw URL {base:?} cannot be a base"))
        })?;
        segments.pop_if_empty();
        segments.push(owner).push(repo).push(branch);
        for part in path.split('/').filter(|p| !p.is_empty()) {
            segments.push(part);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_content_url() {
        let url = raw_content_url(
            "https://raw.githubusercontent.com/",
            "octo",
            "octo.github.io",
            "main",
            "data/ip_data.txt",
        )
        .expect("url");
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/octo/octo.github.io/main/data/ip_data.txt"
        );
    }

    #[test]
    fn test_raw_content_url_with_base_path() {
        let url = raw_content_url("http://127.0.0.1:9000/raw", "o", "r", "b", "f.txt")
            .expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/raw/o/r/b/f.txt");
    }

    #[test]
    fn test_missing_repository_is_config_error() {
        let result = GitHubRemote::new(Arc::new(reqwest::Client::new()), &Config::default());
        assert!(matches!(result, Err(InitializationError::ConfigError(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            repo_owner: "octo".into(),
            repo_name: "repo".into(),
            remote_token: Some(Secret::new("github_pat_secret")),
            ..Default::default()
        };
        let remote = GitHubRemote::new(Arc::new(reqwest::Client::new()), &config).expect("remote");
        let rendered = format!("{:?}", remote);
        assert!(!rendered.contains("github_pat_secret"));
    }
}
