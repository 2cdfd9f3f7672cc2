//! Starter-template cloning

use camino::{Utf8Path, Utf8PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::process;

/// Default starter template repository
pub const DEFAULT_REPO_URL: &str = "https://github.com/medusajs/medusa-starter-default";

/// Branch of the default starter template
pub const DEFAULT_BRANCH: &str = "feat/onboarding";

/// Options for cloning the starter template
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Repository URL to clone
    pub repo_url: String,
    /// Branch to checkout after clone
    pub branch: Option<String>,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            branch: Some(DEFAULT_BRANCH.to_string()),
        }
    }
}

/// Clone the starter template into `destination`
///
/// # Errors
/// Returns error if:
/// - The repository URL is malformed
/// - The destination directory already exists
/// - The clone command fails or is interrupted
pub async fn clone_starter(
    destination: &Utf8Path,
    options: &CloneOptions,
    cancel: &CancellationToken,
) -> Result<Utf8PathBuf> {
    info!(
        "Cloning starter: {} -> {}",
        options.repo_url, destination
    );

    if !is_valid_repo_url(&options.repo_url) {
        return Err(Error::invalid_repo_url(&options.repo_url));
    }

    if destination.exists() {
        return Err(Error::destination_exists(destination.as_str()));
    }

    let mut args = vec!["clone"];
    if let Some(branch) = &options.branch {
        args.push("-b");
        args.push(branch);
    }
    args.push(&options.repo_url);
    args.push(destination.as_str());

    debug!("Running: git clone");
    process::run("git", &args, None, cancel)
        .await
        .map_err(|e| match e {
            Error::Cancelled => Error::Cancelled,
            Error::CommandNotFound { .. } => e,
            Error::ProcessFailed { message, .. } => Error::clone_failed(message),
            other => Error::clone_failed(other.to_string()),
        })?;

    info!("Starter template cloned successfully");

    Ok(destination.to_path_buf())
}

/// Validate if a string is a plausible repository URL
fn is_valid_repo_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("git@") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_repo_url() {
        assert!(is_valid_repo_url(DEFAULT_REPO_URL));
        assert!(is_valid_repo_url("git@github.com:medusajs/medusa-starter-default.git"));
        assert!(is_valid_repo_url("http://example.com/repo.git"));
        assert!(!is_valid_repo_url("not-a-url"));
        assert!(!is_valid_repo_url(""));
    }

    #[test]
    fn test_clone_options_default() {
        let options = CloneOptions::default();
        assert_eq!(options.repo_url, DEFAULT_REPO_URL);
        assert_eq!(options.branch.as_deref(), Some(DEFAULT_BRANCH));
    }

    #[tokio::test]
    async fn test_clone_rejects_invalid_url() {
        let token = CancellationToken::new();
        let options = CloneOptions {
            repo_url: "nope".to_string(),
            branch: None,
        };
        let err = clone_starter(Utf8Path::new("never-created"), &options, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRepoUrl { .. }));
    }

    #[tokio::test]
    async fn test_clone_rejects_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Utf8Path::from_path(dir.path()).unwrap();
        let token = CancellationToken::new();
        let err = clone_starter(dest, &CloneOptions::default(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DestinationExists { .. }));
    }
}
