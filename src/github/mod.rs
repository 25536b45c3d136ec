//! Hosting provider access
//!
//! [`ContentSource`] is the seam every higher layer talks to: directory
//! listings, raw file bytes and repository metadata. [`GitHubClient`] is the
//! production implementation over the GitHub REST contents API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NavigatorError, Result};

mod client;

pub use client::GitHubClient;

/// An `(owner, name)` pair identifying a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    /// Builds an identifier; both parts must be non-empty
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(NavigatorError::Validation(
                "repository owner and name must both be non-empty".into(),
            ));
        }
        Ok(Self { owner, name })
    }

    /// Parses `owner/name`
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name),
            _ => Err(NavigatorError::Validation(format!(
                "expected owner/repo, got {:?}",
                slug
            ))),
        }
    }

    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of a directory listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link
    Symlink,
    /// Git submodule
    Submodule,
    /// Anything the provider adds later
    #[serde(other)]
    Other,
}

/// One item of a provider directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Bare name
    pub name: String,
    /// Repository-relative path, no leading or trailing slash
    pub path: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,
    /// Blob or tree sha
    #[serde(default)]
    pub sha: String,
    /// Raw download URL for files
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ProviderEntry {
    /// A file entry at `path`
    pub fn file(path: &str) -> Self {
        Self::with_kind(path, EntryKind::File)
    }

    /// A directory entry at `path`
    pub fn dir(path: &str) -> Self {
        Self::with_kind(path, EntryKind::Dir)
    }

    fn with_kind(path: &str, kind: EntryKind) -> Self {
        let path = path.trim_matches('/').to_string();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            name,
            path,
            kind,
            size: 0,
            sha: String::new(),
            download_url: None,
        }
    }

    /// Whether the entry expands into a nested listing
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Repository metadata used by the context composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// Short repository name
    pub repo_name: String,
    /// `owner/name`
    pub full_name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Primary language detected by the provider
    pub language: Option<String>,
    /// Star count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Open issue count
    pub open_issues: u64,
    /// Browser URL
    pub url: String,
}

/// Read access to a hosting provider
///
/// `path = ""` denotes the repository root. Every call is one round trip; no
/// batching, caching or retries happen behind this trait.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists a directory in provider order. A file path yields a one-element listing.
    async fn list_directory(&self, repo: &RepoId, path: &str) -> Result<Vec<ProviderEntry>>;

    /// Reads a file's raw bytes; fails with `NotAFile` for directories
    async fn read_file(&self, repo: &RepoId, path: &str) -> Result<Vec<u8>>;

    /// Fetches repository metadata
    async fn repo_metadata(&self, repo: &RepoId) -> Result<RepoMetadata>;
}
