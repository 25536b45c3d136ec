//! In-memory hosting provider used by the unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{NavigatorError, Result};
use crate::github::{ContentSource, ProviderEntry, RepoId, RepoMetadata};

/// A repository held in memory, listing entries in insertion order
#[derive(Default)]
pub struct InMemorySource {
    listings: HashMap<String, Vec<ProviderEntry>>,
    files: HashMap<String, Vec<u8>>,
    metadata: Option<RepoMetadata>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        let mut source = Self::default();
        source.listings.insert(String::new(), Vec::new());
        source
    }

    /// Adds a file and any missing parent directories
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.with_bytes(path, content.as_bytes())
    }

    /// Like [`with_file`](Self::with_file), for content that need not be UTF-8
    pub fn with_bytes(mut self, path: &str, content: &[u8]) -> Self {
        let path = path.trim_matches('/');
        self.register(ProviderEntry::file(path));
        self.files.insert(path.to_string(), content.to_vec());
        self
    }

    /// Adds a (possibly empty) directory and any missing parents
    pub fn with_dir(mut self, path: &str) -> Self {
        self.register(ProviderEntry::dir(path));
        self
    }

    pub fn with_metadata(mut self, name: &str, language: Option<&str>) -> Self {
        self.metadata = Some(RepoMetadata {
            repo_name: name.to_string(),
            full_name: format!("octo/{}", name),
            description: Some("A demo repository".to_string()),
            language: language.map(str::to_string),
            stars: 42,
            forks: 7,
            open_issues: 3,
            url: format!("https://github.com/octo/{}", name),
        });
        self
    }

    /// Makes every call touching `path` fail with a provider error
    pub fn failing_at(mut self, path: &str) -> Self {
        self.failing.insert(path.trim_matches('/').to_string());
        self
    }

    /// Every provider call so far, as `op:path`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn register(&mut self, entry: ProviderEntry) {
        let parent = match entry.path.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        if !parent.is_empty() {
            self.register(ProviderEntry::dir(&parent));
        }
        if entry.is_dir() {
            self.listings.entry(entry.path.clone()).or_default();
        }
        let siblings = self.listings.entry(parent).or_default();
        if !siblings.iter().any(|e| e.path == entry.path) {
            siblings.push(entry);
        }
    }

    fn record(&self, op: &str, path: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("{}:{}", op, path));
        if self.failing.contains(path) {
            return Err(NavigatorError::Provider {
                status: 500,
                message: format!("injected failure at {}", path),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn list_directory(&self, repo: &RepoId, path: &str) -> Result<Vec<ProviderEntry>> {
        self.record("list", path)?;
        if let Some(entries) = self.listings.get(path) {
            return Ok(entries.clone());
        }
        if self.files.contains_key(path) {
            return Ok(vec![ProviderEntry::file(path)]);
        }
        Err(NavigatorError::NotFound(format!("{}:{}", repo, path)))
    }

    async fn read_file(&self, repo: &RepoId, path: &str) -> Result<Vec<u8>> {
        self.record("read", path)?;
        if let Some(content) = self.files.get(path) {
            return Ok(content.clone());
        }
        if self.listings.contains_key(path) {
            return Err(NavigatorError::NotAFile(format!("{}:{}", repo, path)));
        }
        Err(NavigatorError::NotFound(format!("{}:{}", repo, path)))
    }

    async fn repo_metadata(&self, repo: &RepoId) -> Result<RepoMetadata> {
        self.record("meta", "<meta>")?;
        self.metadata
            .clone()
            .ok_or_else(|| NavigatorError::NotFound(repo.to_string()))
    }
}

pub fn demo_repo() -> RepoId {
    RepoId::new("octo", "demo").unwrap()
}
