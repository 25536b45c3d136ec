use std::sync::Arc;
use tracing::info;

use crate::agents::{OpenAIAgent, Summarizer};
use crate::analysis::{self, Definition, Reference};
use crate::config::{redact, Config};
use crate::context::{ContextComposer, ContextDocument};
use crate::error::Result;
use crate::github::{ContentSource, GitHubClient, RepoId};
use crate::prompts;
use crate::structure::{RepoStructure, StructureBuilder, TreeNode, VisualNode};

/// Entry point for every repository operation
///
/// Holds no per-request state; each call goes to the provider from scratch.
#[derive(Clone)]
pub struct NavigatorService {
    source: Arc<dyn ContentSource>,
    summarizer: Arc<dyn Summarizer>,
    file_summary_max_chars: usize,
}

impl NavigatorService {
    /// Wires the production GitHub client and OpenAI agent
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = GitHubClient::new(&config.github)?;
        match &config.github.token {
            Some(token) => info!(token = %redact(token), "using GitHub token"),
            None => info!("GITHUB_TOKEN not set; GitHub requests are unauthenticated"),
        }
        let summarizer = OpenAIAgent::new(&config.openai);
        match &config.openai.api_key {
            Some(key) => {
                info!(api_key = %redact(key), model = %config.openai.model, "AI summaries enabled")
            }
            None => info!("OPENAI_API_KEY not set; AI summaries are disabled"),
        }
        Ok(Self::new(Arc::new(source), Arc::new(summarizer))
            .with_file_summary_limit(config.openai.file_summary_max_chars))
    }

    /// Creates a service over arbitrary collaborators
    pub fn new(source: Arc<dyn ContentSource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            source,
            summarizer,
            file_summary_max_chars: crate::config::OpenAiConfig::default().file_summary_max_chars,
        }
    }

    /// Caps how much of a file is sent for a file summary
    pub fn with_file_summary_limit(mut self, max_chars: usize) -> Self {
        self.file_summary_max_chars = max_chars;
        self
    }

    /// Path-keyed tree of the whole repository
    pub async fn file_structure(&self, repo: &RepoId) -> Result<RepoStructure<TreeNode>> {
        info!(repo = %repo, "building file structure");
        StructureBuilder::new(self.source.as_ref()).build_repo(repo).await
    }

    /// Name-keyed tree for rendering
    pub async fn structure_visualization(
        &self,
        repo: &RepoId,
    ) -> Result<RepoStructure<VisualNode>> {
        info!(repo = %repo, "building structure visualization");
        StructureBuilder::new(self.source.as_ref()).build_repo(repo).await
    }

    /// File content exactly as the provider returned it
    pub async fn file_content(&self, repo: &RepoId, path: &str) -> Result<Vec<u8>> {
        self.source.read_file(repo, path).await
    }

    async fn file_text(&self, repo: &RepoId, path: &str) -> Result<String> {
        let bytes = self.file_content(repo, path).await?;
        Ok(analysis::decode_source(&bytes))
    }

    /// Function and class definitions of a Python file
    pub async fn definitions(&self, repo: &RepoId, path: &str) -> Result<Vec<Definition>> {
        analysis::ensure_python_path(path)?;
        let source = self.file_text(repo, path).await?;
        let definitions = analysis::extract_definitions(&source)?;
        info!(repo = %repo, path, count = definitions.len(), "extracted definitions");
        Ok(definitions)
    }

    /// Lines of a Python file containing `symbol`
    pub async fn references(
        &self,
        repo: &RepoId,
        path: &str,
        symbol: &str,
    ) -> Result<Vec<Reference>> {
        analysis::ensure_python_path(path)?;
        let source = self.file_text(repo, path).await?;
        let references = analysis::find_references(&source, symbol);
        info!(repo = %repo, path, symbol, count = references.len(), "found references");
        Ok(references)
    }

    /// Structured context document
    pub async fn context_document(&self, repo: &RepoId) -> Result<ContextDocument> {
        info!(repo = %repo, "composing context document");
        ContextComposer::new(self.source.as_ref(), self.summarizer.as_ref())
            .compose(repo)
            .await
    }

    /// Context document rendered as YAML
    pub async fn context_yaml(&self, repo: &RepoId) -> Result<String> {
        self.context_document(repo).await?.to_yaml()
    }

    /// Free-form summarization
    pub async fn summarize(&self, prompt: &str) -> Result<String> {
        self.summarizer.summarize(prompt).await
    }

    /// AI summary of a single file
    pub async fn summarize_file(&self, repo: &RepoId, path: &str) -> Result<String> {
        let content = self.file_text(repo, path).await?;
        let (excerpt, truncated) = truncate_chars(&content, self.file_summary_max_chars);
        let prompt = prompts::file_summary(&repo.to_string(), path, excerpt, truncated);
        info!(repo = %repo, path, truncated, "summarizing file");
        self.summarizer.summarize(&prompt).await
    }
}

/// Longest prefix of at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (&text[..cut], true),
        None => (text, false),
    }
}
