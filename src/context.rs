//! Structured repository context
//!
//! Combines provider metadata, the path-keyed tree and an AI overview into one
//! document. The AI step is the only one allowed to fail softly: a failed
//! overview is replaced with a templated sentence, everything else propagates.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agents::Summarizer;
use crate::error::Result;
use crate::github::{ContentSource, RepoId, RepoMetadata};
use crate::prompts;
use crate::structure::{StructureBuilder, TreeNode};

/// A direct file child of a module directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantFile {
    /// Bare file name
    pub file: String,
    /// What the file is for
    pub purpose: String,
}

/// A top-level directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Directory path with trailing `/`
    pub path: String,
    /// Short description
    pub description: String,
    /// Direct file children only
    pub important_files: Vec<ImportantFile>,
}

/// The repository context document, fields in serialization order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Repository name
    pub repo_name: String,
    /// Primary language, if the provider detected one
    pub language: Option<String>,
    /// One entry per top-level directory
    pub modules: Vec<Module>,
    /// Top-level files
    pub entry_points: Vec<String>,
    /// Currently just the detected language
    pub key_concepts: Vec<String>,
    /// AI overview, or the static fallback
    pub high_level_overview: String,
}

impl ContextDocument {
    /// Block-style YAML with unicode preserved and keys in declaration order
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Builds [`ContextDocument`]s
pub struct ContextComposer<'a> {
    source: &'a dyn ContentSource,
    summarizer: &'a dyn Summarizer,
}

impl<'a> ContextComposer<'a> {
    /// Creates a composer over the given collaborators
    pub fn new(source: &'a dyn ContentSource, summarizer: &'a dyn Summarizer) -> Self {
        Self { source, summarizer }
    }

    /// Fetches metadata and structure, then asks for an overview
    pub async fn compose(&self, repo: &RepoId) -> Result<ContextDocument> {
        let meta = self.source.repo_metadata(repo).await?;
        let structure = StructureBuilder::new(self.source)
            .build_repo::<TreeNode>(repo)
            .await?
            .structure;

        let prompt = prompts::repo_overview(&meta.repo_name);
        let overview = match self.summarizer.summarize(&prompt).await {
            Ok(overview) => overview,
            Err(e) => {
                warn!(repo = %repo, error = %e, "AI overview unavailable, using fallback");
                prompts::fallback_overview(&meta.repo_name, meta.language.as_deref())
            }
        };

        Ok(assemble(meta, &structure, overview))
    }
}

/// Derives the document from already fetched parts
pub fn assemble(meta: RepoMetadata, structure: &[TreeNode], overview: String) -> ContextDocument {
    let mut modules = Vec::new();
    let mut entry_points = Vec::new();

    for node in structure {
        match node {
            TreeNode::Directory { path, contents } => modules.push(Module {
                path: path.clone(),
                description: prompts::module_description(path),
                important_files: contents
                    .iter()
                    .filter_map(|child| match child {
                        TreeNode::File { path } => Some(ImportantFile {
                            file: path.rsplit('/').next().unwrap_or(path).to_string(),
                            purpose: prompts::IMPORTANT_FILE_PURPOSE.to_string(),
                        }),
                        TreeNode::Directory { .. } => None,
                    })
                    .collect(),
            }),
            TreeNode::File { path } => entry_points.push(path.clone()),
        }
    }

    let key_concepts = vec![meta
        .language
        .clone()
        .unwrap_or_else(|| prompts::UNKNOWN_LANGUAGE.to_string())];

    ContextDocument {
        repo_name: meta.repo_name,
        language: meta.language,
        modules,
        entry_points,
        key_concepts,
        high_level_overview: overview,
    }
}
