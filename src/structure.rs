//! Repository tree construction
//!
//! A root listing is expanded depth-first into a nested tree. Every directory
//! costs one `list_directory` round trip, issued the moment the directory is
//! reached, and its subtree is completed before the next sibling is looked at.
//! Children keep the provider's listing order at every level.
//!
//! Traversal runs on an explicit stack of frames instead of recursion, so
//! nesting depth is bounded by memory rather than by the call stack.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NavigatorError, Result};
use crate::github::{ContentSource, ProviderEntry, RepoId};

/// Output shape of the builder
///
/// Implemented by the path-keyed [`TreeNode`] and the name-keyed [`VisualNode`].
pub trait TreeShape: Sized + Send {
    /// Node for a non-directory entry
    fn leaf(entry: &ProviderEntry) -> Self;
    /// Node for a directory whose children are fully resolved
    fn branch(entry: &ProviderEntry, children: Vec<Self>) -> Self;
}

/// Path-keyed node, for data and API consumers
///
/// Directory paths carry exactly one trailing `/`; file paths never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// Leaf
    File {
        /// Repository-relative path
        path: String,
    },
    /// Directory with resolved children
    Directory {
        /// Repository-relative path ending in `/`
        path: String,
        /// Children in provider order
        contents: Vec<TreeNode>,
    },
}

impl TreeNode {
    /// The node's path
    pub fn path(&self) -> &str {
        match self {
            Self::File { path } | Self::Directory { path, .. } => path,
        }
    }

    /// Children of a directory; empty for files
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::File { .. } => &[],
            Self::Directory { contents, .. } => contents,
        }
    }

    /// Whether this is a directory node
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

impl TreeShape for TreeNode {
    fn leaf(entry: &ProviderEntry) -> Self {
        Self::File {
            path: entry.path.clone(),
        }
    }

    fn branch(entry: &ProviderEntry, children: Vec<Self>) -> Self {
        Self::Directory {
            path: format!("{}/", entry.path.trim_end_matches('/')),
            contents: children,
        }
    }
}

/// Name-keyed node, for file-tree widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VisualNode {
    /// Leaf
    File {
        /// Bare name
        name: String,
    },
    /// Directory with resolved children
    Directory {
        /// Bare name
        name: String,
        /// Children in provider order
        children: Vec<VisualNode>,
    },
}

impl VisualNode {
    /// The node's bare name
    pub fn name(&self) -> &str {
        match self {
            Self::File { name } | Self::Directory { name, .. } => name,
        }
    }
}

impl TreeShape for VisualNode {
    fn leaf(entry: &ProviderEntry) -> Self {
        Self::File {
            name: entry.name.clone(),
        }
    }

    fn branch(entry: &ProviderEntry, children: Vec<Self>) -> Self {
        Self::Directory {
            name: entry.name.clone(),
            children,
        }
    }
}

/// A built tree together with the repository it describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStructure<S> {
    /// `owner/name`
    pub repo: String,
    /// Top-level nodes
    pub structure: Vec<S>,
}

/// One directory being expanded
struct Frame<S> {
    /// `None` for the repository root
    entry: Option<ProviderEntry>,
    /// Path of the directory this frame lists. Kept for diagnostics only; output
    /// paths always come from the provider entries themselves.
    parent_path: String,
    pending: std::vec::IntoIter<ProviderEntry>,
    nodes: Vec<S>,
}

/// Expands provider listings into complete trees
pub struct StructureBuilder<'a> {
    source: &'a dyn ContentSource,
}

impl<'a> StructureBuilder<'a> {
    /// Creates a builder reading from `source`
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self { source }
    }

    /// Fetches the root listing of `repo` and builds the full tree
    pub async fn build_repo<S: TreeShape>(&self, repo: &RepoId) -> Result<RepoStructure<S>> {
        let root = self.source.list_directory(repo, "").await?;
        let structure = self.build(repo, root).await?;
        Ok(RepoStructure {
            repo: repo.to_string(),
            structure,
        })
    }

    /// Builds a tree from an already fetched listing
    ///
    /// Any failed expansion aborts the whole build; no partial tree escapes.
    pub async fn build<S: TreeShape>(
        &self,
        repo: &RepoId,
        root: Vec<ProviderEntry>,
    ) -> Result<Vec<S>> {
        let mut stack: Vec<Frame<S>> = vec![Frame {
            entry: None,
            parent_path: String::new(),
            pending: root.into_iter(),
            nodes: Vec::new(),
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                return Err(lost_root());
            };

            match frame.pending.next() {
                Some(entry) if entry.is_dir() => {
                    debug!(
                        repo = %repo,
                        path = %entry.path,
                        parent = %frame.parent_path,
                        "expanding directory"
                    );
                    let listing = self.source.list_directory(repo, &entry.path).await?;
                    stack.push(Frame {
                        parent_path: entry.path.clone(),
                        entry: Some(entry),
                        pending: listing.into_iter(),
                        nodes: Vec::new(),
                    });
                }
                Some(entry) => frame.nodes.push(S::leaf(&entry)),
                None => {
                    let Some(done) = stack.pop() else {
                        return Err(lost_root());
                    };
                    match (done.entry, stack.last_mut()) {
                        (Some(entry), Some(parent)) => {
                            parent.nodes.push(S::branch(&entry, done.nodes))
                        }
                        (None, _) => return Ok(done.nodes),
                        (Some(entry), None) => {
                            return Err(NavigatorError::Internal(format!(
                                "directory {} has no enclosing frame",
                                entry.path
                            )))
                        }
                    }
                }
            }
        }
    }
}

fn lost_root() -> NavigatorError {
    NavigatorError::Internal("structure traversal lost its root".into())
}
