#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! Code Navigator - browse GitHub repositories and inspect their Python sources
//!
//! Every request is served live against the hosting provider; nothing is cached.
//!
//! ## Features
//! - Recursive repository structure, path-keyed or name-keyed
//! - Python function and class definitions via tree-sitter
//! - Naive substring references
//! - A YAML context document with an AI overview
//! - An axum HTTP service and a CLI over the same operations
//!
//! ## Usage
//! ```rust,ignore
//! use code_navigator::{Config, NavigatorService, RepoId};
//!
//! async fn example() -> code_navigator::Result<()> {
//!     let config = Config::load(None)?;
//!     let service = NavigatorService::from_config(&config)?;
//!     let repo = RepoId::parse("octocat/Hello-World")?;
//!
//!     let tree = service.file_structure(&repo).await?;
//!     println!("{}", serde_json::to_string_pretty(&tree)?);
//!     Ok(())
//! }
//! ```

/// Configuration loading and environment overrides
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and utilities
pub mod logging;
/// Hosting provider access
pub mod github;
/// Recursive repository structure
pub mod structure;
/// Python source inspection
pub mod analysis;
/// AI summarization
pub mod agents;
/// Prompt and fallback text
pub mod prompts;
/// Repository context document
pub mod context;
/// Operation facade shared by the HTTP service and the CLI
pub mod service;
/// REST API functionality for web service
pub mod api;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use agents::{OpenAIAgent, Summarizer};
pub use analysis::{Definition, DefinitionKind, Reference};
pub use config::Config;
pub use context::ContextDocument;
pub use error::{ErrorKind, NavigatorError, Result};
pub use github::{ContentSource, GitHubClient, RepoId};
pub use service::NavigatorService;
pub use structure::{RepoStructure, TreeNode, VisualNode};
