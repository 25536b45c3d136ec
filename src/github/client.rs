use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{ContentSource, EntryKind, ProviderEntry, RepoId, RepoMetadata};
use crate::config::GitHubConfig;
use crate::error::{NavigatorError, Result};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub REST client for the contents and repository endpoints
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

/// Body of `GET /repos/{owner}/{repo}/contents/{path}`: an array for
/// directories, a single object for files
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ProviderEntry>),
    Single(ContentsFile),
}

#[derive(Debug, Deserialize)]
struct ContentsFile {
    #[serde(flatten)]
    entry: ProviderEntry,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl From<RepoResponse> for RepoMetadata {
    fn from(repo: RepoResponse) -> Self {
        Self {
            repo_name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            url: repo.html_url,
        }
    }
}

impl GitHubClient {
    /// Creates a client from the provider section of the configuration
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| NavigatorError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: Url::parse(&config.api_base)?,
            token: config.token.clone(),
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                NavigatorError::Config(format!(
                    "GitHub API base cannot carry a path: {}",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn contents_url(&self, repo: &RepoId, path: &str) -> Result<Url> {
        let prefix = ["repos", repo.owner(), repo.name(), "contents"];
        self.endpoint(prefix.into_iter().chain(path.split('/')))
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, url: &Url, target: &str) -> Result<Response> {
        debug!(url = %url, "GitHub request");
        let response = self.get(url.as_str()).send().await?;
        check_status(response, target).await
    }

    async fn fetch_contents(&self, repo: &RepoId, path: &str) -> Result<ContentsResponse> {
        let url = self.contents_url(repo, path)?;
        let target = format!("{}:{}", repo, display_path(path));
        let response = self.send(&url, &target).await?;
        Ok(response.json::<ContentsResponse>().await?)
    }

    async fn download_raw(&self, download_url: &str, target: &str) -> Result<Vec<u8>> {
        debug!(url = %download_url, "GitHub raw download");
        let response = self.get(download_url).send().await?;
        let response = check_status(response, target).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    async fn list_directory(&self, repo: &RepoId, path: &str) -> Result<Vec<ProviderEntry>> {
        match self.fetch_contents(repo, path).await? {
            ContentsResponse::Listing(entries) => Ok(entries),
            ContentsResponse::Single(file) => Ok(vec![file.entry]),
        }
    }

    async fn read_file(&self, repo: &RepoId, path: &str) -> Result<Vec<u8>> {
        let target = format!("{}:{}", repo, display_path(path));
        let file = match self.fetch_contents(repo, path).await? {
            ContentsResponse::Listing(_) => return Err(NavigatorError::NotAFile(target)),
            ContentsResponse::Single(file) => file,
        };

        if matches!(file.entry.kind, EntryKind::Dir | EntryKind::Submodule) {
            return Err(NavigatorError::NotAFile(target));
        }

        match (file.encoding.as_deref(), file.content.as_deref()) {
            (Some("base64"), Some(content)) if !content.is_empty() => decode_base64(content),
            _ => match file.entry.download_url.as_deref() {
                Some(download_url) => self.download_raw(download_url, &target).await,
                // Empty files come back with neither inline content nor a download link
                None => Ok(Vec::new()),
            },
        }
    }

    async fn repo_metadata(&self, repo: &RepoId) -> Result<RepoMetadata> {
        let url = self.endpoint(["repos", repo.owner(), repo.name()])?;
        let response = self.send(&url, &repo.to_string()).await?;
        let repo = response.json::<RepoResponse>().await?;
        Ok(repo.into())
    }
}

async fn check_status(response: Response, target: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };

    Err(match status {
        StatusCode::NOT_FOUND => NavigatorError::NotFound(target.to_string()),
        StatusCode::UNAUTHORIZED => {
            NavigatorError::Unauthorized(format!("Invalid or missing GitHub token: {}", message))
        }
        _ => NavigatorError::Provider {
            status: status.as_u16(),
            message,
        },
    })
}

fn decode_base64(content: &str) -> Result<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| NavigatorError::Internal(format!("Invalid base64 file content: {}", e)))
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
