#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use code_navigator::config::Config;
use mockito::{Mock, Server, ServerGuard};
use serde_json::{json, Value};

pub mod test_helpers {
    use super::*;

    pub const OWNER: &str = "octo";
    pub const REPO: &str = "demo";

    pub async fn setup_test_server() -> ServerGuard {
        Server::new_async().await
    }

    /// Config pointing the GitHub API at the mock server, AI disabled
    pub fn create_test_config(server: &ServerGuard) -> Config {
        let mut config = Config::default();
        config.github.api_base = server.url();
        config.github.token = Some("test-token".to_string());
        config
    }

    pub fn setup_test_logger() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    pub fn contents_path(path: &str) -> String {
        if path.is_empty() {
            format!("/repos/{}/{}/contents", OWNER, REPO)
        } else {
            format!("/repos/{}/{}/contents/{}", OWNER, REPO, path)
        }
    }

    pub fn file_entry(path: &str) -> Value {
        json!({
            "name": path.rsplit('/').next().unwrap(),
            "path": path,
            "type": "file",
            "size": 10,
            "sha": "abc123",
            "download_url": null
        })
    }

    pub fn dir_entry(path: &str) -> Value {
        json!({
            "name": path.rsplit('/').next().unwrap(),
            "path": path,
            "type": "dir",
            "size": 0,
            "sha": "def456",
            "download_url": null
        })
    }

    /// Single-object contents answer with inline base64 content
    pub fn file_body(path: &str, content: &str) -> Value {
        let mut body = file_entry(path);
        body["content"] = json!(STANDARD.encode(content));
        body["encoding"] = json!("base64");
        body
    }

    pub fn repo_body(language: Option<&str>) -> Value {
        json!({
            "id": 1,
            "name": REPO,
            "full_name": format!("{}/{}", OWNER, REPO),
            "description": "Demo repository",
            "language": language,
            "stargazers_count": 42,
            "forks_count": 7,
            "forks": 7,
            "open_issues_count": 3,
            "html_url": format!("https://github.com/{}/{}", OWNER, REPO),
            "url": format!("https://api.github.com/repos/{}/{}", OWNER, REPO)
        })
    }

    pub async fn mock_json(
        server: &mut ServerGuard,
        path: &str,
        status: usize,
        body: &Value,
    ) -> Mock {
        server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Mocks a small repository:
    ///
    /// ```text
    /// main.py
    /// pkg/
    ///   core.py
    ///   empty/
    /// README.md
    /// ```
    pub async fn mock_demo_repo(server: &mut ServerGuard) -> Vec<Mock> {
        let main_py = "import os\n\ndef main():\n    print(os.getcwd())\n\n\
                       class App:\n    def run(self):\n        main()\n";
        let repo_path = format!("/repos/{}/{}", OWNER, REPO);
        vec![
            mock_json(server, &repo_path, 200, &repo_body(Some("Python"))).await,
            mock_json(
                server,
                &contents_path(""),
                200,
                &json!([file_entry("main.py"), dir_entry("pkg"), file_entry("README.md")]),
            )
            .await,
            mock_json(
                server,
                &contents_path("pkg"),
                200,
                &json!([file_entry("pkg/core.py"), dir_entry("pkg/empty")]),
            )
            .await,
            mock_json(server, &contents_path("pkg/empty"), 200, &json!([])).await,
            mock_json(server, &contents_path("main.py"), 200, &file_body("main.py", main_py)).await,
            mock_json(
                server,
                &contents_path("README.md"),
                200,
                &file_body("README.md", "# demo\n"),
            )
            .await,
        ]
    }
}
