use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::{FileEntry, RepositoryRef};
use super::{RepoError, RepoSource};
use crate::config::HttpConfig;

const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

/// [`RepoSource`] backed by the GitHub REST API and raw download URLs.
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// Build a client with the configured timeout and User-Agent.
    pub fn new(http: &HttpConfig) -> Result<Self, RepoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_base: http.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    fn contents_url(&self, repo: &RepositoryRef) -> String {
        format!("{}/repos/{}/{}/contents", self.api_base, repo.owner, repo.name)
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn list_root(&self, repo: &RepositoryRef) -> Result<String, RepoError> {
        let url = self.contents_url(repo);
        let fetch_error = |reason: String| RepoError::ListingFetch {
            url: url.clone(),
            reason,
        };

        debug!(url = %url, "fetching root listing");
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, GITHUB_V3_JSON)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await.map_err(|e| fetch_error(e.to_string()))?;
        debug!(body_bytes = body.len(), "received root listing");
        Ok(body)
    }

    #[instrument(skip(self, file), fields(file = %file.name))]
    async fn fetch_raw(&self, file: &FileEntry) -> Result<String, RepoError> {
        let fetch_error = |reason: String| RepoError::FileFetch {
            file: file.name.clone(),
            reason,
        };

        let response = self
            .client
            .get(&file.download_url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let content = response.text().await.map_err(|e| fetch_error(e.to_string()))?;
        debug!(content_bytes = content.len(), "received file content");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn http_config(api_base: &str) -> HttpConfig {
        HttpConfig {
            api_base: api_base.to_string(),
            timeout_secs: 5,
            user_agent: "markup-scanner-test/1.0".to_string(),
        }
    }

    fn acme() -> RepositoryRef {
        RepositoryRef {
            owner: "acme".to_string(),
            name: "docs".to_string(),
        }
    }

    /// Serve one canned HTTP response on a loopback port.
    /// Returns the base URL and a receiver for the raw request head.
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            tx.send(String::from_utf8_lossy(&request).to_lowercase()).ok();
        });

        (base, rx)
    }

    #[test]
    fn test_contents_url() {
        let client = GitHubClient::new(&HttpConfig::default()).unwrap();
        assert_eq!(
            client.contents_url(&acme()),
            "https://api.github.com/repos/acme/docs/contents"
        );
    }

    #[test]
    fn test_contents_url_trims_trailing_slash_on_base() {
        let client = GitHubClient::new(&http_config("http://localhost:8080/api/")).unwrap();
        let repo = RepositoryRef {
            owner: "o".to_string(),
            name: "r.git".to_string(),
        };
        assert_eq!(
            client.contents_url(&repo),
            "http://localhost:8080/api/repos/o/r.git/contents"
        );
    }

    #[tokio::test]
    async fn test_list_root_sends_accept_and_user_agent() {
        let (base, request) = serve_once("200 OK", "[]").await;
        let client = GitHubClient::new(&http_config(&base)).unwrap();

        let body = client.list_root(&acme()).await.unwrap();
        assert_eq!(body, "[]");

        let request = request.await.unwrap();
        assert!(request.starts_with("get /repos/acme/docs/contents http/1.1"), "{}", request);
        assert!(request.contains("accept: application/vnd.github.v3+json"), "{}", request);
        assert!(request.contains("user-agent: markup-scanner-test/1.0"), "{}", request);
    }

    #[tokio::test]
    async fn test_list_root_non_200_is_listing_fetch_error() {
        let (base, _request) = serve_once("404 Not Found", "{\"message\":\"Not Found\"}").await;
        let client = GitHubClient::new(&http_config(&base)).unwrap();

        match client.list_root(&acme()).await {
            Err(RepoError::ListingFetch { url, reason }) => {
                assert_eq!(url, format!("{}/repos/acme/docs/contents", base));
                assert_eq!(reason, "HTTP 404");
            }
            other => panic!("expected ListingFetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_listing_is_listing_fetch_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = GitHubClient::new(&http_config(&base)).unwrap();
        assert!(matches!(
            client.list_root(&acme()).await,
            Err(RepoError::ListingFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_raw_returns_body_and_sends_user_agent() {
        let (base, request) = serve_once("200 OK", "# Title\nTODO: fix\n").await;
        let client = GitHubClient::new(&http_config(&base)).unwrap();
        let file = FileEntry {
            name: "README.md".to_string(),
            download_url: format!("{}/acme/docs/main/README.md", base),
        };

        let content = client.fetch_raw(&file).await.unwrap();
        assert_eq!(content, "# Title\nTODO: fix\n");

        let request = request.await.unwrap();
        assert!(request.starts_with("get /acme/docs/main/readme.md http/1.1"), "{}", request);
        assert!(request.contains("user-agent: markup-scanner-test/1.0"), "{}", request);
    }

    #[tokio::test]
    async fn test_fetch_raw_non_200_is_file_fetch_error() {
        let (base, _request) = serve_once("500 Internal Server Error", "boom").await;
        let client = GitHubClient::new(&http_config(&base)).unwrap();
        let file = FileEntry {
            name: "notes.txt".to_string(),
            download_url: format!("{}/notes.txt", base),
        };

        match client.fetch_raw(&file).await {
            Err(RepoError::FileFetch { file, reason }) => {
                assert_eq!(file, "notes.txt");
                assert_eq!(reason, "HTTP 500");
            }
            other => panic!("expected FileFetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_file_is_file_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = GitHubClient::new(&http_config(&base)).unwrap();
        let file = FileEntry {
            name: "README.md".to_string(),
            download_url: format!("{}/README.md", base),
        };
        match client.fetch_raw(&file).await {
            Err(RepoError::FileFetch { file, .. }) => assert_eq!(file, "README.md"),
            other => panic!("expected FileFetch error, got {:?}", other),
        }
    }
}
