use crate::error::{PrSemverError, Result};
use crate::service::{
    CommitEntry, HostingService, Page, PullRequestEntry, PullRequestState, TagEntry,
};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Bitbucket Server REST API client for a single repository
pub struct BitbucketClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl BitbucketClient {
    /// Create a client for a repository.
    ///
    /// `url` may be the REST endpoint
    /// (`https://host/rest/api/1.0/projects/PRJ/repos/repo`) or the browser URL
    /// of the repository (`https://host/projects/PRJ/repos/repo`).
    pub fn new(
        url: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("pr-semver/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(BitbucketClient {
            http,
            base_url: rest_base_url(url.as_ref()),
            username: username.into(),
            password: password.into(),
        })
    }

    /// Resolved REST base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, query = ?query, "Calling hosting service");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/json")
            .basic_auth(&self.username, Some(&self.password))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PrSemverError::remote(format!(
                "GET {} returned {}: {}",
                url,
                status,
                body.trim()
            )));
        }

        Ok(response.json()?)
    }
}

/// Map a repository browser URL onto the REST API, leaving REST URLs untouched
pub fn rest_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.contains("/rest/api/") {
        return url.to_string();
    }
    match url.find("/projects/") {
        Some(index) => format!("{}/rest/api/1.0{}", &url[..index], &url[index..]),
        None => url.to_string(),
    }
}

impl HostingService for BitbucketClient {
    fn list_tags(&self, start: u64, limit: u32) -> Result<Page<TagEntry>> {
        self.get(
            "/tags",
            &[("start", start.to_string()), ("limit", limit.to_string())],
        )
    }

    fn list_pull_requests(
        &self,
        branch: &str,
        state: PullRequestState,
        start: u64,
        limit: u32,
    ) -> Result<Page<PullRequestEntry>> {
        self.get(
            "/pull-requests",
            &[
                ("state", state.as_str().to_string()),
                ("order", "NEWEST".to_string()),
                ("at", branch.to_string()),
                ("start", start.to_string()),
                ("limit", limit.to_string()),
            ],
        )
    }

    fn get_commit(&self, hash: &str) -> Result<CommitEntry> {
        self.get(&format!("/commits/{}", hash), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{basic_auth, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REPO: &str = "/rest/api/1.0/projects/P/repos/r";

    /// Local stub server; the runtime only drives setup and must outlive the test
    fn stub_server() -> (Runtime, MockServer) {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        (runtime, server)
    }

    fn client_for(server: &MockServer) -> BitbucketClient {
        BitbucketClient::new(format!("{}/projects/P/repos/r", server.uri()), "ci", "secret")
            .unwrap()
    }

    #[test]
    fn test_rest_base_url_from_browser_url() {
        assert_eq!(
            rest_base_url("https://bitbucket.example.com/projects/FOO/repos/bar/"),
            "https://bitbucket.example.com/rest/api/1.0/projects/FOO/repos/bar"
        );
    }

    #[test]
    fn test_rest_base_url_keeps_rest_url() {
        let url = "https://bitbucket.example.com/rest/api/1.0/projects/FOO/repos/bar";
        assert_eq!(rest_base_url(url), url);
    }

    #[test]
    fn test_rest_base_url_with_context_path() {
        assert_eq!(
            rest_base_url("https://example.com/bitbucket/projects/A/repos/b"),
            "https://example.com/bitbucket/rest/api/1.0/projects/A/repos/b"
        );
    }

    #[test]
    fn test_rest_base_url_unknown_shape_is_kept() {
        assert_eq!(rest_base_url(" http://localhost:7990/api "), "http://localhost:7990/api");
    }

    #[test]
    fn test_client_resolves_base_url() {
        let client =
            BitbucketClient::new("https://host/projects/P/repos/r", "user", "secret").unwrap();
        assert_eq!(client.base_url(), "https://host/rest/api/1.0/projects/P/repos/r");
    }

    #[test]
    fn test_list_tags_decodes_page() {
        let (runtime, server) = stub_server();
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path(format!("{}/tags", REPO)))
                .and(query_param("start", "0"))
                .and(query_param("limit", "20"))
                .and(header("accept", "application/json"))
                .and(basic_auth("ci", "secret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "size": 2,
                    "isLastPage": false,
                    "nextPageStart": 2,
                    "values": [
                        {"id": "refs/tags/v1.1.0", "displayId": "v1.1.0", "latestCommit": "aaa"},
                        {"id": "refs/tags/v1.0.0", "displayId": "v1.0.0", "latestCommit": "bbb"}
                    ]
                })))
                .expect(1)
                .mount(&server),
        );

        let page = client_for(&server).list_tags(0, 20).unwrap();
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[0], TagEntry::new("v1.1.0", "aaa"));
        assert_eq!(page.next_page_start, Some(2));
        assert!(page.has_more());
    }

    #[test]
    fn test_list_pull_requests_sends_filters() {
        let (runtime, server) = stub_server();
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path(format!("{}/pull-requests", REPO)))
                .and(query_param("state", "MERGED"))
                .and(query_param("order", "NEWEST"))
                .and(query_param("at", "refs/heads/master"))
                .and(query_param("start", "30"))
                .and(query_param("limit", "30"))
                .and(basic_auth("ci", "secret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "isLastPage": true,
                    "values": [{
                        "id": 17,
                        "title": "Minor: add exports",
                        "updatedDate": 1714564800000i64,
                        "fromRef": {"id": "refs/heads/feature/exports"}
                    }]
                })))
                .expect(1)
                .mount(&server),
        );

        let page = client_for(&server)
            .list_pull_requests("refs/heads/master", PullRequestState::Merged, 30, 30)
            .unwrap();
        assert_eq!(
            page.values,
            vec![PullRequestEntry::new(
                17,
                "Minor: add exports",
                1_714_564_800_000,
                "refs/heads/feature/exports"
            )]
        );
        assert!(!page.has_more());
    }

    #[test]
    fn test_get_commit() {
        let (runtime, server) = stub_server();
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path(format!("{}/commits/abc123", REPO)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "id": "abc123",
                    "message": "Merge pull request #17 in P/r",
                    "authorTimestamp": 1714564800000i64
                })))
                .mount(&server),
        );

        let commit = client_for(&server).get_commit("abc123").unwrap();
        assert_eq!(commit.message.as_deref(), Some("Merge pull request #17 in P/r"));
        assert_eq!(commit.authored_at().unwrap().timestamp(), 1_714_564_800);
    }

    #[test]
    fn test_error_status_is_remote_error() {
        let (runtime, server) = stub_server();
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path(format!("{}/commits/deadbeef", REPO)))
                .respond_with(ResponseTemplate::new(404).set_body_string("No such commit"))
                .mount(&server),
        );

        let err = client_for(&server).get_commit("deadbeef").unwrap_err();
        match err {
            PrSemverError::Remote(msg) => {
                assert!(msg.contains("404"), "unexpected message: {}", msg);
                assert!(msg.contains("No such commit"), "unexpected message: {}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let (runtime, server) = stub_server();
        runtime.block_on(
            Mock::given(method("GET"))
                .and(path(format!("{}/tags", REPO)))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
                .mount(&server),
        );

        let result = client_for(&server).list_tags(0, 20);
        assert!(matches!(result, Err(PrSemverError::Http(_))));
    }
}
