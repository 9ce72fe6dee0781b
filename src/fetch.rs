//! Search API client implementation using reqwest.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::RepositoryRecord;

/// Public GitHub API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const SEARCH_PATH: &str = "/search/repositories";
const SEARCH_QUERY: [(&str, &str); 4] = [
    ("q", "stars:>1"),
    ("sort", "stars"),
    ("order", "desc"),
    ("per_page", "100"),
];
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Blocking client for the repository search endpoint.
#[derive(Clone)]
pub struct RepositoryFetcher {
    token: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for RepositoryFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryFetcher")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl RepositoryFetcher {
    /// Create a client for the public GitHub API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    /// Create a client against another API root, e.g. a mock server.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }

    /// Fetch the 100 most-starred repositories in API ranking order.
    pub fn fetch_top_repositories(&self) -> Result<Vec<RepositoryRecord>> {
        let response = self
            .client
            .get(self.search_url())
            .query(&SEARCH_QUERY)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GITHUB_JSON)
            .header(USER_AGENT, concat!("repostats/", env!("CARGO_PKG_VERSION")))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
            });
        }
        info!(
            status = status.as_u16(),
            "The git api search request was successful"
        );

        let body: Value = response
            .json()
            .map_err(|e| Error::Schema(format!("response body is not JSON: {e}")))?;
        parse_search_response(body)
    }
}

/// Decode the `items` array of a search response.
pub fn parse_search_response(body: Value) -> Result<Vec<RepositoryRecord>> {
    let items = match body {
        Value::Object(mut object) => object
            .remove("items")
            .ok_or_else(|| Error::Schema("missing 'items' array".to_string()))?,
        _ => return Err(Error::Schema("response is not a JSON object".to_string())),
    };

    let Value::Array(items) = items else {
        return Err(Error::Schema("'items' is not an array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::Schema(format!("item {index} is malformed: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item(name: &str, watchers: u64) -> Value {
        json!({
            "name": name,
            "description": null,
            "url": format!("https://api.github.com/repos/acme/{name}"),
            "created_at": "2014-03-01T12:00:00Z",
            "watchers_count": watchers,
            "size": 1024,
            "forks_count": 3,
            "has_projects": true,
            "open_issues_count": 7,
            "stargazers_count": watchers
        })
    }

    #[test]
    fn test_fetch_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "stars:>1".into()),
                Matcher::UrlEncoded("sort".into(), "stars".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .match_header("accept", GITHUB_JSON)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "total_count": 2, "items": [item("alpha", 10), item("beta", 20)] }).to_string())
            .create();

        let fetcher = RepositoryFetcher::with_base_url("test-token", server.url());
        let records = fetcher.fetch_top_repositories().unwrap();

        mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "alpha");
        assert_eq!(records[1].watchers_count, 20);
        assert_eq!(records[0].description, None);
        assert!(records[0].has_projects);
    }

    #[test]
    fn test_fetch_failure_status_is_not_parsed() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .expect(1)
            .create();

        let fetcher = RepositoryFetcher::with_base_url("bad-token", server.url());
        let err = fetcher.fetch_top_repositories().unwrap_err();

        mock.assert();
        assert!(matches!(err, Error::Fetch { status: 403 }));
    }

    #[test]
    fn test_missing_items_is_schema_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total_count": 0}"#)
            .create();

        let fetcher = RepositoryFetcher::with_base_url("t", server.url());
        assert!(matches!(
            fetcher.fetch_top_repositories(),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_malformed_item_names_index() {
        let mut broken = item("gamma", 1);
        broken.as_object_mut().unwrap().remove("created_at");

        let err = parse_search_response(json!({ "items": [item("ok", 1), broken] })).unwrap_err();
        assert!(err.to_string().contains("item 1"));
    }

    #[test]
    fn test_items_must_be_array() {
        assert!(matches!(
            parse_search_response(json!({ "items": {} })),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            parse_search_response(json!([])),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let fetcher = RepositoryFetcher::new("ghp_secret");
        let rendered = format!("{fetcher:?}");
        assert!(!rendered.contains("ghp_secret"));
    }
}
