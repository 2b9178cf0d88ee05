//! PubMed E-utilities client.
//!
//! Two sequential calls per run:
//! - `esearch` resolves a query into a list of PMIDs (JSON)
//! - `efetch` returns the full records for those PMIDs (XML)
//!
//! A single page of up to `max_results` IDs is requested. Any non-success
//! status is returned as an error; nothing is retried.

use crate::error::{OptionExt, PapersError, Result};
use crate::parser::parse_pubmed_xml;
use crate::record::RawRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// NCBI E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// IDs requested from esearch (one page)
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tool name reported to NCBI
const TOOL_NAME: &str = "get-papers-list";

const DATABASE: &str = "pubmed";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// E-utilities base URL (`esearch.fcgi` and `efetch.fcgi` are resolved against it)
    pub base_url: String,
    /// esearch `retmax`
    pub max_results: u32,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// PubMed search and fetch client
pub struct PubmedClient {
    client: reqwest::Client,
    search_url: Url,
    fetch_url: Url,
    max_results: u32,
}

impl PubmedClient {
    /// Create a new PubmedClient
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| PapersError::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        let search_url = base
            .join("esearch.fcgi")
            .map_err(|e| PapersError::Config(format!("Invalid esearch URL: {}", e)))?;
        let fetch_url = base
            .join("efetch.fcgi")
            .map_err(|e| PapersError::Config(format!("Invalid efetch URL: {}", e)))?;

        if config.max_results == 0 {
            return Err(PapersError::Config("max_results must be at least 1".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", TOOL_NAME, env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| PapersError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_url,
            fetch_url,
            max_results: config.max_results,
        })
    }

    /// Resolve a query into PubMed IDs, in relevance order.
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PapersError::Validation("search query must not be empty".to_string()));
        }

        info!(query = query, max_results = self.max_results, "Searching PubMed");

        let retmax = self.max_results.to_string();
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("db", DATABASE),
                ("term", query),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
                ("tool", TOOL_NAME),
            ])
            .send()
            .await?;

        let body = check_status(response, "esearch").await?;
        let ids = parse_search_response(&body)?;

        info!(count = ids.len(), "PubMed search complete");
        Ok(ids)
    }

    /// Fetch full records for `ids`, in response order.
    pub async fn fetch(&self, ids: &[String]) -> Result<Vec<RawRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids.join(",");
        debug!(count = ids.len(), ids = %id_list, "Fetching PubMed records");

        let response = self
            .client
            .get(self.fetch_url.clone())
            .query(&[
                ("db", DATABASE),
                ("id", id_list.as_str()),
                ("retmode", "xml"),
                ("tool", TOOL_NAME),
            ])
            .send()
            .await?;

        let body = check_status(response, "efetch").await?;
        let records = parse_pubmed_xml(&body)?;

        let missing = missing_ids(ids, &records);
        if !missing.is_empty() {
            warn!(
                count = missing.len(),
                ids = %missing.join(","),
                "PubMed returned no record for some requested IDs"
            );
        }

        info!(requested = ids.len(), fetched = records.len(), "PubMed fetch complete");
        Ok(records)
    }
}

async fn check_status(response: reqwest::Response, endpoint: &str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(PapersError::Api {
            code: status.as_u16() as i32,
            message: format!("PubMed {} error: {}", endpoint, status),
        });
    }
    Ok(response.text().await?)
}

/// Requested IDs with no matching record, in request order
fn missing_ids<'a>(requested: &'a [String], records: &[RawRecord]) -> Vec<&'a str> {
    let fetched: HashSet<&str> = records.iter().map(|r| r.pmid.as_str()).collect();
    requested
        .iter()
        .map(String::as_str)
        .filter(|id| !fetched.contains(id))
        .collect()
}

// === esearch Response Types ===

#[derive(Debug, Deserialize)]
struct SearchResponse {
    esearchresult: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    idlist: Option<Vec<String>>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
}

/// Extract the ID list from an esearch JSON body
fn parse_search_response(body: &str) -> Result<Vec<String>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let result = response
        .esearchresult
        .ok_or_parse("esearch response is missing 'esearchresult'")?;

    if let Some(message) = result.error {
        return Err(PapersError::Api { code: 0, message });
    }

    result.idlist.ok_or_parse("esearch response is missing 'idlist'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{"header":{"type":"esearch","version":"0.3"},
            "esearchresult":{"count":"2","retmax":"2","retstart":"0","idlist":["111","222"]}}"#;
        assert_eq!(parse_search_response(body).unwrap(), vec!["111", "222"]);
    }

    #[test]
    fn test_parse_search_response_empty() {
        let body = r#"{"esearchresult":{"count":"0","idlist":[]}}"#;
        assert!(parse_search_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_response_malformed() {
        assert!(matches!(
            parse_search_response(r#"{"header":{}}"#),
            Err(PapersError::Parse(_))
        ));
        assert!(matches!(
            parse_search_response(r#"{"esearchresult":{"count":"0"}}"#),
            Err(PapersError::Parse(_))
        ));
        assert!(matches!(parse_search_response("not json"), Err(PapersError::Json(_))));
    }

    #[test]
    fn test_parse_search_response_error_field() {
        let body = r#"{"esearchresult":{"ERROR":"Invalid query"}}"#;
        match parse_search_response(body) {
            Err(PapersError::Api { message, .. }) => assert_eq!(message, "Invalid query"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_ids() {
        let requested: Vec<String> = ["1", "2", "3", "4"].iter().map(|s| s.to_string()).collect();
        let records = vec![RawRecord::new("3"), RawRecord::new("1")];
        assert_eq!(missing_ids(&requested, &records), vec!["2", "4"]);
        assert!(missing_ids(&requested[..1], &records).is_empty());
    }

    #[test]
    fn test_client_urls() {
        let client = PubmedClient::new(ClientConfig {
            base_url: "http://localhost:8080/eutils".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.search_url.as_str(), "http://localhost:8080/eutils/esearch.fcgi");
        assert_eq!(client.fetch_url.as_str(), "http://localhost:8080/eutils/efetch.fcgi");
    }

    #[test]
    fn test_client_rejects_bad_config() {
        let bad_url = PubmedClient::new(ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(bad_url, Err(PapersError::Config(_))));

        let zero = PubmedClient::new(ClientConfig {
            max_results: 0,
            ..Default::default()
        });
        assert!(matches!(zero, Err(PapersError::Config(_))));
    }
}
