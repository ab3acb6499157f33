//! Search lookup via the DuckDuckGo Instant Answer API.
//!
//! Builds one GET against the fixed endpoint, parses the JSON topic list,
//! and renders the results as numbered lines. The endpoint answers
//! directly, so no redirect handling is involved.

use log::debug;
use serde::Deserialize;

use crate::config::SEARCH_ENDPOINT_HOST;
use crate::error_handling::FetchError;
use crate::render::strip_tags;
use crate::request::build_request;
use crate::response::HttpResponse;
use crate::transport::Transport;
use crate::url::{NormalizedUrl, Scheme};

/// One search hit, in the order the endpoint returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Topic title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Short description, when the endpoint provided one.
    pub snippet: Option<String>,
}

/// Wire shape of the Instant Answer payload. Topic groups nest their
/// entries one level deeper under `Topics`.
#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    #[serde(rename = "Result")]
    result: Option<String>,
    #[serde(rename = "Topics", default)]
    topics: Vec<RelatedTopic>,
}

/// Runs one search lookup and renders the topic list.
///
/// # Errors
///
/// Returns `SearchUnavailable` when the endpoint cannot be reached or
/// answers with a non-2xx status, and `MalformedResponse` when the body is
/// not valid JSON.
pub async fn search<T: Transport>(transport: &T, query: &str) -> Result<String, FetchError> {
    let url = search_url(query);
    debug!("Search query '{query}' -> {}", url.canonical());

    let request = build_request(&url);
    let raw = transport
        .round_trip(&url, request.as_bytes())
        .await
        .map_err(|e| FetchError::SearchUnavailable(e.to_string()))?;
    let response = HttpResponse::parse(&raw)?;

    if !response.is_success() {
        return Err(FetchError::SearchUnavailable(format!(
            "search endpoint answered with status {}",
            response.status
        )));
    }

    let results = parse_results(&response.body_text())?;
    Ok(render_results(&results))
}

/// Search request URL with the query URL-encoded into the query string.
fn search_url(query: &str) -> NormalizedUrl {
    NormalizedUrl {
        scheme: Scheme::Https,
        host: SEARCH_ENDPOINT_HOST.to_string(),
        port: 443,
        path: "/".to_string(),
        query: Some(format!(
            "q={}&format=json&no_redirect=1&no_html=1",
            urlencoding::encode(query)
        )),
    }
}

/// Parses the topic list, skipping entries without a usable title or URL
/// and flattening nested topic groups in source order.
fn parse_results(body: &str) -> Result<Vec<SearchResult>, FetchError> {
    let answer: InstantAnswer = serde_json::from_str(body).map_err(|e| {
        FetchError::MalformedResponse(format!("search payload is not valid JSON: {e}"))
    })?;

    let mut results = Vec::new();
    collect_topics(&answer.related_topics, &mut results);
    Ok(results)
}

fn collect_topics(topics: &[RelatedTopic], results: &mut Vec<SearchResult>) {
    for topic in topics {
        if !topic.topics.is_empty() {
            collect_topics(&topic.topics, results);
            continue;
        }
        let (Some(text), Some(first_url)) = (&topic.text, &topic.first_url) else {
            continue;
        };
        if text.is_empty() || first_url.is_empty() {
            continue;
        }
        results.push(SearchResult {
            title: text.clone(),
            url: first_url.clone(),
            snippet: topic.result.as_deref().map(strip_tags),
        });
    }
}

/// Formats results as numbered `title — url` lines.
fn render_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, result)| format!("{}. {} — {}", i + 1, result.title, result.url))
        .collect::<Vec<_>>()
        .join("\n")
}
