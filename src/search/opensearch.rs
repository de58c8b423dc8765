//! OpenSearch HTTP implementation of [`SearchIndex`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{SearchError, SearchIndex, SearchOptions, SearchResult};
use crate::config::SearchConfig;

pub struct OpenSearchClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    index: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: SessionDocument,
}

#[derive(Debug, Deserialize)]
struct SessionDocument {
    id: i64,
}

impl OpenSearchClient {
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SearchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            index: config.sessions_index.clone(),
        })
    }

    /// Build a request with optional basic auth.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, &url);
        match &self.username {
            Some(username) => req.basic_auth(username, self.password.as_deref()),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> SearchResult<reqwest::Response> {
        req.send()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))
    }
}

/// Request body: the caller's query restricted to one project.
fn search_body(project_id: i64, query: &str, options: &SearchOptions) -> SearchResult<Value> {
    let mut bool_query = json!({
        "filter": [{ "term": { "project_id": project_id } }]
    });
    if !query.trim().is_empty() {
        let parsed: Value =
            serde_json::from_str(query).map_err(|e| SearchError::InvalidQuery(e.to_string()))?;
        if !parsed.is_object() {
            return Err(SearchError::InvalidQuery(
                "query must be a JSON object".to_string(),
            ));
        }
        bool_query["must"] = json!([parsed]);
    }

    let mut body = json!({
        "size": options.max_results,
        "sort": [{ options.sort_field.as_str(): { "order": options.sort_order.as_str() } }],
        "_source": options.include_fields,
        "query": { "bool": bool_query },
    });
    if let Some(after) = options.search_after {
        body["search_after"] = json!([after]);
    }
    Ok(body)
}

#[async_trait]
impl SearchIndex for OpenSearchClient {
    #[instrument(skip(self, query, options), fields(index = %self.index))]
    async fn search_session_ids(
        &self,
        project_id: i64,
        query: &str,
        options: &SearchOptions,
    ) -> SearchResult<Vec<i64>> {
        let body = search_body(project_id, query, options)?;

        let resp = self
            .send(
                self.request(reqwest::Method::POST, &format!("/{}/_search", self.index))
                    .json(&body),
            )
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        let ids: Vec<i64> = parsed.hits.hits.into_iter().map(|h| h.source.id).collect();

        debug!(
            project_id,
            search_after = ?options.search_after,
            hits = ids.len(),
            "Search page fetched"
        );
        Ok(ids)
    }

    async fn delete(&self, index: &str, id: i64) -> SearchResult<()> {
        let resp = self
            .send(self.request(reqwest::Method::DELETE, &format!("/{index}/_doc/{id}")))
            .await?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SearchError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
