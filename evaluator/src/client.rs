use anyhow::{anyhow, Context, Result};
use medeval_core::Document;
use reqwest::{Certificate, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::time::Duration;

/// Engine connection settings. Credentials come from the environment so they
/// never live in the source tree.
pub struct EngineConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub ca_cert: Option<String>,
    pub timeout_secs: u64,
}

impl EngineConfig {
    pub fn from_env(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            url: std::env::var("ENGINE_URL").unwrap_or_else(|_| "https://localhost:9200".into()),
            username: std::env::var("ENGINE_USERNAME").context("ENGINE_USERNAME not set")?,
            password: std::env::var("ENGINE_PASSWORD").context("ENGINE_PASSWORD not set")?,
            ca_cert: std::env::var("ENGINE_CA_CERT").ok(),
            timeout_secs,
        })
    }
}

/// Thin wrapper over the engine's JSON-over-HTTPS API, scoped to one index.
/// All calls are plain request/response with a fixed timeout and no retries.
pub struct EngineClient {
    http: Client,
    base: String,
    index: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    pub hits: Vec<EngineHit>,
}

#[derive(Debug, Deserialize)]
pub struct EngineHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
}

impl EngineClient {
    pub fn new(cfg: &EngineConfig, index: &str) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(path) = &cfg.ca_cert {
            let pem = fs::read(path)
                .with_context(|| format!("reading CA certificate {}", path))?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        }
        Ok(Self {
            http: builder.build()?,
            base: cfg.url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/{}", self.base, self.index)
        } else {
            format!("{}/{}/{}", self.base, self.index, path)
        }
    }

    /// Creates the index with its settings and field mappings. Returns false
    /// if the index was already there.
    pub async fn create_index(&self) -> Result<bool> {
        let resp = self
            .http
            .put(self.url(""))
            .basic_auth(&self.username, Some(&self.password))
            .json(&index_settings())
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        let body = resp.text().await.unwrap_or_default();
        if body.contains("resource_already_exists_exception") {
            return Ok(false);
        }
        Err(anyhow!("create index failed: {} {}", status, body))
    }

    /// Upserts one document under its medline_ui, so re-ingesting the corpus
    /// overwrites rather than duplicates.
    pub async fn index_document(&self, doc: &Document) -> Result<()> {
        let resp = self
            .http
            .put(self.url(&format!("_doc/{}", doc.medline_ui)))
            .basic_auth(&self.username, Some(&self.password))
            .json(doc)
            .send()
            .await?;
        self.expect_success(resp, "index document").await?;
        Ok(())
    }

    pub async fn get_document(&self, id: u32) -> Result<Value> {
        let resp = self
            .http
            .get(self.url(&format!("_doc/{}", id)))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        self.expect_success(resp, "get document").await
    }

    pub async fn search(&self, body: Value) -> Result<Vec<EngineHit>> {
        let resp = self
            .http
            .post(self.url("_search"))
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("search failed: {} {}", status, text));
        }
        let parsed: SearchResponse = resp.json().await.context("decoding search response")?;
        Ok(parsed.hits.hits)
    }

    pub async fn rank_eval(&self, body: Value) -> Result<Value> {
        let resp = self
            .http
            .post(self.url("_rank_eval"))
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        self.expect_success(resp, "rank eval").await
    }

    async fn expect_success(&self, resp: reqwest::Response, what: &str) -> Result<Value> {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!("{} failed: {} {}", what, status, text));
        }
        serde_json::from_str(&text).with_context(|| format!("decoding {} response", what))
    }
}

/// Index settings: 2 shards / 2 replicas, integer keys, text everywhere else.
fn index_settings() -> Value {
    json!({
        "settings": {
            "index": {
                "number_of_shards": 2,
                "number_of_replicas": 2
            }
        },
        "mappings": {
            "properties": {
                "seq_id": { "type": "integer" },
                "medline_ui": { "type": "integer" },
                "source": { "type": "text" },
                "mesh_terms": { "type": "text" },
                "title": { "type": "text" },
                "publication_type": { "type": "text" },
                "abstract": { "type": "text" },
                "authors": { "type": "text" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EngineConfig {
        EngineConfig {
            url: "http://localhost:9200/".into(),
            username: "elastic".into(),
            password: "secret".into(),
            ca_cert: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn urls_are_scoped_to_the_index() {
        let client = EngineClient::new(&test_config(), "med_documents_v1").unwrap();
        assert_eq!(client.url(""), "http://localhost:9200/med_documents_v1");
        assert_eq!(
            client.url("_search"),
            "http://localhost:9200/med_documents_v1/_search"
        );
        assert_eq!(
            client.url("_doc/54725"),
            "http://localhost:9200/med_documents_v1/_doc/54725"
        );
    }

    #[test]
    fn mapping_covers_all_corpus_fields() {
        let settings = index_settings();
        let props = settings["mappings"]["properties"].as_object().unwrap();
        assert_eq!(props.len(), 8);
        assert_eq!(props["medline_ui"]["type"], "integer");
        assert_eq!(props["abstract"]["type"], "text");
        assert_eq!(settings["settings"]["index"]["number_of_shards"], 2);
    }
}
