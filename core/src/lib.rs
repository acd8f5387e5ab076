pub mod blocks;
pub mod corpus;
pub mod qrels;
pub mod topics;
pub mod trec;

use serde::Serialize;

/// One OHSUMED citation. `medline_ui` is the primary key and becomes the
/// engine document id, so duplicates upsert rather than accumulate.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq_id: Option<u32>,
    pub medline_ui: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mesh_terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_type: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
}

/// One retrieval topic from the OHSU query file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub num: String,
    pub title: String,
    pub desc: String,
}
