use crate::client::{EngineClient, EngineHit};
use crate::queries;
use anyhow::{Context, Result};
use medeval_core::qrels;
use medeval_core::trec::{write_run, RankedHit};
use medeval_core::Topic;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// How many judgment rows feed one rank-evaluation request.
const FEEDBACK_DEPTH: usize = 20;

fn to_ranked(hits: Vec<EngineHit>) -> Vec<RankedHit> {
    hits.into_iter()
        .map(|h| RankedHit { doc_id: h.id, score: h.score.unwrap_or(0.0) })
        .collect()
}

pub async fn run_boolean<W: Write>(
    client: &EngineClient,
    topic: &Topic,
    out: &mut W,
) -> Result<()> {
    let hits = client.search(queries::boolean(topic)).await?;
    write_run(out, &topic.num, &to_ranked(hits), "bool")?;
    Ok(())
}

pub async fn run_phrase<W: Write>(
    client: &EngineClient,
    topic: &Topic,
    out: &mut W,
) -> Result<()> {
    let hits = client.search(queries::phrase(topic)).await?;
    write_run(out, &topic.num, &to_ranked(hits), "tf")?;
    Ok(())
}

pub async fn run_tf_idf<W: Write>(
    client: &EngineClient,
    topic: &Topic,
    out: &mut W,
) -> Result<()> {
    let hits = client.search(queries::tf_idf(topic)).await?;
    write_run(out, &topic.num, &to_ranked(hits), "tf-idf")?;
    Ok(())
}

pub async fn run_custom<W: Write>(
    client: &EngineClient,
    topic: &Topic,
    out: &mut W,
) -> Result<()> {
    let hits = client.search(queries::custom(topic)).await?;
    write_run(out, &topic.num, &to_ranked(hits), "custom")?;
    Ok(())
}

/// Relevance feedback: judge the topic's multi-field match against the qrels
/// rows for that topic. Topics with no judgments produce no output lines.
pub async fn run_relevance_feedback<W: Write>(
    client: &EngineClient,
    topic: &Topic,
    qrels_path: &Path,
    out: &mut W,
) -> Result<()> {
    let reader = BufReader::new(
        File::open(qrels_path)
            .with_context(|| format!("opening qrels file {}", qrels_path.display()))?,
    );
    let mut judgments = qrels::judgments_for(reader, &topic.num)?;
    if judgments.is_empty() {
        tracing::warn!(query = %topic.num, "no relevance judgments, skipping rank evaluation");
        return Ok(());
    }
    judgments.truncate(FEEDBACK_DEPTH);

    let body = queries::rank_eval(client.index(), topic, &judgments);
    let result = client.rank_eval(body).await?;
    let hits = rank_eval_hits(&result, &topic.num)?;
    write_run(out, &topic.num, &hits, "relevance")?;
    Ok(())
}

/// Pulls the per-query hit list out of a rank-evaluation response
/// (`details.{num}.hits[].hit`), keeping the engine's ordering.
pub fn rank_eval_hits(result: &Value, num: &str) -> Result<Vec<RankedHit>> {
    let hits = result["details"][num]["hits"]
        .as_array()
        .with_context(|| format!("rank_eval response has no details for query {}", num))?;
    Ok(hits
        .iter()
        .map(|entry| {
            let hit = &entry["hit"];
            let doc_id = match &hit["_id"] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            RankedHit { doc_id, score: hit["_score"].as_f64().unwrap_or(0.0) }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rank_eval_hits_keep_engine_order() {
        let response = json!({
            "metric_score": 0.5,
            "details": {
                "5": {
                    "hits": [
                        { "hit": { "_index": "med_documents_v1", "_id": "1234", "_score": 3.5 }, "rating": 1 },
                        { "hit": { "_index": "med_documents_v1", "_id": "5678", "_score": 2.25 }, "rating": null }
                    ]
                }
            }
        });
        let hits = rank_eval_hits(&response, "5").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, "1234");
        assert_eq!(hits[0].score, 3.5);
        assert_eq!(hits[1].doc_id, "5678");
    }

    #[test]
    fn missing_details_is_an_error() {
        let response = json!({ "details": {} });
        assert!(rank_eval_hits(&response, "5").is_err());
    }
}
