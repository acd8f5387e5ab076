use evaluator::client::{EngineClient, EngineConfig};
use evaluator::executors::run_relevance_feedback;
use medeval_core::Topic;
use std::io::Write as _;
use tempfile::NamedTempFile;

fn offline_client() -> EngineClient {
    // never contacted in these tests
    let cfg = EngineConfig {
        url: "http://localhost:1".into(),
        username: "elastic".into(),
        password: "unused".into(),
        ca_cert: None,
        timeout_secs: 1,
    };
    EngineClient::new(&cfg, "med_documents_v1").unwrap()
}

#[tokio::test]
async fn no_judgments_means_no_output_and_no_request() {
    let mut qrels = NamedTempFile::new().unwrap();
    writeln!(qrels, "7 0 1234 1").unwrap();

    let topic = Topic {
        num: "5".into(),
        title: "heart attack".into(),
        desc: "risk factors".into(),
    };
    let mut out = Vec::new();
    // query 5 has no rows, so the executor returns before any engine call
    run_relevance_feedback(&offline_client(), &topic, qrels.path(), &mut out)
        .await
        .unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn missing_qrels_file_is_an_error() {
    let topic = Topic { num: "5".into(), title: "t".into(), desc: "d".into() };
    let mut out = Vec::new();
    let err = run_relevance_feedback(
        &offline_client(),
        &topic,
        std::path::Path::new("/nonexistent/qrels"),
        &mut out,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("qrels"));
}
