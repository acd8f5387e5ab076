use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evaluator::client::{EngineClient, EngineConfig};
use evaluator::executors;
use medeval_core::{corpus, topics, Topic};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "evaluator")]
#[command(about = "Index the OHSUMED corpus and evaluate retrieval strategies", long_about = None)]
struct Cli {
    /// Engine index name
    #[arg(long, default_value = "med_documents_v1")]
    index: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the index with its settings and field mappings
    CreateIndex,
    /// Parse the corpus flat file and upsert every document into the engine
    Index {
        /// Path to the OHSUMED corpus file
        #[arg(long)]
        corpus: String,
    },
    /// Run all five retrieval strategies over the topic file
    Run {
        /// Path to the topic (query) file
        #[arg(long)]
        topics: String,
        /// Path to the relevance judgment file
        #[arg(long)]
        qrels: String,
        /// Directory for the five run files
        #[arg(long, default_value = "./runs")]
        out_dir: String,
        /// Document id to fetch as a connectivity probe before the run
        #[arg(long)]
        probe_id: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let cfg = EngineConfig::from_env(cli.timeout_secs)?;
    let client = EngineClient::new(&cfg, &cli.index)?;

    match cli.command {
        Commands::CreateIndex => create_index(&client).await,
        Commands::Index { corpus } => index_corpus(&client, &corpus).await,
        Commands::Run { topics, qrels, out_dir, probe_id } => {
            run_all(&client, &topics, &qrels, &out_dir, probe_id).await
        }
    }
}

async fn create_index(client: &EngineClient) -> Result<()> {
    if client.create_index().await? {
        tracing::info!(index = client.index(), "index created");
    } else {
        tracing::info!(index = client.index(), "index already exists");
    }
    Ok(())
}

async fn index_corpus(client: &EngineClient, corpus_path: &str) -> Result<()> {
    let file = File::open(corpus_path)
        .with_context(|| format!("opening corpus file {}", corpus_path))?;
    let mut docs = corpus::documents(BufReader::new(file));

    let mut indexed = 0usize;
    let mut failed = 0usize;
    for doc in docs.by_ref() {
        let doc = doc?;
        if let Err(e) = client.index_document(&doc).await {
            tracing::error!(medline_ui = doc.medline_ui, error = %e, "index call failed");
            failed += 1;
            continue;
        }
        indexed += 1;
        if indexed % 1000 == 0 {
            tracing::info!(indexed, "progress");
        }
    }
    tracing::info!(indexed, failed, skipped = docs.skipped, "corpus ingest complete");
    Ok(())
}

async fn run_all(
    client: &EngineClient,
    topics_path: &str,
    qrels_path: &str,
    out_dir: &str,
    probe_id: Option<u32>,
) -> Result<()> {
    let file = File::open(topics_path)
        .with_context(|| format!("opening topic file {}", topics_path))?;
    let topics = topics::parse_topics(BufReader::new(file))?;
    tracing::info!(topics = topics.len(), "topics loaded");

    if let Some(id) = probe_id {
        client
            .get_document(id)
            .await
            .context("connectivity probe failed")?;
    }

    let dir = Path::new(out_dir);
    fs::create_dir_all(dir)?;
    // one file per strategy, opened once and appended to across all topics
    let mut bool_out = BufWriter::new(File::create(dir.join("boolean_retrieval.txt"))?);
    let mut tf_out = BufWriter::new(File::create(dir.join("tf.txt"))?);
    let mut tf_idf_out = BufWriter::new(File::create(dir.join("tf-idf.txt"))?);
    let mut relevance_out = BufWriter::new(File::create(dir.join("relevance.txt"))?);
    let mut custom_out = BufWriter::new(File::create(dir.join("custom.txt"))?);

    let qrels = Path::new(qrels_path);
    for topic in &topics {
        report(executors::run_boolean(client, topic, &mut bool_out).await, topic, "bool");
        report(executors::run_phrase(client, topic, &mut tf_out).await, topic, "tf");
        report(executors::run_tf_idf(client, topic, &mut tf_idf_out).await, topic, "tf-idf");
        report(
            executors::run_relevance_feedback(client, topic, qrels, &mut relevance_out).await,
            topic,
            "relevance",
        );
        report(executors::run_custom(client, topic, &mut custom_out).await, topic, "custom");
    }

    bool_out.flush()?;
    tf_out.flush()?;
    tf_idf_out.flush()?;
    relevance_out.flush()?;
    custom_out.flush()?;
    tracing::info!(out_dir, "run complete");
    Ok(())
}

// an executor failure aborts that query/method pair only, never the run
fn report(result: Result<()>, topic: &Topic, method: &str) {
    if let Err(e) = result {
        tracing::error!(query = %topic.num, method, error = %e, "executor failed");
    }
}
